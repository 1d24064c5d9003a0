//! Frame timing for a variable-step loop.
//!
//! Motion is scaled by the measured wall-clock `dt` of each frame; there is no
//! fixed simulation step. `FpsCounter` reports how many frames completed in
//! each real-time second, driven by the same `dt` stream.

use std::time::Instant;

/// Frames longer than this are logged as hitches. They are not capped.
const HITCH_THRESHOLD_SECS: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished frame that took `dt` seconds.
    ///
    /// Returns the number of frames in the second that just ended, at most once
    /// per call. Several elapsed seconds collapse into a single report.
    pub fn tick(&mut self, dt: f64) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < 1.0 {
            return None;
        }
        self.elapsed = self.elapsed.fract();
        let frames = self.frames;
        self.frames = 0;
        Some(frames)
    }

    /// Frames counted since the last report.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[derive(Debug)]
pub struct FrameClock {
    pub real_dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            real_dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
        }
    }

    /// Measure the wall-clock delta since the previous frame and advance by it.
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if dt > HITCH_THRESHOLD_SECS {
            log::warn!("Frame took {:.1}ms", dt * 1000.0);
        }
        self.advance(dt);
        dt
    }

    /// Restart the measurement from now, discarding time spent while no frames
    /// ran (e.g. minimised). Counters are kept.
    pub fn reset(&mut self) {
        self.last_instant = Instant::now();
    }

    pub fn advance(&mut self, dt: f64) {
        self.real_dt = dt;
        self.total_time += dt;
        self.frame_count += 1;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

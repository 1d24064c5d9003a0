//! Per-frame game update: quit, plant, pan, zoom.
//!
//! The steps run in a fixed order against one input snapshot. Planting uses
//! the camera as it was at the start of the frame, before this frame's pan and
//! zoom are applied.

use glam::Vec2;
use rand::Rng;
use trees_core::input::{InputState, Key, MouseBtn};
use trees_overlay::TextCommand;
use trees_render::Camera2D;

use crate::atlas::SpriteAtlas;
use crate::batch::{PlantedTree, TreeBatch};
use crate::hud::Hud;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

const PAN_KEYS: [(Key, Vec2); 4] = [
    (Key::Left, Vec2::NEG_X),
    (Key::Right, Vec2::X),
    (Key::Down, Vec2::NEG_Y),
    (Key::Up, Vec2::Y),
];

/// Convert a cursor position in window pixels (origin top-left, y down) to
/// screen space (origin bottom-left, y up).
pub fn cursor_to_screen(mouse_position: (f64, f64), viewport_height: u32) -> Vec2 {
    Vec2::new(
        mouse_position.0 as f32,
        viewport_height as f32 - mouse_position.1 as f32,
    )
}

#[derive(Debug)]
pub struct Garden {
    pub camera: Camera2D,
    pub atlas: SpriteAtlas,
    pub batch: TreeBatch,
    pub hud: Hud,
}

impl Garden {
    pub fn new(camera: Camera2D, atlas: SpriteAtlas, font_scale: f32, author: &str) -> Self {
        let hud = Hud::new(&camera, font_scale, author);
        Self {
            camera,
            atlas,
            batch: TreeBatch::new(),
            hud,
        }
    }

    pub fn trees_planted(&self) -> u64 {
        self.hud.trees_planted()
    }

    pub fn update<R: Rng>(
        &mut self,
        input: &InputState,
        dt: f32,
        rng: &mut R,
    ) -> FrameOutcome {
        if input.is_just_pressed(Key::Escape) {
            return FrameOutcome::Quit;
        }

        if input.is_mouse_just_pressed(MouseBtn::Left) {
            let cursor = cursor_to_screen(input.mouse_position, self.camera.viewport.1);
            self.plant_at(cursor, rng);
        }

        let direction: Vec2 = PAN_KEYS
            .iter()
            .filter(|(key, _)| input.is_held(*key))
            .map(|(_, axis)| *axis)
            .sum();
        if direction != Vec2::ZERO {
            self.camera.pan(direction, dt);
        }

        self.camera.adjust_zoom(input.scroll_delta());
        FrameOutcome::Continue
    }

    /// Plant a random frame at the world point under `screen`.
    pub fn plant_at<R: Rng>(&mut self, screen: Vec2, rng: &mut R) {
        let frame_index = rng.gen_range(0..self.atlas.len());
        let position = self.camera.unproject(screen);
        self.batch.plant(PlantedTree {
            frame_index,
            position,
        });
        self.hud.record_planted();
        log::debug!(
            "Planted tree #{} (frame {}) at ({:.1}, {:.1})",
            self.hud.trees_planted(),
            frame_index,
            position.x,
            position.y
        );
    }

    pub fn text_commands(&self) -> Vec<TextCommand> {
        self.hud.render(&self.camera)
    }
}

//! Heads-up text: the instructions block and the planted-tree counter.
//!
//! The instructions are anchored once, from the camera as it is at startup,
//! and then live in world space: they pan and zoom with the trees. The counter
//! is re-anchored from a fixed screen offset every frame and scaled by the
//! inverse zoom, so it stays put on screen.

use glam::Vec2;
use trees_overlay::TextCommand;
use trees_render::Camera2D;

/// Screen offset of the counter's baseline from the top-left corner.
const COUNTER_OFFSET: Vec2 = Vec2::new(5.0, 25.0);

#[derive(Debug, Clone)]
pub struct Hud {
    instructions: TextCommand,
    font_scale: f32,
    trees_planted: u64,
}

impl Hud {
    pub fn new(camera: &Camera2D, font_scale: f32, author: &str) -> Self {
        let (w, h) = (camera.viewport.0 as f32, camera.viewport.1 as f32);
        let screen_anchor = Vec2::new(w / 1.20 - camera.position.x, h / 0.90 - camera.position.y);
        Self {
            instructions: TextCommand {
                text: instructions_text(author),
                origin: camera.unproject(screen_anchor),
                scale: font_scale,
            },
            font_scale,
            trees_planted: 0,
        }
    }

    pub fn record_planted(&mut self) {
        self.trees_planted += 1;
    }

    pub fn trees_planted(&self) -> u64 {
        self.trees_planted
    }

    pub fn counter(&self, camera: &Camera2D) -> TextCommand {
        let screen = Vec2::new(COUNTER_OFFSET.x, camera.viewport.1 as f32 - COUNTER_OFFSET.y);
        TextCommand {
            text: format!("Trees planted: {}", self.trees_planted),
            origin: camera.unproject(screen),
            scale: self.font_scale / camera.zoom,
        }
    }

    /// Text to draw this frame, back to front.
    pub fn render(&self, camera: &Camera2D) -> Vec<TextCommand> {
        vec![self.instructions.clone(), self.counter(camera)]
    }
}

fn instructions_text(author: &str) -> String {
    [
        "Controls:",
        "- Arrows: Move Camera",
        "- Scroll: Zoom",
        "- Left Click: Plant Tree",
        "",
        "Just have fun planting trees!",
        &format!("- {author}"),
    ]
    .join("\n")
}

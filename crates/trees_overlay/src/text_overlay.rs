//! World-anchored HUD text painted with egui on top of the sprite pass.
//!
//! Text is described in world space (`TextCommand`) so the caller decides
//! whether a block follows the camera or stays fixed on screen. Each frame the
//! commands are projected through the camera and painted on a foreground
//! layer. The camera already works in logical pixels, which are egui points;
//! only the y axis needs flipping.
//!
//! egui needs the same split render as any egui-wgpu integration because
//! `egui_wgpu::Renderer::render()` takes a `RenderPass<'static>`:
//!
//!   1. `prepare()` -- lay out text, produce tessellated primitives
//!   2. `upload()`  -- upload font textures and vertex buffers
//!   3. `paint()`   -- render into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use glam::Vec2;
use trees_render::Camera2D;
use winit::window::Window;

/// Cell height of the bitmap font the HUD was designed around (7x13).
pub const FONT_CELL_HEIGHT: f32 = 13.0;
/// Distance from the top of a line to its baseline in the same font.
pub const FONT_ASCENT: f32 = 11.0;

/// One block of text. `origin` is the world position of the first line's
/// baseline start; `scale` multiplies the font cell size in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub origin: Vec2,
    pub scale: f32,
}

/// Where a command lands in egui's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenText {
    /// Top-left of the first line, logical points, y down.
    pub top_left: egui::Pos2,
    pub font_size: f32,
}

/// Project a command through the camera into egui space.
pub fn layout_text(camera: &Camera2D, command: &TextCommand) -> ScreenText {
    let baseline = camera.project(command.origin);
    let screen_scale = command.scale * camera.zoom;
    let viewport_h = camera.viewport.1 as f32;
    ScreenText {
        top_left: egui::pos2(
            baseline.x,
            viewport_h - baseline.y - FONT_ASCENT * screen_scale,
        ),
        font_size: FONT_CELL_HEIGHT * screen_scale,
    }
}

pub struct TextOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl TextOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    /// Keep egui's view of the window (scale factor, size) current. The overlay
    /// has no widgets, so events are never consumed.
    pub fn handle_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.egui_winit_state.on_window_event(window, event);
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        camera: &Camera2D,
        commands: &[TextCommand],
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("hud_text"),
            ));
            for command in commands {
                let placed = layout_text(camera, command);
                painter.text(
                    placed.top_left,
                    egui::Align2::LEFT_TOP,
                    &command.text,
                    egui::FontId::monospace(placed.font_size.max(1.0)),
                    egui::Color32::WHITE,
                );
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        if !textures_delta.set.is_empty() {
            log::debug!("Uploading {} egui texture update(s)", textures_delta.set.len());
        }
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        if !textures_delta.free.is_empty() {
            log::debug!("Freeing {} egui texture(s)", textures_delta.free.len());
        }
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(origin: Vec2, scale: f32) -> TextCommand {
        TextCommand {
            text: "Trees planted: 0".to_string(),
            origin,
            scale,
        }
    }

    #[test]
    fn identity_camera_flips_y_and_lifts_to_line_top() {
        let camera = Camera2D::new(1024, 768);
        let placed = layout_text(&camera, &command(Vec2::new(5.0, 743.0), 2.0));
        assert!((placed.top_left.x - 5.0).abs() < 1e-3);
        // 768 - 743 = 25 px below the top edge, minus a 22 px ascent.
        assert!((placed.top_left.y - 3.0).abs() < 1e-3);
        assert!((placed.font_size - 26.0).abs() < 1e-3);
    }

    #[test]
    fn font_size_follows_zoom() {
        let mut camera = Camera2D::new(1024, 768);
        camera.zoom = 0.5;
        let placed = layout_text(&camera, &command(Vec2::ZERO, 2.0));
        assert!((placed.font_size - 13.0).abs() < 1e-3);
    }

    #[test]
    fn inverse_zoom_scale_keeps_screen_size() {
        for &zoom in &[0.2f32, 1.0, 1.7] {
            let mut camera = Camera2D::new(1024, 768);
            camera.zoom = zoom;
            let placed = layout_text(&camera, &command(Vec2::ZERO, 2.0 / zoom));
            assert!((placed.font_size - 26.0).abs() < 1e-3);
        }
    }

    #[test]
    fn panned_camera_moves_world_text() {
        let mut camera = Camera2D::new(1024, 768);
        camera.position += Vec2::new(100.0, 50.0);
        let placed = layout_text(&camera, &command(Vec2::new(612.0, 434.0), 1.0));
        // The baseline lands on the viewport center, lifted by one ascent.
        assert!((placed.top_left.x - 512.0).abs() < 1e-3);
        assert!((placed.top_left.y - (384.0 - 11.0)).abs() < 1e-3);
        assert!((placed.font_size - 13.0).abs() < 1e-3);
    }
}

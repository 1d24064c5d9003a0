//! Trees! -- plant random tree sprites on a pannable, zoomable meadow.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler` with
//! `ControlFlow::Poll`. Each `RedrawRequested` is one frame:
//!
//!   1. `begin_frame()` -- measure the wall-clock delta
//!   2. `Garden::update` -- quit / plant / pan / zoom from this frame's input
//!   3. Re-upload the tree mesh if the batch grew, write the camera uniform
//!   4. Clear to grass, draw the tree batch, paint HUD text through egui
//!   5. Present, clear edge-triggered input, tick the FPS counter
//!
//! Startup failures (config, spritesheet, window, GPU) are fatal: the error is
//! logged and the process exits with status 1.

mod assets;
mod atlas;
mod batch;
mod config;
mod garden;
mod hud;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::ThreadRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{load_picture, Picture};
use atlas::SpriteAtlas;
use config::{load_config_or_default, TreesConfig};
use garden::{FrameOutcome, Garden};
use trees_core::input::{InputState, Key, MouseBtn};
use trees_core::time::{FpsCounter, FrameClock};
use trees_overlay::TextOverlay;
use trees_platform::window::{logical_size, WindowConfig};
use trees_render::{
    clear_color_from_srgb8, GpuContext, SpritePipeline, SpriteVertex, Texture,
};

const DEFAULT_CONFIG_PATH: &str = "assets/config/trees.json";
/// Trackpads report pixels; this many pixels count as one wheel line.
const SCROLL_PIXELS_PER_LINE: f64 = 40.0;

/// All per-window state. Constructed in `ApplicationHandler::resumed` once the
/// window exists.
///
///  - **Core systems** (clock, input, garden) -- updated every frame
///  - **GPU resources** (pipeline, spritesheet, mesh and camera buffers)
///  - **Overlay** -- egui text for the HUD
struct EngineState {
    window: Arc<Window>,
    window_config: WindowConfig,
    gpu: GpuContext,
    clock: FrameClock,
    fps: FpsCounter,
    input: InputState,
    rng: ThreadRng,
    garden: Garden,
    tree_scale: f32,
    clear_color: wgpu::Color,
    sprite_pipeline: SpritePipeline,
    text_overlay: TextOverlay,

    sheet_bind_group: wgpu::BindGroup,

    // The tree mesh is rebuilt on the CPU when the batch changes, then streamed
    // into these buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    index_count: u32,
    uploaded_revision: Option<u64>,
    /// Set while the window has a zero-sized client area. No frames run.
    minimized: bool,
}

impl EngineState {
    fn new(
        window: Arc<Window>,
        config: &TreesConfig,
        sheet: &Picture,
        atlas: SpriteAtlas,
    ) -> Result<Self, String> {
        let window_config = config.window_config();
        let gpu = GpuContext::new(window.clone(), window_config.vsync)?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let text_overlay = TextOverlay::new(&gpu.device, gpu.surface_format, &window);

        let sheet_texture = Texture::from_rgba8(
            &gpu.device,
            &gpu.queue,
            sheet.rgba(),
            sheet.width(),
            sheet.height(),
            &config.spritesheet,
        );
        let sheet_bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &sheet_texture);

        let (viewport_w, viewport_h) = logical_size(window.inner_size(), window.scale_factor());
        let camera = config.camera(viewport_w, viewport_h);
        let garden = Garden::new(camera, atlas, config.hud.font_scale, &config.hud.author);

        let camera_uniform = garden.camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Ok(Self {
            window,
            window_config,
            gpu,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            input: InputState::new(),
            rng: rand::thread_rng(),
            garden,
            tree_scale: config.tree_scale,
            clear_color: clear_color_from_srgb8(config.background),
            sprite_pipeline,
            text_overlay,
            sheet_bind_group,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 1,
            mesh_index_capacity: 1,
            index_count: 0,
            uploaded_revision: None,
            minimized: false,
        })
    }

    fn sync_tree_mesh(&mut self) {
        let revision = self.garden.batch.revision();
        if self.uploaded_revision == Some(revision) {
            return;
        }
        let (vertices, indices) = self
            .garden
            .batch
            .build_mesh(&self.garden.atlas, self.tree_scale);
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
        self.index_count = indices.len() as u32;
        self.uploaded_revision = Some(revision);
        log::debug!("Tree mesh uploaded: {} trees", self.garden.batch.len());
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    /// Run one frame. Returns `Ok(FrameOutcome::Quit)` when the player asked to
    /// leave and `Err` when the surface can no longer be rendered to.
    fn frame(&mut self) -> Result<FrameOutcome, String> {
        let dt = self.clock.begin_frame();
        if self.garden.update(&self.input, dt as f32, &mut self.rng) == FrameOutcome::Quit {
            return Ok(FrameOutcome::Quit);
        }

        self.sync_tree_mesh();
        self.render()?;

        self.input.end_frame();
        if let Some(frames) = self.fps.tick(dt) {
            self.window
                .set_title(&self.window_config.title_with_fps(frames));
        }
        Ok(FrameOutcome::Continue)
    }

    fn render(&mut self) -> Result<(), String> {
        let camera_uniform = self.garden.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame()? else {
            return Ok(());
        };

        let text_commands = self.garden.text_commands();
        let (egui_primitives, egui_textures_delta) =
            self.text_overlay
                .prepare(&self.window, &self.garden.camera, &text_commands);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tree Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if self.index_count > 0 {
                render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_bind_group(1, &self.sheet_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        self.text_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Text Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.text_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.text_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

/// Assets loaded before the event loop starts, handed to the engine once the
/// window exists.
struct Startup {
    config: TreesConfig,
    sheet: Picture,
    atlas: SpriteAtlas,
}

struct App {
    window_config: WindowConfig,
    startup: Option<Startup>,
    state: Option<EngineState>,
    fatal_error: Option<String>,
}

impl App {
    fn new(startup: Startup) -> Self {
        Self {
            window_config: startup.config.window_config(),
            startup: Some(startup),
            state: None,
            fatal_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: String) {
        log::error!("{err}");
        self.fatal_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(startup) = self.startup.take() else {
            return;
        };
        let window = match trees_platform::window::create_window(event_loop, &self.window_config)
        {
            Ok(window) => window,
            Err(err) => {
                self.fail(event_loop, format!("Failed to create window: {err}"));
                return;
            }
        };
        match EngineState::new(window, &startup.config, &startup.sheet, startup.atlas) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, format!("Failed to initialise renderer: {err}")),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        state
            .text_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w == 0 || h == 0 {
                    if !state.minimized {
                        log::info!("Window minimised, pausing frames");
                    }
                    state.minimized = true;
                    return;
                }
                if state.minimized {
                    // Drop the time spent minimised so the next frame does not jump.
                    state.minimized = false;
                    state.clock.reset();
                    log::info!("Window restored");
                }
                state.gpu.resize(w, h);
                let (viewport_w, viewport_h) =
                    logical_size(physical_size, state.window.scale_factor());
                state.garden.camera.set_viewport(viewport_w, viewport_h);
                log::info!(
                    "Resized to {}x{} ({}x{} logical)",
                    w,
                    h,
                    viewport_w,
                    viewport_h
                );
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.input.mouse_position = (logical.x, logical.y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                state.input.scroll(scroll_lines(delta));
            }

            WindowEvent::RedrawRequested => {
                if state.minimized {
                    return;
                }
                match state.frame() {
                    Ok(FrameOutcome::Continue) => {}
                    Ok(FrameOutcome::Quit) => {
                        log::info!(
                            "Escape pressed, exiting after planting {} trees.",
                            state.garden.trees_planted()
                        );
                        event_loop.exit();
                    }
                    Err(err) => self.fail(event_loop, format!("Rendering failed: {err}")),
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Tree Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Tree Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        _ => None,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => (position.y / SCROLL_PIXELS_PER_LINE) as f32,
    }
}

fn load_startup(config_path: &Path) -> Result<Startup, String> {
    let config = load_config_or_default(config_path)?;
    let sheet = load_picture(Path::new(&config.spritesheet))
        .map_err(|e| format!("Failed to load spritesheet: {e}"))?;
    let atlas = SpriteAtlas::from_picture(&sheet, config.tile_size)?;
    Ok(Startup {
        config,
        sheet,
        atlas,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Trees! starting...");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let startup = match load_startup(&config_path) {
        Ok(startup) => startup,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(startup);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
    if app.fatal_error.is_some() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    #[test]
    fn arrow_keys_and_escape_are_mapped() {
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::ArrowRight), Some(Key::Right));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyW), None);
    }

    #[test]
    fn left_button_plants() {
        assert_eq!(map_mouse_button(MouseButton::Left), Some(MouseBtn::Left));
        assert_eq!(map_mouse_button(MouseButton::Right), None);
        assert_eq!(map_mouse_button(MouseButton::Back), None);
    }

    #[test]
    fn scroll_deltas_convert_to_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0));
        assert_eq!(scroll_lines(pixels), 2.0);
    }

    #[test]
    fn hidpi_window_starts_camera_at_logical_center() {
        let config = TreesConfig::default();
        let (w, h) = logical_size(PhysicalSize::new(2048, 1536), 2.0);
        let camera = config.camera(w, h);
        assert_eq!(camera.position, glam::Vec2::new(512.0, 384.0));
        assert_eq!(camera.viewport, (1024, 768));
    }

    #[test]
    fn hidpi_click_at_center_plants_at_center() {
        let sheet = Picture::from_rgba8(64, 32, vec![0; 64 * 32 * 4]);
        let atlas = SpriteAtlas::from_picture(&sheet, 32).expect("atlas");
        let (w, h) = logical_size(PhysicalSize::new(2048, 1536), 2.0);
        let config = TreesConfig::default();
        let mut garden = Garden::new(config.camera(w, h), atlas, 2.0, "Jordan");

        // winit reports the cursor in physical pixels; the loop converts it.
        let logical = PhysicalPosition::new(1024.0, 768.0).to_logical::<f64>(2.0);
        let mut input = InputState::new();
        input.mouse_position = (logical.x, logical.y);
        input.mouse_down(MouseBtn::Left);
        let mut rng = rand::thread_rng();
        garden.update(&input, 0.016, &mut rng);

        let tree = garden.batch.iter().last().expect("tree");
        assert!((tree.position - glam::Vec2::new(512.0, 384.0)).length() < 1e-3);
    }

    #[test]
    fn missing_spritesheet_is_fatal_at_startup() {
        let path = std::env::temp_dir().join(format!(
            "trees_main_test_{}_config.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "spritesheet": "does/not/exist.png" }"#)
            .expect("failed to write temp config");
        let err = load_startup(&path).err().expect("startup should fail");
        let _ = std::fs::remove_file(&path);
        assert!(err.contains("Failed to load spritesheet"));
        assert!(err.contains("does/not/exist.png"));
    }
}

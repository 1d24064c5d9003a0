use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Present in sync with the display refresh. Consumed by the GPU surface setup.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Trees!".to_string(),
            width: 1024,
            height: 768,
            vsync: true,
        }
    }
}

impl WindowConfig {
    /// Title with the frame rate of the last second appended.
    pub fn title_with_fps(&self, frames: u32) -> String {
        format!("{} | FPS: {}", self.title, frames)
    }
}

/// Window size in logical pixels, the unit the camera and cursor work in.
/// `WindowConfig` sizes are logical too, so a 1024x768 window reports
/// 1024x768 here at any scale factor.
pub fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical = size.to_logical::<u32>(scale_factor);
    (logical.width, logical.height)
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> Result<Arc<Window>, OsError> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_resizable(false);

    let window = event_loop.create_window(attrs)?;
    log::info!(
        "Window created: {}x{} (scale factor {})",
        config.width,
        config.height,
        window.scale_factor()
    );
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_fixed_1024x768() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "Trees!");
        assert_eq!((config.width, config.height), (1024, 768));
        assert!(config.vsync);
    }

    #[test]
    fn logical_size_divides_out_scale_factor() {
        assert_eq!(logical_size(PhysicalSize::new(1024, 768), 1.0), (1024, 768));
        assert_eq!(logical_size(PhysicalSize::new(2048, 1536), 2.0), (1024, 768));
        assert_eq!(logical_size(PhysicalSize::new(1536, 1152), 1.5), (1024, 768));
    }

    #[test]
    fn title_with_fps_appends_counter() {
        let config = WindowConfig::default();
        assert_eq!(config.title_with_fps(60), "Trees! | FPS: 60");
    }
}

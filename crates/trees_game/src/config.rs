//! Startup configuration loaded from JSON.
//!
//! Every field is optional; omitted fields take the values the demo was tuned
//! with. A missing file is not an error (the defaults are used), but a file
//! that exists and fails to parse or validate aborts startup.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use trees_platform::window::WindowConfig;
use trees_render::{Camera2D, ZoomLimits};

pub const CONFIG_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TreesConfig {
    pub version: String,
    pub window: WindowSection,
    pub spritesheet: String,
    pub tile_size: u32,
    pub tree_scale: f32,
    pub camera: CameraSection,
    pub hud: HudSection,
    pub background: [u8; 3],
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CameraSection {
    pub speed: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HudSection {
    pub font_scale: f32,
    pub author: String,
}

impl Default for TreesConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            window: WindowSection::default(),
            spritesheet: "assets/trees.png".to_string(),
            tile_size: 32,
            tree_scale: 4.0,
            camera: CameraSection::default(),
            hud: HudSection::default(),
            background: [0x4F, 0x82, 0x27],
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        let window = WindowConfig::default();
        Self {
            title: window.title,
            width: window.width,
            height: window.height,
            vsync: window.vsync,
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        let limits = ZoomLimits::default();
        Self {
            speed: 500.0,
            zoom: 1.0,
            min_zoom: limits.min,
            max_zoom: limits.max,
            zoom_step: 1.2,
        }
    }
}

impl Default for HudSection {
    fn default() -> Self {
        Self {
            font_scale: 2.0,
            author: "Jordan".to_string(),
        }
    }
}

impl TreesConfig {
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
            vsync: self.window.vsync,
        }
    }

    /// Camera for a viewport of the given logical size, centred so that world
    /// and screen coincide before the first pan.
    pub fn camera(&self, viewport_width: u32, viewport_height: u32) -> Camera2D {
        let mut camera = Camera2D::new(viewport_width, viewport_height);
        camera.zoom = self.camera.zoom;
        camera.limits = ZoomLimits {
            min: self.camera.min_zoom,
            max: self.camera.max_zoom,
        };
        camera.zoom_step = self.camera.zoom_step;
        camera.pan_speed = self.camera.speed;
        camera
    }
}

/// Load the config at `path`, or the defaults when the file does not exist.
pub fn load_config_or_default(path: &Path) -> Result<TreesConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in defaults",
            path.display()
        );
        return Ok(TreesConfig::default());
    }
    let config = load_config_from_path(path)?;
    log::info!("Config loaded from '{}'", path.display());
    Ok(config)
}

pub fn load_config_from_path(path: &Path) -> Result<TreesConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: TreesConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TreesConfig) -> Result<(), String> {
    if config.version != CONFIG_VERSION {
        return Err(format!(
            "Config validation failed: unsupported version '{}'",
            config.version
        ));
    }
    if config.window.width == 0 || config.window.height == 0 {
        return Err("Config validation failed: window width/height must be > 0".to_string());
    }
    if config.tile_size == 0 {
        return Err("Config validation failed: tile_size must be > 0".to_string());
    }
    if !(config.tree_scale > 0.0) {
        return Err("Config validation failed: tree_scale must be > 0".to_string());
    }
    let cam = &config.camera;
    if !(cam.min_zoom > 0.0) || cam.min_zoom > cam.max_zoom {
        return Err(format!(
            "Config validation failed: zoom limits [{}, {}] must satisfy 0 < min <= max",
            cam.min_zoom, cam.max_zoom
        ));
    }
    if cam.zoom < cam.min_zoom || cam.zoom > cam.max_zoom {
        return Err(format!(
            "Config validation failed: initial zoom {} outside [{}, {}]",
            cam.zoom, cam.min_zoom, cam.max_zoom
        ));
    }
    if !(cam.zoom_step > 0.0) {
        return Err("Config validation failed: camera.zoom_step must be > 0".to_string());
    }
    if !(cam.speed >= 0.0) {
        return Err("Config validation failed: camera.speed must be >= 0".to_string());
    }
    if !(config.hud.font_scale > 0.0) {
        return Err("Config validation failed: hud.font_scale must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "trees_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_and_load(name_hint: &str, json: &str) -> Result<TreesConfig, String> {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("failed to write temp config");
        let result = load_config_from_path(&path);
        let _ = fs::remove_file(&path);
        result
    }

    #[test]
    fn defaults_match_tuned_constants() {
        let config = TreesConfig::default();
        assert_eq!(config.window.title, "Trees!");
        assert_eq!((config.window.width, config.window.height), (1024, 768));
        assert!(config.window.vsync);
        assert_eq!(config.tile_size, 32);
        assert_eq!(config.tree_scale, 4.0);
        assert_eq!(config.camera.speed, 500.0);
        assert_eq!(config.camera.min_zoom, 0.2);
        assert_eq!(config.camera.max_zoom, 2.0);
        assert_eq!(config.camera.zoom_step, 1.2);
        assert_eq!(config.hud.font_scale, 2.0);
        assert_eq!(config.background, [0x4F, 0x82, 0x27]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = write_and_load(
            "partial",
            r#"{ "version": "0.1", "camera": { "speed": 250.0 }, "hud": { "author": "Sam" } }"#,
        )
        .expect("partial config should load");
        assert_eq!(config.camera.speed, 250.0);
        assert_eq!(config.camera.max_zoom, 2.0);
        assert_eq!(config.hud.author, "Sam");
        assert_eq!(config.hud.font_scale, 2.0);
        assert_eq!(config.spritesheet, "assets/trees.png");
    }

    #[test]
    fn rejects_bad_version() {
        let err = write_and_load("version", r#"{ "version": "9.9" }"#).unwrap_err();
        assert!(err.contains("unsupported version"));
    }

    #[test]
    fn rejects_inverted_zoom_limits() {
        let err = write_and_load(
            "zoom",
            r#"{ "camera": { "min_zoom": 3.0, "max_zoom": 1.0, "zoom": 1.0 } }"#,
        )
        .unwrap_err();
        assert!(err.contains("zoom limits"));
    }

    #[test]
    fn rejects_zero_tile_size() {
        let err = write_and_load("tile", r#"{ "tile_size": 0 }"#).unwrap_err();
        assert!(err.contains("tile_size"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = write_and_load("malformed", "{ not json").unwrap_err();
        assert!(err.contains("Failed to parse config JSON"));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = temp_file_path("missing");
        let config = load_config_or_default(&path).expect("missing file should fall back");
        assert_eq!(config.tile_size, 32);
    }

    #[test]
    fn shipped_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/config/trees.json");
        let config = load_config_from_path(&path).expect("shipped config should load");
        assert_eq!(config.spritesheet, "assets/trees.png");
        assert_eq!(config.window.title, "Trees!");
    }

    #[test]
    fn camera_uses_configured_tuning() {
        let mut config = TreesConfig::default();
        config.camera.speed = 10.0;
        config.camera.zoom_step = 2.0;
        let camera = config.camera(1024, 768);
        assert_eq!(camera.pan_speed, 10.0);
        assert_eq!(camera.zoom_step, 2.0);
        assert_eq!(camera.limits, ZoomLimits { min: 0.2, max: 2.0 });
        assert_eq!(camera.position, glam::Vec2::new(512.0, 384.0));
    }
}

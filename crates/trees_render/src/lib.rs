pub mod camera;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform, ZoomLimits};
pub use gpu_context::{clear_color_from_srgb8, GpuContext};
pub use sprite_pipeline::SpritePipeline;
pub use texture::Texture;
pub use vertex::{SpriteVertex, QUAD_INDICES};

use glam::{Affine2, Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.2, max: 2.0 }
    }
}

/// World-space 2D camera. `position` is the world point shown at the viewport
/// center. Screen space is logical pixels with the origin at the bottom-left
/// corner and y pointing up, the same orientation as world space.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: (u32, u32),
    pub limits: ZoomLimits,
    /// Zoom multiplier per scroll line.
    pub zoom_step: f32,
    /// Pan velocity in world units per second.
    pub pan_speed: f32,
}

impl Camera2D {
    /// Camera centred on the viewport, so world and screen coincide at zoom 1.
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::new(viewport_width as f32, viewport_height as f32) * 0.5,
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
            limits: ZoomLimits::default(),
            zoom_step: 1.2,
            pan_speed: 500.0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) * 0.5
    }

    /// Move along `direction` (unit axes, summed for diagonals) for `dt` seconds.
    pub fn pan(&mut self, direction: Vec2, dt: f32) {
        self.position += direction * self.pan_speed * dt;
    }

    /// Multiplicative zoom: each scroll line scales by `zoom_step`, so steps feel
    /// the same at any zoom level. The result is clamped to the limits.
    pub fn adjust_zoom(&mut self, scroll: f32) {
        self.zoom *= self.zoom_step.powf(scroll);
        self.zoom = self.zoom.clamp(self.limits.min, self.limits.max);
    }

    /// Scale about `position` by `zoom`, then move `position` onto the viewport center.
    pub fn world_to_screen(&self) -> Affine2 {
        let translation = self.viewport_center() - self.position * self.zoom;
        Affine2::from_scale_angle_translation(Vec2::splat(self.zoom), 0.0, translation)
    }

    pub fn project(&self, world: Vec2) -> Vec2 {
        self.world_to_screen().transform_point2(world)
    }

    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        self.world_to_screen().inverse().transform_point2(screen)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);

        let proj = Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y - half_h,
            self.position.y + half_h,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

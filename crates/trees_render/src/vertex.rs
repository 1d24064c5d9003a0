use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

/// Two counter-clockwise triangles over the corners emitted by `SpriteVertex::quad`.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

impl SpriteVertex {
    /// Corners of an axis-aligned quad centred on `center`, in the order
    /// bottom-left, bottom-right, top-right, top-left. `uv` is
    /// `[u0, v0, u1, v1]` with `v0` at the top edge of the texture.
    pub fn quad(center: Vec2, size: Vec2, uv: [f32; 4]) -> [SpriteVertex; 4] {
        let half = size * 0.5;
        let [u0, v0, u1, v1] = uv;
        [
            SpriteVertex {
                position: [center.x - half.x, center.y - half.y],
                tex_coords: [u0, v1],
            },
            SpriteVertex {
                position: [center.x + half.x, center.y - half.y],
                tex_coords: [u1, v1],
            },
            SpriteVertex {
                position: [center.x + half.x, center.y + half.y],
                tex_coords: [u1, v0],
            },
            SpriteVertex {
                position: [center.x - half.x, center.y + half.y],
                tex_coords: [u0, v0],
            },
        ]
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_corners_surround_center() {
        let quad = SpriteVertex::quad(Vec2::new(10.0, 20.0), Vec2::new(128.0, 64.0), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(quad[0].position, [-54.0, -12.0]);
        assert_eq!(quad[2].position, [74.0, 52.0]);
    }

    #[test]
    fn quad_bottom_edge_samples_v1() {
        let quad = SpriteVertex::quad(Vec2::ZERO, Vec2::ONE, [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(quad[0].tex_coords, [0.25, 1.0]);
        assert_eq!(quad[1].tex_coords, [0.75, 1.0]);
        assert_eq!(quad[2].tex_coords, [0.75, 0.5]);
        assert_eq!(quad[3].tex_coords, [0.25, 0.5]);
    }
}

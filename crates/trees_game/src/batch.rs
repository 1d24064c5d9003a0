use glam::Vec2;
use trees_render::{SpriteVertex, QUAD_INDICES};

use crate::atlas::SpriteAtlas;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantedTree {
    pub frame_index: usize,
    pub position: Vec2,
}

/// Every tree planted this run, in planting order. Trees are never removed,
/// so later trees paint over earlier ones.
#[derive(Debug, Default)]
pub struct TreeBatch {
    trees: Vec<PlantedTree>,
    revision: u64,
}

impl TreeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plant(&mut self, tree: PlantedTree) {
        self.trees.push(tree);
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantedTree> {
        self.trees.iter()
    }

    /// Bumped on every change; the renderer re-uploads only when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// One quad per tree, centred on its position and `scale` times its frame size.
    pub fn build_mesh(&self, atlas: &SpriteAtlas, scale: f32) -> (Vec<SpriteVertex>, Vec<u32>) {
        let mut vertices = Vec::with_capacity(self.trees.len() * 4);
        let mut indices = Vec::with_capacity(self.trees.len() * 6);

        for tree in self.iter() {
            let (Some(frame), Some(uv)) = (atlas.frame(tree.frame_index), atlas.uv(tree.frame_index))
            else {
                log::warn!("Skipping tree with unknown frame {}", tree.frame_index);
                continue;
            };
            let (w, h) = frame.size();
            let size = Vec2::new(w as f32, h as f32) * scale;
            let base_index = vertices.len() as u32;
            vertices.extend_from_slice(&SpriteVertex::quad(tree.position, size, uv));
            indices.extend(QUAD_INDICES.iter().map(|i| base_index + i));
        }

        (vertices, indices)
    }
}

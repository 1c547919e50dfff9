use glam::Vec2;

use super::quadtree::QuadTreeSnapshot;
use crate::core::math::Rect;
use crate::engine::ecs::{ComponentKind, ComponentStore};

const DYNAMIC_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 0.8];
const STATIC_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.8];
const KINEMATIC_COLOR: [f32; 4] = [0.0, 0.5, 1.0, 0.8];
const NO_BODY_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

/// Node outline colours, cycled by depth
const DEPTH_PALETTE: [[f32; 4]; 4] = [
    [1.0, 1.0, 1.0, 0.4],
    [1.0, 0.8, 0.2, 0.4],
    [1.0, 0.4, 0.2, 0.4],
    [0.8, 0.2, 0.8, 0.4],
];

/// Vertex layout for line-list debug geometry
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Line-list geometry for the quadtree and collider outlines
///
/// Produces plain vertex/index buffers; uploading and drawing them is up to
/// the renderer.
pub struct DebugLines {
    vertices: Vec<DebugVertex>,
    indices: Vec<u32>,
    enabled: bool,
}

impl DebugLines {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            enabled: false, // Disabled by default
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Outline every node of a quadtree snapshot
    pub fn add_quadtree(&mut self, snapshot: &QuadTreeSnapshot) {
        if !self.enabled {
            return;
        }
        for node in &snapshot.nodes {
            let color = DEPTH_PALETTE[node.depth as usize % DEPTH_PALETTE.len()];
            self.draw_rect(&node.boundary, color);
        }
    }

    /// Outline every box collider, coloured by body type
    pub fn add_colliders<S: ComponentStore + ?Sized>(&mut self, store: &S) {
        if !self.enabled {
            return;
        }
        for entity in store.entities_with(&[ComponentKind::Transform, ComponentKind::BoxCollider]) {
            let (Some(transform), Some(collider)) =
                (store.transform(entity), store.box_collider(entity))
            else {
                continue;
            };

            let color = match store.rigid_body(entity) {
                Some(body) if body.is_static() => STATIC_COLOR,
                Some(body) if body.is_kinematic => KINEMATIC_COLOR,
                Some(_) => DYNAMIC_COLOR,
                None => NO_BODY_COLOR,
            };

            let rect = Rect::from_center_half_extents(transform.position, collider.half_extents());
            self.draw_rect(&rect, color);
        }
    }

    fn draw_rect(&mut self, rect: &Rect, color: [f32; 4]) {
        let start_idx = self.vertices.len() as u32;
        let min = rect.min();
        let max = rect.max();

        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        for corner in corners {
            self.vertices.push(DebugVertex {
                position: corner.to_array(),
                color,
            });
        }

        // Four edges
        for i in 0..4 {
            self.indices.push(start_idx + i);
            self.indices.push(start_idx + (i + 1) % 4);
        }
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex data ready for a GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Default for DebugLines {
    fn default() -> Self {
        Self::new()
    }
}

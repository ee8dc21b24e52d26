//! Downstream consumers of generated terrain: mesh upload and the physics
//! height field.

use bevy::prelude::*;

use crate::terrain_mesh::TerrainVertex;

/// Receives finished vertex and index buffers.
pub trait MeshSink<V> {
    fn upload_vertex_buffer(&mut self, vertices: &[V]);

    /// Triangle indices (three per triangle) below and above the water
    /// line. Triangles near the line appear in both.
    fn upload_index_ranges(&mut self, below_water: &[u32], above_water: &[u32]);
}

pub trait HeightFieldSink {
    fn upload_height_field(&mut self, field: &HeightField);
}

// ---------------------------------------------------------------------------
// HeightField
// ---------------------------------------------------------------------------

/// Dense row-major elevation samples over an axis-aligned XZ rectangle.
/// Row `r` lies at `z = min.y + r * (max.y - min.y) / (rows - 1)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightField {
    pub rows: usize,
    pub cols: usize,
    pub min: Vec2,
    pub max: Vec2,
    pub heights: Vec<f32>,
}

impl HeightField {
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.heights[row * self.cols + col]
    }

    /// World XZ of sample `(row, col)`.
    pub fn sample_position(&self, row: usize, col: usize) -> Vec2 {
        let step = self.step();
        Vec2::new(
            self.min.x + col as f32 * step.x,
            self.min.y + row as f32 * step.y,
        )
    }

    fn step(&self) -> Vec2 {
        let extent = self.max - self.min;
        Vec2::new(
            extent.x / (self.cols.max(2) - 1) as f32,
            extent.y / (self.rows.max(2) - 1) as f32,
        )
    }

    /// Bilinear height at world `(x, z)`; `None` outside the bounds.
    pub fn sample(&self, x: f32, z: f32) -> Option<f32> {
        if self.rows < 2 || self.cols < 2 {
            return None;
        }
        if x < self.min.x || x > self.max.x || z < self.min.y || z > self.max.y {
            return None;
        }
        let step = self.step();
        let fx = (x - self.min.x) / step.x;
        let fz = (z - self.min.y) / step.y;
        let c0 = (fx.floor() as usize).min(self.cols - 2);
        let r0 = (fz.floor() as usize).min(self.rows - 2);
        let tx = fx - c0 as f32;
        let tz = fz - r0 as f32;

        let h0 = self.get(r0, c0) + (self.get(r0, c0 + 1) - self.get(r0, c0)) * tx;
        let h1 = self.get(r0 + 1, c0) + (self.get(r0 + 1, c0 + 1) - self.get(r0 + 1, c0)) * tx;
        Some(h0 + (h1 - h0) * tz)
    }
}

// ---------------------------------------------------------------------------
// In-process sinks
// ---------------------------------------------------------------------------

/// Physics-side copy of the latest terrain height field.
#[derive(Resource, Debug, Default)]
pub struct HeightFieldCollider {
    pub field: HeightField,
    /// Bumped on every upload.
    pub revision: u64,
}

impl HeightFieldCollider {
    pub fn sample(&self, x: f32, z: f32) -> Option<f32> {
        self.field.sample(x, z)
    }
}

impl HeightFieldSink for HeightFieldCollider {
    fn upload_height_field(&mut self, field: &HeightField) {
        self.field = field.clone();
        self.revision += 1;
    }
}

/// Terrain buffers staged for the renderer. The rendering plugin watches
/// `revision` and rebuilds its meshes when it changes.
#[derive(Resource, Debug, Default)]
pub struct StagedTerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub below_water: Vec<u32>,
    pub above_water: Vec<u32>,
    pub revision: u64,
}

impl MeshSink<TerrainVertex> for StagedTerrainMesh {
    fn upload_vertex_buffer(&mut self, vertices: &[TerrainVertex]) {
        self.vertices = vertices.to_vec();
        self.revision += 1;
    }

    fn upload_index_ranges(&mut self, below_water: &[u32], above_water: &[u32]) {
        self.below_water = below_water.to_vec();
        self.above_water = above_water.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> HeightField {
        // h = x + 10 z over [0, 2] x [0, 1]
        let (rows, cols) = (3, 5);
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(2.0, 1.0);
        let mut heights = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let x = c as f32 * 0.5;
                let z = r as f32 * 0.5;
                heights.push(x + 10.0 * z);
            }
        }
        HeightField {
            rows,
            cols,
            min,
            max,
            heights,
        }
    }

    #[test]
    fn test_sample_is_exact_on_linear_field() {
        let f = ramp();
        for &(x, z) in &[(0.0, 0.0), (0.3, 0.7), (1.9, 0.2), (2.0, 1.0)] {
            let h = f.sample(x, z).unwrap();
            assert!((h - (x + 10.0 * z)).abs() < 1e-4, "({x}, {z}) -> {h}");
        }
    }

    #[test]
    fn test_sample_outside_bounds_is_none() {
        let f = ramp();
        assert_eq!(f.sample(-0.1, 0.5), None);
        assert_eq!(f.sample(1.0, 1.5), None);
        assert_eq!(HeightField::default().sample(0.0, 0.0), None);
    }

    #[test]
    fn test_sample_position_matches_layout() {
        let f = ramp();
        assert_eq!(f.sample_position(0, 0), Vec2::ZERO);
        assert_eq!(f.sample_position(2, 4), Vec2::new(2.0, 1.0));
        assert_eq!(f.sample_position(1, 1), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_collider_bumps_revision() {
        let mut collider = HeightFieldCollider::default();
        collider.upload_height_field(&ramp());
        collider.upload_height_field(&ramp());
        assert_eq!(collider.revision, 2);
        assert!(collider.sample(1.0, 0.5).is_some());
    }
}

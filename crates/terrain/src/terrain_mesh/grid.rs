//! Raw vertex layout: jittered interior grid plus the sea-bed skirt ring.

use bevy::math::{Vec2, Vec3, Vec4};

use crate::config::{
    MIN_RELATIVE_JITTER, MIN_SKIRT_VERTICES, SEABED_RADIUS_FACTOR, SKIRT_DEPTH, SKIRT_SPACING,
};
use crate::rng::SandboxRng;

use super::types::{TerrainConfig, TerrainTextures, TerrainVertex, SAND_BLEND};

/// Spacing of the interior grid along X and Z.
pub(super) fn cell_size(config: &TerrainConfig) -> Vec2 {
    Vec2::new(
        config.width / (config.cols() - 1) as f32,
        config.length / (config.rows() - 1) as f32,
    )
}

/// Radius of the skirt ring around the origin.
pub fn seabed_radius(config: &TerrainConfig) -> f32 {
    let terrain_radius = 0.5 * (config.width * config.width + config.length * config.length).sqrt();
    SEABED_RADIUS_FACTOR * terrain_radius
}

pub fn skirt_vertex_count(config: &TerrainConfig) -> usize {
    let circumference = std::f32::consts::TAU * seabed_radius(config);
    ((circumference / SKIRT_SPACING).ceil() as usize).max(MIN_SKIRT_VERTICES)
}

/// `rows × cols` row-major grid centred on the origin, every vertex at
/// `min_elevation`. XZ positions are jittered by up to half the relative
/// jitter of a cell in each direction, which keeps neighbours ordered.
pub(super) fn build_grid(
    config: &TerrainConfig,
    textures: &TerrainTextures,
    rng: &mut SandboxRng,
) -> Vec<TerrainVertex> {
    let rows = config.rows();
    let cols = config.cols();
    let cell = cell_size(config);
    let jitter = config.relative_random_jitter.max(MIN_RELATIVE_JITTER);
    let origin = Vec2::new(-0.5 * config.width, -0.5 * config.length);

    let mut vertices = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let dx = rng.next_centered() * jitter * cell.x;
            let dz = rng.next_centered() * jitter * cell.y;
            let x = origin.x + col as f32 * cell.x + dx;
            let z = origin.y + row as f32 * cell.y + dz;
            vertices.push(TerrainVertex {
                position: Vec3::new(x, config.min_elevation, z),
                normal: Vec3::Y,
                uvs: textures.uvs_at(x, z),
                blend: Vec4::ZERO,
            });
        }
    }
    vertices
}

/// Flat ring of sand-textured vertices below the sea bed.
pub(super) fn build_skirt(config: &TerrainConfig, textures: &TerrainTextures) -> Vec<TerrainVertex> {
    let radius = seabed_radius(config);
    let count = skirt_vertex_count(config);
    let y = config.min_elevation - SKIRT_DEPTH;
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let x = radius * angle.cos();
            let z = radius * angle.sin();
            TerrainVertex {
                position: Vec3::new(x, y, z),
                normal: Vec3::Y,
                uvs: textures.uvs_at(x, z),
                blend: SAND_BLEND,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_row_major_and_centred() {
        let config = TerrainConfig {
            relative_random_jitter: 0.0,
            ..Default::default()
        };
        let mut rng = SandboxRng::from_seed_u64(1);
        let grid = build_grid(&config, &TerrainTextures::default(), &mut rng);
        let cols = config.cols();
        assert_eq!(grid.len(), config.rows() * cols);

        // Floor jitter only: at most half a percent of a cell.
        let first = grid[0].position;
        let last = grid[grid.len() - 1].position;
        assert!((first.x + 100.0).abs() < 0.05 && (first.z + 100.0).abs() < 0.05);
        assert!((last.x - 100.0).abs() < 0.05 && (last.z - 100.0).abs() < 0.05);
        assert!(grid[1].position.x > grid[0].position.x);
        assert!(grid[cols].position.z > grid[0].position.z);
    }

    #[test]
    fn test_jitter_stays_within_half_cell() {
        let config = TerrainConfig {
            relative_random_jitter: 1.0,
            ..Default::default()
        };
        let cell = cell_size(&config);
        let mut rng = SandboxRng::from_seed_u64(2);
        let grid = build_grid(&config, &TerrainTextures::default(), &mut rng);
        let cols = config.cols();
        for (i, v) in grid.iter().enumerate() {
            let ideal_x = -100.0 + (i % cols) as f32 * cell.x;
            let ideal_z = -100.0 + (i / cols) as f32 * cell.y;
            assert!((v.position.x - ideal_x).abs() <= 0.5 * cell.x + 1e-3);
            assert!((v.position.z - ideal_z).abs() <= 0.5 * cell.y + 1e-3);
        }
    }

    #[test]
    fn test_skirt_ring_geometry() {
        let config = TerrainConfig::default();
        let skirt = build_skirt(&config, &TerrainTextures::default());
        let radius = seabed_radius(&config);
        assert_eq!(skirt.len(), skirt_vertex_count(&config));
        for v in &skirt {
            assert_eq!(v.position.y, config.min_elevation - SKIRT_DEPTH);
            let r = Vec2::new(v.position.x, v.position.z).length();
            assert!((r - radius).abs() < 1e-2 * radius);
        }
    }

    #[test]
    fn test_skirt_count_has_floor() {
        let tiny = TerrainConfig {
            width: 4.0,
            length: 4.0,
            vertex_density: 1.0,
            ..Default::default()
        };
        assert_eq!(skirt_vertex_count(&tiny), MIN_SKIRT_VERTICES);

        // 2.5 * 0.5 * 200√2 ≈ 353.6, circumference ≈ 2221.4 → 75 vertices.
        assert_eq!(skirt_vertex_count(&TerrainConfig::default()), 75);
    }
}

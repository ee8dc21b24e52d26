use bevy::prelude::*;

use crate::config::WATER_SPLIT_TOLERANCE;
use crate::height_index::TriangleHeightIndex;
use crate::sinks::HeightField;

use super::types::{TerrainConfig, TerrainVertex};

/// Flattened index lists `(below_water, above_water)`.
///
/// A triangle is left out of the below range only when it lies entirely
/// above `water_level + tolerance`, and out of the above range only when it
/// lies entirely below `water_level - tolerance`; everything else lands in
/// both.
pub fn split_by_water(
    vertices: &[TerrainVertex],
    triangles: &[[u32; 3]],
    water_level: f32,
) -> (Vec<u32>, Vec<u32>) {
    let mut below = Vec::new();
    let mut above = Vec::new();
    for tri in triangles {
        let ys = tri.map(|i| vertices[i as usize].position.y);
        let lo = ys[0].min(ys[1]).min(ys[2]);
        let hi = ys[0].max(ys[1]).max(ys[2]);
        if lo <= water_level + WATER_SPLIT_TOLERANCE {
            below.extend_from_slice(tri);
        }
        if hi >= water_level - WATER_SPLIT_TOLERANCE {
            above.extend_from_slice(tri);
        }
    }
    (below, above)
}

/// Sample the mesh surface on a regular `rows × cols` lattice over the
/// terrain footprint.
pub(super) fn sample_height_field(
    index: &TriangleHeightIndex,
    config: &TerrainConfig,
    rows: usize,
    cols: usize,
) -> HeightField {
    let mut field = HeightField {
        rows,
        cols,
        min: Vec2::new(-0.5 * config.width, -0.5 * config.length),
        max: Vec2::new(0.5 * config.width, 0.5 * config.length),
        heights: Vec::with_capacity(rows * cols),
    };
    let mut misses = 0usize;
    for row in 0..rows {
        for col in 0..cols {
            let p = field.sample_position(row, col);
            let h = index.height_at(p.x, p.y).unwrap_or_else(|| {
                misses += 1;
                config.min_elevation
            });
            field.heights.push(h);
        }
    }
    if misses > 0 {
        warn!(
            "terrain: {} of {} height-field samples fell outside the mesh, using min_elevation",
            misses,
            rows * cols
        );
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: f32) -> TerrainVertex {
        TerrainVertex {
            position: Vec3::new(0.0, y, 0.0),
            normal: Vec3::Y,
            uvs: [Vec2::ZERO; 5],
            blend: Vec4::ZERO,
        }
    }

    #[test]
    fn test_split_classifies_triangles() {
        let vertices = vec![at(-3.0), at(-2.0), at(-1.0), at(1.0), at(2.0), at(3.0), at(0.01)];
        let triangles = [[0, 1, 2], [3, 4, 5], [2, 3, 4], [0, 1, 6]];
        let (below, above) = split_by_water(&vertices, &triangles, 0.0);

        assert_eq!(below, vec![0, 1, 2, 2, 3, 4, 0, 1, 6]);
        assert_eq!(above, vec![3, 4, 5, 2, 3, 4, 0, 1, 6]);
    }

    #[test]
    fn test_split_covers_every_triangle() {
        let vertices: Vec<_> = (0..12).map(|i| at(i as f32 * 0.37 - 2.0)).collect();
        let triangles: Vec<[u32; 3]> = (0..10).map(|i| [i, i + 1, i + 2]).collect();
        let (below, above) = split_by_water(&vertices, &triangles, 0.0);
        assert!(below.len() / 3 + above.len() / 3 >= triangles.len());
    }
}

use bevy::prelude::*;

use crate::config::BORDER_SAND_WIDTH;
use crate::noise_field::NoiseField;

use super::displacement::footprint_uv;
use super::types::{TerrainConfig, TerrainVertex};

// ---------------------------------------------------------------------------
// Normals
// ---------------------------------------------------------------------------

/// Area-weighted vertex normals. The outer grid ring and the skirt point
/// straight up.
pub(super) fn compute_normals(
    vertices: &mut [TerrainVertex],
    triangles: &[[u32; 3]],
    rows: usize,
    cols: usize,
) {
    let mut acc = vec![Vec3::ZERO; vertices.len()];
    for tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        let pa = vertices[a].position;
        let face = (vertices[b].position - pa).cross(vertices[c].position - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    let grid_len = rows * cols;
    for (i, (v, n)) in vertices.iter_mut().zip(acc).enumerate() {
        let border = i >= grid_len || {
            let (row, col) = (i / cols, i % cols);
            row == 0 || col == 0 || row + 1 == rows || col + 1 == cols
        };
        v.normal = if border { Vec3::Y } else { n.normalize_or(Vec3::Y) };
    }
}

// ---------------------------------------------------------------------------
// Texture blend weights
// ---------------------------------------------------------------------------

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sand weight from the beach curve: full sand up to just below the local
/// beach height, fading out above it.
#[inline]
pub(super) fn beach_sand(height_above_water: f32, beach_noise: f32) -> f32 {
    let beach_height = 1.0 + 1.5 * beach_noise;
    (beach_height - height_above_water).max(0.0).powf(1.5).clamp(0.0, 1.0)
}

/// Blend weights for one grid vertex. Normals must be final.
pub(super) fn blend_weights(v: &TerrainVertex, config: &TerrainConfig, noise: &NoiseField) -> Vec4 {
    let uv = footprint_uv(config, v.position);
    let slope = (1.0 - v.normal.y).clamp(0.0, 1.0);
    let above = v.position.y - config.water_level;
    let headroom = config.max_elevation - config.water_level;
    let relative_height = if headroom > 0.0 {
        (above / headroom).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Offsets decorrelate the octave stacks drawn from the one field.
    let patches = noise.fractal_norm(uv.x + 0.31, uv.y + 0.17, 4.0, 3);
    let detail = noise.fractal_norm(uv.x + 0.73, uv.y + 0.59, 16.0, 2);
    let streaks = noise.get_norm(uv.x * 8.0 + 0.5, uv.y * 8.0 + 0.5, 2.0);

    let x = ((patches - 0.45) * 3.0 + slope * 1.5).clamp(0.0, 1.0);
    let y = streaks;

    let border_distance = uv.x.min(1.0 - uv.x).min(uv.y).min(1.0 - uv.y);
    let border_sand = 1.0 - smoothstep(0.0, BORDER_SAND_WIDTH, border_distance);

    let (z, w) = if above >= 0.0 {
        let steep = ((slope - 0.3 + (detail - 0.5) * 0.15) * 5.0).clamp(0.0, 1.0);
        let alpine = ((relative_height - 0.85) * 4.0 + (patches - 0.5)).clamp(0.0, 1.0);
        let sand = beach_sand(above, detail);
        (1.0 - steep.max(alpine), sand.max(border_sand))
    } else {
        // Underwater: sand everywhere, rock only on steep drops.
        let steep = ((slope - 0.5) * 4.0).clamp(0.0, 1.0);
        (1.0 - steep, 1.0)
    };

    Vec4::new(x, y, z, w).clamp(Vec4::ZERO, Vec4::ONE)
}

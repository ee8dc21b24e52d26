//! Elevation passes: heightmap + roughness displacement, normalization and
//! edge melt. All passes operate on the interior grid only; the skirt is
//! never touched.

use bevy::prelude::*;

use crate::config::{
    EDGE_MELT_START, HEIGHTMAP_BLUR_PASSES, NOISE_LATTICE, ROUGHNESS_OCTAVES, ROUGHNESS_SCALE,
};
use crate::heightmap::FractalHeightmap;
use crate::noise_field::NoiseField;
use crate::rng::SandboxRng;

use super::types::{TerrainConfig, TerrainVertex};

/// Normalized `(u, v)` of a world XZ position over the terrain footprint.
#[inline]
pub(super) fn footprint_uv(config: &TerrainConfig, position: Vec3) -> Vec2 {
    Vec2::new(
        position.x / config.width + 0.5,
        position.z / config.length + 0.5,
    )
}

#[inline]
fn is_border(row: usize, col: usize, rows: usize, cols: usize) -> bool {
    row == 0 || col == 0 || row + 1 == rows || col + 1 == cols
}

/// Roughness detail at `(u, v)`, centred around zero.
fn roughness_detail(noise: &NoiseField, uv: Vec2, config: &TerrainConfig) -> f32 {
    let sum = noise.octave_sum(uv.x, uv.y, 1.0, ROUGHNESS_OCTAVES);
    let centred = sum * 10.0 - 10.0;
    centred * config.roughness * ROUGHNESS_SCALE * config.elevation_span()
}

/// Add the macro heightmap and roughness noise to every interior vertex.
/// Returns the noise field so the texture pass can reuse it.
pub(super) fn displace(
    grid: &mut [TerrainVertex],
    config: &TerrainConfig,
    rng: &mut SandboxRng,
) -> NoiseField {
    let rows = config.rows();
    let cols = config.cols();

    rng.reseed(config.seed);
    let mut heightmap = FractalHeightmap::new(
        cols.div_ceil(2).max(2),
        rows.div_ceil(2).max(2),
        config.min_elevation,
        config.max_elevation,
        rng,
    );
    heightmap.blur(HEIGHTMAP_BLUR_PASSES);

    rng.reseed(config.seed);
    let noise = NoiseField::new(NOISE_LATTICE, NOISE_LATTICE, rng);

    for row in 0..rows {
        for col in 0..cols {
            if is_border(row, col, rows, cols) {
                continue;
            }
            let v = &mut grid[row * cols + col];
            let uv = footprint_uv(config, v.position);
            let macro_height = heightmap.value(uv.x, uv.y) - config.min_elevation;
            v.position.y += macro_height + roughness_detail(&noise, uv, config);
        }
    }
    debug!(
        "terrain: displaced {}x{} grid (heightmap {}^2)",
        cols,
        rows,
        heightmap.size()
    );
    noise
}

/// Linearly rescale grid heights so they exactly fill
/// `[min_elevation, max_elevation]`.
pub(super) fn normalize_heights(grid: &mut [TerrainVertex], config: &TerrainConfig) {
    let (lo, hi) = grid.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v.position.y), hi.max(v.position.y))
    });
    let span = hi - lo;
    let target = config.elevation_span();
    if !(span > f32::EPSILON) {
        warn!("terrain: flat grid after displacement, nothing to normalize");
        for v in grid.iter_mut() {
            v.position.y = config.min_elevation;
        }
        return;
    }
    for v in grid.iter_mut() {
        let t = (v.position.y - lo) / span;
        let y = config.min_elevation + t * target;
        v.position.y = y.clamp(config.min_elevation, config.max_elevation);
    }
}

/// Fraction of the height kept at normalized distance `d` (0 = centre,
/// 1 = border) from the grid centre.
pub(super) fn melt_keep(d: f32) -> f32 {
    if d <= EDGE_MELT_START {
        return 1.0;
    }
    if d >= 1.0 {
        return 0.0;
    }
    let t = (d - EDGE_MELT_START) / (1.0 - EDGE_MELT_START);
    0.5 - 0.5 * (std::f32::consts::PI * (t - 0.5)).sin()
}

/// Sink heights toward `min_elevation` near the grid border, separately
/// along rows and columns.
pub(super) fn edge_melt(grid: &mut [TerrainVertex], config: &TerrainConfig) {
    let rows = config.rows();
    let cols = config.cols();
    let dist = |i: usize, n: usize| (2.0 * i as f32 / (n - 1) as f32 - 1.0).abs();
    for row in 0..rows {
        let keep_row = melt_keep(dist(row, rows));
        for col in 0..cols {
            let keep = keep_row * melt_keep(dist(col, cols));
            let v = &mut grid[row * cols + col];
            v.position.y = config.min_elevation + (v.position.y - config.min_elevation) * keep;
        }
    }
}

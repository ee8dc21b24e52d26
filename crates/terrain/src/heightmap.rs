//! Diamond-square fractal heightmap.
//!
//! Produces the macro elevation field of the terrain. The lattice is square
//! with `2^k + 1` points per axis. Regions are processed breadth-first from a
//! work queue; every write accumulates into a `(sum, count)` cell because
//! neighbouring regions share their edge midpoints. A final pass resolves the
//! averages and stretches them to the requested height span.

use std::collections::VecDeque;

use crate::config::HEIGHTMAP_DAMPING;
use crate::rng::SandboxRng;

/// Running average for one lattice point.
#[derive(Debug, Clone, Copy, Default)]
struct Accum {
    sum: f32,
    count: u32,
}

impl Accum {
    #[inline]
    fn add(&mut self, value: f32) {
        self.sum += value;
        self.count += 1;
    }

    #[inline]
    fn mean(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f32
        }
    }
}

/// Pending diamond-square region: lattice corners `(x0, z0)`..`(x1, z1)`.
#[derive(Debug, Clone, Copy)]
struct Region {
    x0: usize,
    z0: usize,
    x1: usize,
    z1: usize,
    amplitude: f32,
}

/// Fractal elevation field queried by normalized `(u, v)`.
#[derive(Debug, Clone)]
pub struct FractalHeightmap {
    /// Resolved heights in `[0, max_height - min_height]`, row-major.
    values: Vec<f32>,
    /// Lattice points per axis (`2^k + 1`).
    size: usize,
    min_height: f32,
    max_height: f32,
}

impl FractalHeightmap {
    /// Synthesize a heightmap covering at least `min_width × min_length`
    /// lattice points.
    ///
    /// Both dimensions must be at least 2; smaller regions cannot be
    /// subdivided. This is a caller precondition.
    pub fn new(
        min_width: usize,
        min_length: usize,
        min_height: f32,
        max_height: f32,
        rng: &mut SandboxRng,
    ) -> Self {
        assert!(
            min_width >= 2 && min_length >= 2,
            "heightmap needs at least 2x2 points, got {min_width}x{min_length}"
        );
        assert!(
            max_height > min_height,
            "heightmap max_height {max_height} must exceed min_height {min_height}"
        );

        let size = min_width.max(min_length).next_power_of_two() + 1;
        let amplitude = max_height - min_height;
        let cells = synthesize(size, amplitude, rng);

        let mut heightmap = Self {
            values: cells.iter().map(Accum::mean).collect(),
            size,
            min_height,
            max_height,
        };
        heightmap.normalize();
        heightmap
    }

    /// Lattice points per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    #[inline]
    fn at(&self, x: usize, z: usize) -> f32 {
        self.values[z * self.size + x]
    }

    /// Bilinearly interpolated height at normalized `(u, v)`, both clamped
    /// to `[0, 1]`.
    pub fn value(&self, u: f32, v: f32) -> f32 {
        let last = (self.size - 1) as f32;
        let x = u.clamp(0.0, 1.0) * last;
        let z = v.clamp(0.0, 1.0) * last;

        let x0 = (x.floor() as usize).min(self.size - 2);
        let z0 = (z.floor() as usize).min(self.size - 2);
        let fx = x - x0 as f32;
        let fz = z - z0 as f32;

        let h00 = self.at(x0, z0);
        let h10 = self.at(x0 + 1, z0);
        let h01 = self.at(x0, z0 + 1);
        let h11 = self.at(x0 + 1, z0 + 1);

        let h0 = h00 + (h10 - h00) * fx;
        let h1 = h01 + (h11 - h01) * fx;
        self.min_height + h0 + (h1 - h0) * fz
    }

    /// 3x3 box blur, `passes` times. Edges average over the in-bounds
    /// neighbourhood only.
    pub fn blur(&mut self, passes: usize) {
        let n = self.size;
        let mut scratch = vec![0.0_f32; self.values.len()];
        for _ in 0..passes {
            for z in 0..n {
                for x in 0..n {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    for nz in z.saturating_sub(1)..=(z + 1).min(n - 1) {
                        for nx in x.saturating_sub(1)..=(x + 1).min(n - 1) {
                            sum += self.at(nx, nz);
                            count += 1.0;
                        }
                    }
                    scratch[z * n + x] = sum / count;
                }
            }
            std::mem::swap(&mut self.values, &mut scratch);
        }
    }

    /// Stretch the stored values so the realized min/max span exactly
    /// `[0, max_height - min_height]`.
    fn normalize(&mut self) {
        let lo = self.values.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let span = hi - lo;
        let target = self.max_height - self.min_height;
        if span <= f32::EPSILON {
            self.values.fill(0.0);
            return;
        }
        for h in &mut self.values {
            *h = ((*h - lo) / span * target).clamp(0.0, target);
        }
    }
}

/// Run diamond-square over a `size × size` lattice and return the raw
/// accumulators.
fn synthesize(size: usize, amplitude: f32, rng: &mut SandboxRng) -> Vec<Accum> {
    let mut cells = vec![Accum::default(); size * size];
    let idx = |x: usize, z: usize| z * size + x;
    let last = size - 1;
    let mid = last / 2;

    // Corners, centre and edge midpoints.
    for (x, z) in [
        (0, 0),
        (last, 0),
        (0, last),
        (last, last),
        (mid, mid),
        (mid, 0),
        (mid, last),
        (0, mid),
        (last, mid),
    ] {
        cells[idx(x, z)].add(amplitude * rng.next_f32());
    }

    let mut queue = VecDeque::new();
    queue.push_back(Region {
        x0: 0,
        z0: 0,
        x1: last,
        z1: last,
        amplitude: amplitude * HEIGHTMAP_DAMPING,
    });

    while let Some(r) = queue.pop_front() {
        let cx = (r.x0 + r.x1) / 2;
        let cz = (r.z0 + r.z1) / 2;

        let c00 = cells[idx(r.x0, r.z0)].mean();
        let c10 = cells[idx(r.x1, r.z0)].mean();
        let c01 = cells[idx(r.x0, r.z1)].mean();
        let c11 = cells[idx(r.x1, r.z1)].mean();

        // Diamond
        let centre = (c00 + c10 + c01 + c11) * 0.25 + r.amplitude * rng.next_f32();
        cells[idx(cx, cz)].add(centre);

        // Square
        let top = (c00 + c10 + centre) / 3.0 + r.amplitude * rng.next_f32();
        let bottom = (c01 + c11 + centre) / 3.0 + r.amplitude * rng.next_f32();
        let left = (c00 + c01 + centre) / 3.0 + r.amplitude * rng.next_f32();
        let right = (c10 + c11 + centre) / 3.0 + r.amplitude * rng.next_f32();
        cells[idx(cx, r.z0)].add(top);
        cells[idx(cx, r.z1)].add(bottom);
        cells[idx(r.x0, cz)].add(left);
        cells[idx(r.x1, cz)].add(right);

        if r.x1 - r.x0 > 2 {
            let amplitude = r.amplitude * HEIGHTMAP_DAMPING;
            for (x0, z0, x1, z1) in [
                (r.x0, r.z0, cx, cz),
                (cx, r.z0, r.x1, cz),
                (r.x0, cz, cx, r.z1),
                (cx, cz, r.x1, r.z1),
            ] {
                queue.push_back(Region {
                    x0,
                    z0,
                    x1,
                    z1,
                    amplitude,
                });
            }
        }
    }

    cells
}

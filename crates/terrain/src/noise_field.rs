//! Tileable 2D gradient noise.
//!
//! A `(width+1) × (height+1)` lattice of unit gradients. Gradients come from a
//! small pool of random templates indexed through a shuffled table, which
//! de-correlates neighbouring lattice points without storing one random
//! vector per point. The field knows nothing about octaves; callers sum
//! several frequencies themselves (see [`NoiseField::fractal_norm`]).

use bevy::math::Vec2;

use crate::config::NOISE_TEMPLATES;
use crate::rng::SandboxRng;

#[derive(Debug, Clone)]
pub struct NoiseField {
    width: usize,
    height: usize,
    /// Row-major `(width + 1) × (height + 1)` gradients.
    gradients: Vec<Vec2>,
}

/// Quintic smoothstep `t³(6t² − 15t + 10)`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Contrast reshape: `x^(1/c)` preserving sign.
#[inline]
fn apply_contrast(x: f32, contrast: f32) -> f32 {
    if x > 0.0 {
        x.powf(1.0 / contrast)
    } else if x < 0.0 {
        -(-x).powf(1.0 / contrast)
    } else {
        0.0
    }
}

impl NoiseField {
    /// Build a `width × height` cell field. Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize, rng: &mut SandboxRng) -> Self {
        assert!(
            width > 0 && height > 0,
            "noise field needs at least one cell per axis, got {width}x{height}"
        );

        let n = NOISE_TEMPLATES;
        let templates: Vec<Vec2> = (0..n)
            .map(|_| Vec2::from_angle(rng.next_f32() * std::f32::consts::TAU))
            .collect();

        // Fisher-Yates over the index table.
        let mut shuffled: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = ((rng.next_f32() * (i + 1) as f32) as usize).min(i);
            shuffled.swap(i, j);
        }

        // The last row/column repeats the first so the field tiles.
        let mut gradients = Vec::with_capacity((width + 1) * (height + 1));
        for row in 0..=height {
            for col in 0..=width {
                let r = row % height;
                let c = col % width;
                gradients.push(templates[(shuffled[r % n] + c) % n]);
            }
        }

        Self {
            width,
            height,
            gradients,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn gradient(&self, col: usize, row: usize) -> Vec2 {
        self.gradients[row * (self.width + 1) + col]
    }

    /// Noise at `(u, v)` in `[-1, 1]`. One unit of `u`/`v` spans the whole
    /// lattice; coordinates wrap in both axes.
    pub fn get(&self, u: f32, v: f32, contrast: f32) -> f32 {
        let x = (u * self.width as f32).rem_euclid(self.width as f32);
        let y = (v * self.height as f32).rem_euclid(self.height as f32);

        let x0 = (x.floor() as usize).min(self.width - 1);
        let y0 = (y.floor() as usize).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let d00 = self.gradient(x0, y0).dot(Vec2::new(fx, fy));
        let d10 = self.gradient(x0 + 1, y0).dot(Vec2::new(fx - 1.0, fy));
        let d01 = self.gradient(x0, y0 + 1).dot(Vec2::new(fx, fy - 1.0));
        let d11 = self.gradient(x0 + 1, y0 + 1).dot(Vec2::new(fx - 1.0, fy - 1.0));

        let su = fade(fx);
        let sv = fade(fy);
        // Unit gradients peak at ±√2/2; stretch to fill [-1, 1].
        let raw = lerp(lerp(d00, d10, su), lerp(d01, d11, su), sv) * std::f32::consts::SQRT_2;
        apply_contrast(raw.clamp(-1.0, 1.0), contrast)
    }

    /// [`get`](Self::get) remapped to `[0, 1]`.
    pub fn get_norm(&self, u: f32, v: f32, contrast: f32) -> f32 {
        self.get(u, v, contrast) * 0.5 + 0.5
    }

    /// Raw octave sum of [`get_norm`](Self::get_norm): frequency doubles and
    /// weight halves each octave, starting at weight 1. Range is
    /// `[0, 2 - 2^(1 - octaves)]`.
    pub fn octave_sum(&self, u: f32, v: f32, base_frequency: f32, octaves: u32) -> f32 {
        let mut total = 0.0;
        let mut frequency = base_frequency;
        let mut weight = 1.0;
        for _ in 0..octaves {
            total += weight * self.get_norm(u * frequency, v * frequency, 1.0);
            frequency *= 2.0;
            weight *= 0.5;
        }
        total
    }

    /// [`octave_sum`](Self::octave_sum) renormalized to `[0, 1]`.
    pub fn fractal_norm(&self, u: f32, v: f32, base_frequency: f32, octaves: u32) -> f32 {
        if octaves == 0 {
            return 0.5;
        }
        let weight_sum = 2.0 - 2.0_f32.powi(1 - octaves as i32);
        (self.octave_sum(u, v, base_frequency, octaves) / weight_sum).clamp(0.0, 1.0)
    }
}

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::heightmap::FractalHeightmap;
use crate::noise_field::NoiseField;
use crate::rng::SandboxRng;

#[test]
fn noise_stays_in_range_over_random_samples() {
    let mut rng = SandboxRng::from_seed_u64(2024);
    let field = NoiseField::new(32, 32, &mut rng);
    let mut sampler = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..10_000 {
        let u: f32 = sampler.gen_range(-4.0..4.0);
        let v: f32 = sampler.gen_range(-4.0..4.0);
        let n = field.get(u, v, 1.0);
        assert!((-1.0..=1.0).contains(&n), "get({u}, {v}) = {n}");
        let m = field.get_norm(u, v, 1.0);
        assert!((0.0..=1.0).contains(&m), "get_norm({u}, {v}) = {m}");
    }
}

#[test]
fn noise_contrast_keeps_range() {
    let mut rng = SandboxRng::from_seed_u64(8);
    let field = NoiseField::new(8, 8, &mut rng);
    let mut sampler = ChaCha8Rng::seed_from_u64(2);
    for _ in 0..2_000 {
        let (u, v): (f32, f32) = (sampler.gen(), sampler.gen());
        for contrast in [0.5, 2.0, 4.0] {
            let n = field.get(u, v, contrast);
            assert!((-1.0..=1.0).contains(&n));
        }
    }
}

#[test]
fn noise_is_continuous() {
    let mut rng = SandboxRng::from_seed_u64(31);
    let field = NoiseField::new(16, 16, &mut rng);
    let eps = 1e-4;
    for i in 0..1_000 {
        let u = i as f32 * 0.00731;
        let v = i as f32 * 0.00377;
        let d = (field.get(u + eps, v, 1.0) - field.get(u, v, 1.0)).abs();
        // Slope per lattice cell is a small constant; 16 cells per unit.
        assert!(d < 16.0 * 10.0 * eps, "jump {d} at ({u}, {v})");
    }
}

#[test]
fn heightmap_is_bilinearly_continuous() {
    let mut rng = SandboxRng::from_seed_u64(77);
    let hm = FractalHeightmap::new(64, 64, -2.0, 4.0, &mut rng);
    let span = hm.max_height() - hm.min_height();
    let cells = (hm.size() - 1) as f32;
    let eps = 1e-3;
    // Bilinear slope is at most one full span per cell.
    let bound = span * cells * eps * 1.01 + 1e-4;
    for i in 0..2_000 {
        let u = (i as f32 * 0.000499) % 1.0;
        let v = (i as f32 * 0.000713) % 1.0;
        let d = (hm.value(u + eps, v) - hm.value(u, v)).abs();
        assert!(d <= bound, "jump {d} > {bound} at ({u}, {v})");
    }
}

#[test]
fn heightmap_values_within_bounds() {
    let mut rng = SandboxRng::from_seed_u64(4);
    let hm = FractalHeightmap::new(20, 50, 10.0, 12.5, &mut rng);
    let mut sampler = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..5_000 {
        let (u, v): (f32, f32) = (sampler.gen_range(-0.5..1.5), sampler.gen_range(-0.5..1.5));
        let h = hm.value(u, v);
        assert!((10.0..=12.5 + 1e-5).contains(&h), "value({u}, {v}) = {h}");
    }
}

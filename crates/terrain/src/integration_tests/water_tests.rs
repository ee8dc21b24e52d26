use bevy::prelude::*;

use crate::config::HORIZON_RAISE;
use crate::rng::SandboxRng;
use crate::water::{build_water_mesh, WaterConfig};

fn config() -> WaterConfig {
    WaterConfig {
        seed: 3,
        height: 0.5,
        inner_radius: 60.0,
        outer_extent: 600.0,
        vertex_density: 0.2,
        relative_random_jitter: 0.5,
    }
}

#[test]
fn water_rings_and_disc_layout() {
    let config = config();
    let mesh = build_water_mesh(&config, &mut SandboxRng::default());
    assert!(mesh.disc_count > 0);

    let horizon_y = config.height + config.outer_extent * HORIZON_RAISE;
    let mut horizon = 0;
    for (i, v) in mesh.vertices.iter().enumerate() {
        let r = v.position.xz().length();
        if i < mesh.disc_count {
            assert!(r < config.inner_radius);
            assert_eq!(v.fog, 0.0);
        }
        if v.fog == 1.0 {
            horizon += 1;
            assert_eq!(v.position.y, horizon_y);
            assert!((r - config.outer_extent).abs() < 1e-2);
        } else {
            assert_eq!(v.position.y, config.height);
        }
    }
    assert!(horizon >= 8);
}

#[test]
fn water_triangulation_is_complete() {
    let mesh = build_water_mesh(&config(), &mut SandboxRng::default());
    let n = mesh.vertices.len();
    let horizon = mesh.vertices.iter().filter(|v| v.fog == 1.0).count();
    // Every vertex used, hull is the horizon ring.
    assert_eq!(mesh.triangles.len(), 2 * n - 2 - horizon);
    let mut used = vec![false; n];
    for tri in &mesh.triangles {
        for &i in tri {
            used[i as usize] = true;
        }
    }
    assert!(used.iter().all(|&u| u));
}

#[test]
fn water_seed_changes_disc_only() {
    let a = build_water_mesh(&config(), &mut SandboxRng::default());
    let b = build_water_mesh(
        &WaterConfig {
            seed: 4,
            ..config()
        },
        &mut SandboxRng::default(),
    );
    let ring = |m: &crate::water::WaterMesh| m.vertices[m.disc_count..].to_vec();
    assert_eq!(ring(&a), ring(&b));
    let k = a.disc_count.min(b.disc_count);
    assert_ne!(&a.vertices[..k], &b.vertices[..k]);
}

#[test]
#[should_panic(expected = "invalid water config")]
fn water_rejects_inverted_radii() {
    let config = WaterConfig {
        inner_radius: 100.0,
        outer_extent: 50.0,
        ..Default::default()
    };
    build_water_mesh(&config, &mut SandboxRng::default());
}

//! Companion water surface: a dense jittered disc over the playable area and
//! two rings that carry it out to a fogged horizon.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{HORIZON_RAISE, HORIZON_SPACING, MIN_RELATIVE_JITTER, MIN_SKIRT_VERTICES};
use crate::rng::SandboxRng;
use crate::triangulation::triangulate;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct WaterConfig {
    pub seed: u64,
    /// Y of the water surface.
    pub height: f32,
    /// Radius of the densely meshed disc. Should cover the playable area.
    pub inner_radius: f32,
    /// Radius of the horizon ring.
    pub outer_extent: f32,
    pub vertex_density: f32,
    pub relative_random_jitter: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            height: 0.0,
            inner_radius: 180.0,
            outer_extent: 2000.0,
            vertex_density: 0.1,
            relative_random_jitter: 0.3,
        }
    }
}

impl WaterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.inner_radius > 0.0) {
            return Err(format!(
                "inner_radius must be positive, got {}",
                self.inner_radius
            ));
        }
        if !(self.outer_extent > self.inner_radius) {
            return Err(format!(
                "outer_extent {} must exceed inner_radius {}",
                self.outer_extent, self.inner_radius
            ));
        }
        if !(self.vertex_density > 0.0) {
            return Err(format!(
                "vertex_density must be positive, got {}",
                self.vertex_density
            ));
        }
        if self.inner_radius < 1.0 / self.vertex_density {
            return Err(format!(
                "inner_radius {} is smaller than one grid cell at density {}",
                self.inner_radius, self.vertex_density
            ));
        }
        if !(0.0..=1.0).contains(&self.relative_random_jitter) {
            return Err(format!(
                "relative_random_jitter must be in [0, 1], got {}",
                self.relative_random_jitter
            ));
        }
        if !(self.height.is_finite() && self.outer_extent.is_finite()) {
            return Err(format!(
                "height and outer_extent must be finite, got {} and {}",
                self.height, self.outer_extent
            ));
        }
        Ok(())
    }

    pub fn horizon_height(&self) -> f32 {
        self.height + self.outer_extent * HORIZON_RAISE
    }
}

impl crate::Saveable for WaterConfig {
    const SAVE_KEY: &'static str = "water_config";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if *self == Self::default() {
            return None;
        }
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let config: Self = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("WaterConfig: saved config is invalid ({e}), using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterVertex {
    pub position: Vec3,
    /// 0 = clear water, 1 = fully fogged horizon.
    pub fog: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WaterMesh {
    pub vertices: Vec<WaterVertex>,
    /// Wound to face +Y.
    pub triangles: Vec<[u32; 3]>,
    /// Number of leading vertices belonging to the jittered disc.
    pub disc_count: usize,
}

fn ring(radius: f32, count: usize, phase: f32, y: f32, fog: f32) -> impl Iterator<Item = WaterVertex> {
    (0..count).map(move |i| {
        let angle = (i as f32 + phase) / count as f32 * std::f32::consts::TAU;
        WaterVertex {
            position: Vec3::new(radius * angle.cos(), y, radius * angle.sin()),
            fog,
        }
    })
}

/// Build the water surface for `config`. Panics on an invalid config; the
/// caller's random stream is left untouched.
pub fn build_water_mesh(config: &WaterConfig, rng: &mut SandboxRng) -> WaterMesh {
    if let Err(e) = config.validate() {
        panic!("invalid water config: {e}");
    }
    let outer = rng.snapshot();
    rng.reseed(config.seed);

    let spacing = 1.0 / config.vertex_density;
    let jitter = config.relative_random_jitter.max(MIN_RELATIVE_JITTER) * spacing;
    // Keep disc points clear of the first ring.
    let clip = config.inner_radius - 0.5 * spacing;
    let steps = (config.inner_radius / spacing).ceil() as i32;

    let mut vertices = Vec::new();
    for iz in -steps..=steps {
        for ix in -steps..=steps {
            let x = ix as f32 * spacing + rng.next_centered() * jitter;
            let z = iz as f32 * spacing + rng.next_centered() * jitter;
            if x * x + z * z < clip * clip {
                vertices.push(WaterVertex {
                    position: Vec3::new(x, config.height, z),
                    fog: 0.0,
                });
            }
        }
    }
    let disc_count = vertices.len();

    let tau = std::f32::consts::TAU;
    let inner_count = ((tau * config.inner_radius / spacing).ceil() as usize).max(MIN_SKIRT_VERTICES);
    let outer_count =
        ((tau * config.outer_extent / HORIZON_SPACING).ceil() as usize).max(MIN_SKIRT_VERTICES);
    vertices.extend(ring(config.inner_radius, inner_count, 0.0, config.height, 0.0));
    vertices.extend(ring(
        config.outer_extent,
        outer_count,
        0.5,
        config.horizon_height(),
        1.0,
    ));

    let triangles = match triangulate(&vertices, |v| {
        (v.position.x as f64, v.position.z as f64)
    }) {
        Ok(tris) => tris.into_iter().map(|[a, b, c]| [a, c, b]).collect::<Vec<_>>(),
        Err(e) => panic!("water triangulation failed: {e}"),
    };

    rng.restore(&outer);
    info!(
        "Water mesh built: {} disc + {} inner ring + {} horizon vertices, {} triangles",
        disc_count,
        inner_count,
        outer_count,
        triangles.len()
    );

    WaterMesh {
        vertices,
        triangles,
        disc_count,
    }
}

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TerrainConfig
// ---------------------------------------------------------------------------

/// Declarative input to [`Terrain::generate`](super::Terrain::generate).
///
/// Dimensions are world units along X (`width`) and Z (`length`);
/// `vertex_density` is grid vertices per world unit.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u64,
    pub width: f32,
    pub length: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub vertex_density: f32,
    pub relative_random_jitter: f32,
    pub roughness: f32,
    /// Height that separates the below/above water index ranges.
    pub water_level: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 200.0,
            length: 200.0,
            min_elevation: -2.0,
            max_elevation: 4.0,
            vertex_density: 0.5,
            relative_random_jitter: 0.3,
            roughness: 0.5,
            water_level: 0.0,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.width.is_finite() && self.length.is_finite()) {
            return Err(format!(
                "dimensions must be finite, got {}x{}",
                self.width, self.length
            ));
        }
        if !(self.min_elevation.is_finite() && self.max_elevation.is_finite()) {
            return Err(format!(
                "elevations must be finite, got {}..{}",
                self.min_elevation, self.max_elevation
            ));
        }
        if !(self.width > 0.0 && self.length > 0.0) {
            return Err(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.length
            ));
        }
        if !(self.max_elevation > self.min_elevation) {
            return Err(format!(
                "max_elevation {} must exceed min_elevation {}",
                self.max_elevation, self.min_elevation
            ));
        }
        if !(self.vertex_density > 0.0) {
            return Err(format!(
                "vertex_density must be positive, got {}",
                self.vertex_density
            ));
        }
        let min_span = 1.0 / self.vertex_density;
        if self.width < min_span || self.length < min_span {
            return Err(format!(
                "dimensions {}x{} are smaller than one grid cell ({min_span}) at density {}",
                self.width, self.length, self.vertex_density
            ));
        }
        if !(0.0..=1.0).contains(&self.relative_random_jitter) {
            return Err(format!(
                "relative_random_jitter must be in [0, 1], got {}",
                self.relative_random_jitter
            ));
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Err(format!(
                "roughness must be in [0, 1], got {}",
                self.roughness
            ));
        }
        if !self.water_level.is_finite() {
            return Err("water_level must be finite".to_string());
        }
        Ok(())
    }

    /// Interior grid rows (along Z).
    pub fn rows(&self) -> usize {
        (self.length * self.vertex_density).ceil() as usize + 1
    }

    /// Interior grid columns (along X).
    pub fn cols(&self) -> usize {
        (self.width * self.vertex_density).ceil() as usize + 1
    }

    pub fn elevation_span(&self) -> f32 {
        self.max_elevation - self.min_elevation
    }

    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| format!("invalid terrain config JSON: {e}"))?;
        config.validate()?;
        Ok(config)
    }
}

impl crate::Saveable for TerrainConfig {
    const SAVE_KEY: &'static str = "terrain_config";

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
                warn!("TerrainConfig: saved config is invalid ({e}), using defaults");
                Self::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Texture layers
// ---------------------------------------------------------------------------

pub const TEXTURE_LAYER_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureLayer {
    Grass,
    Dirt,
    Rock,
    Cliff,
    /// Beaches, the sea bed and the underwater edge.
    Sand,
}

impl TextureLayer {
    pub const ALL: [TextureLayer; TEXTURE_LAYER_COUNT] = [
        TextureLayer::Grass,
        TextureLayer::Dirt,
        TextureLayer::Rock,
        TextureLayer::Cliff,
        TextureLayer::Sand,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureLayer::Grass => "grass",
            TextureLayer::Dirt => "dirt",
            TextureLayer::Rock => "rock",
            TextureLayer::Cliff => "cliff",
            TextureLayer::Sand => "sand",
        }
    }
}

/// World-space footprint of one repeat of a layer's texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSize {
    pub width: f32,
    pub height: f32,
}

/// Texture metadata supplied by whoever loads the terrain textures. Only the
/// tile sizes matter to generation.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TerrainTextures {
    pub tiles: [TileSize; TEXTURE_LAYER_COUNT],
}

impl Default for TerrainTextures {
    fn default() -> Self {
        let tile = |s: f32| TileSize {
            width: s,
            height: s,
        };
        Self {
            tiles: [tile(8.0), tile(6.0), tile(12.0), tile(16.0), tile(5.0)],
        }
    }
}

impl TerrainTextures {
    pub fn tile(&self, layer: TextureLayer) -> TileSize {
        self.tiles[layer.index()]
    }

    /// Per-layer UVs for a world-space XZ position.
    pub fn uvs_at(&self, x: f32, z: f32) -> [Vec2; TEXTURE_LAYER_COUNT] {
        let mut uvs = [Vec2::ZERO; TEXTURE_LAYER_COUNT];
        for layer in TextureLayer::ALL {
            let t = self.tile(layer);
            uvs[layer.index()] = Vec2::new(x / t.width, z / t.height);
        }
        uvs
    }
}

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// One terrain vertex.
///
/// `blend` channels:
/// * `x`: grass → dirt
/// * `y`: rock → cliff
/// * `z`: rock/cliff → ground (grass, dirt, sand)
/// * `w`: grass/dirt → sand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uvs: [Vec2; TEXTURE_LAYER_COUNT],
    pub blend: Vec4,
}

impl TerrainVertex {
    pub fn uv(&self, layer: TextureLayer) -> Vec2 {
        self.uvs[layer.index()]
    }

    /// Resolve the four blend channels into one weight per layer. Weights
    /// are non-negative and sum to 1.
    pub fn layer_weights(&self) -> [f32; TEXTURE_LAYER_COUNT] {
        let b = self.blend.clamp(Vec4::ZERO, Vec4::ONE);
        let ground = b.z;
        let rock = 1.0 - b.z;
        let mut w = [0.0; TEXTURE_LAYER_COUNT];
        w[TextureLayer::Grass.index()] = ground * (1.0 - b.w) * (1.0 - b.x);
        w[TextureLayer::Dirt.index()] = ground * (1.0 - b.w) * b.x;
        w[TextureLayer::Sand.index()] = ground * b.w;
        w[TextureLayer::Rock.index()] = rock * (1.0 - b.y);
        w[TextureLayer::Cliff.index()] = rock * b.y;
        w
    }
}

/// Blend that selects 100% sand.
pub const SAND_BLEND: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerrainState {
    #[default]
    Empty,
    Generated,
    BuffersReady,
}

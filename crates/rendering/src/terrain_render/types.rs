use bevy::prelude::*;

use terrain::terrain_mesh::TEXTURE_LAYER_COUNT;
use terrain::TextureLayer;

/// Which index range of the shared vertex buffer an entity draws.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainSurface {
    BelowWater,
    AboveWater,
}

/// Flat base colour per texture layer. Vertex colours are the weighted mix
/// of these, standing in for the tiled texture sets.
#[derive(Resource, Debug, Clone)]
pub struct TerrainPalette {
    pub layers: [Color; TEXTURE_LAYER_COUNT],
}

impl Default for TerrainPalette {
    fn default() -> Self {
        let mut layers = [Color::WHITE; TEXTURE_LAYER_COUNT];
        layers[TextureLayer::Grass.index()] = Color::srgb(0.33, 0.52, 0.22);
        layers[TextureLayer::Dirt.index()] = Color::srgb(0.47, 0.38, 0.26);
        layers[TextureLayer::Rock.index()] = Color::srgb(0.52, 0.51, 0.49);
        layers[TextureLayer::Cliff.index()] = Color::srgb(0.36, 0.34, 0.33);
        layers[TextureLayer::Sand.index()] = Color::srgb(0.84, 0.78, 0.58);
        Self { layers }
    }
}

impl TerrainPalette {
    pub fn color(&self, layer: TextureLayer) -> Color {
        self.layers[layer.index()]
    }

    /// Blend layer colours in linear space.
    pub fn mix(&self, weights: &[f32; TEXTURE_LAYER_COUNT]) -> [f32; 4] {
        let mut rgb = [0.0_f32; 3];
        for layer in TextureLayer::ALL {
            let w = weights[layer.index()];
            let c = self.color(layer).to_linear();
            rgb[0] += c.red * w;
            rgb[1] += c.green * w;
            rgb[2] += c.blue * w;
        }
        [rgb[0], rgb[1], rgb[2], 1.0]
    }
}

/// Shared material handles, created once at startup.
#[derive(Resource, Debug, Clone)]
pub struct TerrainMaterials {
    pub ground: Handle<StandardMaterial>,
}

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use terrain::{MeshSink, TerrainVertex, TextureLayer};

use super::types::TerrainPalette;

/// `MeshSink` that turns the terrain's shared vertex buffer and its two index
/// ranges into a pair of Bevy meshes.
pub struct BevyMeshSink<'a> {
    palette: &'a TerrainPalette,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    detail_uvs: Vec<[f32; 2]>,
    coarse_uvs: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,
    below_water: Option<Mesh>,
    above_water: Option<Mesh>,
}

impl<'a> BevyMeshSink<'a> {
    pub fn new(palette: &'a TerrainPalette) -> Self {
        Self {
            palette,
            positions: Vec::new(),
            normals: Vec::new(),
            detail_uvs: Vec::new(),
            coarse_uvs: Vec::new(),
            colors: Vec::new(),
            below_water: None,
            above_water: None,
        }
    }

    /// `(below_water, above_water)`, or `None` before both uploads happened.
    pub fn into_meshes(self) -> Option<(Mesh, Mesh)> {
        Some((self.below_water?, self.above_water?))
    }

    fn build(&self, indices: &[u32]) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.detail_uvs.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_1, self.coarse_uvs.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors.clone())
        .with_inserted_indices(Indices::U32(indices.to_vec()))
    }
}

impl MeshSink<TerrainVertex> for BevyMeshSink<'_> {
    fn upload_vertex_buffer(&mut self, vertices: &[TerrainVertex]) {
        self.positions = vertices.iter().map(|v| v.position.to_array()).collect();
        self.normals = vertices.iter().map(|v| v.normal.to_array()).collect();
        // Grass has the finest tiling, cliff the coarsest.
        self.detail_uvs = vertices
            .iter()
            .map(|v| v.uv(TextureLayer::Grass).to_array())
            .collect();
        self.coarse_uvs = vertices
            .iter()
            .map(|v| v.uv(TextureLayer::Cliff).to_array())
            .collect();
        self.colors = vertices
            .iter()
            .map(|v| self.palette.mix(&v.layer_weights()))
            .collect();
    }

    fn upload_index_ranges(&mut self, below_water: &[u32], above_water: &[u32]) {
        self.below_water = Some(self.build(below_water));
        self.above_water = Some(self.build(above_water));
    }
}

//! Terrain assembler.
//!
//! `Terrain` turns a [`TerrainConfig`] into a textured triangle mesh plus a
//! sea-bed skirt, then (in a separate step) splits it into below/above water
//! index ranges and hands everything to the mesh and height-field sinks.
//!
//! ```text
//! Empty --generate--> Generated --finish_generate--> BuffersReady
//!   ^                     |  ^                            |
//!   +------- clear -------+  +-------- generate ----------+
//! ```

mod buffers;
mod displacement;
mod grid;
mod shading;
mod types;

use bevy::prelude::*;
use bevy::utils::Instant;

use crate::height_index::TriangleHeightIndex;
use crate::rng::SandboxRng;
use crate::sinks::{HeightField, HeightFieldSink, MeshSink};
use crate::triangulation::triangulate;

pub use buffers::split_by_water;
pub use grid::{seabed_radius, skirt_vertex_count};
pub use types::{
    TerrainConfig, TerrainState, TerrainTextures, TerrainVertex, TextureLayer, TileSize,
    SAND_BLEND, TEXTURE_LAYER_COUNT,
};

/// Output of [`Terrain::finish_generate`].
#[derive(Debug, Clone, Default)]
pub struct TerrainBuffers {
    pub below_water: Vec<u32>,
    pub above_water: Vec<u32>,
    pub height_field: HeightField,
}

#[derive(Resource, Default)]
pub struct Terrain {
    config: TerrainConfig,
    state: TerrainState,
    rows: usize,
    cols: usize,
    /// Row-major grid followed by the skirt ring.
    vertices: Vec<TerrainVertex>,
    triangles: Vec<[u32; 3]>,
    buffers: Option<TerrainBuffers>,
    height_index: Option<TriangleHeightIndex>,
}

impl Terrain {
    pub fn state(&self) -> TerrainState {
        self.state
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn grid_len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn skirt_count(&self) -> usize {
        self.vertices.len() - self.grid_len()
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    /// Mutable access between `generate` and `finish_generate`.
    pub fn vertices_mut(&mut self) -> &mut [TerrainVertex] {
        &mut self.vertices
    }

    pub fn grid_vertices(&self) -> &[TerrainVertex] {
        &self.vertices[..self.grid_len()]
    }

    pub fn skirt_vertices(&self) -> &[TerrainVertex] {
        &self.vertices[self.grid_len()..]
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn buffers(&self) -> Option<&TerrainBuffers> {
        self.buffers.as_ref()
    }

    /// Drop all geometry. The config is kept.
    pub fn clear(&mut self) {
        self.state = TerrainState::Empty;
        self.rows = 0;
        self.cols = 0;
        self.vertices.clear();
        self.triangles.clear();
        self.buffers = None;
        self.height_index = None;
    }

    /// Build the full terrain mesh for `config`.
    ///
    /// Panics if the config is invalid. The caller's random stream is left
    /// exactly where it was.
    ///
    /// Border vertices are never displaced, so a grid with no interior
    /// vertices (a single cell, e.g. `2x2` at density `0.5`) stays flat at
    /// `min_elevation` and normalization logs a flat-grid warning.
    pub fn generate(
        &mut self,
        config: &TerrainConfig,
        textures: &TerrainTextures,
        rng: &mut SandboxRng,
    ) {
        if let Err(e) = config.validate() {
            panic!("invalid terrain config: {e}");
        }
        let start = Instant::now();
        let outer = rng.snapshot();

        self.clear();
        self.config = config.clone();
        self.rows = config.rows();
        self.cols = config.cols();

        rng.reseed(config.seed);
        let mut vertices = grid::build_grid(config, textures, rng);
        vertices.extend(grid::build_skirt(config, textures));
        let grid_len = self.rows * self.cols;

        // Triangulator output is CCW in XZ, which faces down; flip to face +Y.
        let triangles: Vec<[u32; 3]> = match triangulate(&vertices, |v| {
            (v.position.x as f64, v.position.z as f64)
        }) {
            Ok(tris) => tris.into_iter().map(|[a, b, c]| [a, c, b]).collect(),
            Err(e) => panic!("terrain triangulation failed: {e}"),
        };
        debug!(
            "terrain: triangulated {} vertices into {} triangles",
            vertices.len(),
            triangles.len()
        );

        let noise = displacement::displace(&mut vertices[..grid_len], config, rng);
        displacement::normalize_heights(&mut vertices[..grid_len], config);
        displacement::edge_melt(&mut vertices[..grid_len], config);
        // The melt shaves the peak; stretch back to the full span.
        displacement::normalize_heights(&mut vertices[..grid_len], config);

        shading::compute_normals(&mut vertices, &triangles, self.rows, self.cols);
        for v in &mut vertices[..grid_len] {
            v.blend = shading::blend_weights(v, config, &noise);
        }

        rng.restore(&outer);
        self.vertices = vertices;
        self.triangles = triangles;
        self.state = TerrainState::Generated;

        info!(
            "Terrain generated: seed {}, {}x{} grid + {} skirt, {} vertices, {} triangles in {:.1}ms",
            config.seed,
            self.cols,
            self.rows,
            self.skirt_count(),
            self.vertices.len(),
            self.triangles.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Split by water line, build the height index and push buffers to both
    /// sinks. Panics if nothing has been generated.
    pub fn finish_generate(
        &mut self,
        mesh: &mut impl MeshSink<TerrainVertex>,
        physics: &mut impl HeightFieldSink,
    ) -> &TerrainBuffers {
        assert!(
            self.state != TerrainState::Empty,
            "finish_generate called before generate"
        );

        let (below_water, above_water) =
            split_by_water(&self.vertices, &self.triangles, self.config.water_level);
        let index = TriangleHeightIndex::build(
            self.vertices.iter().map(|v| v.position).collect(),
            self.triangles.clone(),
        );
        let height_field = buffers::sample_height_field(&index, &self.config, self.rows, self.cols);

        mesh.upload_vertex_buffer(&self.vertices);
        mesh.upload_index_ranges(&below_water, &above_water);
        physics.upload_height_field(&height_field);

        debug!(
            "terrain: {} triangles below water, {} above ({} total)",
            below_water.len() / 3,
            above_water.len() / 3,
            self.triangles.len()
        );

        self.height_index = Some(index);
        self.state = TerrainState::BuffersReady;
        self.buffers.insert(TerrainBuffers {
            below_water,
            above_water,
            height_field,
        })
    }

    /// Surface height at world `(x, z)`. `None` outside the mesh or before
    /// `finish_generate`.
    pub fn get_height_value(&self, x: f32, z: f32) -> Option<f32> {
        self.height_index.as_ref()?.height_at(x, z)
    }
}

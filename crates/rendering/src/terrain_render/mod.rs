//! Terrain rendering: converts the staged terrain buffers into two Bevy
//! meshes (below and above the water line) sharing one vertex layout.

mod mesh;
mod systems;
mod types;

pub use mesh::BevyMeshSink;
pub use systems::{setup_terrain_materials, sync_terrain_meshes};
pub use types::{TerrainMaterials, TerrainPalette, TerrainSurface};

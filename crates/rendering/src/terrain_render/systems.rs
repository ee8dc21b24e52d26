use bevy::prelude::*;

use terrain::{MeshSink, StagedTerrainMesh};

use super::mesh::BevyMeshSink;
use super::types::{TerrainMaterials, TerrainPalette, TerrainSurface};

pub fn setup_terrain_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        reflectance: 0.2,
        ..default()
    });
    commands.insert_resource(TerrainMaterials { ground });
}

/// Rebuild the terrain meshes whenever the staged buffers change revision.
/// Existing entities get their mesh assets replaced in place.
pub fn sync_terrain_meshes(
    mut commands: Commands,
    staged: Res<StagedTerrainMesh>,
    palette: Res<TerrainPalette>,
    terrain_materials: Res<TerrainMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut synced_revision: Local<u64>,
    surfaces: Query<(&TerrainSurface, &Mesh3d)>,
) {
    if staged.revision == *synced_revision || staged.vertices.is_empty() {
        return;
    }
    *synced_revision = staged.revision;

    let mut sink = BevyMeshSink::new(&palette);
    sink.upload_vertex_buffer(&staged.vertices);
    sink.upload_index_ranges(&staged.below_water, &staged.above_water);
    let Some((below, above)) = sink.into_meshes() else {
        return;
    };

    if surfaces.is_empty() {
        for (surface, mesh) in [
            (TerrainSurface::BelowWater, below),
            (TerrainSurface::AboveWater, above),
        ] {
            commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(terrain_materials.ground.clone()),
                Transform::IDENTITY,
                surface,
            ));
        }
    } else {
        for (surface, handle) in &surfaces {
            let mesh = match surface {
                TerrainSurface::BelowWater => below.clone(),
                TerrainSurface::AboveWater => above.clone(),
            };
            meshes.insert(&handle.0, mesh);
        }
    }

    debug!(
        "Terrain meshes synced: revision {}, {} vertices, {}/{} indices below/above water",
        staged.revision,
        staged.vertices.len(),
        staged.below_water.len(),
        staged.above_water.len()
    );
}

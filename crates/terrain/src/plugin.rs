use bevy::prelude::*;

use crate::rng::SandboxRng;
use crate::sinks::{HeightFieldCollider, StagedTerrainMesh};
use crate::terrain_mesh::{Terrain, TerrainConfig, TerrainTextures};
use crate::water::{build_water_mesh, WaterConfig, WaterMesh};
use crate::SaveableAppExt;

/// Request a terrain rebuild. `seed: Some(_)` replaces the configured seed
/// first.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RegenerateTerrain {
    pub seed: Option<u64>,
}

/// Systems that (re)build terrain and water. Consumers of the staged
/// buffers should run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerrainSet;

fn rebuild_terrain(
    terrain: &mut Terrain,
    config: &TerrainConfig,
    textures: &TerrainTextures,
    rng: &mut SandboxRng,
    staged: &mut StagedTerrainMesh,
    collider: &mut HeightFieldCollider,
) {
    terrain.generate(config, textures, rng);
    terrain.finish_generate(staged, collider);
}

#[allow(clippy::too_many_arguments)]
fn generate_world(
    config: Res<TerrainConfig>,
    water_config: Res<WaterConfig>,
    textures: Res<TerrainTextures>,
    mut rng: ResMut<SandboxRng>,
    mut terrain: ResMut<Terrain>,
    mut staged: ResMut<StagedTerrainMesh>,
    mut collider: ResMut<HeightFieldCollider>,
    mut water: ResMut<WaterMesh>,
) {
    rebuild_terrain(
        &mut terrain,
        &config,
        &textures,
        &mut rng,
        &mut staged,
        &mut collider,
    );
    *water = build_water_mesh(&water_config, &mut rng);
}

fn handle_regenerate_requests(
    mut events: EventReader<RegenerateTerrain>,
    mut config: ResMut<TerrainConfig>,
    textures: Res<TerrainTextures>,
    mut rng: ResMut<SandboxRng>,
    mut terrain: ResMut<Terrain>,
    mut staged: ResMut<StagedTerrainMesh>,
    mut collider: ResMut<HeightFieldCollider>,
) {
    // Several requests in one frame collapse into the last one.
    let Some(request) = events.read().last().copied() else {
        return;
    };
    if let Some(seed) = request.seed {
        config.seed = seed;
    }
    info!("Regenerating terrain with seed {}", config.seed);
    rebuild_terrain(
        &mut terrain,
        &config,
        &textures,
        &mut rng,
        &mut staged,
        &mut collider,
    );
}

/// Rebuild the water surface when its config is replaced after startup
/// (e.g. by a save load).
fn rebuild_water_on_config_change(
    config: Res<WaterConfig>,
    mut rng: ResMut<SandboxRng>,
    mut water: ResMut<WaterMesh>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    *water = build_water_mesh(&config, &mut rng);
}

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainConfig>()
            .init_resource::<WaterConfig>()
            .init_resource::<TerrainTextures>()
            .init_resource::<SandboxRng>()
            .init_resource::<Terrain>()
            .init_resource::<WaterMesh>()
            .init_resource::<StagedTerrainMesh>()
            .init_resource::<HeightFieldCollider>()
            .add_event::<RegenerateTerrain>()
            .add_systems(Startup, generate_world.in_set(TerrainSet))
            .add_systems(
                Update,
                (handle_regenerate_requests, rebuild_water_on_config_change).in_set(TerrainSet),
            );

        app.register_saveable::<TerrainConfig>()
            .register_saveable::<WaterConfig>()
            .register_saveable::<SandboxRng>();
    }
}

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::rng::SandboxRng;
use crate::terrain_mesh::TerrainConfig;
use crate::water::WaterConfig;
use crate::{Saveable, SaveableAppExt, SaveableRegistry};

fn registry_world() -> (SaveableRegistry, World) {
    let mut app = App::new();
    app.register_saveable::<TerrainConfig>()
        .register_saveable::<WaterConfig>()
        .register_saveable::<SandboxRng>();
    let registry = std::mem::take(&mut *app.world_mut().resource_mut::<SaveableRegistry>());
    let mut world = World::new();
    world.insert_resource(TerrainConfig::default());
    world.insert_resource(WaterConfig::default());
    world.insert_resource(SandboxRng::default());
    (registry, world)
}

#[test]
fn default_configs_are_not_saved() {
    assert!(TerrainConfig::default().save_to_bytes().is_none());
    assert!(WaterConfig::default().save_to_bytes().is_none());
}

#[test]
fn registry_roundtrips_configs_and_rng() {
    let (registry, mut world) = registry_world();
    world.insert_resource(TerrainConfig {
        seed: 999,
        roughness: 0.8,
        ..Default::default()
    });
    world.resource_mut::<SandboxRng>().reseed(5);
    world.resource_mut::<SandboxRng>().next_f32();

    let saved = registry.save_all(&world);
    assert!(saved.contains_key("terrain_config"));
    assert!(saved.contains_key("sandbox_rng"));
    assert!(!saved.contains_key("water_config"));

    let expected_next = world.resource::<SandboxRng>().clone().next_f32();

    registry.reset_all(&mut world);
    assert_eq!(world.resource::<TerrainConfig>().seed, 42);

    registry.load_all(&mut world, &saved);
    assert_eq!(world.resource::<TerrainConfig>().seed, 999);
    assert_eq!(world.resource::<TerrainConfig>().roughness, 0.8);
    assert_eq!(world.resource_mut::<SandboxRng>().next_f32(), expected_next);
}

#[test]
fn corrupt_terrain_config_falls_back_to_default() {
    let (registry, mut world) = registry_world();
    let mut saved = BTreeMap::new();
    saved.insert("terrain_config".to_string(), vec![1, 2, 3]);
    registry.load_all(&mut world, &saved);
    assert_eq!(*world.resource::<TerrainConfig>(), TerrainConfig::default());
}

#[test]
fn invalid_saved_terrain_config_is_rejected() {
    let bad = TerrainConfig {
        width: -1.0,
        ..Default::default()
    };
    let bytes = bitcode::encode(&bad);
    assert_eq!(TerrainConfig::load_from_bytes(&bytes), TerrainConfig::default());
}

#[test]
fn invalid_saved_water_config_is_rejected() {
    let bad = WaterConfig {
        outer_extent: 10.0,
        ..Default::default()
    };
    let bytes = bitcode::encode(&bad);
    assert_eq!(WaterConfig::load_from_bytes(&bytes), WaterConfig::default());
}

#[test]
fn loading_invalid_water_config_keeps_sandbox_running() {
    use crate::test_harness::TestSandbox;

    let mut sandbox = TestSandbox::new();
    sandbox.tick();

    let bad = WaterConfig {
        outer_extent: 10.0,
        ..Default::default()
    };
    let registry = std::mem::take(&mut *sandbox.world_mut().resource_mut::<SaveableRegistry>());
    let mut saved = BTreeMap::new();
    saved.insert("water_config".to_string(), bitcode::encode(&bad));
    registry.load_all(sandbox.world_mut(), &saved);
    sandbox.tick();

    assert_eq!(*sandbox.resource::<WaterConfig>(), WaterConfig::default());
    assert!(!sandbox.water().triangles.is_empty());
}

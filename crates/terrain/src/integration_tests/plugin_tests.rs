use crate::terrain_mesh::TerrainState;
use crate::test_harness::TestSandbox;
use crate::SaveableRegistry;

#[test]
fn startup_generates_terrain_and_water() {
    let mut sandbox = TestSandbox::new();
    sandbox.tick();

    let terrain = sandbox.terrain();
    assert_eq!(terrain.state(), TerrainState::BuffersReady);
    assert_eq!(terrain.rows(), 16);
    assert_eq!(terrain.cols(), 21);

    let staged = sandbox.staged();
    assert_eq!(staged.revision, 1);
    assert_eq!(staged.vertices.len(), terrain.vertices().len());
    assert_eq!(sandbox.collider().revision, 1);
    assert!(!sandbox.water().triangles.is_empty());
}

#[test]
fn regenerate_event_applies_new_seed() {
    let mut sandbox = TestSandbox::new();
    sandbox.tick();
    let before = sandbox.staged().vertices.clone();

    sandbox.regenerate(Some(12345)).tick();

    assert_eq!(sandbox.terrain().config().seed, 12345);
    assert_eq!(sandbox.resource::<crate::TerrainConfig>().seed, 12345);
    assert_eq!(sandbox.staged().revision, 2);
    assert_ne!(sandbox.staged().vertices, before);
}

#[test]
fn frames_without_requests_do_not_regenerate() {
    let mut sandbox = TestSandbox::new();
    sandbox.tick().tick().tick();
    assert_eq!(sandbox.staged().revision, 1);
}

#[test]
fn multiple_requests_in_one_frame_collapse() {
    let mut sandbox = TestSandbox::new();
    sandbox.tick();
    sandbox.regenerate(Some(1)).regenerate(Some(2)).tick();
    assert_eq!(sandbox.staged().revision, 2);
    assert_eq!(sandbox.terrain().config().seed, 2);
}

#[test]
fn plugin_registers_saveables() {
    let sandbox = TestSandbox::new();
    let registry = sandbox.resource::<SaveableRegistry>();
    let mut keys: Vec<&str> = registry.entries.iter().map(|e| e.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["sandbox_rng", "terrain_config", "water_config"]);
}

#[test]
fn replacing_water_config_rebuilds_water() {
    let mut sandbox = TestSandbox::new();
    sandbox.tick().tick();
    let before = sandbox.water().vertices.len();

    let mut wider = TestSandbox::small_water();
    wider.outer_extent *= 2.0;
    sandbox.world_mut().insert_resource(wider);
    sandbox.tick();

    assert!(sandbox.water().vertices.len() > before);
    assert_eq!(sandbox.staged().revision, 1);
}

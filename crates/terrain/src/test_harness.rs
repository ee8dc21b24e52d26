//! # TestSandbox: headless harness for plugin-level tests
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + `TerrainPlugin` so tests
//! can run the real startup/update schedules without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::sinks::{HeightFieldCollider, StagedTerrainMesh};
use crate::terrain_mesh::{Terrain, TerrainConfig};
use crate::water::{WaterConfig, WaterMesh};
use crate::{RegenerateTerrain, TerrainPlugin};

pub struct TestSandbox {
    app: App,
}

impl TestSandbox {
    /// Small, fast terrain so plugin tests stay quick.
    pub fn small_config() -> TerrainConfig {
        TerrainConfig {
            seed: 11,
            width: 40.0,
            length: 30.0,
            vertex_density: 0.5,
            ..Default::default()
        }
    }

    pub fn small_water() -> WaterConfig {
        WaterConfig {
            inner_radius: 30.0,
            outer_extent: 300.0,
            vertex_density: 0.25,
            ..Default::default()
        }
    }

    pub fn new() -> Self {
        Self::with_configs(Self::small_config(), Self::small_water())
    }

    /// Insert configs before the plugin so `init_resource` keeps them.
    pub fn with_configs(terrain: TerrainConfig, water: WaterConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(terrain);
        app.insert_resource(water);
        app.add_plugins(TerrainPlugin);
        Self { app }
    }

    /// Run one frame (the first call also runs `Startup`).
    pub fn tick(&mut self) -> &mut Self {
        self.app.update();
        self
    }

    pub fn regenerate(&mut self, seed: Option<u64>) -> &mut Self {
        self.app.world_mut().send_event(RegenerateTerrain { seed });
        self
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn terrain(&self) -> &Terrain {
        self.resource::<Terrain>()
    }

    pub fn staged(&self) -> &StagedTerrainMesh {
        self.resource::<StagedTerrainMesh>()
    }

    pub fn collider(&self) -> &HeightFieldCollider {
        self.resource::<HeightFieldCollider>()
    }

    pub fn water(&self) -> &WaterMesh {
        self.resource::<WaterMesh>()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

impl Default for TestSandbox {
    fn default() -> Self {
        Self::new()
    }
}

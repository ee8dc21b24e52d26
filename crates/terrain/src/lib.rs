use std::collections::BTreeMap;

use bevy::prelude::*;

pub mod config;
pub mod height_index;
pub mod heightmap;
pub mod noise_field;
pub mod plugin;
pub mod rng;
pub mod sinks;
pub mod terrain_mesh;
pub mod triangulation;
pub mod water;

#[cfg(test)]
pub mod test_harness;

pub use plugin::{RegenerateTerrain, TerrainPlugin, TerrainSet};
pub use rng::SandboxRng;
pub use sinks::{HeightField, HeightFieldCollider, HeightFieldSink, MeshSink, StagedTerrainMesh};
pub use terrain_mesh::{
    Terrain, TerrainBuffers, TerrainConfig, TerrainState, TerrainTextures, TerrainVertex,
    TextureLayer,
};
pub use water::{build_water_mesh, WaterConfig, WaterMesh, WaterVertex};

// ---------------------------------------------------------------------------
// Saveable trait + registry
// ---------------------------------------------------------------------------

/// Resources that persist across sessions as opaque byte blobs keyed by
/// `SAVE_KEY`. Generated geometry is never saved; only the inputs that
/// reproduce it.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique, version-stable key in the save map.
    const SAVE_KEY: &'static str;

    /// Serialize this resource. `None` skips it (e.g. default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Decode bytes via `bitcode::decode`, logging a warning and returning `Default` on failure.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased save/load/reset for one registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
    pub reset_fn: ResetFn,
}

#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register a `Saveable` resource type. A second registration under the
    /// same key is ignored (and trips a debug assertion).
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                world.insert_resource(T::load_from_bytes(bytes));
            }),
            reset_fn: Box::new(|world: &mut World| {
                world.insert_resource(T::default());
            }),
        });
    }

    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Resources whose key is absent keep their current value.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }

    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

/// `App` extension so plugins can register saveables in `build()`.
pub trait SaveableAppExt {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self;
}

impl SaveableAppExt for App {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self {
        self.init_resource::<SaveableRegistry>();
        self.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<T>();
        self
    }
}

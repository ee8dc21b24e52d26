//! F5/F9 quicksave: persists every registered `Saveable` to a single file.
//! Geometry is regenerated from the restored configs on load.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use terrain::{RegenerateTerrain, SaveableRegistry};

pub const QUICKSAVE_PATH: &str = "sandbox.save";
const QUICKSAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct Quicksave {
    pub version: u32,
    /// `Saveable::SAVE_KEY` -> bitcode-encoded resource.
    pub extensions: BTreeMap<String, Vec<u8>>,
}

impl Quicksave {
    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let save: Self = bitcode::decode(bytes).map_err(|e| format!("corrupt quicksave: {e}"))?;
        if save.version != QUICKSAVE_VERSION {
            return Err(format!(
                "unsupported quicksave version {} (expected {})",
                save.version, QUICKSAVE_VERSION
            ));
        }
        Ok(save)
    }
}

pub fn capture(world: &mut World) -> Quicksave {
    let extensions =
        world.resource_scope(|world, registry: Mut<SaveableRegistry>| registry.save_all(world));
    Quicksave {
        version: QUICKSAVE_VERSION,
        extensions,
    }
}

/// Reset every saveable, apply the saved ones, then request a rebuild.
/// Keys missing from the save (default-valued at save time) end up default.
pub fn restore(world: &mut World, save: &Quicksave) {
    world.resource_scope(|world, registry: Mut<SaveableRegistry>| {
        registry.reset_all(world);
        registry.load_all(world, &save.extensions);
    });
    world.send_event(RegenerateTerrain { seed: None });
}

pub fn write_quicksave(world: &mut World, path: &Path) -> Result<usize, String> {
    let bytes = capture(world).encode();
    std::fs::write(path, &bytes).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(bytes.len())
}

pub fn read_quicksave(world: &mut World, path: &Path) -> Result<usize, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let save = Quicksave::decode(&bytes)?;
    restore(world, &save);
    Ok(save.extensions.len())
}

/// Exclusive system: F5 saves, F9 loads.
pub fn quicksave_hotkeys(world: &mut World) {
    let (save, load) = {
        let keys = world.resource::<ButtonInput<KeyCode>>();
        (keys.just_pressed(KeyCode::F5), keys.just_pressed(KeyCode::F9))
    };
    let path = Path::new(QUICKSAVE_PATH);

    if save {
        match write_quicksave(world, path) {
            Ok(len) => info!("Quicksaved {} bytes to {}", len, path.display()),
            Err(e) => warn!("Quicksave failed: {e}"),
        }
    }
    if load {
        match read_quicksave(world, path) {
            Ok(count) => info!("Quickload restored {} resources", count),
            Err(e) => warn!("Quickload failed: {e}"),
        }
    }
}

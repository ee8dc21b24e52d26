//! Optional JSON terrain config loaded at startup.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use terrain::TerrainConfig;

pub const CONFIG_ENV: &str = "SANDBOX_TERRAIN_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "terrain.json";

/// `$SANDBOX_TERRAIN_CONFIG` if set, otherwise `terrain.json` when present.
pub fn config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            path.exists().then_some(path)
        }
    }
}

pub fn read_terrain_config(path: &Path) -> Result<TerrainConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    TerrainConfig::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Never fails: a missing file means defaults, a bad one logs and falls back.
pub fn load_terrain_config() -> TerrainConfig {
    let Some(path) = config_path() else {
        return TerrainConfig::default();
    };
    match read_terrain_config(&path) {
        Ok(config) => {
            info!("Loaded terrain config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring terrain config, using defaults: {e}");
            TerrainConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sandbox_config_{}_{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_partial_config_with_defaults() {
        let path = scratch_file("partial", r#"{ "seed": 7, "width": 120.0 }"#);
        let config = read_terrain_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 120.0);
        assert_eq!(config.length, TerrainConfig::default().length);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let path = scratch_file("invalid", r#"{ "vertex_density": 0.0 }"#);
        let result = read_terrain_config(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("sandbox_config_does_not_exist.json");
        let err = read_terrain_config(&path).unwrap_err();
        assert!(err.contains("cannot read"));
    }
}

//! # Engine Configuration
//!
//! JSON-compatible configuration for the world manager and world generation. Every
//! field is optional in the JSON form; missing fields take their defaults.
//!
//! ```json
//! {
//!   "world": { "chunkSize": { "width": 32, "height": 32 }, "drawDistance": 2 },
//!   "generation": { "seed": 7, "terrain": { "waterOffset": 4 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::voxels::{chunk::ChunkSize, params::GenerationParams};

/// Errors raised while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings of the world manager itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    pub chunk_size: ChunkSize,
    /// Chunks loaded in each direction around the observer's chunk
    pub draw_distance: u32,
    /// Generate streamed-in chunks on background workers
    pub async_loading: bool,
    /// Number of background generation workers
    pub worker_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: ChunkSize::default(),
            draw_distance: 2,
            async_loading: true,
            worker_count: 2,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub generation: GenerationParams,
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("Loading config from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{ConfigError, EngineConfig};
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").expect("valid json");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.world.chunk_size.width, 32);
        assert_eq!(config.world.draw_distance, 2);
        assert!(config.world.async_loading);
    }

    #[test]
    fn nested_options_use_camel_case() {
        let config = EngineConfig::from_json_str(
            r#"{
                "world": { "drawDistance": 4, "asyncLoading": false, "chunkSize": { "width": 16 } },
                "generation": {
                    "seed": 99,
                    "trees": { "canopy": { "maxRadius": 6 } },
                    "resources": [ { "block": "ironOre", "scale": { "x": 1.0, "y": 2.0, "z": 3.0 }, "scarcity": 0.1 } ]
                }
            }"#,
        )
        .expect("valid json");

        assert_eq!(config.world.draw_distance, 4);
        assert!(!config.world.async_loading);
        assert_eq!(config.world.chunk_size.width, 16);
        assert_eq!(config.world.chunk_size.height, 32);
        assert_eq!(config.generation.seed, 99);
        assert_eq!(config.generation.trees.canopy.max_radius, 6);
        assert_eq!(config.generation.trees.canopy.min_radius, 2);
        assert_eq!(config.generation.resources.len(), 1);
        assert_eq!(config.generation.resources[0].block, BlockType::IRON_ORE);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = EngineConfig::from_json_str("{ \"world\": ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn reads_config_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "generation": {{ "seed": 5 }} }}"#).expect("write config");

        let config = EngineConfig::from_json_file(file.path()).expect("readable config");
        assert_eq!(config.generation.seed, 5);
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = EngineConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

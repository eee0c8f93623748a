//! # Generation Parameters
//!
//! The value struct every chunk of a generation is built from. Parameters are
//! passed explicitly into chunk generation; changing them is a deliberate
//! "reconfigure and regenerate" step on the world, never ambient state.
//!
//! All structs serialize as camelCase JSON, matching the configuration surface
//! (`waterOffset`, `tundraToTemperate`, `canopy.minRadius`, ...).

use serde::{Deserialize, Serialize};

use super::block::{
    block_type::{catalog_name, BlockType},
    resource_descriptors, ResourceScale,
};

/// Terrain height field settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerrainParams {
    /// Horizontal scale of the height noise
    pub scale: f64,
    /// Height variation around `offset`
    pub magnitude: f64,
    /// Base terrain height
    pub offset: f64,
    /// Every column cell at or below this height (and at or below the surface) is sand
    pub water_offset: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: 100.0,
            magnitude: 8.0,
            offset: 6.0,
            water_offset: 3,
        }
    }
}

/// Secondary, higher-frequency biome noise blended into the primary sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiomeVariation {
    pub amplitude: f64,
    pub scale: f64,
}

impl Default for BiomeVariation {
    fn default() -> Self {
        Self {
            amplitude: 0.2,
            scale: 50.0,
        }
    }
}

/// Biome classification settings.
///
/// The three cutoffs must be strictly increasing. They are not reordered or
/// validated; out-of-order cutoffs still classify every column deterministically,
/// just not into the intended bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiomeParams {
    pub scale: f64,
    pub variation: BiomeVariation,
    pub tundra_to_temperate: f64,
    pub temperate_to_jungle: f64,
    pub jungle_to_desert: f64,
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            scale: 500.0,
            variation: BiomeVariation::default(),
            tundra_to_temperate: 0.25,
            temperate_to_jungle: 0.5,
            jungle_to_desert: 0.75,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrunkParams {
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for TrunkParams {
    fn default() -> Self {
        Self {
            min_height: 4,
            max_height: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanopyParams {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Probability in `[0, 1]` that a cell inside the canopy radius gets a leaf
    pub density: f64,
}

impl Default for CanopyParams {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 4,
            density: 0.7,
        }
    }
}

/// Tree placement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeParams {
    /// Probability that a surface cell above the water line roots a tree
    pub frequency: f64,
    pub trunk: TrunkParams,
    pub canopy: CanopyParams,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            frequency: 0.005,
            trunk: TrunkParams::default(),
            canopy: CanopyParams::default(),
        }
    }
}

/// Cloud layer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudParams {
    pub scale: f64,
    /// Fraction of the sky in `[0, 1]` covered by clouds
    pub density: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            scale: 30.0,
            density: 0.3,
        }
    }
}

/// Generation settings of one ore-like resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceParams {
    /// The block placed where the resource noise exceeds `scarcity`, by catalog name
    #[serde(with = "catalog_name")]
    pub block: BlockType,
    pub scale: ResourceScale,
    /// Noise threshold in `[0, 1]`; higher is rarer
    pub scarcity: f64,
}

/// Returns the registry defaults for every resource, in generation order.
pub fn default_resources() -> Vec<ResourceParams> {
    resource_descriptors()
        .map(|(block, defaults)| ResourceParams {
            block,
            scale: defaults.scale,
            scarcity: defaults.scarcity,
        })
        .collect()
}

/// Every setting that shapes procedural generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParams {
    pub seed: u64,
    pub terrain: TerrainParams,
    pub biomes: BiomeParams,
    pub trees: TreeParams,
    pub clouds: CloudParams,
    /// Ore-like resources, applied in order; later entries win on overlap
    pub resources: Vec<ResourceParams>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain: TerrainParams::default(),
            biomes: BiomeParams::default(),
            trees: TreeParams::default(),
            clouds: CloudParams::default(),
            resources: default_resources(),
        }
    }
}

impl GenerationParams {
    /// Default parameters with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Returns the settings of a resource, if it takes part in generation.
    pub fn resource(&self, block: BlockType) -> Option<&ResourceParams> {
        self.resources.iter().find(|resource| resource.block == block)
    }

    /// Mutable access to the settings of a resource.
    pub fn resource_mut(&mut self, block: BlockType) -> Option<&mut ResourceParams> {
        self.resources
            .iter_mut()
            .find(|resource| resource.block == block)
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationParams;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn default_resources_come_from_the_registry() {
        let params = GenerationParams::default();
        let stone = params.resource(BlockType::STONE).expect("stone is a resource");
        assert_eq!(stone.scarcity, 0.5);
        assert_eq!(stone.scale.x, 30.0);
        assert!(params.resource(BlockType::GRASS).is_none());
    }

    #[test]
    fn json_uses_camel_case_option_names() {
        let json = serde_json::to_string(&GenerationParams::default()).expect("serializable");
        assert!(json.contains("\"waterOffset\""));
        assert!(json.contains("\"tundraToTemperate\""));
        assert!(json.contains("\"minRadius\""));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: GenerationParams =
            serde_json::from_str(r#"{"seed": 9, "terrain": {"magnitude": 2.0}}"#)
                .expect("partial params parse");
        assert_eq!(params.seed, 9);
        assert_eq!(params.terrain.magnitude, 2.0);
        assert_eq!(params.terrain.scale, 100.0);
        assert_eq!(params.resources.len(), 3);
    }

    #[test]
    fn resources_are_named_by_catalog_name() {
        let json = serde_json::to_string(&GenerationParams::default()).expect("serializable");
        assert!(json.contains("\"block\":\"coalOre\""));
        assert!(!json.contains("COAL_ORE"));

        let params: GenerationParams = serde_json::from_str(
            r#"{"resources": [{"block": "ironOre", "scale": {"x": 1.0, "y": 1.0, "z": 1.0}, "scarcity": 0.2}]}"#,
        )
        .expect("catalog names parse");
        assert_eq!(params.resources[0].block, BlockType::IRON_ORE);
    }

    #[test]
    fn unknown_resource_names_are_rejected() {
        let result: Result<GenerationParams, _> = serde_json::from_str(
            r#"{"resources": [{"block": "IRON_ORE", "scale": {"x": 1.0, "y": 1.0, "z": 1.0}, "scarcity": 0.2}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn resources_are_mutable_by_block() {
        let mut params = GenerationParams::default();
        params
            .resource_mut(BlockType::IRON_ORE)
            .expect("iron is a resource")
            .scarcity = 0.1;
        assert_eq!(params.resource(BlockType::IRON_ORE).map(|r| r.scarcity), Some(0.1));
    }
}

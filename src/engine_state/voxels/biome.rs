//! # Biomes
//!
//! Per-column biome classification from blended noise.

use super::{block::block_type::BlockType, params::BiomeParams};

/// The four biome bands, in increasing order of the classification sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Tundra,
    Temperate,
    Jungle,
    Desert,
}

impl Biome {
    /// Classifies a blended biome sample against the configured cutoffs.
    ///
    /// Cutoffs are expected to satisfy
    /// `tundra_to_temperate < temperate_to_jungle < jungle_to_desert`; they are
    /// checked in that order and never reordered.
    pub fn classify(sample: f64, params: &BiomeParams) -> Biome {
        if sample < params.tundra_to_temperate {
            Biome::Tundra
        } else if sample < params.temperate_to_jungle {
            Biome::Temperate
        } else if sample < params.jungle_to_desert {
            Biome::Jungle
        } else {
            Biome::Desert
        }
    }

    /// The block placed at the surface of a column.
    pub fn ground_block(self) -> BlockType {
        match self {
            Biome::Desert => BlockType::SAND,
            Biome::Temperate | Biome::Jungle => BlockType::GRASS,
            Biome::Tundra => BlockType::SNOW,
        }
    }

    /// The block a tree trunk is built from.
    pub fn trunk_block(self) -> BlockType {
        match self {
            Biome::Temperate | Biome::Tundra => BlockType::TREE,
            Biome::Jungle => BlockType::JUNGLE_TREE,
            Biome::Desert => BlockType::CACTUS,
        }
    }

    /// The block a tree canopy is filled with, if trees here grow one.
    pub fn canopy_block(self) -> Option<BlockType> {
        match self {
            Biome::Temperate => Some(BlockType::LEAVES),
            Biome::Jungle => Some(BlockType::JUNGLE_LEAVES),
            Biome::Tundra | Biome::Desert => None,
        }
    }
}

//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides block type identification, conversion from the compact integer
//! representation used in saves, and lookup by name.

use num_derive::FromPrimitive;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant of each variant is its stable block id. The `FromPrimitive`
/// derive allows conversion from integers, which is used when deserializing edits.
/// `EMPTY` (id 0) is reserved and means "no block".
#[allow(non_camel_case_types)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize,
    Deserialize,
)]
pub enum BlockType {
    /// No block. Cells holding this id are air.
    #[default]
    EMPTY = 0,

    /// Grass-topped ground of temperate and jungle biomes.
    GRASS = 1,

    /// Default fill below the surface.
    DIRT = 2,

    /// Ore-like resource, generated in large pockets.
    STONE = 3,

    /// Ore-like resource, generated in small veins.
    COAL_ORE = 4,

    /// Ore-like resource, rare and widely spaced.
    IRON_ORE = 5,

    /// Trunk of temperate and tundra trees.
    TREE = 6,

    /// Canopy of temperate trees.
    LEAVES = 7,

    /// Beaches, riverbeds and desert ground.
    SAND = 8,

    /// Cloud layer at the top of the chunk.
    CLOUD = 9,

    /// Ground of tundra biomes.
    SNOW = 10,

    /// Trunk of jungle trees.
    JUNGLE_TREE = 11,

    /// Canopy of jungle trees.
    JUNGLE_LEAVES = 12,

    /// Desert "tree", a trunk without canopy.
    CACTUS = 13,
}

/// Lookup table from the catalog name of a block to its type.
static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "empty" => BlockType::EMPTY,
    "grass" => BlockType::GRASS,
    "dirt" => BlockType::DIRT,
    "stone" => BlockType::STONE,
    "coalOre" => BlockType::COAL_ORE,
    "ironOre" => BlockType::IRON_ORE,
    "tree" => BlockType::TREE,
    "leaves" => BlockType::LEAVES,
    "sand" => BlockType::SAND,
    "cloud" => BlockType::CLOUD,
    "snow" => BlockType::SNOW,
    "jungleTree" => BlockType::JUNGLE_TREE,
    "jungleLeaves" => BlockType::JUNGLE_LEAVES,
    "cactus" => BlockType::CACTUS,
};

impl BlockType {
    /// Number of block types, including `EMPTY`.
    pub const COUNT: usize = 14;

    /// Every block type in id order.
    pub const ALL: [BlockType; BlockType::COUNT] = [
        BlockType::EMPTY,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::COAL_ORE,
        BlockType::IRON_ORE,
        BlockType::TREE,
        BlockType::LEAVES,
        BlockType::SAND,
        BlockType::CLOUD,
        BlockType::SNOW,
        BlockType::JUNGLE_TREE,
        BlockType::JUNGLE_LEAVES,
        BlockType::CACTUS,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// This is used when deserializing block data from the compact storage format.
    ///
    /// # Returns
    /// The corresponding `BlockType`, or `None` if the id is not in the catalog.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Returns the compact id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Looks a block type up by its catalog name (e.g. `"coalOre"`).
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_NAMES.get(name).copied()
    }

    /// Returns the catalog name of this block type (e.g. `"coalOre"`).
    pub fn name(self) -> &'static str {
        super::descriptor(self).name
    }

    /// Returns `true` for the reserved "no block" id.
    pub fn is_empty(self) -> bool {
        self == BlockType::EMPTY
    }
}

/// Serde adapter that writes a `BlockType` as its catalog name.
///
/// Used with `#[serde(with = "catalog_name")]` on configuration fields, so blocks
/// are named the same way there as everywhere else.
pub mod catalog_name {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::BlockType;

    pub fn serialize<S: Serializer>(block: &BlockType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(block.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BlockType, D::Error> {
        let name = String::deserialize(deserializer)?;
        BlockType::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown block name {:?}", name)))
    }
}

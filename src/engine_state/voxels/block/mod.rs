//! # Block Module
//!
//! This module provides the static block registry and the per-cell block data
//! stored in every chunk grid.
//!
//! The registry is a fixed table indexed by block id: each entry names the block,
//! references the textures the rendering collaborator should bind for each face,
//! and, for ore-like resources, carries the default noise scale and scarcity used
//! by resource generation.

use block_side::BlockSide;
use block_type::BlockType;
use serde::{Deserialize, Serialize};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for compact storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Per-axis noise scale of an ore-like resource.
///
/// World coordinates are divided by these values before sampling, so larger values
/// stretch the resource pockets along that axis.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceScale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ResourceScale {
    /// A scale that is the same along every axis.
    pub const fn uniform(scale: f64) -> Self {
        Self {
            x: scale,
            y: scale,
            z: scale,
        }
    }
}

/// Default generation settings of an ore-like resource.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResourceDefaults {
    /// Noise scale of the resource field
    pub scale: ResourceScale,
    /// Noise threshold in `[0, 1]` above which the resource replaces the fill block
    pub scarcity: f64,
}

/// Immutable registry entry describing a block type.
#[derive(Debug)]
pub struct BlockDescriptor {
    /// The block type this entry describes
    pub block_type: BlockType,
    /// Catalog name, as used in configuration and tooling
    pub name: &'static str,
    /// Texture name for each face, indexed by `BlockSide`
    pub textures: Option<[&'static str; 6]>,
    /// Flat color for blocks rendered without a texture
    pub color: Option<u32>,
    /// Resource generation defaults, for ore-like blocks only
    pub resource: Option<ResourceDefaults>,
}

impl BlockDescriptor {
    /// Returns the texture bound to the given face, if the block is textured.
    pub fn texture(&self, side: BlockSide) -> Option<&'static str> {
        self.textures.map(|textures| textures[side as usize])
    }
}

/// Builds a texture table using the same texture on all six faces.
const fn same_on_all_sides(texture: &'static str) -> Option<[&'static str; 6]> {
    Some([texture; 6])
}

/// Builds a texture table for log-like blocks: `top` on the top and bottom faces,
/// `side` everywhere else.
const fn column(side: &'static str, top: &'static str) -> Option<[&'static str; 6]> {
    // [Front, Back, Bottom, Top, Left, Right]
    Some([side, side, top, top, side, side])
}

/// The block registry, indexed by `BlockType` as `usize`.
pub static BLOCK_DESCRIPTORS: [BlockDescriptor; BlockType::COUNT] = [
    BlockDescriptor {
        block_type: BlockType::EMPTY,
        name: "empty",
        textures: None,
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::GRASS,
        name: "grass",
        textures: Some([
            "grass_side",
            "grass_side",
            "dirt",
            "grass",
            "grass_side",
            "grass_side",
        ]),
        color: Some(0x559020),
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::DIRT,
        name: "dirt",
        textures: same_on_all_sides("dirt"),
        color: Some(0x807020),
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::STONE,
        name: "stone",
        textures: same_on_all_sides("stone"),
        color: Some(0x808080),
        resource: Some(ResourceDefaults {
            scale: ResourceScale::uniform(30.0),
            scarcity: 0.5,
        }),
    },
    BlockDescriptor {
        block_type: BlockType::COAL_ORE,
        name: "coalOre",
        textures: same_on_all_sides("coal_ore"),
        color: Some(0x202020),
        resource: Some(ResourceDefaults {
            scale: ResourceScale::uniform(20.0),
            scarcity: 0.8,
        }),
    },
    BlockDescriptor {
        block_type: BlockType::IRON_ORE,
        name: "ironOre",
        textures: same_on_all_sides("iron_ore"),
        color: Some(0x806060),
        resource: Some(ResourceDefaults {
            scale: ResourceScale::uniform(60.0),
            scarcity: 0.9,
        }),
    },
    BlockDescriptor {
        block_type: BlockType::TREE,
        name: "tree",
        textures: column("tree_side", "tree_top"),
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::LEAVES,
        name: "leaves",
        textures: same_on_all_sides("leaves"),
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::SAND,
        name: "sand",
        textures: same_on_all_sides("sand"),
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::CLOUD,
        name: "cloud",
        textures: None,
        color: Some(0xf0f0f0),
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::SNOW,
        name: "snow",
        textures: None,
        color: Some(0xffffff),
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::JUNGLE_TREE,
        name: "jungleTree",
        textures: column("jungle_tree_side", "jungle_tree_top"),
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::JUNGLE_LEAVES,
        name: "jungleLeaves",
        textures: same_on_all_sides("jungle_leaves"),
        color: None,
        resource: None,
    },
    BlockDescriptor {
        block_type: BlockType::CACTUS,
        name: "cactus",
        textures: column("cactus_side", "cactus_top"),
        color: None,
        resource: None,
    },
];

/// Returns the registry entry for a block type.
pub fn descriptor(block_type: BlockType) -> &'static BlockDescriptor {
    &BLOCK_DESCRIPTORS[block_type as usize]
}

/// Returns the ore-like block types in generation order, with their defaults.
///
/// Later entries take precedence when several resources claim the same cell.
pub fn resource_descriptors() -> impl Iterator<Item = (BlockType, ResourceDefaults)> {
    BLOCK_DESCRIPTORS
        .iter()
        .filter_map(|entry| entry.resource.map(|defaults| (entry.block_type, defaults)))
}

/// The contents of a single grid cell.
///
/// Every cell of a loaded chunk holds exactly one `BlockCell`. The `instance_id`
/// is the cell's slot in its chunk's instance list for `block_type`; it is `None`
/// for empty cells and for blocks hidden on all six sides.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockCell {
    /// The type of block in this cell
    pub block_type: BlockType,
    /// Render instance slot, if the block is visible
    pub instance_id: Option<u32>,
}

impl BlockCell {
    /// Creates a cell holding the given block with no render instance.
    pub fn new(block_type: BlockType) -> Self {
        BlockCell {
            block_type,
            instance_id: None,
        }
    }

    /// Returns `true` if the cell holds no block.
    pub fn is_empty(&self) -> bool {
        self.block_type.is_empty()
    }
}

//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size column of the world,
//! `width × height × width` blocks, identified by its horizontal chunk coordinate.
//! It owns the block grid, the visibility state and the render instance lists of
//! its blocks.
//!
//! ## Storage
//!
//! Chunks keep two views of their blocks:
//! - `cells`: one `BlockCell` per grid position, dense, in x-fastest order
//!   (`x + width * y + width * height * z`)
//! - `solid_array`: a bit vector with one bit per block, padded by one cell on
//!   every side. The padding is never set, so blocks on the chunk border see their
//!   out-of-chunk neighbors as empty.
//!
//! The bit vector makes the obscured check (six neighbor lookups) O(1) without
//! bounds checks. `cells` and `solid_array` are kept in sync by `set_block_id`.
//!
//! ## Instances
//!
//! For every block type the chunk keeps a dense `InstanceList`. A non-empty block
//! owns an instance exactly when it is not obscured on all six sides; its
//! `instance_id` is the slot it occupies. Instances are added and removed
//! incrementally as blocks change, see `add_block` and `remove_block`.

use bitvec::prelude::BitVec;
use cgmath::Point3;
use serde::{Deserialize, Serialize};

use self::chunk_iteration::ChunkBlockIterator;
use self::instances::InstanceList;
use super::block::{block_side::BlockSide, block_type::BlockType, BlockCell};
use super::edit_store::{ChunkOrigin, EditStore};
use crate::engine_state::rendering::{InstanceRaw, RenderBatch};

mod chunk_generation;
pub mod chunk_iteration;
pub mod instances;

/// Height of the water plane above `waterOffset`.
pub const WATER_PLANE_OFFSET: f32 = 0.4;

/// Horizontal position of a chunk, in chunk units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Chebyshev distance between two chunk coordinates.
    pub fn distance(self, other: ChunkCoord) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.z - other.z).unsigned_abs())
    }
}

/// Dimensions of every chunk in a world.
///
/// Both dimensions must be at least 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkSize {
    /// Extent along x and z
    pub width: usize,
    /// Extent along y
    pub height: usize,
}

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize {
            width: 32,
            height: 32,
        }
    }
}

impl ChunkSize {
    /// Number of cells in one chunk.
    pub fn volume(&self) -> usize {
        self.width * self.height * self.width
    }

    /// Number of bits in the padded solidity array.
    fn wrapped_volume(&self) -> usize {
        (self.width + 2) * (self.height + 2) * (self.width + 2)
    }
}

/// A `width × height × width` section of the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates
    coord: ChunkCoord,
    size: ChunkSize,
    /// One cell per grid position; empty until `initialize` runs
    cells: Vec<BlockCell>,
    /// Padded solidity bits, see the module docs
    solid_array: BitVec,
    /// Render instances, indexed by `BlockType as usize`
    instances: Vec<InstanceList>,
    /// Height of the water plane, known once generated
    water_level: Option<f32>,
    /// Set once the whole generation pipeline has run
    loaded: bool,
}

impl Chunk {
    /// Creates an unloaded chunk with no storage allocated.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `size` - The dimensions shared by every chunk of the world
    pub fn new(coord: ChunkCoord, size: ChunkSize) -> Self {
        Chunk {
            coord,
            size,
            cells: Vec::new(),
            solid_array: BitVec::new(),
            instances: Vec::new(),
            water_level: None,
            loaded: false,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn size(&self) -> ChunkSize {
        self.size
    }

    /// Returns `true` once the generation pipeline has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// World-space `(x, z)` of the chunk's minimum corner.
    pub fn origin(&self) -> ChunkOrigin {
        let width = self.size.width as i32;
        (self.coord.x * width, self.coord.z * width)
    }

    /// Height of the water plane drawn over this chunk.
    ///
    /// # Returns
    /// `waterOffset + 0.4` of the parameters the chunk was generated with, or `None`
    /// before generation.
    pub fn water_level(&self) -> Option<f32> {
        self.water_level
    }

    /// Allocates an all-empty grid and empty instance lists.
    pub fn initialize(&mut self) {
        self.cells = vec![BlockCell::default(); self.size.volume()];
        self.solid_array = BitVec::repeat(false, self.size.wrapped_volume());
        self.instances = vec![InstanceList::default(); BlockType::COUNT];
    }

    /// Returns `true` if a chunk-local position lies inside the grid.
    pub fn in_bounds(&self, local: Point3<i32>) -> bool {
        let width = self.size.width as i32;
        let height = self.size.height as i32;
        (0..width).contains(&local.x)
            && (0..height).contains(&local.y)
            && (0..width).contains(&local.z)
    }

    /// Converts a chunk-local position to a world position.
    pub fn to_world(&self, local: Point3<i32>) -> Point3<i32> {
        let (origin_x, origin_z) = self.origin();
        Point3::new(origin_x + local.x, local.y, origin_z + local.z)
    }

    /// Index of a position in `cells`, or `None` if it is outside the grid or the
    /// grid is not allocated.
    fn cell_index(&self, local: Point3<i32>) -> Option<usize> {
        if !self.in_bounds(local) || self.cells.is_empty() {
            return None;
        }
        let (x, y, z) = (local.x as usize, local.y as usize, local.z as usize);
        Some(x + self.size.width * y + self.size.width * self.size.height * z)
    }

    /// Index of a position in the padded `solid_array`.
    ///
    /// Valid for every position from -1 to the grid extent on each axis, which
    /// covers the padding ring.
    fn solid_index(&self, local: Point3<i32>) -> Option<usize> {
        let wrapped_width = self.size.width as i32 + 2;
        let wrapped_height = self.size.height as i32 + 2;
        let (x, y, z) = (local.x + 1, local.y + 1, local.z + 1);
        if !(0..wrapped_width).contains(&x)
            || !(0..wrapped_height).contains(&y)
            || !(0..wrapped_width).contains(&z)
            || self.solid_array.is_empty()
        {
            return None;
        }
        Some((x + wrapped_width * y + wrapped_width * wrapped_height * z) as usize)
    }

    /// Gets the cell at a chunk-local position.
    ///
    /// # Returns
    /// The cell, or `None` if the position is out of bounds or the chunk has no grid.
    pub fn get_block(&self, local: Point3<i32>) -> Option<&BlockCell> {
        self.cell_index(local).map(|index| &self.cells[index])
    }

    /// Sets the block type of a cell, keeping the solidity bits in sync.
    ///
    /// Instances are left untouched; callers that change a block after meshing go
    /// through `add_block`/`remove_block`. Out-of-bounds positions are ignored, which
    /// lets tree canopies spill over the chunk edge harmlessly.
    pub fn set_block_id(&mut self, local: Point3<i32>, block_type: BlockType) {
        let Some(index) = self.cell_index(local) else {
            return;
        };
        self.cells[index].block_type = block_type;
        if let Some(solid_index) = self.solid_index(local) {
            self.solid_array.set(solid_index, !block_type.is_empty());
        }
    }

    fn set_block_instance_id(&mut self, local: Point3<i32>, instance_id: Option<u32>) {
        if let Some(index) = self.cell_index(local) {
            self.cells[index].instance_id = instance_id;
        }
    }

    /// Checks if the block at a chunk-local position is solid.
    ///
    /// # Returns
    /// `true` if the block is non-empty, `false` if it's empty or outside the chunk.
    pub fn is_block_solid(&self, local: Point3<i32>) -> bool {
        self.solid_index(local)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Returns `true` if all six face neighbors of a position are solid.
    ///
    /// Neighbors outside this chunk count as empty, so border blocks are never
    /// obscured.
    pub fn is_block_obscured(&self, local: Point3<i32>) -> bool {
        BlockSide::all()
            .into_iter()
            .all(|side| self.is_block_solid(side.neighbor_of(local)))
    }

    /// Rebuilds every instance list from the grid in raster order.
    pub fn generate_meshes(&mut self) {
        for list in &mut self.instances {
            list.clear();
        }
        for cell in &mut self.cells {
            cell.instance_id = None;
        }

        let width = self.size.width as i32;
        let height = self.size.height as i32;
        for x in 0..width {
            for y in 0..height {
                for z in 0..width {
                    self.add_block_instance(Point3::new(x, y, z));
                }
            }
        }
    }

    /// Gives the block at a position an instance if it is visible and has none.
    ///
    /// # Returns
    /// `true` if an instance was allocated.
    pub fn add_block_instance(&mut self, local: Point3<i32>) -> bool {
        let Some(index) = self.cell_index(local) else {
            return false;
        };
        let cell = self.cells[index];
        if cell.is_empty() || cell.instance_id.is_some() || self.is_block_obscured(local) {
            return false;
        }

        let instance = InstanceRaw::new(self.to_world(local));
        let slot = self.instances[cell.block_type as usize].push(local, instance);
        self.cells[index].instance_id = Some(slot);
        true
    }

    /// Releases the instance of the block at a position, if it has one.
    ///
    /// The last instance of the same type moves into the freed slot and its owner's
    /// `instance_id` is updated to match.
    pub fn delete_block_instance(&mut self, local: Point3<i32>) {
        let Some(index) = self.cell_index(local) else {
            return;
        };
        let cell = self.cells[index];
        let Some(slot) = cell.instance_id else {
            return;
        };

        if let Some(moved) = self.instances[cell.block_type as usize].swap_remove(slot) {
            self.set_block_instance_id(moved, Some(slot));
        }
        self.cells[index].instance_id = None;
    }

    /// Places a block in an empty cell and records the edit.
    ///
    /// Only this cell is updated. Neighbors that the new block obscures are hidden
    /// by the world, which can see across chunk borders.
    ///
    /// # Returns
    /// `true` if the block was placed; `false` (and nothing changes) if the cell is
    /// occupied, out of bounds, or `block_type` is empty.
    pub fn add_block(
        &mut self,
        local: Point3<i32>,
        block_type: BlockType,
        edits: &mut EditStore,
    ) -> bool {
        match self.get_block(local) {
            Some(cell) if cell.is_empty() && !block_type.is_empty() => {}
            _ => {
                log::trace!("Ignoring add of {:?} at {:?}", block_type, local);
                return false;
            }
        }

        self.set_block_id(local, block_type);
        self.add_block_instance(local);
        edits.set(self.origin(), local, block_type);
        true
    }

    /// Empties an occupied cell and records the edit.
    ///
    /// # Returns
    /// `true` if a block was removed; `false` if the cell was already empty or out of
    /// bounds.
    pub fn remove_block(&mut self, local: Point3<i32>, edits: &mut EditStore) -> bool {
        match self.get_block(local) {
            Some(cell) if !cell.is_empty() => {}
            _ => {
                log::trace!("Ignoring removal at {:?}", local);
                return false;
            }
        }

        self.delete_block_instance(local);
        self.set_block_id(local, BlockType::EMPTY);
        edits.set(self.origin(), local, BlockType::EMPTY);
        true
    }

    /// Live instances of one block type.
    pub fn instances_of(&self, block_type: BlockType) -> &[InstanceRaw] {
        self.instances
            .get(block_type as usize)
            .map(InstanceList::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty instance lists of this chunk, one batch per block type.
    pub fn render_batches(&self) -> impl Iterator<Item = RenderBatch<'_>> + '_ {
        let chunk = self.coord;
        BlockType::ALL
            .into_iter()
            .filter(|block_type| !block_type.is_empty())
            .map(move |block_type| RenderBatch {
                chunk,
                block_type,
                instances: self.instances_of(block_type),
            })
            .filter(|batch| !batch.is_empty())
    }

    /// Total number of live instances across all block types.
    pub fn instance_count(&self) -> usize {
        self.instances.iter().map(InstanceList::len).sum()
    }

    /// Iterates over the non-empty blocks of the chunk.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Releases the grid and instance lists. The chunk is unloaded afterwards.
    pub fn dispose(&mut self) {
        self.cells = Vec::new();
        self.solid_array = BitVec::new();
        self.instances = Vec::new();
        self.loaded = false;
    }
}

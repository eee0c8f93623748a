//! Read-only rendering projection of the voxel world.
//!
//! The simulation never talks to a graphics API. Instead, every loaded chunk keeps
//! one dense instance list per block type, and this module exposes those lists as
//! `RenderBatch`es: "draw these unit cubes with this block's material". Turning a
//! batch into pixels is the rendering collaborator's job.

mod instance;

pub use instance::InstanceRaw;

use super::voxels::{
    block::{block_type::BlockType, descriptor, BlockDescriptor},
    chunk::ChunkCoord,
};

/// The instances of one block type within one chunk.
#[derive(Copy, Clone, Debug)]
pub struct RenderBatch<'a> {
    /// The chunk the instances belong to
    pub chunk: ChunkCoord,
    /// The block type drawn by this batch
    pub block_type: BlockType,
    /// Live instances; the length is the instance count to draw
    pub instances: &'a [InstanceRaw],
}

impl<'a> RenderBatch<'a> {
    /// The registry entry holding the material of this batch.
    pub fn descriptor(&self) -> &'static BlockDescriptor {
        descriptor(self.block_type)
    }

    /// The instance list as raw bytes, ready for upload to an instance buffer.
    pub fn bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.instances)
    }

    /// Number of instances to draw.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which runs the chunk generation
//! pipeline on a background worker when the world streams in chunks with async
//! loading enabled.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        task_management::task::{Task, TaskResult},
        voxels::{
            chunk::{Chunk, ChunkCoord, ChunkSize},
            edit_store::EditStore,
            params::GenerationParams,
            world::World,
        },
    },
};

/// A task that generates one chunk off the owning thread.
///
/// The task builds a complete, owned `Chunk`; the world decides on handling the
/// result whether it still wants it.
pub struct ChunkGenerationTask {
    /// The chunk to generate
    coord: ChunkCoord,
    size: ChunkSize,
    /// Identifies this request; stale tickets are discarded by the world
    ticket: u64,
    params: Arc<GenerationParams>,
    /// The world's edit store, read once to snapshot this chunk's edits
    edits: MtResource<EditStore>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the chunk to generate
    /// * `size` - The world's chunk dimensions
    /// * `ticket` - The world's ticket for this request
    /// * `params` - The parameters of the current generation
    /// * `edits` - A shared handle to the world's edit store
    pub fn new(
        coord: ChunkCoord,
        size: ChunkSize,
        ticket: u64,
        params: Arc<GenerationParams>,
        edits: MtResource<EditStore>,
    ) -> Self {
        ChunkGenerationTask {
            coord,
            size,
            ticket,
            params,
            edits,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut chunk = Chunk::new(self.coord, self.size);

        // The read lock is held only for the copy, never for the whole pipeline
        let edits = self.edits.get().snapshot_chunk(chunk.origin());
        chunk.generate(&self.params, &edits);

        Box::new(ChunkGenerationTaskResult {
            ticket: self.ticket,
            chunk,
        })
    }
}

/// A fully generated chunk on its way back to the world.
pub struct ChunkGenerationTaskResult {
    ticket: u64,
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs the chunk, unless the world has unloaded or regenerated it since the
    /// task was published.
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>> {
        world.install_generated_chunk(self.ticket, self.chunk);
        Vec::new()
    }
}


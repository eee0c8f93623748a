//! # Edit Store
//!
//! The sparse record of player edits: every block added or removed during play,
//! keyed by chunk origin and chunk-local position. Chunks overlay these edits onto
//! freshly generated terrain, so edits survive unloading and regeneration.
//!
//! Keys use the chunk's world-space origin rather than a chunk object, so a given
//! world block always maps to exactly one key no matter how often its chunk is
//! rebuilt.

use std::collections::HashMap;

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::block::{block_type::BlockType, BlockTypeSize};

/// World-space origin `(x, z)` of a chunk.
pub type ChunkOrigin = (i32, i32);

/// One persisted edit, in the flat form used by saves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditEntry {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Block id applied by the player; 0 records a removal
    pub block: BlockTypeSize,
}

/// Sparse map from `(chunk origin, local position)` to a player-applied block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditStore {
    chunks: HashMap<ChunkOrigin, HashMap<Point3<i32>, BlockType>>,
}

impl EditStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or overwrites) the edit at a chunk-local position.
    pub fn set(&mut self, origin: ChunkOrigin, local: Point3<i32>, block_type: BlockType) {
        log::trace!("Recording edit {:?} {:?} -> {:?}", origin, local, block_type);
        self.chunks
            .entry(origin)
            .or_default()
            .insert(local, block_type);
    }

    /// Returns the recorded edit at a chunk-local position.
    pub fn get(&self, origin: ChunkOrigin, local: Point3<i32>) -> Option<BlockType> {
        self.chunks
            .get(&origin)
            .and_then(|edits| edits.get(&local))
            .copied()
    }

    /// Returns `true` if an edit is recorded at the position.
    pub fn contains(&self, origin: ChunkOrigin, local: Point3<i32>) -> bool {
        self.get(origin, local).is_some()
    }

    /// Iterates over the edits recorded for one chunk.
    pub fn chunk_edits(
        &self,
        origin: ChunkOrigin,
    ) -> impl Iterator<Item = (Point3<i32>, BlockType)> + '_ {
        self.chunks
            .get(&origin)
            .into_iter()
            .flat_map(|edits| edits.iter().map(|(local, block)| (*local, *block)))
    }

    /// Copies the edits of one chunk into a new store.
    ///
    /// Background generation works from this copy so it never holds the shared
    /// store's lock for the length of a generation pass.
    pub fn snapshot_chunk(&self, origin: ChunkOrigin) -> EditStore {
        let mut snapshot = EditStore::new();
        if let Some(edits) = self.chunks.get(&origin) {
            snapshot.chunks.insert(origin, edits.clone());
        }
        snapshot
    }

    /// Number of recorded edits.
    pub fn len(&self) -> usize {
        self.chunks.values().map(HashMap::len).sum()
    }

    /// Returns `true` if nothing has been edited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every edit.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Flattens the store into entries, sorted so saves are stable.
    pub fn entries(&self) -> Vec<EditEntry> {
        let mut entries: Vec<EditEntry> = self
            .chunks
            .iter()
            .flat_map(|(&(chunk_x, chunk_z), edits)| {
                edits.iter().map(move |(local, block)| EditEntry {
                    chunk_x,
                    chunk_z,
                    x: local.x,
                    y: local.y,
                    z: local.z,
                    block: block.id(),
                })
            })
            .collect();
        entries.sort();
        entries
    }

    /// Rebuilds a store from saved entries.
    ///
    /// # Returns
    /// The store, or the first block id that is not in the catalog.
    pub fn from_entries(entries: &[EditEntry]) -> Result<Self, BlockTypeSize> {
        let mut store = EditStore::new();
        for entry in entries {
            let block_type =
                BlockType::get_block_type_from_int(entry.block).ok_or(entry.block)?;
            store.set(
                (entry.chunk_x, entry.chunk_z),
                Point3::new(entry.x, entry.y, entry.z),
                block_type,
            );
        }
        Ok(store)
    }
}

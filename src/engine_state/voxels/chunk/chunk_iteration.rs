//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-empty blocks of a chunk.
//!
//! ## Traversal Order
//!
//! Blocks are visited in storage order: x fastest, then y, then z. The iterator
//! tracks the local position alongside the flat cell index, so no division is
//! needed to recover coordinates.

use cgmath::Point3;

use super::Chunk;
use crate::engine_state::voxels::block::BlockCell;

/// An iterator over all non-empty blocks in a chunk.
///
/// Yields each block's chunk-local position together with its cell. An unloaded
/// chunk with no grid yields nothing.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current position in the cell vector
    current_offset: usize,
    /// Current X position within the chunk
    local_x: usize,
    /// Current Y position within the chunk
    local_y: usize,
    /// Current Z position within the chunk
    local_z: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned at the first cell of the chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Moves the local position one cell forward in storage order.
    fn advance(&mut self) {
        let size = self.chunk_ref.size;
        self.current_offset += 1;
        self.local_x += 1;
        if self.local_x == size.width {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == size.height {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<i32>, &'a BlockCell);

    fn next(&mut self) -> Option<Self::Item> {
        let cells = &self.chunk_ref.cells;
        while self.current_offset < cells.len() {
            let cell = &cells[self.current_offset];
            let position = Point3::new(
                self.local_x as i32,
                self.local_y as i32,
                self.local_z as i32,
            );
            self.advance();

            if !cell.is_empty() {
                return Some((position, cell));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord, ChunkSize};

    #[test]
    fn yields_only_non_empty_blocks_with_their_positions() {
        let mut chunk = Chunk::new(
            ChunkCoord::new(0, 0),
            ChunkSize {
                width: 3,
                height: 2,
            },
        );
        chunk.initialize();
        chunk.set_block_id(Point3::new(2, 0, 0), BlockType::DIRT);
        chunk.set_block_id(Point3::new(0, 1, 0), BlockType::SAND);
        chunk.set_block_id(Point3::new(1, 1, 2), BlockType::CLOUD);

        let blocks: Vec<_> = chunk
            .blocks()
            .map(|(position, cell)| (position, cell.block_type))
            .collect();

        assert_eq!(
            blocks,
            vec![
                (Point3::new(2, 0, 0), BlockType::DIRT),
                (Point3::new(0, 1, 0), BlockType::SAND),
                (Point3::new(1, 1, 2), BlockType::CLOUD),
            ]
        );
    }

    #[test]
    fn unallocated_chunks_yield_nothing() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), ChunkSize::default());
        assert_eq!(chunk.blocks().count(), 0);
    }
}

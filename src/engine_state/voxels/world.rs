//! # World Module
//!
//! This module provides the `World` struct, the single owner of every loaded chunk.
//! It streams chunks in and out around an observer, routes block queries and
//! mutations to the owning chunk, and keeps visibility correct across chunk borders.
//!
//! ## Architecture
//!
//! The world keeps a sparse map from chunk coordinate to `Chunk`. Only the square
//! window of `(2D + 1)²` chunks around the observer's chunk is kept, where `D` is
//! the draw distance. Player edits live in a separate `EditStore` that outlives the
//! chunks, so an edited region looks the same every time it is streamed back in.
//!
//! ## Async Loading
//!
//! With async loading enabled, a streamed-in chunk is inserted immediately as an
//! unloaded placeholder, and a `ChunkGenerationTask` builds the real chunk on a
//! background worker. Each request carries a ticket; a finished chunk is installed
//! only if its ticket is still the current one for that coordinate. Chunks unloaded
//! or regenerated in the meantime simply drop the late result.
//!
//! Until a chunk is loaded, queries against it return `None` and mutations are
//! rejected.
//!
//! Full regeneration (`generate`) always runs synchronously.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info, trace, warn};
use web_time::Instant;

use super::block::{block_side::BlockSide, block_type::BlockType, BlockCell};
use super::chunk::{Chunk, ChunkCoord, ChunkSize, WATER_PLANE_OFFSET};
use super::edit_store::EditStore;
use super::params::GenerationParams;
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use crate::core::MtResource;
use crate::engine_state::config::WorldConfig;
use crate::engine_state::persistence::{PersistenceError, SaveData, WorldStorage};
use crate::engine_state::rendering::RenderBatch;
use crate::engine_state::task_management::TaskManager;

/// Returns the square window of chunk coordinates within `draw_distance` of
/// `center`, row by row.
///
/// The window always holds exactly `(2 * draw_distance + 1)²` coordinates.
pub fn visible_chunks(center: ChunkCoord, draw_distance: u32) -> Vec<ChunkCoord> {
    let distance = draw_distance as i32;
    let side = (2 * draw_distance + 1) as usize;
    let mut window = Vec::with_capacity(side * side);
    for x in center.x - distance..=center.x + distance {
        for z in center.z - distance..=center.z + distance {
            window.push(ChunkCoord::new(x, z));
        }
    }
    window
}

/// The streamed voxel world.
pub struct World {
    config: WorldConfig,
    /// Parameters of the current generation, shared with background tasks
    params: Arc<GenerationParams>,
    /// Every chunk in the window, loaded or waiting for generation
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Ticket of the outstanding background generation of each placeholder chunk
    pending: HashMap<ChunkCoord, u64>,
    next_ticket: u64,
    edits: MtResource<EditStore>,
    task_manager: TaskManager,
    /// The chunk the observer was in at the last update
    center: ChunkCoord,
}

impl World {
    /// Creates a world with no chunks. Chunks appear on the first `update` or
    /// `generate`. Chunk dimensions of 0 are raised to 1.
    ///
    /// # Arguments
    /// * `config` - Chunk size, draw distance and loading mode
    /// * `params` - The generation parameters
    pub fn new(mut config: WorldConfig, params: GenerationParams) -> Self {
        let size = config.chunk_size;
        if size.width == 0 || size.height == 0 {
            warn!(
                "Chunk size {}x{} has an empty dimension, using at least 1",
                size.width, size.height
            );
            config.chunk_size.width = size.width.max(1);
            config.chunk_size.height = size.height.max(1);
        }

        let task_manager = TaskManager::new(config.worker_count.max(1));
        World {
            config,
            params: Arc::new(params),
            chunks: HashMap::new(),
            pending: HashMap::new(),
            next_ticket: 0,
            edits: MtResource::new(EditStore::new()),
            task_manager,
            center: ChunkCoord::default(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn chunk_size(&self) -> ChunkSize {
        self.config.chunk_size
    }

    /// Splits a world position into its chunk and chunk-local position.
    ///
    /// Uses floor division, so `x = -1` lands in chunk `-1` at local `width - 1`.
    /// `y` is passed through unchanged.
    pub fn world_to_chunk_coords(&self, position: Point3<i32>) -> (ChunkCoord, Point3<i32>) {
        let width = self.chunk_size().width as i32;
        let coord = ChunkCoord::new(position.x.div_euclid(width), position.z.div_euclid(width));
        let local = Point3::new(
            position.x.rem_euclid(width),
            position.y,
            position.z.rem_euclid(width),
        );
        (coord, local)
    }

    /// Returns the chunk containing an observer position.
    pub fn chunk_coord_for_position(&self, position: Point3<f32>) -> ChunkCoord {
        let width = self.chunk_size().width as f32;
        ChunkCoord::new(
            (position.x / width).floor() as i32,
            (position.z / width).floor() as i32,
        )
    }

    /// The window of chunks that should be loaded around `center`.
    pub fn visible_chunks(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        visible_chunks(center, self.config.draw_distance)
    }

    /// Streams chunks around the observer.
    ///
    /// Installs finished background generations, unloads chunks that left the
    /// window (their edits are kept) and instantiates the chunks that entered it.
    /// Call once per tick.
    pub fn update(&mut self, observer: Point3<f32>) {
        self.process_tasks();

        let center = self.chunk_coord_for_position(observer);
        if center != self.center {
            debug!("Observer moved to chunk ({}, {})", center.x, center.z);
            self.center = center;
        }

        self.unload_distant_chunks();

        for coord in self.visible_chunks(center) {
            if !self.chunks.contains_key(&coord) {
                self.generate_chunk(coord);
            }
        }
    }

    fn unload_distant_chunks(&mut self) {
        let center = self.center;
        let draw_distance = self.config.draw_distance;
        let distant: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.distance(center) > draw_distance)
            .copied()
            .collect();

        for coord in distant {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.dispose();
            }
            self.pending.remove(&coord);
            debug!("Unloaded chunk ({}, {})", coord.x, coord.z);
        }
    }

    /// Instantiates and generates one chunk, on a background worker if async
    /// loading is enabled.
    pub fn generate_chunk(&mut self, coord: ChunkCoord) {
        if !self.config.async_loading {
            self.generate_chunk_now(coord);
            return;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let size = self.chunk_size();
        self.chunks.insert(coord, Chunk::new(coord, size));
        self.pending.insert(coord, ticket);
        self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
            coord,
            size,
            ticket,
            self.params.clone(),
            self.edits.clone(),
        )));
        debug!("Queued generation of chunk ({}, {})", coord.x, coord.z);
    }

    fn generate_chunk_now(&mut self, coord: ChunkCoord) {
        let mut chunk = Chunk::new(coord, self.chunk_size());
        chunk.generate(&self.params, &self.edits.get());
        self.pending.remove(&coord);
        self.chunks.insert(coord, chunk);
    }

    /// Applies every finished background task and schedules queued ones.
    pub fn process_tasks(&mut self) {
        let results = self.task_manager.collect_completed_tasks();
        for result in results {
            for task in result.handle_result(self) {
                self.task_manager.publish_task(task);
            }
        }
        self.task_manager.process_queued_tasks();
    }

    /// Installs a chunk produced by a background generation.
    ///
    /// # Returns
    /// `true` if the chunk was installed, `false` if the request is stale because
    /// the chunk was unloaded or the world regenerated.
    pub(crate) fn install_generated_chunk(&mut self, ticket: u64, chunk: Chunk) -> bool {
        let coord = chunk.coord();
        if self.pending.get(&coord) != Some(&ticket) {
            debug!(
                "Discarding stale generation of chunk ({}, {})",
                coord.x, coord.z
            );
            return false;
        }

        self.pending.remove(&coord);
        self.chunks.insert(coord, chunk);
        true
    }

    /// Discards every chunk and rebuilds the window around the last observer chunk.
    ///
    /// # Arguments
    /// * `clear_cache` - Also forget every player edit, restoring the procedural
    ///   baseline
    pub fn generate(&mut self, clear_cache: bool) {
        let start = Instant::now();
        if clear_cache {
            self.edits.get_mut().clear();
        }

        let revoked = self.task_manager.cancel_queued_tasks();
        if revoked > 0 {
            debug!("Revoked {} queued chunk generations", revoked);
        }
        self.pending.clear();
        self.chunks.clear();

        for coord in self.visible_chunks(self.center) {
            self.generate_chunk_now(coord);
        }

        info!(
            "Generated {} chunks around ({}, {}) in {:?} (edits cleared: {})",
            self.chunks.len(),
            self.center.x,
            self.center.z,
            start.elapsed(),
            clear_cache
        );
    }

    fn loaded_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).filter(|chunk| chunk.is_loaded())
    }

    fn loaded_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord).filter(|chunk| chunk.is_loaded())
    }

    /// Gets the cell at a world position.
    ///
    /// # Returns
    /// The cell, or `None` if the owning chunk is not loaded or `y` is outside the
    /// chunk height.
    pub fn get_block(&self, position: Point3<i32>) -> Option<BlockCell> {
        let (coord, local) = self.world_to_chunk_coords(position);
        self.loaded_chunk(coord)?.get_block(local).copied()
    }

    /// Places a block at a world position and hides neighbors it obscures.
    ///
    /// # Returns
    /// `true` if the block was placed. Occupied cells, unloaded chunks and
    /// out-of-range positions leave the world unchanged.
    pub fn add_block(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        let (coord, local) = self.world_to_chunk_coords(position);
        let Some(chunk) = self.chunks.get_mut(&coord).filter(|chunk| chunk.is_loaded()) else {
            trace!("Ignoring add at {:?}: chunk not loaded", position);
            return false;
        };
        if !chunk.add_block(local, block_type, &mut self.edits.get_mut()) {
            return false;
        }

        for side in BlockSide::all() {
            self.hide_if_obscured(side.neighbor_of(position));
        }
        true
    }

    /// Removes the block at a world position and reveals neighbors it exposes.
    ///
    /// # Returns
    /// `true` if a block was removed.
    pub fn remove_block(&mut self, position: Point3<i32>) -> bool {
        let (coord, local) = self.world_to_chunk_coords(position);
        let Some(chunk) = self.chunks.get_mut(&coord).filter(|chunk| chunk.is_loaded()) else {
            trace!("Ignoring removal at {:?}: chunk not loaded", position);
            return false;
        };
        if !chunk.remove_block(local, &mut self.edits.get_mut()) {
            return false;
        }

        for side in BlockSide::all() {
            self.reveal_if_exposed(side.neighbor_of(position));
        }
        true
    }

    fn hide_if_obscured(&mut self, position: Point3<i32>) {
        let (coord, local) = self.world_to_chunk_coords(position);
        if let Some(chunk) = self.loaded_chunk_mut(coord) {
            if chunk.is_block_obscured(local) {
                chunk.delete_block_instance(local);
            }
        }
    }

    fn reveal_if_exposed(&mut self, position: Point3<i32>) {
        let (coord, local) = self.world_to_chunk_coords(position);
        if let Some(chunk) = self.loaded_chunk_mut(coord) {
            chunk.add_block_instance(local);
        }
    }

    /// Returns the chunk at a coordinate, loaded or not.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded_chunk(coord).is_some()
    }

    /// Number of chunks that have completed generation.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.values().filter(|chunk| chunk.is_loaded()).count()
    }

    /// Number of chunks waiting for a background generation.
    pub fn pending_chunk_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of background generations queued or running, including stale ones.
    pub fn background_task_count(&self) -> usize {
        self.task_manager.queued_task_count() + self.task_manager.tasks_in_flight()
    }

    /// Returns the player edit recorded at a world position, if any.
    pub fn edit_override(&self, position: Point3<i32>) -> Option<BlockType> {
        let (coord, local) = self.world_to_chunk_coords(position);
        let width = self.chunk_size().width as i32;
        self.edits
            .get()
            .get((coord.x * width, coord.z * width), local)
    }

    /// Number of recorded player edits.
    pub fn edit_count(&self) -> usize {
        self.edits.get().len()
    }

    /// Replaces the generation parameters and regenerates, keeping edits.
    pub fn set_params(&mut self, params: GenerationParams) {
        self.params = Arc::new(params);
        self.generate(false);
    }

    pub fn set_draw_distance(&mut self, draw_distance: u32) {
        self.config.draw_distance = draw_distance;
        self.generate(false);
    }

    pub fn set_async_loading(&mut self, async_loading: bool) {
        self.config.async_loading = async_loading;
        self.generate(false);
    }

    /// Render batches of every loaded chunk.
    pub fn render_batches(&self) -> impl Iterator<Item = RenderBatch<'_>> + '_ {
        self.chunks
            .values()
            .filter(|chunk| chunk.is_loaded())
            .flat_map(Chunk::render_batches)
    }

    /// Height of the water plane under the current parameters.
    pub fn water_level(&self) -> f32 {
        self.params.terrain.water_offset as f32 + WATER_PLANE_OFFSET
    }

    /// Writes the generation parameters and every edit to `storage`.
    pub fn save(&self, storage: &mut dyn WorldStorage) -> Result<(), PersistenceError> {
        let data = SaveData::new((*self.params).clone(), &self.edits.get());
        storage.save(&data.to_bytes()?)?;
        info!("Saved world with {} edits", data.edits.len());
        Ok(())
    }

    /// Restores parameters and edits from `storage` and regenerates.
    ///
    /// # Returns
    /// `false` if the storage holds no saved world; the world is left untouched.
    pub fn load(&mut self, storage: &dyn WorldStorage) -> Result<bool, PersistenceError> {
        let Some(bytes) = storage.load()? else {
            info!("No saved world to load");
            return Ok(false);
        };

        let (params, edits) = SaveData::from_bytes(&bytes)?.into_parts()?;
        info!("Loaded world with seed {} and {} edits", params.seed, edits.len());

        self.params = Arc::new(params);
        *self.edits.get_mut() = edits;
        self.generate(false);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use cgmath::Point3;
    use proptest::prelude::*;

    use super::{visible_chunks, World};
    use crate::engine_state::config::{EngineConfig, WorldConfig};
    use crate::engine_state::persistence::MemoryStorage;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        chunk::{tests::assert_visibility_invariant, ChunkCoord, ChunkSize},
        params::GenerationParams,
    };

    const OBSERVER: Point3<f32> = Point3 {
        x: 4.0,
        y: 10.0,
        z: 4.0,
    };

    fn test_config(async_loading: bool) -> WorldConfig {
        WorldConfig {
            chunk_size: ChunkSize {
                width: 8,
                height: 16,
            },
            draw_distance: 1,
            async_loading,
            worker_count: 2,
        }
    }

    /// Flat ground: sand for y in 0..=3, the biome's ground block at y = 4, empty above.
    fn flat_params() -> GenerationParams {
        let mut params = GenerationParams::with_seed(31);
        params.terrain.magnitude = 0.0;
        params.terrain.offset = 4.0;
        params.trees.frequency = 0.0;
        params.clouds.density = 0.0;
        params
    }

    fn loaded_world() -> World {
        let mut world = World::new(test_config(false), flat_params());
        world.update(OBSERVER);
        world
    }

    fn block_type_at(world: &World, x: i32, y: i32, z: i32) -> Option<BlockType> {
        world.get_block(Point3::new(x, y, z)).map(|cell| cell.block_type)
    }

    fn assert_all_chunks_consistent(world: &World) {
        for coord in world.visible_chunks(ChunkCoord::new(0, 0)) {
            if let Some(chunk) = world.chunk(coord) {
                assert_visibility_invariant(chunk);
            }
        }
    }

    /// Ticks the world until every background generation has been handled.
    fn settle(world: &mut World) {
        for _ in 0..1000 {
            world.update(OBSERVER);
            if world.pending_chunk_count() == 0 && world.background_task_count() == 0 {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("background generation did not finish");
    }

    #[test]
    fn world_positions_split_with_floor_division() {
        let world = World::new(test_config(false), flat_params());
        assert_eq!(
            world.world_to_chunk_coords(Point3::new(-1, 3, 8)),
            (ChunkCoord::new(-1, 1), Point3::new(7, 3, 0))
        );
        assert_eq!(
            world.world_to_chunk_coords(Point3::new(-8, 0, -9)),
            (ChunkCoord::new(-1, -2), Point3::new(0, 0, 7))
        );
        assert_eq!(
            world.chunk_coord_for_position(Point3::new(-0.5, 0.0, 15.9)),
            ChunkCoord::new(-1, 1)
        );
    }

    #[test]
    fn update_loads_the_window_and_unloads_what_leaves_it() {
        let mut world = loaded_world();
        assert_eq!(world.loaded_chunk_count(), 9);
        assert!(world.is_chunk_loaded(ChunkCoord::new(-1, 1)));

        world.update(Point3::new(20.0, 0.0, 4.0));

        assert_eq!(world.loaded_chunk_count(), 9);
        assert!(!world.is_chunk_loaded(ChunkCoord::new(-1, 1)));
        assert!(world.is_chunk_loaded(ChunkCoord::new(3, 1)));
        assert_eq!(block_type_at(&world, -4, 2, 4), None);
    }

    #[test]
    fn edits_survive_streaming_out_and_back_in() {
        let mut world = loaded_world();
        let position = Point3::new(-3, 9, 2);
        assert!(world.add_block(position, BlockType::IRON_ORE));

        world.update(Point3::new(40.0, 0.0, 4.0));
        assert_eq!(world.get_block(position), None);
        world.update(OBSERVER);

        assert_eq!(block_type_at(&world, -3, 9, 2), Some(BlockType::IRON_ORE));
    }

    #[test]
    fn out_of_range_heights_are_unknown() {
        let world = loaded_world();
        assert_eq!(world.get_block(Point3::new(0, -1, 0)), None);
        assert_eq!(world.get_block(Point3::new(0, 16, 0)), None);
        assert_eq!(block_type_at(&world, 0, 2, 0), Some(BlockType::SAND));
    }

    #[test]
    fn regenerating_keeps_edits_unless_the_cache_is_cleared() {
        let mut world = loaded_world();
        let position = Point3::new(3, 8, 3);
        assert!(world.add_block(position, BlockType::STONE));

        world.generate(false);
        assert_eq!(block_type_at(&world, 3, 8, 3), Some(BlockType::STONE));

        world.generate(true);
        assert_eq!(block_type_at(&world, 3, 8, 3), Some(BlockType::EMPTY));
        assert_eq!(world.edit_count(), 0);
    }

    #[test]
    fn remove_then_add_restores_the_original_block() {
        let mut world = loaded_world();
        let position = Point3::new(2, 4, 2);
        let original = block_type_at(&world, 2, 4, 2).expect("loaded");
        assert!(!original.is_empty());

        assert!(world.remove_block(position));
        assert_eq!(block_type_at(&world, 2, 4, 2), Some(BlockType::EMPTY));
        assert!(world.add_block(position, original));

        assert_eq!(block_type_at(&world, 2, 4, 2), Some(original));
        assert_eq!(world.edit_override(position), Some(original));
        assert_all_chunks_consistent(&world);
    }

    #[test]
    fn mutations_that_change_nothing_leave_no_trace() {
        let mut world = loaded_world();

        assert!(!world.add_block(Point3::new(1, 2, 1), BlockType::DIRT));
        assert!(!world.remove_block(Point3::new(1, 12, 1)));
        assert!(!world.add_block(Point3::new(1000, 8, 0), BlockType::DIRT));

        assert_eq!(world.edit_count(), 0);
        assert_eq!(block_type_at(&world, 1, 2, 1), Some(BlockType::SAND));
    }

    #[test]
    fn neighbors_are_revealed_and_hidden_across_the_slab() {
        let mut world = loaded_world();
        let center = Point3::new(2, 3, 2);
        let above = Point3::new(2, 4, 2);
        let ground = block_type_at(&world, 2, 4, 2).expect("loaded");

        assert_eq!(world.get_block(center).and_then(|c| c.instance_id), None);

        assert!(world.remove_block(above));
        assert!(world.get_block(center).and_then(|c| c.instance_id).is_some());
        assert_all_chunks_consistent(&world);

        assert!(world.add_block(above, ground));
        assert_eq!(world.get_block(center).and_then(|c| c.instance_id), None);
        assert_all_chunks_consistent(&world);
    }

    #[test]
    fn mutations_on_chunk_borders_keep_both_chunks_consistent() {
        let mut world = loaded_world();

        // x = 7 and x = 8 sit on either side of the border between chunks 0 and 1
        assert!(world.remove_block(Point3::new(7, 4, 3)));
        assert!(world.remove_block(Point3::new(8, 3, 3)));
        assert!(world.add_block(Point3::new(8, 5, 3), BlockType::CACTUS));
        assert!(world.remove_block(Point3::new(-1, 4, -1)));

        assert_all_chunks_consistent(&world);
    }

    #[test]
    fn render_batches_cover_every_instance() {
        let world = loaded_world();
        let batched: usize = world.render_batches().map(|batch| batch.len()).sum();
        let expected: usize = world
            .visible_chunks(ChunkCoord::new(0, 0))
            .into_iter()
            .filter_map(|coord| world.chunk(coord))
            .map(|chunk| chunk.instance_count())
            .sum();
        assert!(batched > 0);
        assert_eq!(batched, expected);
        assert!(world.render_batches().all(|batch| !batch.block_type.is_empty()));
    }

    #[test]
    fn async_chunks_are_unknown_until_generated() {
        let mut world = World::new(test_config(true), flat_params());
        world.update(OBSERVER);

        assert_eq!(world.pending_chunk_count(), 9);
        assert_eq!(world.loaded_chunk_count(), 0);
        assert_eq!(world.get_block(Point3::new(1, 2, 1)), None);
        assert!(!world.add_block(Point3::new(1, 8, 1), BlockType::DIRT));

        settle(&mut world);

        let reference = loaded_world();
        assert_eq!(world.loaded_chunk_count(), 9);
        for (x, y, z) in [(1, 2, 1), (-5, 4, 6), (12, 4, -3), (0, 9, 0)] {
            assert_eq!(
                block_type_at(&world, x, y, z),
                block_type_at(&reference, x, y, z)
            );
        }
        assert_all_chunks_consistent(&world);
    }

    #[test]
    fn stale_background_results_are_discarded() {
        let mut world = World::new(test_config(true), flat_params());
        world.update(OBSERVER);

        // Regenerating replaces every placeholder with a synchronously built chunk
        world.generate(false);
        assert_eq!(world.pending_chunk_count(), 0);
        assert!(world.add_block(Point3::new(3, 8, 3), BlockType::STONE));

        settle(&mut world);

        assert_eq!(world.loaded_chunk_count(), 9);
        assert_eq!(block_type_at(&world, 3, 8, 3), Some(BlockType::STONE));
    }

    #[test]
    fn save_and_load_restore_params_and_edits() {
        let mut world = loaded_world();
        world.add_block(Point3::new(5, 10, -6), BlockType::SNOW);
        world.remove_block(Point3::new(-2, 4, 7));
        let mut storage = MemoryStorage::new();
        world.save(&mut storage).expect("saved");

        let mut restored = World::new(test_config(false), GenerationParams::with_seed(1));
        assert!(restored.load(&storage).expect("loaded"));

        assert_eq!(restored.params(), world.params());
        assert_eq!(block_type_at(&restored, 5, 10, -6), Some(BlockType::SNOW));
        assert_eq!(block_type_at(&restored, -2, 4, 7), Some(BlockType::EMPTY));
        assert_eq!(restored.edit_count(), 2);
    }

    #[test]
    fn loading_from_empty_storage_changes_nothing() {
        let mut world = loaded_world();
        world.add_block(Point3::new(0, 9, 0), BlockType::DIRT);

        assert!(!world.load(&MemoryStorage::new()).expect("empty storage is fine"));
        assert_eq!(world.edit_count(), 1);
    }

    #[test]
    fn reconfiguring_regenerates() {
        let mut world = loaded_world();
        world.set_draw_distance(2);
        assert_eq!(world.loaded_chunk_count(), 25);

        let mut params = flat_params();
        params.terrain.offset = 6.0;
        world.set_params(params);
        assert_eq!(block_type_at(&world, 0, 5, 0).map(|b| b.is_empty()), Some(false));
        assert!((world.water_level() - 3.4).abs() < 1e-5);
    }

    #[test]
    fn empty_chunk_dimensions_are_raised_to_one() {
        let config = EngineConfig::from_json_str(
            r#"{"world": {"chunkSize": {"width": 0, "height": 0}, "asyncLoading": false, "drawDistance": 1}}"#,
        )
        .expect("valid config");
        let mut world = World::new(config.world, config.generation);
        assert_eq!(world.config().chunk_size, ChunkSize { width: 1, height: 1 });

        world.update(OBSERVER);
        assert_eq!(world.loaded_chunk_count(), 9);
        // One-block chunks: the window around (4, 4) spans x and z in 3..=5
        assert!(world.get_block(Point3::new(4, 0, 4)).is_some());
        assert!(world.get_block(Point3::new(-3, 0, 7)).is_none());
        assert!(world.remove_block(Point3::new(4, 0, 4)));
        assert!(world.add_block(Point3::new(4, 0, 4), BlockType::STONE));
        assert_all_chunks_consistent(&world);
    }

    #[test]
    fn zero_height_is_raised_to_one() {
        let config = EngineConfig::from_json_str(
            r#"{"world": {"chunkSize": {"width": 8, "height": 0}, "asyncLoading": false, "drawDistance": 1}}"#,
        )
        .expect("valid config");
        let mut world = World::new(config.world, config.generation);
        assert_eq!(world.config().chunk_size.height, 1);
        world.update(OBSERVER);
        assert_eq!(world.loaded_chunk_count(), 9);
        assert!(world.get_block(Point3::new(4, 0, 4)).is_some());
        assert_all_chunks_consistent(&world);
    }

    proptest! {
        #[test]
        fn window_is_a_full_square(
            x in -1000i32..1000,
            z in -1000i32..1000,
            draw_distance in 0u32..6,
        ) {
            let center = ChunkCoord::new(x, z);
            let mut window = visible_chunks(center, draw_distance);
            let side = (2 * draw_distance + 1) as usize;

            prop_assert_eq!(window.len(), side * side);
            prop_assert!(window.iter().all(|coord| coord.distance(center) <= draw_distance));
            window.sort();
            window.dedup();
            prop_assert_eq!(window.len(), side * side);
        }
    }
}

//! # Engine State Module
//!
//! The core engine module that owns the voxel world and drives it one tick at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The state container the application drives each tick
//! * `config` - JSON configuration of the world manager and generation
//! * `persistence` - Saving and loading generation parameters plus player edits
//! * `rendering` - Per-block-type instance batches handed to a renderer
//! * `task_management` - Background workers for chunk generation
//! * `voxels` - Blocks, chunks, procedural generation and the streamed world
//!
//! ## Architecture
//!
//! `EngineState` is the single place the application touches. It forwards observer
//! movement to the world, applies queued player actions and reports per-tick
//! statistics. Everything it needs lives in the submodules.

use cgmath::Point3;
use log::{debug, info, warn};
use web_time::Instant;

use config::EngineConfig;
use persistence::{PersistenceError, WorldStorage};
use voxels::{block::block_type::BlockType, world::World};

pub mod config;
pub mod persistence;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// An edit requested by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Place a block at a world position
    Place {
        position: Point3<i32>,
        block: BlockType,
    },
    /// Break whatever block is at a world position
    Break { position: Point3<i32> },
    /// Rebuild the window, optionally forgetting every edit
    Regenerate { clear_cache: bool },
}

/// A snapshot of the world's bookkeeping after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub loaded_chunks: usize,
    pub pending_chunks: usize,
    pub background_tasks: usize,
    /// Render instances across every loaded chunk
    pub instances: usize,
    pub edits: usize,
}

/// The main state container for the voxel engine.
///
/// Holds the world plus the actions queued since the last tick.
pub struct EngineState {
    world: World,
    player_actions: Vec<PlayerAction>,
    observer: Point3<f32>,
    ticks: u64,
}

impl EngineState {
    /// Creates the engine from a configuration.
    ///
    /// No chunks exist until the first `tick` or `World::generate`.
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "Creating world with seed {} and chunk size {}x{}",
            config.generation.seed, config.world.chunk_size.width, config.world.chunk_size.height
        );
        EngineState {
            world: World::new(config.world, config.generation),
            player_actions: Vec::new(),
            observer: Point3::new(0.0, 0.0, 0.0),
            ticks: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Queues an action to be applied on the next tick.
    pub fn push_action(&mut self, action: PlayerAction) {
        self.player_actions.push(action);
    }

    /// Moves the observer.
    pub fn set_observer(&mut self, observer: Point3<f32>) {
        self.observer = observer;
    }

    /// Advances the engine by one tick.
    ///
    /// Streams chunks around the observer, then applies the queued player actions
    /// in the order they were pushed.
    ///
    /// # Returns
    /// The world statistics after the tick
    pub fn tick(&mut self) -> WorldStats {
        let start = Instant::now();
        self.world.update(self.observer);

        for action in std::mem::take(&mut self.player_actions) {
            self.apply_action(action);
        }

        self.ticks += 1;
        let stats = self.stats();
        debug!(
            "Tick {} took {:?}: {:?}",
            self.ticks,
            start.elapsed(),
            stats
        );
        stats
    }

    fn apply_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Place { position, block } => {
                if !self.world.add_block(position, block) {
                    warn!("Could not place {:?} at {:?}", block, position);
                }
            }
            PlayerAction::Break { position } => {
                if !self.world.remove_block(position) {
                    warn!("Nothing to break at {:?}", position);
                }
            }
            PlayerAction::Regenerate { clear_cache } => self.world.generate(clear_cache),
        }
    }

    /// Returns the world's current bookkeeping.
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.world.loaded_chunk_count(),
            pending_chunks: self.world.pending_chunk_count(),
            background_tasks: self.world.background_task_count(),
            instances: self.world.render_batches().map(|batch| batch.len()).sum(),
            edits: self.world.edit_count(),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Saves the world to `storage`.
    pub fn save(&self, storage: &mut dyn WorldStorage) -> Result<(), PersistenceError> {
        self.world.save(storage)
    }

    /// Restores a saved world from `storage` and rebuilds the window.
    ///
    /// # Returns
    /// `true` if a save was found
    pub fn load(&mut self, storage: &dyn WorldStorage) -> Result<bool, PersistenceError> {
        self.world.load(storage)
    }
}

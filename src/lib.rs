#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A procedurally generated voxel world, streamed around an observer within a fixed
//! draw distance.
//!
//! The world is split into vertical chunk columns generated on demand around an
//! observer from a seed and a set of generation parameters. Player edits are kept
//! in an overlay that survives unloading and regeneration, and the whole world can
//! be saved as parameters plus edits.
//!
//! ## Key Modules
//!
//! * `core` - Shared utilities used throughout the engine
//! * `engine_state` - The world, its generation pipeline, background tasks and persistence
//! * `application_state` - A headless driver that walks an observer through the world
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_world::engine_state::{config::EngineConfig, EngineState};
//!
//! let mut config = EngineConfig::default();
//! config.world.async_loading = false;
//! config.world.draw_distance = 1;
//!
//! let mut engine = EngineState::new(config);
//! engine.set_observer(Point3::new(0.0, 0.0, 0.0));
//! let stats = engine.tick();
//! assert_eq!(stats.loaded_chunks, 9);
//! ```

use log::info;

use application_state::{ApplicationArgs, ApplicationState};

mod application_state;
pub mod core;
pub mod engine_state;

/// Runs the headless application until its scripted walk is done.
///
/// Logging goes to stdout and is filtered by `RUST_LOG`.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let args = ApplicationArgs::from_env();
    let mut state = ApplicationState::new(&args);
    state.run();
    state.save();
}

//! # Voxel World
//!
//! This module contains the voxel world simulation: the block catalog, procedural
//! chunk generation, per-block visibility and render instances, player edits, and
//! the world manager that streams chunks around an observer.
//!
//! ## Architecture
//!
//! * **Block**: the static block registry and the per-cell data of a chunk grid
//! * **Params / Biome / Noise / RNG**: the deterministic inputs of generation
//! * **Chunk**: a `width × height × width` grid with its generation pipeline and
//!   instance lists
//! * **Edit store**: player changes, overlaid on regenerated chunks
//! * **World**: owns the chunks, streams them and routes mutations
//! * **Tasks**: background chunk generation for async loading
//!
//! ## Data Flow
//!
//! 1. The observer position arrives through `World::update`
//! 2. Missing chunks in the window are generated, here or on a worker
//! 3. Block mutations go through the world, which updates the owning chunk, the
//!    edit store and the visibility of the neighbors
//! 4. The renderer reads `World::render_batches`

pub mod biome;
pub mod block;
pub mod chunk;
pub mod edit_store;
pub mod noise_field;
pub mod params;
pub mod rng;
pub mod tasks;
pub mod world;

//! # Voxel World Application Entry Point
//!
//! Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [save.json]
//! ```

fn main() {
    voxel_world::run();
}

//! # Application State Management
//!
//! Drives the engine without a window. The application:
//! - reads an optional JSON configuration and a save path from the command line
//! - restores the saved world if one exists
//! - walks the observer along a scripted path, placing and breaking blocks on the way
//! - saves the world again on exit
//!
//! ```bash
//! voxel-world [config.json] [save.json]
//! ```

use std::thread;
use std::time::Duration;

use cgmath::Point3;
use log::{error, info};

use crate::engine_state::{
    config::EngineConfig,
    persistence::FileStorage,
    voxels::block::block_type::BlockType,
    EngineState, PlayerAction,
};

/// Save file used when none is given on the command line.
const DEFAULT_SAVE_PATH: &str = "world.json";

/// Ticks spent walking between two waypoints.
const TICKS_PER_LEG: u32 = 8;

/// Pause between ticks so background workers can finish chunks.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Ticks allowed for the initial window to finish loading.
const SETTLE_TICKS: u32 = 500;

/// Where the observer walks, in world units.
const WAYPOINTS: [(f32, f32); 4] = [(0.0, 0.0), (80.0, 0.0), (80.0, -80.0), (0.0, 0.0)];

/// Command-line inputs of the application.
pub struct ApplicationArgs {
    pub config_path: Option<String>,
    pub save_path: String,
}

impl ApplicationArgs {
    /// Reads `[config] [save]` from the process arguments.
    pub fn from_env() -> Self {
        let mut args = std::env::args().skip(1);
        let config_path = args.next();
        let save_path = args.next().unwrap_or_else(|| DEFAULT_SAVE_PATH.to_string());
        ApplicationArgs {
            config_path,
            save_path,
        }
    }
}

/// The running application: the engine plus the storage it saves to.
pub struct ApplicationState {
    pub engine_state: EngineState,
    storage: FileStorage,
}

impl ApplicationState {
    /// Builds the engine and restores the saved world, if any.
    ///
    /// A configuration that cannot be read falls back to the defaults. A save that
    /// cannot be read is logged and ignored.
    pub fn new(args: &ApplicationArgs) -> Self {
        let config = match &args.config_path {
            Some(path) => EngineConfig::from_json_file(path).unwrap_or_else(|err| {
                error!("Ignoring config {}: {}", path, err);
                EngineConfig::default()
            }),
            None => EngineConfig::default(),
        };

        let mut engine_state = EngineState::new(config);
        let storage = FileStorage::new(&args.save_path);
        match engine_state.load(&storage) {
            Ok(true) => info!("Restored world from {}", args.save_path),
            Ok(false) => engine_state.world_mut().generate(false),
            Err(err) => {
                error!("Could not load {}: {}", args.save_path, err);
                engine_state.world_mut().generate(false);
            }
        }

        ApplicationState {
            engine_state,
            storage,
        }
    }

    /// Ticks until no chunk around the observer is still generating.
    fn settle(&mut self) {
        for _ in 0..SETTLE_TICKS {
            if self.engine_state.tick().pending_chunks == 0 {
                return;
            }
            thread::sleep(TICK_INTERVAL);
        }
        error!("World did not settle after {} ticks", SETTLE_TICKS);
    }

    /// Walks the observer through every waypoint, editing the ground at each one.
    pub fn run(&mut self) {
        self.settle();

        for leg in WAYPOINTS.windows(2) {
            let (from, to) = (leg[0], leg[1]);
            for step in 1..=TICKS_PER_LEG {
                let t = step as f32 / TICKS_PER_LEG as f32;
                let observer = Point3::new(
                    from.0 + (to.0 - from.0) * t,
                    0.0,
                    from.1 + (to.1 - from.1) * t,
                );
                self.engine_state.set_observer(observer);
                let stats = self.engine_state.tick();
                info!(
                    "Observer at ({:.1}, {:.1}): {} loaded, {} pending, {} instances",
                    observer.x, observer.z, stats.loaded_chunks, stats.pending_chunks, stats.instances
                );
                thread::sleep(TICK_INTERVAL);
            }

            self.settle();
            self.edit_ground(to);
        }

        let stats = self.engine_state.tick();
        info!(
            "Finished after {} ticks with {} edits",
            self.engine_state.ticks(),
            stats.edits
        );
    }

    /// Replaces the ground block under the observer with stone and plants a cactus
    /// on top. Clouds are not ground.
    fn edit_ground(&mut self, at: (f32, f32)) {
        let x = at.0.floor() as i32;
        let z = at.1.floor() as i32;
        let world = self.engine_state.world();
        let height = world.config().chunk_size.height as i32;

        let Some(surface) = (0..height).rev().find(|&y| {
            world
                .get_block(Point3::new(x, y, z))
                .is_some_and(|cell| !cell.is_empty() && cell.block_type != BlockType::CLOUD)
        }) else {
            return;
        };

        self.engine_state.push_action(PlayerAction::Break {
            position: Point3::new(x, surface, z),
        });
        self.engine_state.push_action(PlayerAction::Place {
            position: Point3::new(x, surface, z),
            block: BlockType::STONE,
        });
        if surface + 1 < height {
            self.engine_state.push_action(PlayerAction::Place {
                position: Point3::new(x, surface + 1, z),
                block: BlockType::CACTUS,
            });
        }
    }

    /// Writes the world to the save path.
    pub fn save(&mut self) {
        match self.engine_state.save(&mut self.storage) {
            Ok(()) => info!("Saved world to {}", self.storage.path().display()),
            Err(err) => error!("Could not save world: {}", err),
        }
    }
}

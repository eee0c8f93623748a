//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The world collects finished results and calls `handle_result()` on its own thread
//! 5. The result can apply itself to the world and spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - Shared state read by tasks goes through `MtResource`

use crate::engine_state::voxels::world::World;

/// A unit of work that can be executed on a background worker.
///
/// Tasks should own all the data they need (or hold `MtResource` handles to
/// shared data) so that they are `'static` and can move to another thread.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a worker thread. Errors are handled internally and reported through
    /// the result.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be handled by the world.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Applies the result to the world.
    ///
    /// Called on the thread that owns the world, never concurrently with any other
    /// world operation.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (usually empty).
    fn handle_result(self: Box<Self>, world: &mut World) -> Vec<Box<dyn Task + Send>>;
}

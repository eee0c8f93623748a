//! # Task Management System
//!
//! This module provides a small worker pool for running chunk generation off the
//! thread that owns the world.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, applied to the world afterwards
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! Each worker is a `std::thread` with a dedicated pair of `mpsc` channels. Tasks
//! are distributed round-robin with at most `MAX_TASKS_IN_FLIGHT` per worker; the
//! rest wait in a FIFO queue until `process_queued_tasks` finds a free worker.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to an idle worker, or queues them
//! 3. Workers process tasks and send back results
//! 4. The owner drains results with `collect_completed_tasks()` and handles them
//! 5. Queued tasks that have not started can be revoked with `cancel_queued_tasks()`
//!
//! Tasks already handed to a worker always run to completion. Owners that no
//! longer want their result must recognize and drop it when it arrives.

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::info;
use task::{Task, TaskResult};

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `_worker`: Handle to the worker thread
///
/// Dropping the channel drops `task_sender`, which ends the worker's receive loop.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Kept at 1 so that a busy worker never holds tasks that could still be revoked
/// from the queue.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. With zero workers every
    ///   task stays queued.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was handed to the worker
    /// - `Err(task)` if the worker has disconnected, giving the task back for requeueing
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to workers until the queue is empty or every worker is
    /// busy. Tasks are scheduled in FIFO order.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Drains every finished result from the workers.
    ///
    /// The caller handles the results; the manager only frees up the workers they
    /// came from.
    pub fn collect_completed_tasks(&mut self) -> Vec<Box<dyn TaskResult + Send>> {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
                results.push(result);
            }
        }
        results
    }

    /// Drops every task that has not been handed to a worker yet.
    ///
    /// # Returns
    /// The number of revoked tasks.
    pub fn cancel_queued_tasks(&mut self) -> usize {
        let revoked = self.queued_tasks.len();
        self.queued_tasks.clear();
        revoked
    }

    /// Number of tasks waiting for a worker.
    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks currently being processed by workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use super::task::{Task, TaskResult};
    use super::TaskManager;
    use crate::core::MtResource;
    use crate::engine_state::voxels::world::World;

    struct Doubled;

    impl TaskResult for Doubled {
        fn handle_result(self: Box<Self>, _world: &mut World) -> Vec<Box<dyn Task + Send>> {
            Vec::new()
        }
    }

    /// Doubles a value into a shared list.
    struct DoubleTask {
        value: u32,
        output: MtResource<Vec<u32>>,
    }

    impl Task for DoubleTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.output.get_mut().push(self.value * 2);
            Box::new(Doubled)
        }
    }

    /// Blocks its worker until the gate is opened.
    struct GateTask {
        gate: Mutex<Receiver<()>>,
    }

    impl Task for GateTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            if let Ok(gate) = self.gate.lock() {
                let _ = gate.recv();
            }
            Box::new(Doubled)
        }
    }

    fn wait_for_results(manager: &mut TaskManager, expected: usize) -> usize {
        let mut received = 0;
        for _ in 0..500 {
            received += manager.collect_completed_tasks().len();
            manager.process_queued_tasks();
            if received >= expected {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        received
    }

    #[test]
    fn every_published_task_produces_one_result() {
        let mut manager = TaskManager::new(2);
        let output = MtResource::new(Vec::new());

        for value in 0..6 {
            manager.publish_task(Box::new(DoubleTask {
                value,
                output: output.clone(),
            }));
        }
        assert_eq!(manager.tasks_in_flight(), 2);
        assert_eq!(manager.queued_task_count(), 4);

        assert_eq!(wait_for_results(&mut manager, 6), 6);

        let mut values = output.get().clone();
        values.sort_unstable();
        assert_eq!(values, vec![0, 2, 4, 6, 8, 10]);
        assert_eq!(manager.tasks_in_flight(), 0);
    }

    #[test]
    fn queued_tasks_can_be_revoked() {
        let mut manager = TaskManager::new(1);
        let output = MtResource::new(Vec::new());
        let (open, gate) = channel();

        assert!(manager.publish_task(Box::new(GateTask {
            gate: Mutex::new(gate),
        })));
        for value in 1..=3 {
            assert!(!manager.publish_task(Box::new(DoubleTask {
                value,
                output: output.clone(),
            })));
        }

        assert_eq!(manager.cancel_queued_tasks(), 3);
        open.send(()).expect("worker holds the gate");

        assert_eq!(wait_for_results(&mut manager, 1), 1);
        assert!(output.get().is_empty());
    }

    #[test]
    fn without_workers_everything_queues() {
        let mut manager = TaskManager::new(0);
        let output = MtResource::new(Vec::new());
        assert!(!manager.publish_task(Box::new(DoubleTask { value: 1, output })));
        manager.process_queued_tasks();
        assert_eq!(manager.queued_task_count(), 1);
        assert_eq!(manager.worker_count(), 0);
    }
}

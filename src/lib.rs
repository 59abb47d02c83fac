//! Task Queue Runner - drain push/pull task queues inside integration tests
//!
//! This library pulls pending tasks out of a queue service, decodes them and
//! hands them to a task processor, the way a production queue worker would,
//! minus retries, leases and durability.

/// Configuration management for the runner binary
pub mod config;
/// Drain engine: run queues until quiescence
pub mod drain;
/// Queue service port, accessor helpers and the in-memory service
pub mod queue;
/// Stateful runner facade
pub mod runner;
/// Seeded random task sampling across queues
pub mod sampler;
/// Task model, codec and executor
pub mod task;

pub use crate::config::Config;
pub use drain::{run, run_queue, RunSummary};
pub use queue::memory::MemoryQueueService;
pub use queue::{QueueDescriptor, QueueMode, QueueService};
pub use runner::Runner;
pub use sampler::{run_random, RandomRun};
pub use task::executor::{ProcessOutcome, RequestContext, TaskExecutor, TaskProcessor};
pub use task::{RawTask, Task, TaskInput, TaskMethod, TaskRecord};

use thiserror::Error;

/// Result type for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Error types surfaced by the runner and its collaborators
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The queue service has no queue with this name
    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    /// No task with this name is pending in the queue
    #[error("Task not found: {task} in queue {queue}")]
    TaskNotFound {
        /// Queue that was searched
        queue: String,
        /// Task name that was requested
        task: String,
    },

    /// A task with this name is already pending in the queue
    #[error("Task already exists: {task} in queue {queue}")]
    TaskAlreadyExists {
        /// Queue the task was added to
        queue: String,
        /// Conflicting task name
        task: String,
    },

    /// Task method does not match the queue mode
    #[error("Task method {method} is not valid for {mode} queue {queue}")]
    QueueModeMismatch {
        /// Target queue
        queue: String,
        /// Mode of the target queue
        mode: QueueMode,
        /// Method carried by the task
        method: TaskMethod,
    },

    /// Raw task carries neither a payload nor a body
    #[error("Malformed task: {0}")]
    MalformedTask(String),

    /// Task body is not valid base64
    #[error("Body decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Task processor reported a failure
    #[error("Task processing failed: {0}")]
    Processor(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = RunnerError::UnknownQueue("missing".to_string());
        assert_eq!(err.to_string(), "Unknown queue: missing");

        let err = RunnerError::TaskNotFound {
            queue: "default".to_string(),
            task: "task1".to_string(),
        };
        assert_eq!(err.to_string(), "Task not found: task1 in queue default");

        let err = RunnerError::QueueModeMismatch {
            queue: "jobs".to_string(),
            mode: QueueMode::Push,
            method: TaskMethod::Pull,
        };
        assert_eq!(
            err.to_string(),
            "Task method PULL is not valid for push queue jobs"
        );
    }
}

//! Queue service port

/// Read/clear/add helpers over a queue service
pub mod accessor;
/// In-memory queue service
pub mod memory;

use crate::task::{Task, TaskRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How tasks leave a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// Tasks are delivered to a handler by the service
    #[default]
    Push,
    /// Tasks are fetched by a consumer
    Pull,
}

impl fmt::Display for QueueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueMode::Push => f.write_str("push"),
            QueueMode::Pull => f.write_str("pull"),
        }
    }
}

/// Name and mode of a queue known to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDescriptor {
    /// Queue name, unique within the service
    pub name: String,

    /// Delivery mode, fixed for the queue's lifetime
    #[serde(default)]
    pub mode: QueueMode,
}

impl QueueDescriptor {
    /// Describe a push queue
    pub fn push(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: QueueMode::Push,
        }
    }

    /// Describe a pull queue
    pub fn pull(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: QueueMode::Pull,
        }
    }

    /// Check if this is a push queue
    pub fn is_push(&self) -> bool {
        self.mode == QueueMode::Push
    }
}

/// Trait for queue service implementations
///
/// Callers hold no queue state of their own; every operation goes back to
/// the service.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Describe every queue
    async fn get_queues(&self) -> crate::Result<Vec<QueueDescriptor>>;

    /// List pending tasks of a queue in delivery order
    async fn get_tasks(&self, queue_name: &str) -> crate::Result<Vec<TaskRecord>>;

    /// Remove every pending task of a queue
    async fn flush_queue(&self, queue_name: &str) -> crate::Result<()>;

    /// Remove one pending task by name
    async fn delete_task(&self, queue_name: &str, task_name: &str) -> crate::Result<()>;

    /// Add tasks to a queue
    async fn add_tasks(&self, queue_name: &str, tasks: Vec<Task>) -> crate::Result<()>;
}

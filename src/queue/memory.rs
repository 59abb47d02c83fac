//! Memory

use crate::queue::{QueueDescriptor, QueueService};
use crate::task::{Task, TaskRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct MemoryState {
    /// Queues in declaration order
    descriptors: Vec<QueueDescriptor>,
    /// Pending records per queue, oldest first
    pending: HashMap<String, Vec<TaskRecord>>,
    /// Counter used to name unnamed tasks
    next_task_id: u64,
}

impl MemoryState {
    fn queue_mut(&mut self, queue_name: &str) -> crate::Result<&mut Vec<TaskRecord>> {
        self.pending
            .get_mut(queue_name)
            .ok_or_else(|| crate::RunnerError::UnknownQueue(queue_name.to_string()))
    }

    fn descriptor(&self, queue_name: &str) -> crate::Result<&QueueDescriptor> {
        self.descriptors
            .iter()
            .find(|desc| desc.name == queue_name)
            .ok_or_else(|| crate::RunnerError::UnknownQueue(queue_name.to_string()))
    }

    fn allocate_task_name(&mut self) -> String {
        self.next_task_id += 1;
        format!("task{}", self.next_task_id)
    }
}

/// In-memory queue service for local runs and tests
///
/// Clones share the same queues, so a processor can hold a clone and add
/// follow-on tasks while a drain is running.
#[derive(Clone, Default)]
pub struct MemoryQueueService {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryQueueService {
    /// Create a service with no queues
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service with the given queues declared
    pub async fn with_queues(
        descriptors: impl IntoIterator<Item = QueueDescriptor>,
    ) -> crate::Result<Self> {
        let service = Self::new();
        for desc in descriptors {
            service.declare_queue(desc).await?;
        }
        Ok(service)
    }

    /// Declare a queue
    ///
    /// Redeclaring a queue with the same mode is a no-op; changing its mode
    /// is rejected.
    pub async fn declare_queue(&self, descriptor: QueueDescriptor) -> crate::Result<()> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.descriptors.iter().find(|d| d.name == descriptor.name) {
            if existing.mode != descriptor.mode {
                return Err(crate::RunnerError::ConfigError(format!(
                    "queue {} is already declared as {}",
                    existing.name, existing.mode
                )));
            }
            return Ok(());
        }

        debug!("Declared {} queue {}", descriptor.mode, descriptor.name);
        state.pending.insert(descriptor.name.clone(), Vec::new());
        state.descriptors.push(descriptor);
        Ok(())
    }

    /// Number of pending tasks in a queue
    pub async fn size(&self, queue_name: &str) -> crate::Result<usize> {
        let state = self.state.read().await;
        state
            .pending
            .get(queue_name)
            .map(Vec::len)
            .ok_or_else(|| crate::RunnerError::UnknownQueue(queue_name.to_string()))
    }
}

#[async_trait]
impl QueueService for MemoryQueueService {
    async fn get_queues(&self) -> crate::Result<Vec<QueueDescriptor>> {
        let state = self.state.read().await;
        Ok(state.descriptors.clone())
    }

    async fn get_tasks(&self, queue_name: &str) -> crate::Result<Vec<TaskRecord>> {
        let state = self.state.read().await;
        state
            .pending
            .get(queue_name)
            .cloned()
            .ok_or_else(|| crate::RunnerError::UnknownQueue(queue_name.to_string()))
    }

    async fn flush_queue(&self, queue_name: &str) -> crate::Result<()> {
        let mut state = self.state.write().await;
        let pending = state.queue_mut(queue_name)?;
        let flushed = pending.len();
        pending.clear();

        debug!("Flushed {} tasks from queue {}", flushed, queue_name);
        Ok(())
    }

    async fn delete_task(&self, queue_name: &str, task_name: &str) -> crate::Result<()> {
        let mut state = self.state.write().await;
        let pending = state.queue_mut(queue_name)?;

        match pending.iter().position(|record| record.name == task_name) {
            Some(index) => {
                pending.remove(index);
                debug!("Task {} deleted from queue {}", task_name, queue_name);
                Ok(())
            }
            None => Err(crate::RunnerError::TaskNotFound {
                queue: queue_name.to_string(),
                task: task_name.to_string(),
            }),
        }
    }

    async fn add_tasks(&self, queue_name: &str, tasks: Vec<Task>) -> crate::Result<()> {
        let mut state = self.state.write().await;
        let mode = state.descriptor(queue_name)?.mode;

        // Validate the whole batch before touching the queue.
        let mut taken: HashSet<String> = state
            .queue_mut(queue_name)?
            .iter()
            .map(|record| record.name.clone())
            .collect();
        for task in &tasks {
            if !task.method.fits(mode) {
                return Err(crate::RunnerError::QueueModeMismatch {
                    queue: queue_name.to_string(),
                    mode,
                    method: task.method,
                });
            }
            if let Some(name) = &task.name {
                if !taken.insert(name.clone()) {
                    return Err(crate::RunnerError::TaskAlreadyExists {
                        queue: queue_name.to_string(),
                        task: name.clone(),
                    });
                }
            }
        }

        let mut records = Vec::with_capacity(tasks.len());
        for task in tasks {
            let name = match &task.name {
                Some(name) => name.clone(),
                None => loop {
                    let candidate = state.allocate_task_name();
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };
            records.push(task.to_record(name, Utc::now()));
        }

        let added = records.len();
        state.queue_mut(queue_name)?.extend(records);

        debug!("Added {} tasks to queue {}", added, queue_name);
        Ok(())
    }
}

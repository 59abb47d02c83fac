//! Runner

use crate::drain::{self, RunSummary};
use crate::queue::accessor::get_push_queue_names;
use crate::queue::QueueService;
use crate::task::executor::TaskExecutor;
use std::sync::Arc;

/// Keeps a queue service, executor and queue list for repeated drains
pub struct Runner<S: QueueService + ?Sized> {
    service: Arc<S>,
    executor: TaskExecutor,
    queue_names: Vec<String>,
}

impl<S: QueueService + ?Sized> Runner<S> {
    /// Create a runner
    ///
    /// Without queue names the push queues known at construction are used.
    pub async fn new(
        service: Arc<S>,
        executor: TaskExecutor,
        queue_names: Option<Vec<String>>,
    ) -> crate::Result<Self> {
        let queue_names = match queue_names {
            Some(names) => names,
            None => get_push_queue_names(service.as_ref()).await?,
        };

        Ok(Self {
            service,
            executor,
            queue_names,
        })
    }

    /// Run the bound queues until quiescence or `max_iterations`
    pub async fn run(&self, max_iterations: Option<usize>) -> crate::Result<RunSummary> {
        drain::run(
            self.service.as_ref(),
            &self.executor,
            Some(self.queue_names.as_slice()),
            max_iterations,
        )
        .await
    }

    /// Run the tasks currently pending in one queue
    pub async fn run_queue(&self, queue_name: &str) -> crate::Result<usize> {
        drain::run_queue(self.service.as_ref(), &self.executor, queue_name).await
    }

    /// Queue names this runner drains
    pub fn queue_names(&self) -> &[String] {
        &self.queue_names
    }

    /// The bound queue service
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }
}

//! Drain engine: execute queued tasks until the queues go quiet

use crate::queue::accessor::get_push_queue_names;
use crate::queue::QueueService;
use crate::task::executor::TaskExecutor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Totals reported by [`run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of full passes over the queues
    pub iterations: usize,

    /// Number of tasks executed across all passes
    pub tasks_processed: usize,
}

/// Execute every task currently pending in one queue
///
/// The queue is listed and flushed before anything runs, so tasks added by
/// the executed tasks stay queued for the next call.
pub async fn run_queue<S>(
    service: &S,
    executor: &TaskExecutor,
    queue_name: &str,
) -> crate::Result<usize>
where
    S: QueueService + ?Sized,
{
    let tasks = service.get_tasks(queue_name).await?;
    service.flush_queue(queue_name).await?;

    let mut processed = 0;
    for task in &tasks {
        executor.execute(task).await?;
        processed += 1;
    }

    debug!("Ran {} tasks from queue {}", processed, queue_name);
    Ok(processed)
}

/// Run queues until a pass executes nothing or `max_iterations` is reached
///
/// Without queue names every push queue is drained. `max_iterations` of
/// `Some(0)` runs nothing; `None` keeps going until quiescence.
pub async fn run<S>(
    service: &S,
    executor: &TaskExecutor,
    queue_names: Option<&[String]>,
    max_iterations: Option<usize>,
) -> crate::Result<RunSummary>
where
    S: QueueService + ?Sized,
{
    let queue_names = match queue_names {
        Some(names) if !names.is_empty() => names.to_vec(),
        _ => get_push_queue_names(service).await?,
    };

    let mut summary = RunSummary::default();

    loop {
        if let Some(limit) = max_iterations {
            if summary.iterations >= limit {
                if limit > 0 {
                    warn!("Stopped after reaching max_iterations={}", limit);
                }
                break;
            }
        }

        let processed = run_pass(service, executor, &queue_names).await?;
        summary.iterations += 1;
        summary.tasks_processed += processed;

        if processed == 0 {
            break;
        }
    }

    info!(
        "Drained {} tasks in {} iterations",
        summary.tasks_processed, summary.iterations
    );
    Ok(summary)
}

/// One pass over the queues in the given order
// TODO: interleave queues round-robin instead of draining one at a time.
async fn run_pass<S>(
    service: &S,
    executor: &TaskExecutor,
    queue_names: &[String],
) -> crate::Result<usize>
where
    S: QueueService + ?Sized,
{
    let mut processed = 0;
    for queue_name in queue_names {
        processed += run_queue(service, executor, queue_name).await?;
    }
    Ok(processed)
}

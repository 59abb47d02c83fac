//! Random sampler: execute tasks picked at random across queues

use crate::queue::{QueueDescriptor, QueueService};
use crate::task::executor::TaskExecutor;
use crate::task::TaskRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Default seed used by [`RandomRun`]
pub const DEFAULT_RANDOM_SEED: u64 = 123;

/// Default task budget used by [`RandomRun`]
pub const DEFAULT_MAX_TASKS: usize = 100;

/// Parameters for a seeded random run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomRun {
    /// Seed for the generator choosing queues and tasks
    pub random_seed: u64,

    /// Stop after this many tasks
    pub max_tasks: usize,
}

impl Default for RandomRun {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }
}

impl RandomRun {
    /// Run with these parameters
    pub async fn run<S>(
        &self,
        service: &S,
        executor: &TaskExecutor,
        queues: &[QueueDescriptor],
    ) -> crate::Result<usize>
    where
        S: QueueService + ?Sized,
    {
        run_random(service, executor, queues, self.random_seed, self.max_tasks).await
    }
}

/// Execute up to `max_tasks` tasks chosen at random from the push queues
///
/// Each round picks a random queue and walks forward from it, wrapping
/// around, until some push queue yields a task. The run ends when the budget
/// is spent or a whole round finds nothing to execute. For a fixed seed and
/// fixed queue contents the executed sequence is always the same.
pub async fn run_random<S>(
    service: &S,
    executor: &TaskExecutor,
    queues: &[QueueDescriptor],
    random_seed: u64,
    max_tasks: usize,
) -> crate::Result<usize>
where
    S: QueueService + ?Sized,
{
    if !queues.iter().any(QueueDescriptor::is_push) {
        return Ok(0);
    }

    let queue_count = queues.len();
    let mut rng = StdRng::seed_from_u64(random_seed);
    let mut processed = 0;

    while processed < max_tasks {
        let start = rng.gen_range(0..queue_count);

        let mut task_ran = false;
        for offset in 0..queue_count {
            let desc = &queues[(start + offset) % queue_count];
            if !desc.is_push() {
                continue;
            }
            if run_random_task_from_queue(service, executor, &desc.name, &mut rng).await? {
                task_ran = true;
                break;
            }
        }

        if !task_ran {
            break;
        }
        processed += 1;
    }

    info!("Randomly ran {} tasks (seed {})", processed, random_seed);
    Ok(processed)
}

/// Execute one random task from a queue, then delete it by name
///
/// Returns `false` when the queue has nothing to execute.
async fn run_random_task_from_queue<S, R>(
    service: &S,
    executor: &TaskExecutor,
    queue_name: &str,
    rng: &mut R,
) -> crate::Result<bool>
where
    S: QueueService + ?Sized,
    R: Rng + Send,
{
    let Some(task) = fetch_random_task_from_queue(service, queue_name, rng).await? else {
        return Ok(false);
    };

    debug!("Picked task {} from queue {}", task.name, queue_name);
    executor.execute(&task).await?;
    service.delete_task(queue_name, &task.name).await?;

    Ok(true)
}

async fn fetch_random_task_from_queue<S, R>(
    service: &S,
    queue_name: &str,
    rng: &mut R,
) -> crate::Result<Option<TaskRecord>>
where
    S: QueueService + ?Sized,
    R: Rng + Send,
{
    let tasks = service.get_tasks(queue_name).await?;
    Ok(tasks
        .choose(rng)
        .filter(|task| !task.name.is_empty())
        .cloned())
}

//! Task Queue Runner binary entry point

use task_queue_runner::config::{Config, Strategy};
use task_queue_runner::task::executor::HANDLER_HEADER;
use task_queue_runner::{run, run_random, MemoryQueueService, QueueService, Task, TaskExecutor};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Starting Task Queue Runner");

    let config = Config::load()?;
    config.validate()?;

    info!(
        "Initialized with {} queues, strategy: {:?}",
        config.queues.len(),
        config.strategy
    );

    let service = MemoryQueueService::with_queues(config.queues.clone()).await?;

    for desc in config.queues.iter().filter(|desc| desc.is_push()) {
        let tasks = (0..config.seed_tasks_per_queue)
            .map(|i| {
                Task::new(format!("demo payload {i}"))
                    .with_header(HANDLER_HEADER, format!("demo.{}", desc.name))
            })
            .collect();
        service.add_tasks(&desc.name, tasks).await?;
    }

    let executor = TaskExecutor::default();

    match config.strategy {
        Strategy::Drain => {
            let summary = run(&service, &executor, None, config.max_iterations).await?;
            info!(
                "Finished after {} iterations, {} tasks processed",
                summary.iterations, summary.tasks_processed
            );
        }
        Strategy::Random => {
            let processed = run_random(
                &service,
                &executor,
                &config.queues,
                config.random_seed,
                config.max_tasks,
            )
            .await?;
            info!("Finished, {} tasks processed", processed);
        }
    }

    Ok(())
}

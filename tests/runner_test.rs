mod common;

use common::{add_bodies, recording_executor, REPLICATE_HEADER};
use std::sync::Arc;
use task_queue_runner::{MemoryQueueService, QueueDescriptor, QueueService, Runner, Task};

async fn service() -> MemoryQueueService {
    MemoryQueueService::with_queues([
        QueueDescriptor::push("default"),
        QueueDescriptor::pull("leases"),
        QueueDescriptor::push("mail"),
    ])
    .await
    .unwrap()
}

#[tokio::test]
async fn test_runner_defaults_to_push_queues() {
    let service = Arc::new(service().await);
    let (executor, _processor) = recording_executor(None);

    let runner = Runner::new(service, executor, None).await.unwrap();

    assert_eq!(runner.queue_names().to_vec(), vec!["default", "mail"]);
}

#[tokio::test]
async fn test_runner_keeps_explicit_queue_names() {
    let service = Arc::new(service().await);
    let (executor, _processor) = recording_executor(None);

    let runner = Runner::new(service, executor, Some(vec!["mail".to_string()]))
        .await
        .unwrap();

    assert_eq!(runner.queue_names().to_vec(), vec!["mail"]);
}

#[tokio::test]
async fn test_runner_runs_repeatedly() {
    let service = service().await;
    let (executor, processor) = recording_executor(None);
    let runner = Runner::new(Arc::new(service.clone()), executor, None)
        .await
        .unwrap();

    add_bodies(&service, "default", &["first"]).await;
    let summary = runner.run(None).await.unwrap();
    assert_eq!(summary.iterations, 2);
    assert_eq!(summary.tasks_processed, 1);

    add_bodies(&service, "mail", &["second", "third"]).await;
    let summary = runner.run(None).await.unwrap();
    assert_eq!(summary.tasks_processed, 2);

    assert_eq!(processor.bodies(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_runner_honors_max_iterations() {
    let service = service().await;
    let (executor, _processor) = recording_executor(Some(service.clone()));
    let runner = Runner::new(Arc::new(service.clone()), executor, None)
        .await
        .unwrap();
    let task = Task::new("again").with_header(REPLICATE_HEADER, "default");
    service.add_tasks("default", vec![task]).await.unwrap();

    let summary = runner.run(Some(3)).await.unwrap();

    assert_eq!(summary.iterations, 3);
    assert_eq!(summary.tasks_processed, 3);
}

#[tokio::test]
async fn test_runner_run_queue() {
    let service = service().await;
    let (executor, processor) = recording_executor(None);
    let runner = Runner::new(Arc::new(service.clone()), executor, None)
        .await
        .unwrap();
    add_bodies(&service, "default", &["d"]).await;
    add_bodies(&service, "mail", &["m"]).await;

    let processed = runner.run_queue("mail").await.unwrap();

    assert_eq!(processed, 1);
    assert_eq!(processor.bodies(), vec!["m"]);
    assert_eq!(runner.service().size("default").await.unwrap(), 1);
}

#[tokio::test]
async fn test_runner_over_trait_object() {
    let service = service().await;
    add_bodies(&service, "default", &["dyn"]).await;
    let shared: Arc<dyn QueueService> = Arc::new(service.clone());
    let (executor, _processor) = recording_executor(None);

    let runner = Runner::new(shared, executor, None).await.unwrap();
    let summary = runner.run(None).await.unwrap();

    assert_eq!(summary.tasks_processed, 1);
    assert_eq!(service.size("default").await.unwrap(), 0);
}

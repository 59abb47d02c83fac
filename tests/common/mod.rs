#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use task_queue_runner::task::executor::{RequestScope, HANDLER_HEADER};
use task_queue_runner::task::Headers;
use task_queue_runner::{
    MemoryQueueService, ProcessOutcome, QueueService, RequestContext, RunnerError, Task,
    TaskExecutor, TaskProcessor,
};

/// Adds one plain task with the same body to the named queue
pub const FOLLOW_UP_HEADER: &str = "X-Follow-Up";

/// Re-adds the task, header included, to the named queue
pub const REPLICATE_HEADER: &str = "X-Replicate";

/// Processor that records every body it sees and can enqueue follow-ups
pub struct RecordingProcessor {
    service: Option<MemoryQueueService>,
    bodies: Mutex<Vec<String>>,
    request_ids: Mutex<Vec<String>>,
}

impl RecordingProcessor {
    pub fn new() -> Self {
        Self {
            service: None,
            bodies: Mutex::new(Vec::new()),
            request_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn with_service(service: MemoryQueueService) -> Self {
        Self {
            service: Some(service),
            ..Self::new()
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskProcessor for RecordingProcessor {
    async fn process(
        &self,
        ctx: &RequestContext,
        headers: &Headers,
        body: &[u8],
    ) -> task_queue_runner::Result<ProcessOutcome> {
        let body = String::from_utf8_lossy(body).to_string();
        self.bodies.lock().unwrap().push(body.clone());
        self.request_ids.lock().unwrap().push(ctx.request_id.clone());

        if let Some(service) = &self.service {
            if let Some(queue) = headers.get(FOLLOW_UP_HEADER) {
                service
                    .add_tasks(queue, vec![Task::new(body.clone())])
                    .await?;
            }
            if let Some(queue) = headers.get(REPLICATE_HEADER) {
                let task = Task::new(body.clone()).with_header(REPLICATE_HEADER, queue.clone());
                service.add_tasks(queue, vec![task]).await?;
            }
        }

        Ok(ProcessOutcome {
            status: 200,
            handler: headers
                .get(HANDLER_HEADER)
                .cloned()
                .unwrap_or_else(|| "recording".to_string()),
        })
    }
}

/// Processor that always fails
pub struct FailingProcessor;

#[async_trait]
impl TaskProcessor for FailingProcessor {
    async fn process(
        &self,
        _ctx: &RequestContext,
        _headers: &Headers,
        _body: &[u8],
    ) -> task_queue_runner::Result<ProcessOutcome> {
        Err(RunnerError::Processor("handler exploded".to_string()))
    }
}

/// Scope counting how often it was cleared
#[derive(Default)]
pub struct CountingScope {
    clears: AtomicUsize,
}

impl CountingScope {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl RequestScope for CountingScope {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Executor over a fresh recording processor
pub fn recording_executor(
    service: Option<MemoryQueueService>,
) -> (TaskExecutor, Arc<RecordingProcessor>) {
    let processor = Arc::new(match service {
        Some(service) => RecordingProcessor::with_service(service),
        None => RecordingProcessor::new(),
    });
    (TaskExecutor::new(processor.clone()), processor)
}

/// Add plain tasks with the given bodies to a queue
pub async fn add_bodies(service: &MemoryQueueService, queue: &str, bodies: &[&str]) {
    let tasks = bodies.iter().map(|body| Task::new(*body)).collect();
    service.add_tasks(queue, tasks).await.unwrap();
}

//! Executor

use crate::task::{Headers, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Header naming the handler a task is routed to
pub const HANDLER_HEADER: &str = "X-Task-Handler";

/// Per-execution context handed to the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Identifier unique to this execution
    pub request_id: String,
}

impl RequestContext {
    /// Create a context with a fresh request id
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().simple().to_string(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Result reported by the processor for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Response status code
    pub status: u16,

    /// Identifier of the handler that ran
    pub handler: String,
}

/// Entry point of the system under test
#[async_trait]
pub trait TaskProcessor: Send + Sync {
    /// Run the handler referenced by `headers` on `body`
    async fn process(
        &self,
        ctx: &RequestContext,
        headers: &Headers,
        body: &[u8],
    ) -> crate::Result<ProcessOutcome>;
}

/// Request-scoped state that must not leak between executions
pub trait RequestScope: Send + Sync {
    /// Drop all request-scoped state
    fn clear(&self);
}

/// Scope with no state to clear
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScope;

impl RequestScope for NoopScope {
    fn clear(&self) {}
}

/// Processor that only logs what it receives
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProcessor;

#[async_trait]
impl TaskProcessor for LoggingProcessor {
    async fn process(
        &self,
        ctx: &RequestContext,
        headers: &Headers,
        body: &[u8],
    ) -> crate::Result<ProcessOutcome> {
        let handler = headers
            .get(HANDLER_HEADER)
            .cloned()
            .unwrap_or_else(|| "unrouted".to_string());

        info!(
            "Request {} ran handler {} with {} byte body",
            ctx.request_id,
            handler,
            body.len()
        );

        Ok(ProcessOutcome {
            status: 200,
            handler,
        })
    }
}

/// Decodes task records and hands them to a processor
#[derive(Clone)]
pub struct TaskExecutor {
    processor: Arc<dyn TaskProcessor>,
    scope: Arc<dyn RequestScope>,
}

impl TaskExecutor {
    /// Create an executor with no request-scoped state
    pub fn new(processor: Arc<dyn TaskProcessor>) -> Self {
        Self {
            processor,
            scope: Arc::new(NoopScope),
        }
    }

    /// Create an executor that clears `scope` after every task
    pub fn with_scope(processor: Arc<dyn TaskProcessor>, scope: Arc<dyn RequestScope>) -> Self {
        Self { processor, scope }
    }

    /// Execute one task record
    ///
    /// The scope is cleared whether or not the processor succeeds, and the
    /// processor's error is returned as is.
    pub async fn execute(&self, record: &TaskRecord) -> crate::Result<ProcessOutcome> {
        let ctx = RequestContext::new();
        debug!("Executing task {} as request {}", record.name, ctx.request_id);

        let result = match record.payload() {
            Ok(body) => self.processor.process(&ctx, &record.headers, &body).await,
            Err(e) => Err(e),
        };

        self.scope.clear();

        let outcome = result?;
        debug!(
            "Task {} finished with status {} from {}",
            record.name, outcome.status, outcome.handler
        );
        Ok(outcome)
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new(Arc::new(LoggingProcessor))
    }
}

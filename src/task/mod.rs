/// Body encoding and task reconstruction
pub mod codec;
/// Task executor implementations
pub mod executor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::queue::QueueMode;

/// Task headers keyed by header name
pub type Headers = BTreeMap<String, String>;

/// HTTP verb a push task is delivered with, or `Pull` for leased tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskMethod {
    /// GET request
    Get,
    /// POST request
    #[default]
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// HEAD request
    Head,
    /// Pulled by a consumer instead of delivered
    Pull,
}

impl TaskMethod {
    /// Whether this method is only valid on pull queues
    pub fn is_pull(self) -> bool {
        self == TaskMethod::Pull
    }

    /// Whether this method is accepted by a queue in the given mode
    pub fn fits(self, mode: QueueMode) -> bool {
        match mode {
            QueueMode::Pull => self.is_pull(),
            QueueMode::Push => !self.is_pull(),
        }
    }
}

impl fmt::Display for TaskMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            TaskMethod::Get => "GET",
            TaskMethod::Post => "POST",
            TaskMethod::Put => "PUT",
            TaskMethod::Delete => "DELETE",
            TaskMethod::Head => "HEAD",
            TaskMethod::Pull => "PULL",
        };
        f.write_str(verb)
    }
}

/// A task ready to be added to a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Task {
    /// Task name, assigned by the queue service when absent
    pub name: Option<String>,

    /// Raw payload handed to the processor
    pub payload: Vec<u8>,

    /// Headers routing the payload to a handler
    pub headers: Headers,

    /// Delivery method
    pub method: TaskMethod,

    /// Target URL for push delivery
    pub url: Option<String>,
}

impl Task {
    /// Create a push task with the given payload
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            ..Default::default()
        }
    }

    /// Create a pull task with the given payload
    pub fn pull(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            method: TaskMethod::Pull,
            ..Default::default()
        }
    }

    /// Set the task name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the delivery method
    pub fn with_method(mut self, method: TaskMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the target URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Build the record a queue listing returns for this task
    pub fn to_record(&self, name: String, eta: DateTime<Utc>) -> TaskRecord {
        TaskRecord {
            name,
            body: codec::encode_body(&self.payload),
            headers: self.headers.clone(),
            method: self.method,
            url: self.url.clone(),
            eta,
        }
    }
}

/// A pending task as listed by the queue service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task name, unique within its queue
    pub name: String,

    /// Base64 encoded payload
    pub body: String,

    /// Task headers
    #[serde(default)]
    pub headers: Headers,

    /// Delivery method
    pub method: TaskMethod,

    /// Target URL
    #[serde(default)]
    pub url: Option<String>,

    /// Time the task became eligible to run
    pub eta: DateTime<Utc>,
}

impl TaskRecord {
    /// Decode the body back into the original payload
    pub fn payload(&self) -> crate::Result<Vec<u8>> {
        codec::decode_body(&self.body)
    }
}

/// Dictionary form of a task, e.g. a listing record or a JSON fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawTask {
    /// Task name
    #[serde(default)]
    pub name: Option<String>,

    /// Decoded payload, takes precedence over `body`
    #[serde(default)]
    pub payload: Option<Vec<u8>>,

    /// Base64 encoded payload
    #[serde(default)]
    pub body: Option<String>,

    /// Task headers
    #[serde(default)]
    pub headers: Headers,

    /// Recorded delivery method
    #[serde(default)]
    pub method: Option<TaskMethod>,

    /// Recorded URL
    #[serde(default)]
    pub url: Option<String>,
}

impl From<TaskRecord> for RawTask {
    fn from(record: TaskRecord) -> Self {
        Self {
            name: Some(record.name),
            payload: None,
            body: Some(record.body),
            headers: record.headers,
            method: Some(record.method),
            url: record.url,
        }
    }
}

/// Input accepted by `add_tasks`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    /// Already a task, added unchanged
    Native(Task),
    /// Dictionary form, rebuilt for the target queue's mode
    Raw(RawTask),
}

impl TaskInput {
    /// Normalize into a task suitable for a queue in `mode`
    pub fn normalize(self, mode: QueueMode) -> crate::Result<Task> {
        match self {
            TaskInput::Native(task) => Ok(task),
            TaskInput::Raw(raw) => raw.into_task(mode),
        }
    }
}

impl From<Task> for TaskInput {
    fn from(task: Task) -> Self {
        TaskInput::Native(task)
    }
}

impl From<RawTask> for TaskInput {
    fn from(raw: RawTask) -> Self {
        TaskInput::Raw(raw)
    }
}

impl From<TaskRecord> for TaskInput {
    fn from(record: TaskRecord) -> Self {
        TaskInput::Raw(record.into())
    }
}

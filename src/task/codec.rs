//! Codec

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::queue::QueueMode;
use crate::task::{RawTask, Task, TaskMethod};

/// Encode a payload for transport in a task record
pub fn encode_body(payload: &[u8]) -> String {
    STANDARD.encode(payload)
}

/// Decode a task record body
pub fn decode_body(body: &str) -> crate::Result<Vec<u8>> {
    Ok(STANDARD.decode(body)?)
}

impl RawTask {
    /// Rebuild a task for a queue in `mode`
    ///
    /// The payload comes from `payload` when present, otherwise from the
    /// decoded `body`. Pull queue tasks always get the `PULL` method; push
    /// queue tasks keep their recorded method unless it was `PULL`.
    pub fn into_task(self, mode: QueueMode) -> crate::Result<Task> {
        let payload = match (self.payload, self.body) {
            (Some(payload), _) => payload,
            (None, Some(body)) => decode_body(&body)?,
            (None, None) => {
                return Err(crate::RunnerError::MalformedTask(format!(
                    "task {} has neither payload nor body",
                    self.name.as_deref().unwrap_or("<unnamed>")
                )))
            }
        };

        let task = match mode {
            QueueMode::Pull => Task {
                name: self.name,
                payload,
                headers: Default::default(),
                method: TaskMethod::Pull,
                url: self.url,
            },
            QueueMode::Push => Task {
                name: self.name,
                payload,
                headers: self.headers,
                method: self
                    .method
                    .filter(|method| !method.is_pull())
                    .unwrap_or_default(),
                url: self.url,
            },
        };

        Ok(task)
    }
}

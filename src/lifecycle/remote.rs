//! Collaborator seams: the request backend, the router, and the error payloads
//! they hand back.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::model::{RecentRequestEntry, RequestDraft};

/// Inline text used when a creation failure carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Inline text used when a list refresh failure carries no usable message.
pub const RECENT_LIST_ERROR: &str = "Error loading recent requests";

/// A failure reported by the backend.
///
/// The payload is kept as raw JSON because its shape is not guaranteed: it may
/// be `{"body": {"message": ..}}`, `{"message": ..}`, a bare string, or
/// anything else. Message lookups degrade instead of failing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("remote call failed: {payload}")]
pub struct RemoteError {
    payload: Value,
}

impl RemoteError {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Error with a nested `body.message`, the shape server-side exceptions use.
    pub fn structured(message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "body": { "message": message.into() } }))
    }

    /// Error with a top-level `message`, the shape transport failures use.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "message": message.into() }))
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// `body.message`, if present and non-empty.
    pub fn structured_message(&self) -> Option<&str> {
        non_empty(self.payload.pointer("/body/message"))
    }

    /// Top-level `message`, if present and non-empty.
    pub fn generic_message(&self) -> Option<&str> {
        non_empty(self.payload.get("message"))
    }

    /// The payload itself when it is a non-empty string.
    pub fn raw_text(&self) -> Option<&str> {
        non_empty(Some(&self.payload))
    }

    /// Message for a failed submission: structured, generic, raw string, then
    /// [`UNKNOWN_ERROR`].
    pub fn submission_message(&self) -> String {
        self.structured_message()
            .or_else(|| self.generic_message())
            .or_else(|| self.raw_text())
            .unwrap_or(UNKNOWN_ERROR)
            .to_string()
    }

    /// Message for a failed list refresh: structured, generic, then
    /// [`RECENT_LIST_ERROR`].
    pub fn recent_list_message(&self) -> String {
        self.structured_message()
            .or_else(|| self.generic_message())
            .unwrap_or(RECENT_LIST_ERROR)
            .to_string()
    }
}

impl From<&str> for RemoteError {
    fn from(message: &str) -> Self {
        Self::new(Value::String(message.to_string()))
    }
}

impl From<String> for RemoteError {
    fn from(message: String) -> Self {
        Self::new(Value::String(message))
    }
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// The persistence service behind the form.
///
/// Futures are boxed so the backend can sit behind `Arc<dyn RequestBackend>`
/// and be driven from a spawned task.
pub trait RequestBackend: Send + Sync {
    /// Creates a record from the draft and resolves to its identifier.
    fn create_request(&self, draft: RequestDraft) -> BoxFuture<'_, Result<String, RemoteError>>;

    /// Resolves to at most `limit` of the most recently created records.
    fn list_recent(
        &self,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<RecentRequestEntry>, RemoteError>>;
}

/// Host-provided router. Fire-and-forget; the lifecycle never retries.
pub trait Navigator {
    fn navigate_to_record(&mut self, record_id: &str, record_type: &str);
}

use chrono::NaiveDate;

use crate::lifecycle::RemoteError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing the request file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,

    /// A request with the same email, description, and priority already exists for the same UTC day.
    ///
    /// Produced by [`crate::storage::RequestStore::create`] when a duplicate is detected.
    #[error("DUPLICATE_VALUE: a matching request from {customer_email} already exists on {date} UTC")]
    DuplicateRequest {
        /// The customer email of the conflicting request.
        customer_email: String,
        /// The UTC date of the conflict.
        date: NaiveDate,
    },
}

/// Duplicates surface as structured (`body.message`) errors, the way a
/// server-side rule violation would; everything else is a generic failure.
impl From<StorageError> for RemoteError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateRequest { .. } => RemoteError::structured(err.to_string()),
            other => RemoteError::generic(other.to_string()),
        }
    }
}

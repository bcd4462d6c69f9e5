//! Local request persistence (JSONL) standing in for the remote backend.
//!
//! All requests live in a single `requests.jsonl` file, one record per line,
//! so creating a request is a single-line append with no read/rewrite.

mod error;
mod store;

pub use error::StorageError;
pub use store::RequestStore;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::StorageError;
use crate::lifecycle::{RemoteError, RequestBackend};
use crate::model::{RecentRequestEntry, RequestDraft, ServiceRequest};

const REQUESTS_FILE: &str = "requests.jsonl";

/// Manages JSONL-based request persistence.
///
/// Each line of `requests.jsonl` is one [`ServiceRequest`], in creation order.
#[derive(Debug, Clone)]
pub struct RequestStore {
    base_path: PathBuf,
}

impl RequestStore {
    /// Creates a store using the XDG data directory.
    ///
    /// The directory (`~/.local/share/intake/`) is created if it does not
    /// already exist.
    pub fn new() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Self::with_path(data_dir.join("intake"))
    }

    /// Creates a store rooted at the given directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn requests_path(&self) -> PathBuf {
        self.base_path.join(REQUESTS_FILE)
    }

    /// Loads every stored request in creation order.
    ///
    /// A missing file is an empty store; blank lines are skipped.
    pub async fn load_all(&self) -> Result<Vec<ServiceRequest>, StorageError> {
        let contents = match tokio::fs::read_to_string(self.requests_path()).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StorageError::Json))
            .collect()
    }

    /// Creates a request stamped with the current time.
    pub async fn create(&self, draft: RequestDraft) -> Result<ServiceRequest, StorageError> {
        self.create_at(draft, Utc::now()).await
    }

    /// Creates a request, checking for duplicates before appending.
    ///
    /// Returns [`StorageError::DuplicateRequest`] if a request with the same
    /// email (case-insensitive), description, and priority already exists on
    /// the same UTC day. Ids are `SR-<YYYYMMDD>-<NNNN>`, numbered per day.
    pub async fn create_at(
        &self,
        draft: RequestDraft,
        now: DateTime<Utc>,
    ) -> Result<ServiceRequest, StorageError> {
        let date = now.date_naive();
        let existing = self.load_all().await?;
        let same_day: Vec<&ServiceRequest> = existing
            .iter()
            .filter(|r| r.created_at.date_naive() == date)
            .collect();

        if same_day.iter().any(|r| is_duplicate(r, &draft)) {
            return Err(StorageError::DuplicateRequest {
                customer_email: draft.customer_email,
                date,
            });
        }

        let id = format!("SR-{}-{:04}", now.format("%Y%m%d"), same_day.len() + 1);
        let record = ServiceRequest::from_draft(id, draft, now);

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.requests_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(id = %record.id, "request appended");
        Ok(record)
    }

    /// Lists up to `limit` requests, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<RecentRequestEntry>, StorageError> {
        let mut requests = self.load_all().await?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests
            .iter()
            .take(limit)
            .map(ServiceRequest::summary)
            .collect())
    }

    /// Looks up a single request by id.
    pub async fn get_request(&self, id: &str) -> Result<Option<ServiceRequest>, StorageError> {
        Ok(self.load_all().await?.into_iter().find(|r| r.id == id))
    }
}

impl RequestBackend for RequestStore {
    fn create_request(&self, draft: RequestDraft) -> BoxFuture<'_, Result<String, RemoteError>> {
        async move {
            let record = self.create(draft).await?;
            Ok::<_, RemoteError>(record.id)
        }
        .boxed()
    }

    fn list_recent(
        &self,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<RecentRequestEntry>, RemoteError>> {
        async move { Ok::<_, RemoteError>(self.recent(limit).await?) }.boxed()
    }
}

/// Returns `true` if `existing` repeats the draft's content.
fn is_duplicate(existing: &ServiceRequest, draft: &RequestDraft) -> bool {
    existing.customer_email.to_lowercase() == draft.customer_email.to_lowercase()
        && existing.description == draft.description
        && existing.priority == draft.priority
}

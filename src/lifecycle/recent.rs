//! Read-only list of recently created requests, fed by an external refresh
//! channel.

use tracing::{debug, warn};

use crate::model::RecentRequestEntry;

use super::remote::RemoteError;

/// One event from the refresh channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Data(Vec<RecentRequestEntry>),
    Error(RemoteError),
}

impl From<Result<Vec<RecentRequestEntry>, RemoteError>> for Refresh {
    fn from(result: Result<Vec<RecentRequestEntry>, RemoteError>) -> Self {
        match result {
            Ok(entries) => Refresh::Data(entries),
            Err(err) => Refresh::Error(err),
        }
    }
}

/// Latest outcome of the recent-list fetch, held verbatim.
///
/// Never gates the form; the host reads [`has_entries`](Self::has_entries)
/// to decide whether to show the panel at all.
#[derive(Debug, Clone, Default)]
pub struct RecentListState {
    entries: Vec<RecentRequestEntry>,
    error: Option<String>,
}

impl RecentListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a refresh event, replacing whatever was held before.
    pub fn on_refresh(&mut self, refresh: Refresh) {
        match refresh {
            Refresh::Data(entries) => {
                debug!(count = entries.len(), "recent requests refreshed");
                self.entries = entries;
                self.error = None;
            }
            Refresh::Error(err) => {
                let message = err.recent_list_message();
                warn!(%err, %message, "recent requests failed to load");
                self.entries.clear();
                self.error = Some(message);
            }
        }
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RecentRequestEntry] {
        &self.entries
    }

    /// List-level error text from the last failed refresh.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record id of the entry at `index`, for navigation.
    pub fn record_id(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn entry(id: &str) -> RecentRequestEntry {
        RecentRequestEntry {
            id: id.to_string(),
            customer_email: "a@b.com".to_string(),
            priority: "Low".to_string(),
            status: "New".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn starts_empty() {
        let list = RecentListState::new();
        assert!(!list.has_entries());
        assert_eq!(list.error(), None);
    }

    #[test]
    fn data_replaces_entries_wholesale() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Data(vec![entry("a"), entry("b")]));
        list.on_refresh(Refresh::Data(vec![entry("c")]));
        assert_eq!(list.entries(), &[entry("c")]);
        assert!(list.has_entries());
    }

    #[test]
    fn empty_data_hides_panel() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Data(vec![entry("a")]));
        list.on_refresh(Refresh::Data(vec![]));
        assert!(!list.has_entries());
    }

    #[test]
    fn error_clears_entries_and_sets_message() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Data(vec![entry("a")]));
        list.on_refresh(Refresh::Error(RemoteError::new(json!({ "message": "down" }))));
        assert!(!list.has_entries());
        assert!(list.entries().is_empty());
        assert_eq!(list.error(), Some("down"));
    }

    #[test]
    fn error_without_message_uses_fallback() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Error(RemoteError::new(json!(null))));
        assert_eq!(list.error(), Some("Error loading recent requests"));
    }

    #[test]
    fn data_after_error_clears_message() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Error(RemoteError::structured("denied")));
        list.on_refresh(Refresh::Data(vec![entry("a")]));
        assert_eq!(list.error(), None);
        assert!(list.has_entries());
    }

    #[test]
    fn record_id_by_index() {
        let mut list = RecentListState::new();
        list.on_refresh(Refresh::Data(vec![entry("a"), entry("b")]));
        assert_eq!(list.record_id(1), Some("b"));
        assert_eq!(list.record_id(2), None);
    }

    #[test]
    fn from_result() {
        assert_eq!(Refresh::from(Ok(vec![entry("a")])), Refresh::Data(vec![entry("a")]));
        let err = RemoteError::generic("x");
        assert_eq!(Refresh::from(Err(err.clone())), Refresh::Error(err));
    }
}

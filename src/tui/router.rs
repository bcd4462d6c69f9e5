//! Record routing for the terminal host.

use tracing::debug;

use crate::lifecycle::Navigator;

/// A request to open one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRoute {
    pub record_id: String,
    pub record_type: String,
}

/// [`Navigator`] that queues routes for the [`App`](super::App) to open.
///
/// Navigation is fire-and-forget from the form's point of view; the app
/// drains the queue after each key press.
#[derive(Debug, Clone, Default)]
pub struct Router {
    pending: Option<RecordRoute>,
    history: Vec<RecordRoute>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the most recent unopened route, if any.
    pub fn take_pending(&mut self) -> Option<RecordRoute> {
        self.pending.take()
    }

    /// Every route requested so far, oldest first.
    pub fn history(&self) -> &[RecordRoute] {
        &self.history
    }
}

impl Navigator for Router {
    fn navigate_to_record(&mut self, record_id: &str, record_type: &str) {
        debug!(record_id, record_type, "route queued");
        let route = RecordRoute {
            record_id: record_id.to_string(),
            record_type: record_type.to_string(),
        };
        self.history.push(route.clone());
        self.pending = Some(route);
    }
}

//! Actions returned by screen event handlers.

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// Screens edit the form directly; anything that spawns work, routes, or
/// changes screens comes back to the `App` as one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Validate and send the current form.
    Submit,
    /// Re-fetch the recent request list.
    RefreshRecent,
    /// Open the record created by the last submission.
    ViewCreatedRecord,
    /// Open the record with the given id.
    ViewRecord(String),
    /// Quit the application.
    Quit,
}

//! User-facing notifications produced by the lifecycle for the host to render.

/// Visual tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Goes away on its own or on the next interaction.
    Dismissable,
    /// Stays until the user dismisses it explicitly.
    Sticky,
}

/// A toast-style message emitted by a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub persistence: Persistence,
}

impl Notification {
    /// Warning shown when a submit attempt fails local validation.
    pub fn validation_warning() -> Self {
        Self {
            title: "Validation Error".to_string(),
            message: "Please fill in all required fields correctly (Email, Description, Priority)."
                .to_string(),
            severity: Severity::Warning,
            persistence: Persistence::Dismissable,
        }
    }

    /// Confirmation carrying the identifier of the newly created record.
    pub fn created(record_id: &str) -> Self {
        Self {
            title: "Success".to_string(),
            message: format!("Service Request created successfully! Record ID: {record_id}"),
            severity: Severity::Success,
            persistence: Persistence::Dismissable,
        }
    }

    /// Remote failure; sticky so the cause stays visible.
    pub fn remote_failure(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            severity: Severity::Error,
            persistence: Persistence::Sticky,
        }
    }

    pub fn is_sticky(&self) -> bool {
        self.persistence == Persistence::Sticky
    }
}

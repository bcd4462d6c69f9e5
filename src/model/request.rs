use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::validation::{ValidationError, validate_description, validate_email};

/// Field values captured at submit time and sent to the backend.
///
/// Taking a snapshot keeps the in-flight request stable while the user keeps
/// editing the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub customer_email: String,
    pub description: String,
    pub priority: Priority,
}

impl RequestDraft {
    /// Creates a draft, validating the email and description.
    pub fn new(
        customer_email: String,
        description: String,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        validate_email(&customer_email)?;
        validate_description(&description)?;
        Ok(Self {
            customer_email,
            description,
            priority,
        })
    }
}

/// A persisted service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub customer_email: String,
    pub description: String,
    pub priority: Priority,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Status assigned to every newly created request.
    pub const NEW_STATUS: &'static str = "New";

    /// Builds the record for a draft that the backend has accepted.
    pub fn from_draft(id: String, draft: RequestDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_email: draft.customer_email,
            description: draft.description,
            priority: draft.priority,
            status: Self::NEW_STATUS.to_string(),
            created_at,
        }
    }

    /// Returns the list-row summary of this record.
    pub fn summary(&self) -> RecentRequestEntry {
        RecentRequestEntry {
            id: self.id.clone(),
            customer_email: self.customer_email.clone(),
            priority: self.priority.as_str().to_string(),
            status: self.status.clone(),
            created_at: self.created_at,
        }
    }
}

/// A row in the recently-created list.
///
/// The lifecycle only iterates these and reads `id` for navigation; the other
/// fields are for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRequestEntry {
    pub id: String,
    pub customer_email: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

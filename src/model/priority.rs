use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Urgency of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

static ALL_PRIORITIES: &[Priority] = &[Priority::Low, Priority::Medium, Priority::High];

impl Priority {
    /// Returns the value sent to the backend and shown in option lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Returns all priorities in display order.
    pub fn all() -> &'static [Priority] {
        ALL_PRIORITIES
    }

    /// Steps through the options, treating "unset" as the slot before `Low`.
    pub fn cycle(current: Option<Priority>, forward: bool) -> Option<Priority> {
        let slots = ALL_PRIORITIES.len() + 1;
        let pos = current
            .and_then(|p| ALL_PRIORITIES.iter().position(|&x| x == p))
            .map_or(0, |i| i + 1);
        let next = if forward {
            (pos + 1) % slots
        } else {
            (pos + slots - 1) % slots
        };
        next.checked_sub(1).map(|i| ALL_PRIORITIES[i])
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "" => Err(ValidationError::MissingPriority),
            other => Err(ValidationError::UnknownPriority(other.to_string())),
        }
    }
}

#[mutants::skip]
impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

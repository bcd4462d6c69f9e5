mod priority;
mod request;
mod validation;

pub use priority::Priority;
pub use request::{RecentRequestEntry, RequestDraft, ServiceRequest};
pub use validation::{ValidationError, validate_description, validate_email, validate_priority};

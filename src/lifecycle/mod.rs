//! Client-side request lifecycle: the form state machine, the recent-request
//! list, and the seams to the backend and router.
//!
//! Nothing here renders or performs I/O. Hosts mutate the state through its
//! methods, read it back to draw, and show the [`Notification`]s that
//! transitions return.

mod notification;
mod recent;
mod remote;
mod state;

pub use notification::{Notification, Persistence, Severity};
pub use recent::{RecentListState, Refresh};
pub use remote::{Navigator, RECENT_LIST_ERROR, RemoteError, RequestBackend, UNKNOWN_ERROR};
pub use state::{
    DEFAULT_RECORD_TYPE, Field, FormInputs, FormState, Phase, SubmissionOutcome, SubmitError,
    VALIDATION_MESSAGE,
};

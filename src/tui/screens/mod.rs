//! TUI screen implementations.

pub mod help;
pub mod record;
pub mod request_form;

pub use help::{HelpState, draw_help};
pub use record::{RecordLoad, RecordScreen, draw_record};
pub use request_form::{RequestFormScreen, draw_request_form};

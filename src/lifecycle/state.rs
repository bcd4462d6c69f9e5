//! The request lifecycle: input capture, validation, submission, outcome
//! reconciliation and reset.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{
    Priority, RequestDraft, validate_description, validate_email, validate_priority,
};

use super::notification::Notification;
use super::remote::{Navigator, RemoteError, RequestBackend};

/// Record type passed to the router unless configured otherwise.
pub const DEFAULT_RECORD_TYPE: &str = "Service_Request__c";

/// Inline message shown after a submit attempt fails validation.
pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields correctly.";

/// The three user-editable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerEmail,
    Description,
    Priority,
}

/// Current values of the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInputs {
    pub customer_email: String,
    pub description: String,
    pub priority: Option<Priority>,
}

impl FormInputs {
    /// Returns `true` when every field is empty or unset.
    pub fn is_empty(&self) -> bool {
        self.customer_email.is_empty() && self.description.is_empty() && self.priority.is_none()
    }
}

/// Lifecycle phase of the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    /// Terminal for the current record until [`FormState::create_another`].
    Success { record_id: String },
    /// Not terminal: inputs stay editable and resubmission is allowed.
    Failed { message: String },
}

/// Result of the current submission attempt, derived from the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Succeeded { record_id: String },
    Failed { message: String },
}

/// Reasons a submit attempt does not reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Local validation failed.
    #[error("Please fill in all required fields correctly.")]
    Invalid,
    /// A submission is already awaiting its response.
    #[error("a submission is already in flight")]
    InFlight,
    /// The current record was created; start another one first.
    #[error("request already created; start another to submit again")]
    AlreadyCreated,
}

impl SubmitError {
    /// The notification the host should show for this rejection, if any.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmitError::Invalid => Some(Notification::validation_warning()),
            SubmitError::InFlight | SubmitError::AlreadyCreated => None,
        }
    }
}

/// Owned state of one intake form.
#[derive(Debug, Clone)]
pub struct FormState {
    inputs: FormInputs,
    phase: Phase,
    error_message: Option<String>,
    is_loading: bool,
    record_type: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Creates an idle form with empty inputs.
    pub fn new() -> Self {
        Self::with_record_type(DEFAULT_RECORD_TYPE)
    }

    /// Creates an idle form that routes to records of the given type.
    pub fn with_record_type(record_type: impl Into<String>) -> Self {
        Self {
            inputs: FormInputs::default(),
            phase: Phase::Idle,
            error_message: None,
            is_loading: false,
            record_type: record_type.into(),
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Standing inline error text, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// `true` for exactly the span between dispatch and resolution of a
    /// submission. Hosts disable the submit control while it is set.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Identifier of the record created by the last successful submission.
    pub fn created_record_id(&self) -> Option<&str> {
        match &self.phase {
            Phase::Success { record_id } => Some(record_id),
            _ => None,
        }
    }

    /// Outcome of the current attempt; `None` before any attempt or after reset.
    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Submitting => Some(SubmissionOutcome::Pending),
            Phase::Success { record_id } => Some(SubmissionOutcome::Succeeded {
                record_id: record_id.clone(),
            }),
            Phase::Failed { message } => Some(SubmissionOutcome::Failed {
                message: message.clone(),
            }),
        }
    }

    /// Overwrites one input and clears the standing error. Never validates.
    ///
    /// For [`Field::Priority`] the value is parsed; anything other than an
    /// enumerated priority leaves the priority unset.
    pub fn update_field(&mut self, field: Field, value: &str) {
        match field {
            Field::CustomerEmail => self.inputs.customer_email = value.to_string(),
            Field::Description => self.inputs.description = value.to_string(),
            Field::Priority => self.inputs.priority = value.parse().ok(),
        }
        self.clear_error();
    }

    /// Sets the priority directly, clearing the standing error.
    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.inputs.priority = priority;
        self.clear_error();
    }

    /// Pure pass/fail check of the current inputs.
    pub fn validate(&self) -> bool {
        let email = validate_email(&self.inputs.customer_email);
        let description = validate_description(&self.inputs.description);
        let priority = validate_priority(self.inputs.priority);
        debug!(
            email_ok = email.is_ok(),
            description_ok = description.is_ok(),
            priority_ok = priority.is_ok(),
            "validation check"
        );
        email.is_ok() && description.is_ok() && priority.is_ok()
    }

    /// First half of a submission: validate, enter `Submitting`, snapshot inputs.
    ///
    /// On [`SubmitError::Invalid`] the inline message is set and the phase is
    /// left as it was. Re-entry while submitting or after success is refused
    /// without touching any state.
    pub fn begin_submit(&mut self) -> Result<RequestDraft, SubmitError> {
        match self.phase {
            Phase::Submitting => return Err(SubmitError::InFlight),
            Phase::Success { .. } => return Err(SubmitError::AlreadyCreated),
            Phase::Idle | Phase::Failed { .. } => {}
        }

        self.clear_error();

        let draft = match (self.validate(), self.inputs.priority) {
            (true, Some(priority)) => RequestDraft::new(
                self.inputs.customer_email.clone(),
                self.inputs.description.clone(),
                priority,
            )
            .ok(),
            _ => None,
        };
        let Some(draft) = draft else {
            info!("submit rejected by validation");
            self.error_message = Some(VALIDATION_MESSAGE.to_string());
            return Err(SubmitError::Invalid);
        };

        self.phase = Phase::Submitting;
        self.is_loading = true;
        debug!(priority = %draft.priority, "submission dispatched");
        Ok(draft)
    }

    /// Second half of a submission: reconcile the backend response.
    ///
    /// Returns `None` if no submission is in flight. The loading flag is
    /// cleared last, after the phase and messages are updated.
    pub fn complete_submit(&mut self, result: Result<String, RemoteError>) -> Option<Notification> {
        if self.phase != Phase::Submitting {
            warn!("submission result arrived with nothing in flight; ignored");
            return None;
        }

        let notification = match result {
            Ok(record_id) => {
                info!(%record_id, "service request created");
                let notification = Notification::created(&record_id);
                self.phase = Phase::Success { record_id };
                notification
            }
            Err(err) => {
                let message = err.submission_message();
                warn!(%err, %message, "service request creation failed");
                self.error_message = Some(message.clone());
                self.phase = Phase::Failed {
                    message: message.clone(),
                };
                Notification::remote_failure(message)
            }
        };

        self.is_loading = false;
        Some(notification)
    }

    /// Runs a full submission against `backend`, awaiting the response.
    ///
    /// Hosts that need field edits to keep flowing during the round trip use
    /// [`begin_submit`](Self::begin_submit) and
    /// [`complete_submit`](Self::complete_submit) around their own task instead.
    pub async fn submit<B>(&mut self, backend: &B) -> Option<Notification>
    where
        B: RequestBackend + ?Sized,
    {
        match self.begin_submit() {
            Ok(draft) => {
                let result = backend.create_request(draft).await;
                self.complete_submit(result)
            }
            Err(err) => err.notification(),
        }
    }

    /// Empties every input and the standing error. Leaves the phase alone.
    pub fn clear(&mut self) {
        self.inputs = FormInputs::default();
        self.clear_error();
    }

    /// Leaves `Success`, forgets the created id, and clears the inputs.
    pub fn create_another(&mut self) {
        if matches!(self.phase, Phase::Submitting) {
            warn!("create another requested while submitting; ignored");
            return;
        }
        self.phase = Phase::Idle;
        self.clear();
    }

    /// Asks the router to open the record created by the last submission.
    ///
    /// Returns `false` when no record has been created.
    pub fn view_created_record(&self, navigator: &mut dyn Navigator) -> bool {
        match self.created_record_id() {
            Some(record_id) => {
                self.view_record(record_id, navigator);
                true
            }
            None => false,
        }
    }

    /// Asks the router to open an arbitrary record, e.g. from the recent list.
    pub fn view_record(&self, record_id: &str, navigator: &mut dyn Navigator) {
        info!(%record_id, record_type = %self.record_type, "navigating to record");
        navigator.navigate_to_record(record_id, &self.record_type);
    }

    fn clear_error(&mut self) {
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use serde_json::json;

    use super::*;
    use crate::model::RecentRequestEntry;

    fn filled() -> FormState {
        let mut form = FormState::new();
        form.update_field(Field::CustomerEmail, "a@b.com");
        form.update_field(Field::Description, "desc");
        form.update_field(Field::Priority, "Medium");
        form
    }

    /// Backend that answers every create with a canned result and records drafts.
    struct ScriptedBackend {
        result: Result<String, RemoteError>,
        drafts: Mutex<Vec<RequestDraft>>,
    }

    impl ScriptedBackend {
        fn new(result: Result<String, RemoteError>) -> Self {
            Self {
                result,
                drafts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.drafts.lock().unwrap().len()
        }
    }

    impl RequestBackend for ScriptedBackend {
        fn create_request(&self, draft: RequestDraft) -> BoxFuture<'_, Result<String, RemoteError>> {
            self.drafts.lock().unwrap().push(draft);
            let result = self.result.clone();
            async move { result }.boxed()
        }

        fn list_recent(
            &self,
            _limit: usize,
        ) -> BoxFuture<'_, Result<Vec<RecentRequestEntry>, RemoteError>> {
            async { Ok(Vec::new()) }.boxed()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Vec<(String, String)>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to_record(&mut self, record_id: &str, record_type: &str) {
            self.visits
                .push((record_id.to_string(), record_type.to_string()));
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn starts_idle_and_empty() {
            let form = FormState::new();
            assert_eq!(form.phase(), &Phase::Idle);
            assert!(form.inputs().is_empty());
            assert!(!form.is_loading());
            assert_eq!(form.error_message(), None);
            assert_eq!(form.outcome(), None);
            assert_eq!(form.record_type(), DEFAULT_RECORD_TYPE);
        }

        #[test]
        fn update_field_overwrites_values() {
            let form = filled();
            assert_eq!(form.inputs().customer_email, "a@b.com");
            assert_eq!(form.inputs().description, "desc");
            assert_eq!(form.inputs().priority, Some(Priority::Medium));
        }

        #[test]
        fn update_field_clears_error() {
            let mut form = FormState::new();
            assert_eq!(form.begin_submit(), Err(SubmitError::Invalid));
            assert!(form.error_message().is_some());
            form.update_field(Field::Description, "x");
            assert_eq!(form.error_message(), None);
        }

        #[test]
        fn unknown_priority_leaves_it_unset() {
            let mut form = filled();
            form.update_field(Field::Priority, "Urgent");
            assert_eq!(form.inputs().priority, None);
            assert!(!form.validate());
        }

        #[test]
        fn set_priority_clears_error() {
            let mut form = FormState::new();
            let _ = form.begin_submit();
            form.set_priority(Some(Priority::High));
            assert_eq!(form.inputs().priority, Some(Priority::High));
            assert_eq!(form.error_message(), None);
        }

        #[test]
        fn update_field_does_not_change_phase() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.update_field(Field::Description, "edited mid-flight");
            assert_eq!(form.phase(), &Phase::Submitting);
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn valid_inputs_pass() {
            assert!(filled().validate());
        }

        #[test]
        fn email_without_at_fails() {
            let mut form = filled();
            form.update_field(Field::CustomerEmail, "ab.com");
            assert!(!form.validate());
        }

        #[test]
        fn email_without_dot_after_at_fails() {
            let mut form = filled();
            form.update_field(Field::CustomerEmail, "a.b@com");
            assert!(!form.validate());
        }

        #[test]
        fn whitespace_description_fails() {
            let mut form = filled();
            form.update_field(Field::Description, " \t ");
            assert!(!form.validate());
        }

        #[test]
        fn missing_priority_fails() {
            let mut form = filled();
            form.update_field(Field::Priority, "");
            assert!(!form.validate());
        }
    }

    mod begin_submit {
        use super::*;

        #[test]
        fn invalid_sets_message_and_keeps_phase() {
            let mut form = FormState::new();
            assert_eq!(form.begin_submit(), Err(SubmitError::Invalid));
            assert_eq!(form.phase(), &Phase::Idle);
            assert_eq!(form.error_message(), Some(VALIDATION_MESSAGE));
            assert!(!form.is_loading());
        }

        #[test]
        fn invalid_after_failure_stays_failed() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Err(RemoteError::from("boom")));
            form.update_field(Field::CustomerEmail, "bad");
            assert_eq!(form.begin_submit(), Err(SubmitError::Invalid));
            assert_eq!(
                form.phase(),
                &Phase::Failed {
                    message: "boom".to_string()
                }
            );
        }

        #[test]
        fn invalid_yields_validation_notification() {
            let n = SubmitError::Invalid.notification().unwrap();
            assert_eq!(n, Notification::validation_warning());
            assert_eq!(SubmitError::InFlight.notification(), None);
            assert_eq!(SubmitError::AlreadyCreated.notification(), None);
        }

        #[test]
        fn valid_enters_submitting_with_snapshot() {
            let mut form = filled();
            let draft = form.begin_submit().unwrap();
            assert_eq!(form.phase(), &Phase::Submitting);
            assert!(form.is_loading());
            assert_eq!(form.outcome(), Some(SubmissionOutcome::Pending));
            assert_eq!(
                draft,
                RequestDraft::new("a@b.com".to_string(), "desc".to_string(), Priority::Medium)
                    .unwrap()
            );
        }

        #[test]
        fn snapshot_is_unaffected_by_later_edits() {
            let mut form = filled();
            let draft = form.begin_submit().unwrap();
            form.update_field(Field::Description, "changed");
            assert_eq!(draft.description, "desc");
            assert_eq!(form.inputs().description, "changed");
        }

        #[test]
        fn reentry_while_submitting_is_refused() {
            let mut form = filled();
            form.begin_submit().unwrap();
            assert_eq!(form.begin_submit(), Err(SubmitError::InFlight));
            assert_eq!(form.phase(), &Phase::Submitting);
            assert!(form.is_loading());
        }

        #[test]
        fn submit_after_success_is_refused() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Ok("001xyz".to_string()));
            assert_eq!(form.begin_submit(), Err(SubmitError::AlreadyCreated));
            assert_eq!(form.created_record_id(), Some("001xyz"));
        }
    }

    mod complete_submit {
        use super::*;

        #[test]
        fn success_stores_id_and_notifies() {
            let mut form = filled();
            form.begin_submit().unwrap();
            let n = form.complete_submit(Ok("001xyz".to_string())).unwrap();
            assert_eq!(
                form.phase(),
                &Phase::Success {
                    record_id: "001xyz".to_string()
                }
            );
            assert_eq!(form.created_record_id(), Some("001xyz"));
            assert!(n.message.contains("001xyz"));
            assert!(!n.is_sticky());
            assert!(!form.is_loading());
        }

        #[test]
        fn structured_failure_message() {
            let mut form = filled();
            form.begin_submit().unwrap();
            let err = RemoteError::new(json!({ "body": { "message": "DUPLICATE" } }));
            let n = form.complete_submit(Err(err)).unwrap();
            assert_eq!(
                form.phase(),
                &Phase::Failed {
                    message: "DUPLICATE".to_string()
                }
            );
            assert_eq!(form.error_message(), Some("DUPLICATE"));
            assert!(n.is_sticky());
            assert_eq!(n.message, "DUPLICATE");
            assert!(!form.is_loading());
        }

        #[test]
        fn string_failure_message() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Err(RemoteError::from("boom")));
            assert_eq!(form.error_message(), Some("boom"));
        }

        #[test]
        fn unknown_failure_shape() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Err(RemoteError::new(json!({}))));
            assert_eq!(form.error_message(), Some("Unknown error occurred"));
        }

        #[test]
        fn failure_keeps_inputs_for_resubmission() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Err(RemoteError::from("boom")));
            assert_eq!(form.inputs(), filled().inputs());
            assert!(form.begin_submit().is_ok());
        }

        #[test]
        fn stray_result_is_ignored() {
            let mut form = filled();
            assert_eq!(form.complete_submit(Ok("001".to_string())), None);
            assert_eq!(form.phase(), &Phase::Idle);
        }

        #[test]
        fn loading_spans_exactly_the_round_trip() {
            for result in [Ok("001xyz".to_string()), Err(RemoteError::from("boom"))] {
                let mut form = filled();
                assert!(!form.is_loading());
                form.begin_submit().unwrap();
                assert!(form.is_loading());
                form.complete_submit(result);
                assert!(!form.is_loading());
            }
        }
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn invalid_never_reaches_backend() {
            let backend = ScriptedBackend::new(Ok("001xyz".to_string()));
            let mut form = FormState::new();
            form.update_field(Field::CustomerEmail, "nope");
            let n = form.submit(&backend).await.unwrap();
            assert_eq!(n.title, "Validation Error");
            assert_eq!(backend.calls(), 0);
        }

        #[tokio::test]
        async fn success_round_trip() {
            let backend = ScriptedBackend::new(Ok("001xyz".to_string()));
            let mut form = filled();
            let n = form.submit(&backend).await.unwrap();
            assert_eq!(n.message, "Service Request created successfully! Record ID: 001xyz");
            assert_eq!(form.created_record_id(), Some("001xyz"));
            assert_eq!(backend.calls(), 1);
            assert_eq!(
                backend.drafts.lock().unwrap()[0].priority,
                Priority::Medium
            );
        }

        #[tokio::test]
        async fn failure_round_trip() {
            let backend = ScriptedBackend::new(Err(RemoteError::structured("DUPLICATE")));
            let mut form = filled();
            let n = form.submit(&backend).await.unwrap();
            assert!(n.is_sticky());
            assert_eq!(form.error_message(), Some("DUPLICATE"));
            assert!(!form.is_loading());
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn clear_empties_inputs_and_error() {
            let mut form = filled();
            form.update_field(Field::CustomerEmail, "bad");
            let _ = form.begin_submit();
            form.clear();
            assert!(form.inputs().is_empty());
            assert_eq!(form.error_message(), None);
        }

        #[test]
        fn clear_is_idempotent() {
            let mut once = filled();
            once.clear();
            let mut twice = filled();
            twice.clear();
            twice.clear();
            assert_eq!(once.inputs(), twice.inputs());
            assert_eq!(once.inputs(), &FormInputs::default());
        }

        #[test]
        fn clear_keeps_success_phase() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Ok("001xyz".to_string()));
            form.clear();
            assert_eq!(form.created_record_id(), Some("001xyz"));
        }

        #[test]
        fn create_another_returns_to_idle() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Ok("001xyz".to_string()));
            form.create_another();
            assert_eq!(form.phase(), &Phase::Idle);
            assert!(form.inputs().is_empty());
            assert_eq!(form.created_record_id(), None);
        }

        #[test]
        fn create_another_while_submitting_is_ignored() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.create_another();
            assert_eq!(form.phase(), &Phase::Submitting);
            assert!(!form.inputs().is_empty());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn view_created_record_routes_with_record_type() {
            let mut form = filled();
            form.begin_submit().unwrap();
            form.complete_submit(Ok("001xyz".to_string()));
            let mut nav = RecordingNavigator::default();
            assert!(form.view_created_record(&mut nav));
            assert_eq!(
                nav.visits,
                vec![("001xyz".to_string(), "Service_Request__c".to_string())]
            );
        }

        #[test]
        fn view_created_record_without_record_is_noop() {
            let form = FormState::new();
            let mut nav = RecordingNavigator::default();
            assert!(!form.view_created_record(&mut nav));
            assert!(nav.visits.is_empty());
        }

        #[test]
        fn view_record_uses_configured_type() {
            let form = FormState::with_record_type("Case");
            let mut nav = RecordingNavigator::default();
            form.view_record("500abc", &mut nav);
            assert_eq!(nav.visits, vec![("500abc".to_string(), "Case".to_string())]);
        }

        #[test]
        fn view_record_does_not_change_state() {
            let form = filled();
            let before = form.inputs().clone();
            let mut nav = RecordingNavigator::default();
            form.view_record("x", &mut nav);
            assert_eq!(form.inputs(), &before);
            assert_eq!(form.phase(), &Phase::Idle);
        }
    }
}

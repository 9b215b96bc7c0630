use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::{debug, error, info};

use super::state::SubmissionStatus;
use super::{FormError, FormEvent};
use crate::api::ApplicationSink;
use crate::model::{DonorSignup, Field, validate_email, validate_required};

/// State of the donor waitlist form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WaitlistState {
    name: String,
    email: String,
    validation_errors: BTreeMap<Field, String>,
    submission: SubmissionStatus,
}

impl WaitlistState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn validation_errors(&self) -> &BTreeMap<Field, String> {
        &self.validation_errors
    }

    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    /// Sets the name or email. Other fields are not part of this form.
    pub fn set_field(&mut self, field: Field, value: String) -> bool {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            _ => return false,
        }
        self.validation_errors.remove(&field);
        true
    }

    pub fn validate(&self) -> BTreeMap<Field, String> {
        let mut errors = BTreeMap::new();
        if let Err(e) = validate_required(Field::Name, &self.name) {
            errors.insert(Field::Name, e.to_string());
        }
        if let Err(e) = validate_email(&self.email) {
            errors.insert(Field::Email, e.to_string());
        }
        errors
    }

    /// Validates and, if clean, moves to `Submitting` and returns the payload.
    pub fn begin_submit(&mut self) -> Result<DonorSignup, FormError> {
        self.submission.check_ready()?;
        let errors = self.validate();
        if !errors.is_empty() {
            let count = errors.len();
            self.validation_errors = errors;
            return Err(FormError::ValidationFailed(count));
        }
        self.validation_errors.clear();
        self.submission = SubmissionStatus::Submitting;
        Ok(DonorSignup {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), String>) {
        self.submission.finish(result);
    }
}

/// Drives the donor waitlist form.
pub struct WaitlistController {
    state: WaitlistState,
    sink: Arc<dyn ApplicationSink>,
    submission: Option<AbortHandle>,
    tx: UnboundedSender<FormEvent>,
    rx: UnboundedReceiver<FormEvent>,
}

impl WaitlistController {
    pub fn new(sink: Arc<dyn ApplicationSink>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: WaitlistState::default(),
            sink,
            submission: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &WaitlistState {
        &self.state
    }

    pub fn on_field_changed(&mut self, field: Field, value: impl Into<String>) {
        self.state.set_field(field, value.into());
    }

    pub fn validate(&self) -> BTreeMap<Field, String> {
        self.state.validate()
    }

    /// Validates the form and, if clean, starts the submission.
    pub fn on_submit(&mut self) -> Result<(), FormError> {
        let signup = self.state.begin_submit().inspect_err(|e| {
            debug!(error = %e, "waitlist submit refused");
        })?;
        info!("joining donor waitlist");
        let sink = Arc::clone(&self.sink);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = sink.join_waitlist(&signup).await.map_err(|e| e.to_string());
            let _ = tx.send(FormEvent::SubmitResolved(result));
        });
        self.submission = Some(handle.abort_handle());
        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.rx.recv().await
    }

    pub fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::SubmitResolved(result) => {
                self.submission = None;
                match &result {
                    Ok(()) => info!("donor joined waitlist"),
                    Err(e) => error!(error = %e, "waitlist submission failed"),
                }
                self.state.finish_submit(result);
            }
            other => debug!(?other, "event not used by waitlist form"),
        }
    }
}

impl Drop for WaitlistController {
    fn drop(&mut self) {
        if let Some(handle) = self.submission.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::testing::FakeSink;

    async fn pump(ctl: &mut WaitlistController) {
        let event = ctl.next_event().await.expect("controller holds a sender");
        ctl.handle_event(event);
    }

    fn filled(sink: &Arc<FakeSink>) -> WaitlistController {
        let mut ctl = WaitlistController::new(sink.clone());
        ctl.on_field_changed(Field::Name, "Grace Hopper");
        ctl.on_field_changed(Field::Email, " grace@example.com ");
        ctl
    }

    #[test]
    fn empty_form_has_two_errors() {
        let errors = WaitlistState::default().validate();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec![Field::Name, Field::Email]
        );
    }

    #[test]
    fn set_field_ignores_student_fields() {
        let mut state = WaitlistState::default();
        assert!(!state.set_field(Field::Institution, "Stanford".into()));
        assert!(state.set_field(Field::Name, "Grace".into()));
        assert_eq!(state.name(), "Grace");
    }

    #[tokio::test]
    async fn malformed_email_blocks_submit() {
        let sink = FakeSink::succeeding();
        let mut ctl = WaitlistController::new(sink.clone());
        ctl.on_field_changed(Field::Name, "Grace");
        ctl.on_field_changed(Field::Email, "grace@");

        assert_eq!(ctl.on_submit(), Err(FormError::ValidationFailed(1)));
        assert!(ctl.state().validation_errors().contains_key(&Field::Email));
        tokio::task::yield_now().await;
        assert!(sink.signups().is_empty());

        ctl.on_field_changed(Field::Email, "grace@example.com");
        assert!(ctl.state().validation_errors().is_empty());
    }

    #[tokio::test]
    async fn successful_signup_is_terminal() {
        let sink = FakeSink::succeeding();
        let mut ctl = filled(&sink);

        ctl.on_submit().unwrap();
        assert_eq!(*ctl.state().submission(), SubmissionStatus::Submitting);
        assert_eq!(ctl.on_submit(), Err(FormError::SubmissionInFlight));
        pump(&mut ctl).await;

        assert!(ctl.state().submission().is_submitted());
        assert_eq!(
            sink.signups(),
            vec![DonorSignup {
                name: "Grace Hopper".into(),
                email: "grace@example.com".into()
            }]
        );
        assert_eq!(ctl.on_submit(), Err(FormError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn failed_signup_keeps_form_editable() {
        let sink = FakeSink::failing();
        let mut ctl = filled(&sink);

        ctl.on_submit().unwrap();
        pump(&mut ctl).await;

        assert!(matches!(
            ctl.state().submission(),
            SubmissionStatus::Failed { .. }
        ));
        assert_eq!(ctl.state().name(), "Grace Hopper");
        ctl.on_submit().unwrap();
        pump(&mut ctl).await;
        assert_eq!(sink.signups().len(), 2);
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::debounce::Debouncer;
use super::state::{FormState, LookupApplied, LookupFailure, LookupResult, QueryChange};
use super::{FormError, FormEvent, SearchSettings};
use crate::api::{ApplicationSink, InstitutionDirectory};
use crate::config::ApplicationConfig;
use crate::model::{DegreeLevel, Field, Suggestion};

/// Drives the student application form.
///
/// Owns the [`FormState`], the debounce timer for the institution field,
/// every lookup it has dispatched and the pending submission. Completions
/// arrive through [`next_event`](Self::next_event) and must be passed to
/// [`handle_event`](Self::handle_event).
pub struct StudentFormController {
    state: FormState,
    directory: Arc<dyn InstitutionDirectory>,
    sink: Arc<dyn ApplicationSink>,
    settings: SearchSettings,
    /// Bumped on every institution edit; a debounce firing for an older
    /// value is ignored.
    query_seq: u64,
    debounce: Debouncer,
    lookups: Vec<AbortHandle>,
    submission: Option<AbortHandle>,
    tx: UnboundedSender<FormEvent>,
    rx: UnboundedReceiver<FormEvent>,
}

impl StudentFormController {
    pub fn new(
        directory: Arc<dyn InstitutionDirectory>,
        sink: Arc<dyn ApplicationSink>,
        settings: SearchSettings,
        application: &ApplicationConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::new(
                application.default_country.clone(),
                settings.min_query_chars,
                application.minimum_amount,
            ),
            directory,
            sink,
            settings,
            query_seq: 0,
            debounce: Debouncer::new(settings.debounce),
            lookups: Vec::new(),
            submission: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Returns `true` while a lookup is waiting on its debounce timer.
    pub fn lookup_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Handles an edit of the institution field.
    pub fn on_query_text_changed(&mut self, text: impl Into<String>) {
        self.query_seq += 1;
        match self.state.set_query(text.into()) {
            QueryChange::BelowThreshold => self.debounce.cancel(),
            QueryChange::Searchable => {
                let seq = self.query_seq;
                let query = self.state.fields().institution.clone();
                let tx = self.tx.clone();
                self.debounce.schedule(move || {
                    let _ = tx.send(FormEvent::DebounceElapsed { seq, query });
                });
            }
        }
    }

    /// Handles a pick from the suggestion list.
    ///
    /// Returns `false` if `suggestion` is not currently shown.
    pub fn on_suggestion_selected(&mut self, suggestion: &Suggestion) -> bool {
        if !self.state.select_suggestion(suggestion) {
            return false;
        }
        self.query_seq += 1;
        self.debounce.cancel();
        debug!(id = %suggestion.id, "institution selected");
        true
    }

    /// Accepts the institution text as typed.
    pub fn on_manual_entry_requested(&mut self) {
        self.query_seq += 1;
        self.debounce.cancel();
        self.state.request_manual_entry();
        debug!(text = %self.state.fields().institution, "manual institution entry");
    }

    /// Sets a text field; institution edits go through the search path.
    ///
    /// The manual-entry flag is not a text field and is refused here; use
    /// [`Self::on_manual_entry_requested`].
    pub fn on_field_changed(&mut self, field: Field, value: impl Into<String>) -> bool {
        match field {
            Field::Institution => {
                self.on_query_text_changed(value);
                true
            }
            Field::ManualInstitutionEntry => {
                debug!("manual entry flag is not set through field edits");
                false
            }
            _ => self.state.set_field(field, value.into()),
        }
    }

    /// Sets the degree level from the selector.
    pub fn on_degree_changed(&mut self, degree: Option<DegreeLevel>) {
        self.state.set_degree(degree);
    }

    /// Validates every field without changing state.
    pub fn validate(&self) -> BTreeMap<Field, String> {
        self.state.validate()
    }

    /// Validates the form and, if clean, starts the submission.
    ///
    /// Refused submissions make no network call.
    pub fn on_submit(&mut self) -> Result<(), FormError> {
        let application = self.state.begin_submit().inspect_err(|e| {
            debug!(error = %e, "submit refused");
        })?;
        info!(
            manual = application.is_manual_institution_entry,
            "submitting student application"
        );
        let sink = Arc::clone(&self.sink);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = sink
                .submit_application(&application)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FormEvent::SubmitResolved(result));
        });
        self.submission = Some(handle.abort_handle());
        Ok(())
    }

    /// Waits for the next completion from a background task.
    ///
    /// Cancel-safe; pending forever while nothing is in flight.
    pub async fn next_event(&mut self) -> Option<FormEvent> {
        self.rx.recv().await
    }

    /// Applies a completion posted by one of this controller's tasks.
    pub fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::DebounceElapsed { seq, query } => {
                if seq == self.query_seq {
                    self.perform_lookup(query);
                } else {
                    debug!(seq, current = self.query_seq, "superseded debounce ignored");
                }
            }
            FormEvent::LookupResolved(result) => self.on_lookup_resolved(result),
            FormEvent::SubmitResolved(result) => {
                self.submission = None;
                match &result {
                    Ok(()) => info!("student application submitted"),
                    Err(e) => error!(error = %e, "student application submission failed"),
                }
                self.state.finish_submit(result);
            }
        }
    }

    fn perform_lookup(&mut self, query: String) {
        if !self.state.begin_lookup(&query) {
            return;
        }
        debug!(query = %query, "dispatching institution lookup");
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        let limit = self.settings.lookup_timeout;
        self.lookups.retain(|h| !h.is_finished());
        let handle = tokio::spawn(async move {
            let outcome = match timeout(limit, directory.search(&query)).await {
                Ok(Ok(found)) => Ok(found.into_iter().map(Suggestion::from).collect()),
                Ok(Err(e)) => Err(LookupFailure::Failed(e.to_string())),
                Err(_) => Err(LookupFailure::TimedOut),
            };
            let _ = tx.send(FormEvent::LookupResolved(LookupResult { query, outcome }));
        });
        self.lookups.push(handle.abort_handle());
    }

    fn on_lookup_resolved(&mut self, result: LookupResult) {
        let query = result.query.clone();
        match &result.outcome {
            Ok(items) => debug!(query = %query, count = items.len(), "lookup returned"),
            Err(LookupFailure::TimedOut) => warn!(query = %query, "lookup timed out"),
            Err(LookupFailure::Failed(e)) => warn!(query = %query, error = %e, "lookup failed"),
        }
        if self.state.apply_lookup(result) == LookupApplied::Stale {
            debug!(query = %query, "stale lookup result discarded");
        }
    }
}

impl Drop for StudentFormController {
    fn drop(&mut self) {
        self.debounce.cancel();
        for handle in self.lookups.drain(..) {
            handle.abort();
        }
        if let Some(handle) = self.submission.take() {
            handle.abort();
        }
    }
}

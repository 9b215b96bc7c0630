//! Form controllers: the student application with its institution
//! autocomplete, and the donor waitlist.
//!
//! Controllers own their state and every background task they start.
//! Tasks never touch state directly; they post a [`FormEvent`] back to the
//! controller's channel and the owner applies it with `handle_event`, so all
//! mutation happens on the UI side. Dropping a controller aborts its tasks.

mod controller;
mod debounce;
mod state;
mod waitlist;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use crate::config::SearchConfig;

pub use controller::StudentFormController;
pub use debounce::Debouncer;
pub use state::{
    FormState, LookupApplied, LookupFailure, LookupResult, QueryChange, SearchStatus,
    StudentFields, SubmissionStatus, SuggestionSet,
};
pub use waitlist::{WaitlistController, WaitlistState};

/// Errors returned when a submit request is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// One or more fields are invalid; errors are set on the fields.
    #[error("{0} field(s) need attention")]
    ValidationFailed(usize),

    /// A submission is already waiting for a response.
    #[error("submission already in progress")]
    SubmissionInFlight,

    /// The form was submitted successfully and is closed.
    #[error("form already submitted")]
    AlreadySubmitted,
}

/// Completion messages posted by a controller's background tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The debounce timer for keystroke `seq` expired.
    DebounceElapsed { seq: u64, query: String },
    /// An institution lookup finished, failed, or timed out.
    LookupResolved(LookupResult),
    /// A submission finished; `Err` carries the failure description.
    SubmitResolved(Result<(), String>),
}

/// Timing and threshold settings for the institution search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub lookup_timeout: Duration,
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            lookup_timeout: config.lookup_timeout(),
            min_query_chars: config.min_query_chars,
        }
    }
}

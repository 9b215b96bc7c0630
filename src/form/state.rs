//! Pure form state and its transitions.
//!
//! Nothing here spawns or awaits; the controller owns timers and requests
//! and feeds their completions back through these methods.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::FormError;
use crate::model::{
    DegreeLevel, Field, StudentApplication, Suggestion, validate_amount, validate_email,
    validate_required,
};

/// Progress of the institution lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    NotSearching,
    Searching,
    Succeeded,
    TimedOutOrFailed,
}

/// Progress of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    /// Terminal: the form is not submitted again.
    Submitted { at: DateTime<Utc> },
    /// The last attempt failed; the form may be resubmitted.
    Failed { reason: String },
}

impl SubmissionStatus {
    /// Fails if a new submission may not start from this status.
    pub fn check_ready(&self) -> Result<(), FormError> {
        match self {
            Self::Submitting => Err(FormError::SubmissionInFlight),
            Self::Submitted { .. } => Err(FormError::AlreadySubmitted),
            Self::Idle | Self::Failed { .. } => Ok(()),
        }
    }

    /// Records the outcome of the in-flight submission.
    ///
    /// Ignored unless a submission is in flight.
    pub fn finish(&mut self, result: Result<(), String>) {
        if *self != Self::Submitting {
            return;
        }
        *self = match result {
            Ok(()) => Self::Submitted { at: Utc::now() },
            Err(reason) => Self::Failed { reason },
        };
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

/// Why a lookup produced no suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    TimedOut,
    Failed(String),
}

/// A completed lookup, tagged with the query it answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub query: String,
    pub outcome: Result<Vec<Suggestion>, LookupFailure>,
}

/// Whether a lookup result was applied to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupApplied {
    Applied,
    Stale,
}

/// What a query edit requires of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// Too short to search; any pending lookup should be cancelled.
    BelowThreshold,
    /// Long enough to search once typing pauses.
    Searchable,
}

/// Suggestions for the institution field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionSet {
    pub query: String,
    pub items: Vec<Suggestion>,
    pub status: SearchStatus,
}

impl SuggestionSet {
    fn clear(&mut self) {
        self.items.clear();
        self.status = SearchStatus::NotSearching;
    }
}

/// Current values of the student application fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub institution: String,
    pub field_of_study: String,
    pub degree_level: Option<DegreeLevel>,
    pub requested_amount: String,
    pub country: String,
    pub is_manual_institution_entry: bool,
}

impl StudentFields {
    /// Returns the display value of `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Institution => &self.institution,
            Field::FieldOfStudy => &self.field_of_study,
            Field::DegreeLevel => self.degree_level.map_or("", |d| d.label()),
            Field::RequestedAmount => &self.requested_amount,
            Field::Country => &self.country,
            Field::ManualInstitutionEntry => {
                if self.is_manual_institution_entry {
                    "yes"
                } else {
                    ""
                }
            }
        }
    }
}

/// State of the student application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: StudentFields,
    validation_errors: BTreeMap<Field, String>,
    submission: SubmissionStatus,
    selection_locked: bool,
    suggestions: SuggestionSet,
    manual_entry_offered: bool,
    min_query_chars: usize,
    minimum_amount: u64,
}

impl FormState {
    /// Creates an empty form with `country` preselected.
    pub fn new(country: impl Into<String>, min_query_chars: usize, minimum_amount: u64) -> Self {
        Self {
            fields: StudentFields {
                country: country.into(),
                ..StudentFields::default()
            },
            validation_errors: BTreeMap::new(),
            submission: SubmissionStatus::Idle,
            selection_locked: false,
            suggestions: SuggestionSet::default(),
            manual_entry_offered: false,
            min_query_chars,
            minimum_amount,
        }
    }

    pub fn fields(&self) -> &StudentFields {
        &self.fields
    }

    pub fn validation_errors(&self) -> &BTreeMap<Field, String> {
        &self.validation_errors
    }

    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    pub fn selection_locked(&self) -> bool {
        self.selection_locked
    }

    pub fn suggestions(&self) -> &SuggestionSet {
        &self.suggestions
    }

    /// Whether the "enter it manually" affordance should be shown.
    pub fn manual_entry_offered(&self) -> bool {
        self.manual_entry_offered
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_chars
    }

    /// Stores new institution text and unlocks searching.
    pub fn set_query(&mut self, text: String) -> QueryChange {
        self.fields.institution = text;
        self.selection_locked = false;
        self.manual_entry_offered = false;
        self.validation_errors.remove(&Field::Institution);
        if self.is_searchable(&self.fields.institution) {
            QueryChange::Searchable
        } else {
            self.suggestions.clear();
            self.suggestions.query.clear();
            QueryChange::BelowThreshold
        }
    }

    /// Marks a lookup for `query` as started.
    ///
    /// Returns `false`, leaving the state untouched, if `query` is no longer
    /// the field's text, is too short, or a suggestion has been selected.
    pub fn begin_lookup(&mut self, query: &str) -> bool {
        if self.selection_locked
            || query != self.fields.institution
            || !self.is_searchable(query)
        {
            return false;
        }
        self.suggestions.query = query.to_string();
        self.suggestions.status = SearchStatus::Searching;
        true
    }

    /// Applies a completed lookup unless it is stale.
    ///
    /// A result is stale when the field text has moved on from its query,
    /// a suggestion has been selected, or nothing is being searched for any
    /// more (cleared, selected, or switched to manual entry).
    pub fn apply_lookup(&mut self, result: LookupResult) -> LookupApplied {
        if result.query != self.fields.institution
            || self.selection_locked
            || self.suggestions.status != SearchStatus::Searching
        {
            return LookupApplied::Stale;
        }
        self.suggestions.query = result.query;
        match result.outcome {
            Ok(items) => {
                self.manual_entry_offered = items.is_empty();
                self.suggestions.items = items;
                self.suggestions.status = SearchStatus::Succeeded;
            }
            Err(_) => {
                self.suggestions.items.clear();
                self.suggestions.status = SearchStatus::TimedOutOrFailed;
                self.manual_entry_offered = true;
            }
        }
        LookupApplied::Applied
    }

    /// Writes a shown suggestion into the field and locks searching.
    ///
    /// Returns `false` if `suggestion` is not among the current items.
    pub fn select_suggestion(&mut self, suggestion: &Suggestion) -> bool {
        if !self.suggestions.items.contains(suggestion) {
            return false;
        }
        self.fields.institution = suggestion.display_name.clone();
        self.fields.is_manual_institution_entry = false;
        self.selection_locked = true;
        self.manual_entry_offered = false;
        self.suggestions.clear();
        self.validation_errors.remove(&Field::Institution);
        true
    }

    /// Accepts the current institution text as typed.
    pub fn request_manual_entry(&mut self) {
        self.fields.is_manual_institution_entry = true;
        self.manual_entry_offered = false;
        self.suggestions.clear();
    }

    /// Sets a non-search field and clears its validation error.
    ///
    /// Returns `false` for fields that have their own operations
    /// (institution text and the manual-entry flag).
    pub fn set_field(&mut self, field: Field, value: String) -> bool {
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::FieldOfStudy => self.fields.field_of_study = value,
            Field::DegreeLevel => self.fields.degree_level = DegreeLevel::parse(&value),
            Field::RequestedAmount => self.fields.requested_amount = value,
            Field::Country => self.fields.country = value,
            Field::Institution | Field::ManualInstitutionEntry => return false,
        }
        self.validation_errors.remove(&field);
        true
    }

    /// Sets the degree level directly.
    pub fn set_degree(&mut self, degree: Option<DegreeLevel>) {
        self.fields.degree_level = degree;
        self.validation_errors.remove(&Field::DegreeLevel);
    }

    /// Validates every required field. Empty iff the form may be submitted.
    pub fn validate(&self) -> BTreeMap<Field, String> {
        let mut errors = BTreeMap::new();
        for &field in Field::required_for_application() {
            let value = self.fields.value(field);
            let result = match field {
                Field::Email => validate_email(value),
                Field::RequestedAmount => validate_amount(value, self.minimum_amount).map(drop),
                _ => validate_required(field, value),
            };
            if let Err(e) = result {
                errors.insert(field, e.to_string());
            }
        }
        errors
    }

    /// Validates and, if clean, moves to `Submitting` and returns the payload.
    pub fn begin_submit(&mut self) -> Result<StudentApplication, FormError> {
        self.submission.check_ready()?;
        let errors = self.validate();
        let f = &self.fields;
        let degree = match (errors.is_empty(), f.degree_level) {
            (true, Some(degree)) => degree,
            _ => {
                let count = errors.len();
                self.validation_errors = errors;
                return Err(FormError::ValidationFailed(count));
            }
        };
        let application = StudentApplication {
            name: f.name.trim().to_string(),
            email: f.email.trim().to_string(),
            university: f.institution.trim().to_string(),
            field_of_study: f.field_of_study.trim().to_string(),
            degree,
            funds_requested: f.requested_amount.trim().to_string(),
            country: f.country.clone(),
            is_manual_institution_entry: f.is_manual_institution_entry,
        };
        self.validation_errors.clear();
        self.submission = SubmissionStatus::Submitting;
        Ok(application)
    }

    /// Records the outcome of the in-flight submission.
    pub fn finish_submit(&mut self, result: Result<(), String>) {
        self.submission.finish(result);
    }
}

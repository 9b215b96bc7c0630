use serde::{Deserialize, Serialize};

use super::degree::DegreeLevel;

/// Payload posted to the student application endpoint.
///
/// Field names follow the endpoint's JSON contract (`university`, `degree`,
/// `fundsRequested`), which predates the form's own naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentApplication {
    pub name: String,
    pub email: String,
    /// Selected institution name, or the literal text under manual entry.
    pub university: String,
    pub field_of_study: String,
    pub degree: DegreeLevel,
    /// Requested amount in USD, as entered.
    pub funds_requested: String,
    pub country: String,
    pub is_manual_institution_entry: bool,
}

/// Payload posted to the donor waitlist endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorSignup {
    pub name: String,
    pub email: String,
}

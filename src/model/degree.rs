use std::fmt;

use serde::{Deserialize, Serialize};

/// Degree level a student is applying to fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    Bachelor,
    Master,
    Phd,
    Associate,
    Certificate,
}

static ALL_DEGREES: &[DegreeLevel] = &[
    DegreeLevel::Bachelor,
    DegreeLevel::Master,
    DegreeLevel::Phd,
    DegreeLevel::Associate,
    DegreeLevel::Certificate,
];

impl DegreeLevel {
    /// Returns the wire value sent to the application endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Master => "master",
            DegreeLevel::Phd => "phd",
            DegreeLevel::Associate => "associate",
            DegreeLevel::Certificate => "certificate",
        }
    }

    /// Returns the label shown in the degree selector.
    pub fn label(&self) -> &'static str {
        match self {
            DegreeLevel::Bachelor => "Bachelor's Degree",
            DegreeLevel::Master => "Master's Degree",
            DegreeLevel::Phd => "PhD",
            DegreeLevel::Associate => "Associate Degree",
            DegreeLevel::Certificate => "Certificate Program",
        }
    }

    /// Parses a wire value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        ALL_DEGREES
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Returns all degree levels in selector order.
    pub fn all() -> &'static [DegreeLevel] {
        ALL_DEGREES
    }
}

#[mutants::skip]
impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

use std::fmt;

/// Names the fields of the application forms.
///
/// Variant order is form order, so a `BTreeMap<Field, _>` iterates errors
/// top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Institution,
    FieldOfStudy,
    DegreeLevel,
    RequestedAmount,
    Country,
    ManualInstitutionEntry,
}

impl Field {
    /// Returns the label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Institution => "University",
            Self::FieldOfStudy => "Field of Study",
            Self::DegreeLevel => "Degree Level",
            Self::RequestedAmount => "Funds Requested (USD)",
            Self::Country => "Country",
            Self::ManualInstitutionEntry => "Manual University Entry",
        }
    }

    /// Fields that must be non-empty before the student form can be submitted.
    pub fn required_for_application() -> &'static [Field] {
        &[
            Self::Name,
            Self::Email,
            Self::Institution,
            Self::FieldOfStudy,
            Self::DegreeLevel,
            Self::RequestedAmount,
        ]
    }
}

#[mutants::skip]
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

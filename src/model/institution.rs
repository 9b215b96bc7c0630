use serde::{Deserialize, Serialize};

/// An institution record as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// One entry in the autocomplete list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Stable identifier from the directory.
    pub id: String,
    /// Text written into the institution field when the suggestion is picked.
    pub display_name: String,
    /// Locality shown next to the name, e.g. `Stanford, CA`.
    pub secondary_label: String,
}

impl From<Institution> for Suggestion {
    fn from(inst: Institution) -> Self {
        let secondary_label = [inst.city.trim(), inst.state.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: inst.id,
            display_name: inst.name,
            secondary_label,
        }
    }
}

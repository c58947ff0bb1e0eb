use serde::{Deserialize, Serialize};

/// One of the two persisted snapshots of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Editable snapshot
    Draft,
    /// Published snapshot
    Live,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Draft => "draft",
            Stage::Live => "live",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from an element to whatever it hangs off
///
/// Exactly one parent reference is ever set, so the two cases are variants
/// rather than a pair of optional ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HolderRef {
    /// Top-level record (a page)
    Container(String),
    /// Another element
    Element(String),
}

impl HolderRef {
    pub fn id(&self) -> &str {
        match self {
            HolderRef::Container(id) | HolderRef::Element(id) => id,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, HolderRef::Container(_))
    }

    /// Split into `(container_id, parent_element_id)` column values
    pub fn as_columns(&self) -> (Option<&str>, Option<&str>) {
        match self {
            HolderRef::Container(id) => (Some(id.as_str()), None),
            HolderRef::Element(id) => (None, Some(id.as_str())),
        }
    }

    /// Rebuild from `(container_id, parent_element_id)` column values
    ///
    /// The element reference wins when both are set, matching the sort-scope
    /// rule that a parent element narrows the scope.
    pub fn from_columns(container_id: Option<String>, element_id: Option<String>) -> Option<Self> {
        match (container_id, element_id) {
            (_, Some(element_id)) => Some(HolderRef::Element(element_id)),
            (Some(container_id), None) => Some(HolderRef::Container(container_id)),
            (None, None) => None,
        }
    }
}

impl std::fmt::Display for HolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolderRef::Container(id) => write!(f, "container:{}", id),
            HolderRef::Element(id) => write!(f, "element:{}", id),
        }
    }
}

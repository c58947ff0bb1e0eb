use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::HolderRef;

/// Element - one typed content block
///
/// Elements hang off a container (page) or another element under a named
/// relation, and may own child elements of their own. Draft and live are two
/// snapshots of the same element keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Opaque unique identifier (UUID v7)
    pub id: String,

    /// Concrete element type, resolved through the relation registry
    pub type_tag: String,

    pub title: String,

    /// Slug, unique among elements of the same type; empty until first write
    pub url_segment: String,

    /// Configured relation this element belongs to on its holder
    pub relation_name: String,

    /// Hidden elements are listed in the CMS but never to visitors
    pub visible: bool,

    /// Position among siblings of the same holder; 0 means "not yet assigned"
    pub sort: u32,

    /// Container or parent element; `None` while unattached
    pub holder: Option<HolderRef>,

    /// Version of this snapshot; 0 until first persisted
    pub version: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Element {
    /// Create a transient element of the given type
    ///
    /// The id is generated up front; `url_segment` and `sort` are left unset
    /// and assigned on the first write.
    pub fn new(type_tag: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            type_tag: type_tag.into(),
            title: String::new(),
            url_segment: String::new(),
            relation_name: String::new(),
            visible: true,
            sort: 0,
            holder: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fill in the fields an editor would otherwise provide for a new block
    ///
    /// The title becomes `"<type label> title"`.
    pub fn populate(&mut self, type_label: &str, holder: HolderRef, relation_name: &str) {
        self.title = format!("{} title", type_label);
        self.holder = Some(holder);
        self.relation_name = relation_name.to_string();
    }

    /// Whether this element has never been written
    pub fn is_transient(&self) -> bool {
        self.version == 0
    }

    pub fn has_url_segment(&self) -> bool {
        !self.url_segment.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        self.sort != 0
    }

    /// Reference other elements use to hang off this one
    pub fn as_holder(&self) -> HolderRef {
        HolderRef::Element(self.id.clone())
    }
}

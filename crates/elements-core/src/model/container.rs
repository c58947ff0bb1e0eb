use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::HolderRef;

/// Container - a top-level record (page) owning element relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,

    /// Container type; keys the relation configuration
    pub type_name: String,

    pub title: String,

    /// Version of this snapshot; 0 until first persisted
    pub version: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Container {
    pub fn new(type_name: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            type_name: type_name.into(),
            title: title.into(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn as_holder(&self) -> HolderRef {
        HolderRef::Container(self.id.clone())
    }
}

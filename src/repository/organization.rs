use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant. The slug is derived once from the display name and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Organization {
    /// Builds a fresh organization with a new id and a slug taken from `name`.
    pub fn new(name: &str, now: i64) -> Self {
        let name = name.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            slug: slugify(name),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Lower-cases the name and replaces each space with a hyphen.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

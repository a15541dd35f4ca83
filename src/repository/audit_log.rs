use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only record of who did what to which resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<String>,
    pub created_at: i64,
}

impl AuditLog {
    pub fn new(action: &str, resource: &str, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: None,
            organization_id: None,
            action: action.to_owned(),
            resource: resource.to_owned(),
            resource_id: None,
            details: None,
            created_at: now,
        }
    }

    #[must_use]
    pub fn by(mut self, user_id: &str, organization_id: &str) -> Self {
        self.user_id = Some(user_id.to_owned());
        self.organization_id = Some(organization_id.to_owned());
        self
    }

    #[must_use]
    pub fn on(mut self, resource_id: &str) -> Self {
        self.resource_id = Some(resource_id.to_owned());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

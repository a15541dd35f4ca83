use serde::{Deserialize, Serialize};

use crate::roles::OrgRole;

/// Binds a user to an organization. Identified by the pair of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub organization_id: String,
    pub user_id: String,
    pub role: OrgRole,
    pub joined_at: i64,
    pub deleted_at: Option<i64>,
}

impl OrganizationMember {
    pub fn new(organization_id: &str, user_id: &str, role: OrgRole, now: i64) -> Self {
        Self {
            organization_id: organization_id.to_owned(),
            user_id: user_id.to_owned(),
            role,
            joined_at: now,
            deleted_at: None,
        }
    }
}

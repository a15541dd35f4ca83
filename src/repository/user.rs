use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::SystemRole;

/// A platform account bound to one owning organization.
///
/// `verification_token` and `refresh_token` hold SHA-256 digests of the values
/// handed to the user, never the raw tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub system_role: SystemRole,
    pub email_verified: bool,
    pub email_verified_at: Option<i64>,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<i64>,
    pub organization_id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl User {
    /// A new, unverified account with the default system role.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: String,
        organization_id: &str,
        verification_digest: String,
        now: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_owned(),
            email: email.to_owned(),
            password_hash,
            system_role: SystemRole::default(),
            email_verified: false,
            email_verified_at: None,
            verification_token: Some(verification_digest),
            refresh_token: None,
            refresh_token_expires_at: None,
            organization_id: organization_id.to_owned(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn mark_verified(&mut self, now: i64) {
        self.email_verified = true;
        self.email_verified_at = Some(now);
        self.verification_token = None;
        self.updated_at = now;
    }

    pub fn clear_refresh_token(&mut self, now: i64) {
        self.refresh_token = None;
        self.refresh_token_expires_at = None;
        self.updated_at = now;
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("system_role", &self.system_role)
            .field("email_verified", &self.email_verified)
            .field("organization_id", &self.organization_id)
            .field("deleted_at", &self.deleted_at)
            .finish_non_exhaustive()
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock(organization_id: &str) -> Self {
        Self::new(
            "Test User",
            "test@example.com",
            "fakehashedpassword".to_owned(),
            organization_id,
            "fakedigest".to_owned(),
            crate::now_millis(),
        )
    }
}

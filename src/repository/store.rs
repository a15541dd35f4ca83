use async_trait::async_trait;

use crate::AuthError;

use super::{AuditLog, Organization, OrganizationMember, Plan, Subscription, User};

/// Transactional persistence for every tenant entity.
///
/// A workflow opens exactly one transaction per call with [`begin`]. Work
/// done through the transaction becomes visible only after
/// [`AccountTransaction::commit`]. Dropping an uncommitted transaction rolls
/// everything back.
///
/// [`begin`]: AccountStore::begin
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    type Transaction: AccountTransaction;

    async fn begin(&self) -> Result<Self::Transaction, AuthError>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<(), AuthError>;
}

/// Operations available inside one transaction.
///
/// Lookups that say nothing else return live rows only (`deleted_at` unset).
/// The uniqueness counts are the exception: they count deleted rows too,
/// because the storage uniqueness constraints do.
#[async_trait]
pub trait AccountTransaction: Send {
    async fn count_organizations_by_slug(&mut self, slug: &str) -> Result<u64, AuthError>;
    async fn create_organization(&mut self, organization: &Organization) -> Result<(), AuthError>;
    async fn find_organization(&mut self, id: &str) -> Result<Option<Organization>, AuthError>;
    async fn update_organization(&mut self, organization: &Organization) -> Result<(), AuthError>;

    async fn count_users_by_email(&mut self, email: &str) -> Result<u64, AuthError>;
    async fn create_user(&mut self, user: &User) -> Result<(), AuthError>;
    async fn find_user_by_id(&mut self, id: &str) -> Result<Option<User>, AuthError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AuthError>;
    async fn find_user_by_refresh_token(&mut self, digest: &str)
    -> Result<Option<User>, AuthError>;
    async fn find_user_by_verification_token(
        &mut self,
        digest: &str,
    ) -> Result<Option<User>, AuthError>;
    /// Fails with [`AuthError::NotFound`] when no live row matches.
    async fn update_user(&mut self, user: &User) -> Result<(), AuthError>;

    async fn create_member(&mut self, member: &OrganizationMember) -> Result<(), AuthError>;
    async fn find_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>, AuthError>;
    async fn list_members(
        &mut self,
        organization_id: &str,
    ) -> Result<Vec<(OrganizationMember, User)>, AuthError>;
    /// Soft delete. Fails with [`AuthError::NotFound`] when no live row matches.
    async fn remove_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
        at: i64,
    ) -> Result<(), AuthError>;

    /// Active plans only.
    async fn find_plan_by_slug(&mut self, slug: &str) -> Result<Option<Plan>, AuthError>;
    /// Active plans only.
    async fn find_plan_by_id(&mut self, id: &str) -> Result<Option<Plan>, AuthError>;

    async fn create_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError>;
    async fn find_active_subscription(
        &mut self,
        organization_id: &str,
    ) -> Result<Option<Subscription>, AuthError>;
    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError>;

    async fn append_audit_log(&mut self, entry: &AuditLog) -> Result<(), AuthError>;

    async fn commit(self) -> Result<(), AuthError>;
}

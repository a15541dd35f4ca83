use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::AuthError;
use crate::repository::{
    AccountStore, AccountTransaction, AuditLog, Organization, OrganizationMember, Plan,
    Subscription, User,
};
use crate::roles::Role;

use super::records::{
    JOINED_USER_COLUMNS, MEMBER_COLUMNS, MemberRecord, MemberWithUserRecord, ORGANIZATION_COLUMNS,
    OrganizationRecord, PLAN_COLUMNS, PlanRecord, SUBSCRIPTION_COLUMNS, SubscriptionRecord,
    USER_COLUMNS, UserRecord,
};

fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AuthError {
    move |e| {
        log::error!(target: "tenantry_auth", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
        AuthError::DatabaseError(e.to_string())
    }
}

/// Maps a unique-constraint violation to `conflict`, anything else to a
/// database error.
fn insert_error(
    operation: &'static str,
    conflict: AuthError,
) -> impl FnOnce(sqlx::Error) -> AuthError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                log::debug!(target: "tenantry_auth", "msg=\"unique violation\", operation=\"{operation}\"");
                return conflict;
            }
        }
        db_error(operation)(e)
    }
}

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// `SQLite`-backed [`AccountStore`].
#[derive(Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    type Transaction = SqliteTransaction;

    async fn begin(&self) -> Result<SqliteTransaction, AuthError> {
        let tx = self.pool.begin().await.map_err(db_error("begin"))?;
        Ok(SqliteTransaction { tx })
    }

    async fn ping(&self) -> Result<(), AuthError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(db_error("ping"))
    }
}

/// One open `SQLite` transaction. Rolls back when dropped uncommitted.
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTransaction {
    async fn find_user_where(
        &mut self,
        column: &'static str,
        value: &str,
        operation: &'static str,
    ) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ? AND deleted_at IS NULL");
        let row: Option<UserRecord> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error(operation))?;

        row.map(User::try_from).transpose()
    }

    async fn find_plan_where(
        &mut self,
        column: &'static str,
        value: &str,
        operation: &'static str,
    ) -> Result<Option<Plan>, AuthError> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE {column} = ? AND is_active = 1");
        let row: Option<PlanRecord> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error(operation))?;

        row.map(Plan::try_from).transpose()
    }
}

#[async_trait]
impl AccountTransaction for SqliteTransaction {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn count_organizations_by_slug(&mut self, slug: &str) -> Result<u64, AuthError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations WHERE slug = ?")
            .bind(slug)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_error("count_organizations_by_slug"))?;
        Ok(count(n))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create_organization(&mut self, organization: &Organization) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO organizations (id, name, slug, created_at, updated_at, deleted_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&organization.id)
        .bind(&organization.name)
        .bind(&organization.slug)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .bind(organization.deleted_at)
        .execute(&mut *self.tx)
        .await
        .map_err(insert_error("create_organization", AuthError::SlugConflict))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_organization(&mut self, id: &str) -> Result<Option<Organization>, AuthError> {
        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = ? AND deleted_at IS NULL"
        );
        let row: Option<OrganizationRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("find_organization"))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn update_organization(&mut self, organization: &Organization) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE organizations SET name = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&organization.name)
        .bind(organization.updated_at)
        .bind(&organization.id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("update_organization"))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn count_users_by_email(&mut self, email: &str) -> Result<u64, AuthError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_error("count_users_by_email"))?;
        Ok(count(n))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create_user(&mut self, user: &User) -> Result<(), AuthError> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        sqlx::query(&sql)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.system_role.as_str())
            .bind(user.email_verified)
            .bind(user.email_verified_at)
            .bind(&user.verification_token)
            .bind(&user.refresh_token)
            .bind(user.refresh_token_expires_at)
            .bind(&user.organization_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.deleted_at)
            .execute(&mut *self.tx)
            .await
            .map_err(insert_error("create_user", AuthError::EmailConflict))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_id(&mut self, id: &str) -> Result<Option<User>, AuthError> {
        self.find_user_where("id", id, "find_user_by_id").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AuthError> {
        self.find_user_where("email", email, "find_user_by_email").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find_user_by_refresh_token(
        &mut self,
        digest: &str,
    ) -> Result<Option<User>, AuthError> {
        self.find_user_where("refresh_token", digest, "find_user_by_refresh_token")
            .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find_user_by_verification_token(
        &mut self,
        digest: &str,
    ) -> Result<Option<User>, AuthError> {
        self.find_user_where("verification_token", digest, "find_user_by_verification_token")
            .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn update_user(&mut self, user: &User) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, email = ?, password_hash = ?, system_role = ?, email_verified = ?, email_verified_at = ?, verification_token = ?, refresh_token = ?, refresh_token_expires_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.system_role.as_str())
        .bind(user.email_verified)
        .bind(user.email_verified_at)
        .bind(&user.verification_token)
        .bind(&user.refresh_token)
        .bind(user.refresh_token_expires_at)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&mut *self.tx)
        .await
        .map_err(insert_error("update_user", AuthError::EmailConflict))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create_member(&mut self, member: &OrganizationMember) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO organization_members (organization_id, user_id, role, joined_at, deleted_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&member.organization_id)
        .bind(&member.user_id)
        .bind(member.role.as_str())
        .bind(member.joined_at)
        .bind(member.deleted_at)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("create_member"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>, AuthError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM organization_members WHERE organization_id = ? AND user_id = ? AND deleted_at IS NULL"
        );
        let row: Option<MemberRecord> = sqlx::query_as(&sql)
            .bind(organization_id)
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("find_member"))?;

        row.map(OrganizationMember::try_from).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_members(
        &mut self,
        organization_id: &str,
    ) -> Result<Vec<(OrganizationMember, User)>, AuthError> {
        let sql = format!(
            "SELECT m.role AS member_role, m.joined_at AS member_joined_at, {JOINED_USER_COLUMNS} \
             FROM organization_members m \
             JOIN users u ON u.id = m.user_id \
             WHERE m.organization_id = ? AND m.deleted_at IS NULL AND u.deleted_at IS NULL \
             ORDER BY m.joined_at"
        );
        let rows: Vec<MemberWithUserRecord> = sqlx::query_as(&sql)
            .bind(organization_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("list_members"))?;

        rows.into_iter()
            .map(|row| row.into_pair(organization_id))
            .collect()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn remove_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
        at: i64,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE organization_members SET deleted_at = ? WHERE organization_id = ? AND user_id = ? AND deleted_at IS NULL",
        )
        .bind(at)
        .bind(organization_id)
        .bind(user_id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("remove_member"))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_plan_by_slug(&mut self, slug: &str) -> Result<Option<Plan>, AuthError> {
        self.find_plan_where("slug", slug, "find_plan_by_slug").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_plan_by_id(&mut self, id: &str) -> Result<Option<Plan>, AuthError> {
        self.find_plan_where("id", id, "find_plan_by_id").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError> {
        let sql = format!(
            "INSERT INTO subscriptions ({SUBSCRIPTION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        sqlx::query(&sql)
            .bind(&subscription.id)
            .bind(&subscription.organization_id)
            .bind(&subscription.plan_id)
            .bind(subscription.status.as_str())
            .bind(subscription.current_period_start)
            .bind(subscription.current_period_end)
            .bind(subscription.created_at)
            .bind(subscription.updated_at)
            .bind(subscription.deleted_at)
            .execute(&mut *self.tx)
            .await
            .map_err(db_error("create_subscription"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_active_subscription(
        &mut self,
        organization_id: &str,
    ) -> Result<Option<Subscription>, AuthError> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE organization_id = ? AND status = 'active' AND deleted_at IS NULL ORDER BY created_at DESC LIMIT 1"
        );
        let row: Option<SubscriptionRecord> = sqlx::query_as(&sql)
            .bind(organization_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("find_active_subscription"))?;

        row.map(Subscription::try_from).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE subscriptions SET plan_id = ?, status = ?, current_period_start = ?, current_period_end = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&subscription.plan_id)
        .bind(subscription.status.as_str())
        .bind(subscription.current_period_start)
        .bind(subscription.current_period_end)
        .bind(subscription.updated_at)
        .bind(&subscription.id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("update_subscription"))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn append_audit_log(&mut self, entry: &AuditLog) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, user_id, organization_id, action, resource, resource_id, details, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.organization_id)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("append_audit_log"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn commit(self) -> Result<(), AuthError> {
        self.tx.commit().await.map_err(db_error("commit"))
    }
}

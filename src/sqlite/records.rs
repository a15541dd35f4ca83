//! Row shapes as stored, and their conversion into domain types.
//!
//! Role and status strings go back through the same validation gate used at
//! the wire boundary. A stored value outside the taxonomy is an internal
//! error, never a silent default.

use sqlx::FromRow;

use crate::AuthError;
use crate::repository::{
    Organization, OrganizationMember, Plan, Subscription, SubscriptionStatus, User,
};
use crate::roles::{validate_org_role, validate_system_role};

pub(super) const ORGANIZATION_COLUMNS: &str = "id, name, slug, created_at, updated_at, deleted_at";

pub(super) const USER_COLUMNS: &str = "id, name, email, password_hash, system_role, email_verified, email_verified_at, verification_token, refresh_token, refresh_token_expires_at, organization_id, created_at, updated_at, deleted_at";

/// `USER_COLUMNS` qualified for joins against `organization_members`.
pub(super) const JOINED_USER_COLUMNS: &str = "u.id, u.name, u.email, u.password_hash, u.system_role, u.email_verified, u.email_verified_at, u.verification_token, u.refresh_token, u.refresh_token_expires_at, u.organization_id, u.created_at, u.updated_at, u.deleted_at";

pub(super) const MEMBER_COLUMNS: &str = "organization_id, user_id, role, joined_at, deleted_at";

pub(super) const PLAN_COLUMNS: &str =
    "id, name, slug, price, billing_period, features, limits, is_active, created_at, updated_at";

pub(super) const SUBSCRIPTION_COLUMNS: &str = "id, organization_id, plan_id, status, current_period_start, current_period_end, created_at, updated_at, deleted_at";

fn corrupt(what: &str, detail: impl std::fmt::Display) -> AuthError {
    log::error!(target: "tenantry_auth", "msg=\"corrupt row\", table=\"{what}\", error=\"{detail}\"");
    AuthError::Internal(format!("corrupt {what} row"))
}

#[derive(FromRow)]
pub(super) struct OrganizationRecord {
    id: String,
    name: String,
    slug: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl From<OrganizationRecord> for Organization {
    fn from(row: OrganizationRecord) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(FromRow)]
pub(super) struct UserRecord {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    system_role: String,
    email_verified: bool,
    email_verified_at: Option<i64>,
    verification_token: Option<String>,
    refresh_token: Option<String>,
    refresh_token_expires_at: Option<i64>,
    organization_id: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<UserRecord> for User {
    type Error = AuthError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        let system_role = validate_system_role(&row.system_role).map_err(|e| corrupt("users", e))?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            system_role,
            email_verified: row.email_verified,
            email_verified_at: row.email_verified_at,
            verification_token: row.verification_token,
            refresh_token: row.refresh_token,
            refresh_token_expires_at: row.refresh_token_expires_at,
            organization_id: row.organization_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(FromRow)]
pub(super) struct MemberRecord {
    organization_id: String,
    user_id: String,
    role: String,
    joined_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<MemberRecord> for OrganizationMember {
    type Error = AuthError;

    fn try_from(row: MemberRecord) -> Result<Self, Self::Error> {
        let role = validate_org_role(&row.role).map_err(|e| corrupt("organization_members", e))?;
        Ok(OrganizationMember {
            organization_id: row.organization_id,
            user_id: row.user_id,
            role,
            joined_at: row.joined_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// A live membership joined with its user.
#[derive(FromRow)]
pub(super) struct MemberWithUserRecord {
    member_role: String,
    member_joined_at: i64,
    #[sqlx(flatten)]
    user: UserRecord,
}

impl MemberWithUserRecord {
    pub(super) fn into_pair(
        self,
        organization_id: &str,
    ) -> Result<(OrganizationMember, User), AuthError> {
        let role =
            validate_org_role(&self.member_role).map_err(|e| corrupt("organization_members", e))?;
        let user = User::try_from(self.user)?;
        let member = OrganizationMember {
            organization_id: organization_id.to_owned(),
            user_id: user.id.clone(),
            role,
            joined_at: self.member_joined_at,
            deleted_at: None,
        };
        Ok((member, user))
    }
}

#[derive(FromRow)]
pub(super) struct PlanRecord {
    id: String,
    name: String,
    slug: String,
    price: f64,
    billing_period: String,
    features: String,
    limits: String,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<PlanRecord> for Plan {
    type Error = AuthError;

    fn try_from(row: PlanRecord) -> Result<Self, Self::Error> {
        Ok(Plan {
            id: row.id,
            name: row.name,
            slug: row.slug,
            price: row.price,
            billing_period: row.billing_period,
            features: serde_json::from_str(&row.features).map_err(|e| corrupt("plans", e))?,
            limits: serde_json::from_str(&row.limits).map_err(|e| corrupt("plans", e))?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
pub(super) struct SubscriptionRecord {
    id: String,
    organization_id: String,
    plan_id: String,
    status: String,
    current_period_start: i64,
    current_period_end: i64,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = AuthError;

    fn try_from(row: SubscriptionRecord) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status)
            .ok_or_else(|| corrupt("subscriptions", format!("unknown status {}", row.status)))?;
        Ok(Subscription {
            id: row.id,
            organization_id: row.organization_id,
            plan_id: row.plan_id,
            status,
            current_period_start: row.current_period_start,
            current_period_end: row.current_period_end,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

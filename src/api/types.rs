use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{LoginOutcome, RefreshOutcome};
use crate::repository::{Organization, OrganizationMember, Plan, Subscription, User};
use crate::{AuthError, SecretString};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub organization_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrganizationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeSubscriptionRequest {
    pub plan_id: String,
}

// Response DTOs

/// Public view of a user. Credentials and token digests never leave the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub organization_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub organization: OrganizationResponse,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_in: i64,
    pub token_type: String,
    pub user: UserResponse,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: SecretString,
    pub expires_in: i64,
    pub token_type: String,
}

impl std::fmt::Debug for RefreshTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub role: String,
    pub joined_at: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub billing_period: String,
    pub features: Value,
    pub limits: Value,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub organization_id: String,
    pub plan: PlanResponse,
    pub status: String,
    pub current_period_start: i64,
    pub current_period_end: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            organization_id: user.organization_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<Organization> for OrganizationResponse {
    fn from(organization: Organization) -> Self {
        OrganizationResponse {
            id: organization.id,
            name: organization.name,
            slug: organization.slug,
            created_at: organization.created_at,
            updated_at: organization.updated_at,
        }
    }
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        LoginResponse {
            access_token: outcome.access_token,
            refresh_token: outcome.refresh_token,
            expires_in: outcome.expires_in,
            token_type: outcome.token_type.to_owned(),
            user: outcome.user.into(),
        }
    }
}

impl From<RefreshOutcome> for RefreshTokenResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        RefreshTokenResponse {
            access_token: outcome.access_token,
            expires_in: outcome.expires_in,
            token_type: outcome.token_type.to_owned(),
        }
    }
}

impl From<(OrganizationMember, User)> for MemberResponse {
    fn from((member, user): (OrganizationMember, User)) -> Self {
        MemberResponse {
            user_id: member.user_id,
            role: member.role.to_string(),
            joined_at: member.joined_at,
            user: user.into(),
        }
    }
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        PlanResponse {
            id: plan.id,
            name: plan.name,
            slug: plan.slug,
            price: plan.price,
            billing_period: plan.billing_period,
            features: plan.features,
            limits: plan.limits,
            is_active: plan.is_active,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

impl From<(Subscription, Plan)> for SubscriptionResponse {
    fn from((subscription, plan): (Subscription, Plan)) -> Self {
        SubscriptionResponse {
            id: subscription.id,
            organization_id: subscription.organization_id,
            plan: plan.into(),
            status: subscription.status.to_string(),
            current_period_start: subscription.current_period_start,
            current_period_end: subscription.current_period_end,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::EmailConflict => "EMAIL_CONFLICT",
            AuthError::SlugConflict => "SLUG_CONFLICT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            AuthError::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::DefaultPlanMissing
            | AuthError::PasswordHashError
            | AuthError::DatabaseError(_)
            | AuthError::ConfigurationError(_)
            | AuthError::Internal(_) => "INTERNAL_ERROR",
        };

        // internal detail stays in the logs
        let error = if err.is_internal() {
            "Internal server error".to_owned()
        } else {
            err.to_string()
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}

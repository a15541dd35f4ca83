/// Domain events emitted by the workflows after their transaction commits.
///
/// Timestamps are epoch milliseconds. Events carry identifiers and emails,
/// never credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    // tenant lifecycle
    OrganizationProvisioned {
        organization_id: String,
        user_id: String,
        email: String,
        at: i64,
    },
    OrganizationUpdated {
        organization_id: String,
        user_id: String,
        at: i64,
    },
    MemberRemoved {
        organization_id: String,
        user_id: String,
        removed_by: String,
        at: i64,
    },

    // authentication
    LoginSuccess {
        user_id: String,
        email: String,
        at: i64,
    },
    LoginFailed {
        email: String,
        reason: String,
        at: i64,
    },
    LogoutSuccess {
        user_id: String,
        at: i64,
    },
    TokenRefreshed {
        user_id: String,
        at: i64,
    },

    // account
    ProfileUpdated {
        user_id: String,
        at: i64,
    },
    EmailVerificationSent {
        user_id: String,
        email: String,
        at: i64,
    },
    EmailVerified {
        user_id: String,
        at: i64,
    },

    // billing
    SubscriptionUpgraded {
        organization_id: String,
        plan_id: String,
        at: i64,
    },
    SubscriptionCancelled {
        organization_id: String,
        at: i64,
    },
}

impl AuthEvent {
    /// Dot-separated event name for logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrganizationProvisioned { .. } => "organization.provisioned",
            Self::OrganizationUpdated { .. } => "organization.updated",
            Self::MemberRemoved { .. } => "organization.member_removed",
            Self::LoginSuccess { .. } => "auth.login.success",
            Self::LoginFailed { .. } => "auth.login.failed",
            Self::LogoutSuccess { .. } => "auth.logout.success",
            Self::TokenRefreshed { .. } => "auth.token.refreshed",
            Self::ProfileUpdated { .. } => "user.profile_updated",
            Self::EmailVerificationSent { .. } => "auth.email.verification_sent",
            Self::EmailVerified { .. } => "auth.email.verified",
            Self::SubscriptionUpgraded { .. } => "subscription.upgraded",
            Self::SubscriptionCancelled { .. } => "subscription.cancelled",
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::OrganizationProvisioned { at, .. }
            | Self::OrganizationUpdated { at, .. }
            | Self::MemberRemoved { at, .. }
            | Self::LoginSuccess { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LogoutSuccess { at, .. }
            | Self::TokenRefreshed { at, .. }
            | Self::ProfileUpdated { at, .. }
            | Self::EmailVerificationSent { at, .. }
            | Self::EmailVerified { at, .. }
            | Self::SubscriptionUpgraded { at, .. }
            | Self::SubscriptionCancelled { at, .. } => *at,
        }
    }
}

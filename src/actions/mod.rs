//! Workflow actions.
//!
//! Each action is a struct built with `new` and run with `execute`. An
//! execution opens one store transaction, validates before writing, and
//! commits once at the end. Any error drops the transaction, which rolls it
//! back. Events and notifications go out only after the commit.

mod get_user;
mod login;
mod logout;
mod organization;
mod refresh_token;
mod register;
mod resend_verification;
mod subscription;
mod update_user;
mod verify_email;
mod verify_token;

pub use get_user::GetUserAction;
pub use login::{LoginAction, LoginOutcome};
pub use logout::LogoutAction;
pub use organization::{
    GetOrganizationAction, ListMembersAction, RemoveMemberAction, UpdateOrganizationAction,
};
pub use refresh_token::{RefreshOutcome, RefreshTokenAction};
pub use register::{NewTenant, RegisterAction};
pub use resend_verification::{ResendStatus, ResendVerificationAction};
pub use subscription::{
    CancelSubscriptionAction, CurrentSubscriptionAction, UpgradeSubscriptionAction,
};
pub use update_user::{UpdateUserAction, UserChanges};
pub use verify_email::{VerificationStatus, VerifyEmailAction};
pub use verify_token::VerifyTokenAction;

use crate::jwt::AuthContext;
use crate::repository::{AccountTransaction, OrganizationMember};
use crate::AuthError;

/// Token type reported alongside every access token.
pub const TOKEN_TYPE: &str = "Bearer";

/// The caller's live membership in their own organization, if it grants
/// admin rights.
async fn require_admin<T: AccountTransaction>(
    tx: &mut T,
    caller: &AuthContext,
) -> Result<OrganizationMember, AuthError> {
    match tx.find_member(&caller.organization_id, &caller.user_id).await? {
        Some(member) if member.role.is_admin() => Ok(member),
        _ => {
            log::warn!(
                target: "tenantry_auth",
                "msg=\"admin required\", user_id=\"{}\", organization_id=\"{}\"",
                caller.user_id,
                caller.organization_id
            );
            Err(AuthError::Forbidden)
        }
    }
}

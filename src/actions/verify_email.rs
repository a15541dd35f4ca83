use crate::crypto::digest_token;
use crate::events::{AuthEvent, dispatch};
use crate::repository::{AccountStore, AccountTransaction};
use crate::validators::require;
use crate::{AuthError, now_millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    AlreadyVerified,
}

impl VerificationStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::Verified => "Email verified successfully",
            Self::AlreadyVerified => "Email already verified",
        }
    }
}

/// Consumes a verification token and marks its owner's email as verified.
///
/// A token works once. Verifying clears the stored digest, so presenting the
/// same token again fails with [`AuthError::InvalidVerificationToken`].
pub struct VerifyEmailAction<S> {
    store: S,
}

impl<S: AccountStore> VerifyEmailAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "verify_email", skip_all, err)
    )]
    pub async fn execute(&self, token: &str) -> Result<VerificationStatus, AuthError> {
        require("token", token)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;

        let Some(mut user) = tx.find_user_by_verification_token(&digest_token(token)).await? else {
            log::warn!(target: "tenantry_auth", "msg=\"email verification rejected\", reason=\"unknown_token\"");
            return Err(AuthError::InvalidVerificationToken);
        };

        if user.email_verified {
            return Ok(VerificationStatus::AlreadyVerified);
        }

        user.mark_verified(now);
        tx.update_user(&user).await?;
        tx.commit().await?;

        dispatch(AuthEvent::EmailVerified {
            user_id: user.id.clone(),
            at: now,
        })
        .await;

        log::info!(target: "tenantry_auth", "msg=\"email verified\", user_id=\"{}\"", user.id);

        Ok(VerificationStatus::Verified)
    }
}

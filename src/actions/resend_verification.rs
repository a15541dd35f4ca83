use crate::crypto::{digest_token, generate_verification_token};
use crate::events::{AuthEvent, dispatch};
use crate::notifier::{NotificationDispatcher, VerificationEmail};
use crate::repository::{AccountStore, AccountTransaction};
use crate::validators::validate_email;
use crate::{AuthError, now_millis};

/// Outcome of a resend request.
///
/// An unknown email and a successful resend report the same thing, so the
/// response never reveals whether an account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendStatus {
    LinkSent,
    AlreadyVerified,
}

impl ResendStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::LinkSent => "If the email exists, a verification link has been sent",
            Self::AlreadyVerified => "Email already verified",
        }
    }
}

/// Issues a fresh verification token and queues another email. The new token
/// replaces the previous one.
pub struct ResendVerificationAction<S> {
    store: S,
    dispatcher: NotificationDispatcher,
}

impl<S: AccountStore> ResendVerificationAction<S> {
    pub fn new(store: S, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resend_verification", skip_all, err)
    )]
    pub async fn execute(&self, email: &str) -> Result<ResendStatus, AuthError> {
        validate_email(email)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;

        let Some(mut user) = tx.find_user_by_email(email).await? else {
            log::debug!(target: "tenantry_auth", "msg=\"resend skipped\", reason=\"unknown_email\"");
            return Ok(ResendStatus::LinkSent);
        };

        if user.email_verified {
            return Ok(ResendStatus::AlreadyVerified);
        }

        let token = generate_verification_token();
        user.verification_token = Some(digest_token(&token));
        user.updated_at = now;
        tx.update_user(&user).await?;
        tx.commit().await?;

        self.dispatcher.dispatch(VerificationEmail {
            to: user.email.clone(),
            name: user.name.clone(),
            token: token.into(),
        });

        dispatch(AuthEvent::EmailVerificationSent {
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: now,
        })
        .await;

        Ok(ResendStatus::LinkSent)
    }
}

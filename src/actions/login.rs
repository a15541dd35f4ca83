use crate::crypto::{Argon2Hasher, PasswordHasher, digest_token, generate_refresh_token};
use crate::events::{AuthEvent, dispatch};
use crate::jwt::TokenSigner;
use crate::repository::{AccountStore, AccountTransaction, User};
use crate::validators::{require, validate_email};
use crate::{AuthError, SecretString, now_millis};

use super::TOKEN_TYPE;

/// Credentials issued by a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: &'static str,
    pub user: User,
}

/// Exchanges email and password for an access token and a refresh token.
///
/// An unknown email and a wrong password fail the same way. A user holds one
/// refresh token at a time, so logging in again invalidates the previous one.
pub struct LoginAction<S, H = Argon2Hasher> {
    store: S,
    hasher: H,
    signer: TokenSigner,
}

impl<S: AccountStore> LoginAction<S> {
    pub fn new(store: S, signer: TokenSigner) -> Self {
        Self {
            store,
            hasher: Argon2Hasher::default(),
            signer,
        }
    }
}

impl<S: AccountStore, H: PasswordHasher> LoginAction<S, H> {
    pub fn with_hasher<H2: PasswordHasher>(self, hasher: H2) -> LoginAction<S, H2> {
        LoginAction {
            store: self.store,
            hasher,
            signer: self.signer,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        validate_email(email)?;
        require("password", password)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;

        let Some(mut user) = tx.find_user_by_email(email).await? else {
            // Pay the same Argon2 cost as a real verification.
            let _ = self.hasher.hash(password);
            return Err(self.reject(email, "unknown_email", now).await);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(self.reject(email, "invalid_password", now).await);
        }

        let access_token = self
            .signer
            .issue(&user.id, &user.email, &user.organization_id)?;
        let refresh_token = generate_refresh_token();

        user.refresh_token = Some(digest_token(&refresh_token));
        user.refresh_token_expires_at = Some(now + self.signer.refresh_expiry().num_milliseconds());
        user.updated_at = now;
        tx.update_user(&user).await?;
        tx.commit().await?;

        dispatch(AuthEvent::LoginSuccess {
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: now,
        })
        .await;

        log::info!(target: "tenantry_auth", "msg=\"login success\", user_id=\"{}\"", user.id);

        Ok(LoginOutcome {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in: self.signer.access_expiry().num_seconds(),
            token_type: TOKEN_TYPE,
            user,
        })
    }

    /// The reason is only logged. Callers always see `InvalidCredentials`.
    async fn reject(&self, email: &str, reason: &str, now: i64) -> AuthError {
        log::warn!(target: "tenantry_auth", "msg=\"login failed\", reason=\"{reason}\"");
        dispatch(AuthEvent::LoginFailed {
            email: email.to_owned(),
            reason: reason.to_owned(),
            at: now,
        })
        .await;
        AuthError::InvalidCredentials
    }
}

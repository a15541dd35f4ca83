use crate::crypto::digest_token;
use crate::events::{AuthEvent, dispatch};
use crate::jwt::TokenSigner;
use crate::repository::{AccountStore, AccountTransaction};
use crate::validators::require;
use crate::{AuthError, SecretString, now_millis};

use super::TOKEN_TYPE;

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub access_token: SecretString,
    pub expires_in: i64,
    pub token_type: &'static str,
}

/// Exchanges a stored refresh token for a new access token.
///
/// The refresh token itself is not rotated; it stays valid until it expires,
/// the user logs out, or a new login replaces it.
pub struct RefreshTokenAction<S> {
    store: S,
    signer: TokenSigner,
}

impl<S: AccountStore> RefreshTokenAction<S> {
    pub fn new(store: S, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "refresh_token", skip_all, err)
    )]
    pub async fn execute(&self, refresh_token: &str) -> Result<RefreshOutcome, AuthError> {
        require("refresh_token", refresh_token)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;
        let user = tx
            .find_user_by_refresh_token(&digest_token(refresh_token))
            .await?
            .ok_or_else(|| {
                log::warn!(target: "tenantry_auth", "msg=\"refresh rejected\", reason=\"unknown_token\"");
                AuthError::InvalidRefreshToken
            })?;

        match user.refresh_token_expires_at {
            Some(expires_at) if expires_at >= now => {}
            _ => {
                log::warn!(target: "tenantry_auth", "msg=\"refresh rejected\", reason=\"expired\", user_id=\"{}\"", user.id);
                return Err(AuthError::RefreshTokenExpired);
            }
        }

        let access_token = self
            .signer
            .issue(&user.id, &user.email, &user.organization_id)?;

        dispatch(AuthEvent::TokenRefreshed {
            user_id: user.id.clone(),
            at: now,
        })
        .await;

        Ok(RefreshOutcome {
            access_token: access_token.into(),
            expires_in: self.signer.access_expiry().num_seconds(),
            token_type: TOKEN_TYPE,
        })
    }
}

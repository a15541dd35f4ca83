use crate::events::{AuthEvent, dispatch};
use crate::repository::{AccountStore, AccountTransaction};
use crate::{AuthError, now_millis};

/// Clears the caller's stored refresh token. Access tokens already issued stay
/// valid until they expire.
pub struct LogoutAction<S> {
    store: S,
}

impl<S: AccountStore> LogoutAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `user_id` comes from an already verified access token.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn execute(&self, user_id: &str) -> Result<(), AuthError> {
        let now = now_millis();
        let mut tx = self.store.begin().await?;

        let mut user = tx.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)?;
        user.clear_refresh_token(now);
        tx.update_user(&user).await?;
        tx.commit().await?;

        dispatch(AuthEvent::LogoutSuccess {
            user_id: user.id.clone(),
            at: now,
        })
        .await;

        log::info!(target: "tenantry_auth", "msg=\"logout success\", user_id=\"{}\"", user.id);

        Ok(())
    }
}

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::events::{AuthEvent, dispatch};
use crate::repository::{AccountStore, AccountTransaction, User};
use crate::validators::{validate_name, validate_password};
use crate::{AuthError, SecretString, now_millis};

/// Profile fields a user may change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password: Option<SecretString>,
}

/// Updates the caller's own profile. Email and roles are not editable here.
pub struct UpdateUserAction<S, H = Argon2Hasher> {
    store: S,
    hasher: H,
}

impl<S: AccountStore> UpdateUserAction<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            hasher: Argon2Hasher::default(),
        }
    }
}

impl<S: AccountStore, H: PasswordHasher> UpdateUserAction<S, H> {
    pub fn with_hasher<H2: PasswordHasher>(self, hasher: H2) -> UpdateUserAction<S, H2> {
        UpdateUserAction {
            store: self.store,
            hasher,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_user", skip_all, err)
    )]
    pub async fn execute(&self, user_id: &str, changes: &UserChanges) -> Result<User, AuthError> {
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        if let Some(password) = &changes.password {
            validate_password(password.expose_secret())?;
        }

        let now = now_millis();
        let mut tx = self.store.begin().await?;
        let mut user = tx.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)?;

        if let Some(name) = &changes.name {
            user.name = name.trim().to_owned();
        }
        if let Some(password) = &changes.password {
            user.password_hash = self.hasher.hash(password.expose_secret())?;
        }
        user.updated_at = now;

        tx.update_user(&user).await?;
        tx.commit().await?;

        dispatch(AuthEvent::ProfileUpdated {
            user_id: user.id.clone(),
            at: now,
        })
        .await;

        Ok(user)
    }
}

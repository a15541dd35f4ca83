use crate::repository::{AccountStore, AccountTransaction, User};
use crate::AuthError;

/// Loads a live user by id.
pub struct GetUserAction<S> {
    store: S,
}

impl<S: AccountStore> GetUserAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn execute(&self, user_id: &str) -> Result<User, AuthError> {
        let mut tx = self.store.begin().await?;
        tx.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)
    }
}

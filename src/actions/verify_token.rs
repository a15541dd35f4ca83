use crate::AuthError;
use crate::jwt::{AuthContext, TokenSigner};

/// Authenticates a request from its bearer token. Never touches the store.
#[derive(Clone)]
pub struct VerifyTokenAction {
    signer: TokenSigner,
}

impl VerifyTokenAction {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    /// Accepts either a bare token or a full `Bearer <token>` header value.
    pub fn execute(&self, token: &str) -> Result<AuthContext, AuthError> {
        let token = token.trim();
        let token = token
            .strip_prefix("Bearer ")
            .or_else(|| token.strip_prefix("bearer "))
            .unwrap_or(token)
            .trim();

        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        self.signer.verify(token)
    }
}

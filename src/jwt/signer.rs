use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AccessClaims, AuthContext, JwtConfig};
use crate::AuthError;

/// Issues and verifies HS256 access tokens.
///
/// Verification never touches storage or shared mutable state, so a single
/// signer can be shared across any number of tasks.
#[derive(Clone)]
pub struct TokenSigner {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.expose_secret().as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Signs an access token for the given identity.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        organization_id: &str,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            organization_id: organization_id.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.config.access_expiry()).timestamp(),
            iss: self.config.issuer.clone(),
        };

        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(
            |e| {
                log::error!(target: "tenantry_auth", "msg=\"token signing failed\", error=\"{e}\"");
                AuthError::Internal("token signing failed".to_owned())
            },
        )
    }

    /// Checks signature and expiry. Every failure is `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;
        if let Some(ref iss) = self.config.issuer {
            validation.set_issuer(&[iss]);
        }

        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.into())
            .map_err(|e| {
                log::debug!(target: "tenantry_auth", "msg=\"access token rejected\", reason=\"{:?}\"", e.kind());
                AuthError::Unauthenticated
            })
    }

    pub fn access_expiry(&self) -> Duration {
        self.config.access_expiry()
    }

    pub fn refresh_expiry(&self) -> Duration {
        self.config.refresh_expiry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(JwtConfig::new("test-secret-32-bytes-long-key-01").unwrap())
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let token = signer.issue("user-1", "jane@x.com", "org-1").unwrap();
        let ctx = signer.verify(&token).unwrap();

        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.email, "jane@x.com");
        assert_eq!(ctx.organization_id, "org-1");
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let now = Utc::now().timestamp();
        let token = signer
            .encode(&AccessClaims {
                user_id: "user-1".into(),
                email: "jane@x.com".into(),
                organization_id: "org-1".into(),
                iat: now - 7200,
                exp: now - 3600,
                iss: None,
            })
            .unwrap();

        assert_eq!(signer.verify(&token), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_token_expired_seconds_ago_rejected() {
        let signer = signer();
        let now = Utc::now().timestamp();
        let token = signer
            .encode(&AccessClaims {
                user_id: "user-1".into(),
                email: "jane@x.com".into(),
                organization_id: "org-1".into(),
                iat: now - 65,
                exp: now - 5,
                iss: None,
            })
            .unwrap();

        assert_eq!(signer.verify(&token), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = signer();
        let token = signer.issue("user-1", "jane@x.com", "org-1").unwrap();
        let forged = signer.issue("user-2", "eve@x.com", "org-2").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(signer.verify(&tampered), Err(AuthError::Unauthenticated));
        assert_eq!(signer.verify("not-a-jwt"), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_other_secret_rejected() {
        let other = TokenSigner::new(JwtConfig::new("another-secret-32-bytes-long-key").unwrap());
        let token = other.issue("user-1", "jane@x.com", "org-1").unwrap();

        assert_eq!(signer().verify(&token), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_issuer_enforced() {
        let config = JwtConfig::new("test-secret-32-bytes-long-key-01").unwrap();
        let with_issuer = TokenSigner::new(config.clone().with_issuer("tenantry"));
        let token = signer().issue("user-1", "jane@x.com", "org-1").unwrap();

        assert_eq!(with_issuer.verify(&token), Err(AuthError::Unauthenticated));
        let token = with_issuer.issue("user-1", "jane@x.com", "org-1").unwrap();
        assert!(with_issuer.verify(&token).is_ok());
    }
}

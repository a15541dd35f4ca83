use serde::{Deserialize, Serialize};

/// Claims carried by an access token. `iat` and `exp` are epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: String,
    pub email: String,
    pub organization_id: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Identity recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub organization_id: String,
}

impl From<AccessClaims> for AuthContext {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            organization_id: claims.organization_id,
        }
    }
}

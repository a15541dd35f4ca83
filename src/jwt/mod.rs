//! Signed access tokens.
//!
//! ```rust
//! use tenantry::jwt::{JwtConfig, TokenSigner};
//!
//! let config = JwtConfig::new("a-secret-that-is-at-least-32-bytes!")
//!     .unwrap()
//!     .with_access_expiry(chrono::Duration::minutes(15));
//! let signer = TokenSigner::new(config);
//!
//! let token = signer.issue("user-1", "jane@x.com", "org-1").unwrap();
//! let ctx = signer.verify(&token).unwrap();
//! assert_eq!(ctx.organization_id, "org-1");
//! ```

mod claims;
mod config;
mod signer;

pub use claims::{AccessClaims, AuthContext};
pub use config::{JwtConfig, MIN_SECRET_LENGTH};
pub use signer::TokenSigner;

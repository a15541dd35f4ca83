//! Password hashing and opaque token primitives.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::AuthError;

/// Random bytes behind every verification token.
pub const VERIFICATION_TOKEN_BYTES: usize = 32;

/// One-way salted password hashing.
///
/// `verify` reports a mismatch as `Ok(false)`. Only a stored hash that cannot
/// be parsed is an error.
///
/// ```rust
/// use tenantry::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("pw123456").unwrap();
/// assert!(hasher.verify("pw123456", &hash).unwrap());
/// assert!(!hasher.verify("pw654321", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Argon2id with a per-hash random salt. Cost parameters are embedded in the
/// PHC string, so verification keeps working after the costs change.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// 64 MiB, 3 passes, 4 lanes.
    #[must_use]
    pub fn production() -> Self {
        Self::new(65536, 3, 4)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|_| AuthError::PasswordHashError)?;
        let salt = SaltString::generate(&mut OsRng);

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Single-use email verification token: 32 bytes from the OS RNG, hex encoded.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Opaque refresh token handed to the client at login.
pub fn generate_refresh_token() -> String {
    Uuid::new_v4().to_string()
}

/// SHA-256 hex digest used to store and look up opaque tokens.
/// Tokens are high-entropy, so a fast hash is enough here.
pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

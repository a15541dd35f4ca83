//! Redacting wrapper for passwords, tokens and signing keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string that never shows up in `Debug` or `Display` output.
///
/// Request bodies deserialize straight into it and token responses serialize
/// the raw value, so the only way to read it in code is [`expose_secret`].
///
/// ```rust
/// use tenantry::SecretString;
///
/// let refresh = SecretString::new("6f1c0d2e");
/// assert_eq!(format!("{refresh:?}"), "SecretString([REDACTED])");
/// assert_eq!(refresh.expose_secret(), "6f1c0d2e");
/// ```
///
/// [`expose_secret`]: SecretString::expose_secret
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Character count, which is what the length validators compare against.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

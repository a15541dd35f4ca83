//! Input validation that runs before any persistence.

pub mod email;
pub mod name;
pub mod password;

pub use email::validate_email;
pub use name::{validate_name, validate_organization_name};
pub use password::validate_password;

use thiserror::Error;

pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_ORGANIZATION_NAME_LENGTH: usize = 200;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    EmailEmpty,
    #[error("Email is too long (max 255 characters)")]
    EmailTooLong,
    #[error("Invalid email format")]
    EmailInvalidFormat,
    #[error("Password cannot be empty")]
    PasswordEmpty,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password is too long (max 100 characters)")]
    PasswordTooLong,
    #[error("Name cannot be empty")]
    NameEmpty,
    #[error("Name is too long (max 100 characters)")]
    NameTooLong,
    #[error("Organization name cannot be empty")]
    OrganizationNameEmpty,
    #[error("Organization name is too long (max 200 characters)")]
    OrganizationNameTooLong,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Invalid system role: {0}")]
    InvalidSystemRole(String),
    #[error("Invalid organization role: {0}")]
    InvalidOrganizationRole(String),
    #[error("Invalid request body")]
    MalformedBody,
}

/// Rejects a blank value for a required field.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("token", "abc").is_ok());
        assert_eq!(require("token", "  ").unwrap_err(), ValidationError::Required("token"));
        assert_eq!(
            ValidationError::Required("refresh_token").to_string(),
            "refresh_token is required"
        );
    }
}

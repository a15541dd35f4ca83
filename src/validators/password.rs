use super::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, ValidationError};

/// Length bounds only. Composition rules are left to the caller's UI.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();

    if length == 0 {
        return Err(ValidationError::PasswordEmpty);
    }

    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}

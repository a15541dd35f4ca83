use std::sync::LazyLock;

use regex::Regex;

use super::{MAX_EMAIL_LENGTH, ValidationError};

#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

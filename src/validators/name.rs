use super::{MAX_NAME_LENGTH, MAX_ORGANIZATION_NAME_LENGTH, ValidationError};

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::NameEmpty);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    Ok(())
}

pub fn validate_organization_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::OrganizationNameEmpty);
    }

    if trimmed.chars().count() > MAX_ORGANIZATION_NAME_LENGTH {
        return Err(ValidationError::OrganizationNameTooLong);
    }

    Ok(())
}

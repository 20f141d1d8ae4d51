//! Field checks applied to request bodies before they reach the services.

use crate::domain::error::DomainError;
use crate::domain::payment::CreatePayment;
use crate::domain::user::{CreateUser, LoginRequest};

const MAX_NAME_LENGTH: usize = 100;
const MAX_PASSWORD_LENGTH: usize = 128;

pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

pub fn validate_required(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

pub fn validate_length(value: &str, max: usize, field: &str) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::Validation(format!("Invalid email: {}", value));

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if domain.contains('@') {
        return Err(invalid());
    }

    if local.is_empty() || local.len() > 64 {
        return Err(invalid());
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(invalid());
    }

    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return Err(invalid());
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(invalid());
    }

    Ok(())
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), DomainError> {
        validate_email(&self.email)?;
        validate_required(&self.first_name, "firstName")?;
        validate_length(&self.first_name, MAX_NAME_LENGTH, "firstName")?;
        validate_required(&self.last_name, "lastName")?;
        validate_length(&self.last_name, MAX_NAME_LENGTH, "lastName")?;
        validate_required(&self.password, "password")?;
        validate_length(&self.password, MAX_PASSWORD_LENGTH, "password")
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), DomainError> {
        validate_required(&self.email, "email")?;
        validate_required(&self.password, "password")
    }
}

impl Validate for CreatePayment {
    fn validate(&self) -> Result<(), DomainError> {
        if self.user_id == 0 {
            return Err(DomainError::Validation("userId must be positive".to_string()));
        }
        if self.cost.inner() == 0 {
            return Err(DomainError::Validation("cost must be positive".to_string()));
        }
        Ok(())
    }
}

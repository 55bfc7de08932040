use crate::constants::{ERR_INVALID_EMAIL, MIN_PASSWORD_LEN};
use crate::error::{AppError, Result};

/// Reject empty or whitespace-only values
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Minimal email shape check: one '@' with a dotted domain, no whitespace
pub fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Reject zero or negative numeric fields
pub fn validate_positive(field: &str, value: f64) -> Result<()> {
    if value <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "{} must be positive",
            field
        )));
    }
    Ok(())
}

/// Validate an optional numeric field against an inclusive range
pub fn validate_range(field: &str, value: Option<f64>, min: f64, max: f64) -> Result<()> {
    if let Some(v) = value {
        if v < min || v > max {
            return Err(AppError::InvalidInput(format!(
                "{} must be between {} and {}",
                field, min, max
            )));
        }
    }
    Ok(())
}

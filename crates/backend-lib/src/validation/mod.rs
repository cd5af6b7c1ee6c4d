// ============================
// sabha-backend-lib/src/validation/mod.rs
// ============================
//! Input validation module.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid user type: {0}")]
    InvalidUserType(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(
            "email must be between 1 and 254 characters".to_string(),
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "email format is invalid".to_string(),
        ));
    }
    Ok(email)
}

/// Validate a sign-up password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(password)
}

/// Validate an account type
pub fn validate_user_type(user_type: &str) -> ValidationResult<&str> {
    // "1" is a legacy listing type still present in stored data
    match user_type {
        "user" | "merchant" | "admin" | "1" => Ok(user_type),
        other => Err(ValidationError::InvalidUserType(other.to_string())),
    }
}

/// Validate an uploaded/requested file name; rejects path traversal.
pub fn validate_file_name(name: &str) -> ValidationResult<&str> {
    if name.is_empty()
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(ValidationError::InvalidFileName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("u.ser+tag@sub.example.co.in").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_user_type() {
        assert!(validate_user_type("merchant").is_ok());
        assert!(validate_user_type("user").is_ok());
        assert!(validate_user_type("1").is_ok());
        assert!(validate_user_type("superadmin").is_err());
    }

    #[test]
    fn test_validate_file_name_rejects_traversal() {
        assert!(validate_file_name("photo.png").is_ok());
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("a/b.png").is_err());
        assert!(validate_file_name("").is_err());
    }
}

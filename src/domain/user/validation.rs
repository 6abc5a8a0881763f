//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("Full name cannot be empty")]
    EmptyFullName,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("The password must have an uppercase letter, a lowercase letter and a number or symbol")]
    WeakPassword,
}

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 50;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Validate an email address (after trimming)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), UserValidationError> {
    if full_name.trim().is_empty() {
        return Err(UserValidationError::EmptyFullName);
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - 6 to 50 characters
/// - at least one uppercase and one lowercase letter
/// - at least one digit or non-alphanumeric symbol
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit_or_symbol = password
        .chars()
        .any(|c| c.is_ascii_digit() || !(c.is_alphanumeric() || c == '_'));

    if !(has_upper && has_lower && has_digit_or_symbol) {
        return Err(UserValidationError::WeakPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("test1@google.com").is_ok());
        assert!(validate_email("  padded@mail.org ").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert!(matches!(
            validate_email("no-at-sign.com"),
            Err(UserValidationError::InvalidEmail(_))
        ));
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name("Test One").is_ok());
        assert_eq!(
            validate_full_name("   "),
            Err(UserValidationError::EmptyFullName)
        );
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("Abc123").is_ok());
        assert!(validate_password("Abcdef!").is_ok());
    }

    #[test]
    fn test_password_length_bounds() {
        assert_eq!(
            validate_password("Ab1"),
            Err(UserValidationError::PasswordTooShort(6))
        );
        let long = format!("Ab1{}", "x".repeat(48));
        assert_eq!(
            validate_password(&long),
            Err(UserValidationError::PasswordTooLong(50))
        );
    }

    #[test]
    fn test_weak_passwords() {
        assert_eq!(
            validate_password("abcdef1"),
            Err(UserValidationError::WeakPassword)
        );
        assert_eq!(
            validate_password("ABCDEF1"),
            Err(UserValidationError::WeakPassword)
        );
        assert_eq!(
            validate_password("Abcdefg"),
            Err(UserValidationError::WeakPassword)
        );
    }
}

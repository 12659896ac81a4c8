//! Registration input validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::value_objects::RegisterRequest;
use crate::errors::ValidationError;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Characters that satisfy the special-character rule
const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validator for registration requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationValidator;

impl RegistrationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that an email has the shape `local@domain.tld`
    pub fn validate_email(&self, email: &str) -> Result<(), ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            });
        }
        if !EMAIL_REGEX.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Check password strength
    ///
    /// At least 8 characters with a lowercase letter, an uppercase letter, a
    /// digit and one of `!@#$%^&*`.
    pub fn validate_password(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            });
        }

        let strong = password.chars().count() >= MIN_PASSWORD_LENGTH
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

        if strong {
            Ok(())
        } else {
            Err(ValidationError::WeakPassword)
        }
    }

    /// Validate a full registration request
    pub fn validate(&self, request: &RegisterRequest) -> Result<(), ValidationError> {
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)
    }
}

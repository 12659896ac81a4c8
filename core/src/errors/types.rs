//! Error types for authentication, token issuance and input validation

use thiserror::Error;

/// Authentication-related errors surfaced to the HTTP layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown identifier or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Too many login attempts. Please try again in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("User already exists")]
    UserAlreadyExists,

    /// Token failed verification for any reason (expired, tampered, revoked)
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Registration is disabled")]
    RegistrationDisabled,
}

impl AuthError {
    /// Whole minutes until a rate-limited client may retry, rounded up
    pub fn retry_after_minutes(&self) -> Option<u64> {
        match self {
            AuthError::RateLimited { retry_after_seconds } => {
                Some(retry_after_seconds.div_ceil(60))
            }
            _ => None,
        }
    }
}

/// Token issuance errors
///
/// Verification never returns these; a token that fails verification is
/// reported as absent so callers cannot tell the failure modes apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Missing required claim: {claim}")]
    MissingClaim { claim: String },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password does not meet strength requirements")]
    WeakPassword,
}

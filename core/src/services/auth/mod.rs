//! Authentication service module
//!
//! This module wires credential checks to the rest of the core:
//! - Registration with input validation and password hashing
//! - Rate-limited login issuing a token pair
//! - Refresh, logout and access-token authentication

mod config;
mod password;
mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use validation::RegistrationValidator;

//! Value objects representing immutable domain concepts.

pub mod auth_request;

// Re-export commonly used types
pub use auth_request::{LoginRequest, RegisterRequest};

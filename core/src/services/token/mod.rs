//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - HS256 access and refresh token issuance
//! - Verification against both the signature and the server-side record
//! - Best-effort revocation by deleting the record

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;

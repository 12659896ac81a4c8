//! Shared configuration and utilities for the Gatekeeper workspace
//!
//! This crate provides the pieces every other crate depends on:
//! - Configuration value objects and the layered loader
//! - Duration-string parsing for token lifetimes
//! - Client identifier construction for rate limiting

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthenticationConfig, CacheConfig, ConfigError, Environment, JwtConfig,
    LogFormat, LoggingConfig, RateLimitConfig, SecurityConfig,
};
pub use utils::{client_identifier, parse_duration_seconds, DurationParseError};

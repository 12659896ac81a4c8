//! # Gatekeeper Core
//!
//! Core business logic for the Gatekeeper authentication backend.
//! This crate contains the cache contracts and in-memory store, cache key
//! derivation, token issuance and revocation, progressive rate limiting,
//! credential store contracts and the authentication flow built on them.

pub mod cache;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use cache::{
    CacheKeyGenerator, CacheService, CacheServiceExt, KeyArg, MemoryCacheService,
    Sha256KeyGenerator,
};
pub use domain::{Claims, LoginRequest, RegisterRequest, TokenKind, TokenPair, TokenRecord, UserRecord};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{CredentialStore, InMemoryCredentialStore};
pub use services::{
    AuthService, AuthServiceConfig, PasswordHasher, ProgressiveRateLimiter, RateLimitStatus,
    RateLimiterTrait, TokenService, TokenServiceConfig,
};

//! Business services containing domain logic and use cases.

pub mod auth;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, PasswordHasher, RegistrationValidator};
pub use rate_limit::{ProgressiveRateLimiter, RateLimitStatus, RateLimiterTrait};
pub use token::{TokenService, TokenServiceConfig};

//! Login throttling configuration module

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Security configuration section (`security.*`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Progressive rate limiting for credential checks
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Progressive rate limiting configuration (`security.rate_limit.*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Attempts allowed inside one window before a block is imposed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Length of the attempt-counting window in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,

    /// Base block duration in seconds, doubled for each prior violation
    #[serde(default = "default_block_duration_seconds")]
    pub block_duration_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_seconds: default_window_seconds(),
            block_duration_seconds: default_block_duration_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with explicit values
    pub fn new(max_attempts: u32, window_seconds: u64, block_duration_seconds: u64) -> Self {
        Self {
            max_attempts,
            window_seconds,
            block_duration_seconds,
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self::default()
    }

    /// Create a production configuration (stricter limits, longer blocks)
    pub fn production() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: default_window_seconds(),
            block_duration_seconds: 60 * 60,
        }
    }

    /// Pick the defaults matching an environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Staging => Self::development(),
        }
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_window_seconds() -> u64 {
    15 * 60
}

fn default_block_duration_seconds() -> u64 {
    15 * 60
}

//! Progressive rate limiting for credential checks
//!
//! Attempts are counted per identifier inside a sliding TTL window. Reaching
//! the limit imposes a block whose duration doubles with every prior
//! violation, up to 32 times the base duration.

mod limiter;

#[cfg(test)]
mod tests;

pub use limiter::{
    ProgressiveRateLimiter, RateLimitStatus, RateLimiterTrait, ATTEMPT_KEY_PREFIX,
    BLOCK_KEY_PREFIX, MAX_BLOCK_MULTIPLIER, VIOLATION_KEY_PREFIX, VIOLATION_TTL_SECONDS,
};

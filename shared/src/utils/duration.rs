//! Duration-string parsing for token lifetimes
//!
//! Accepts a non-negative integer followed by an optional unit:
//! `s` (seconds, also the default), `m`, `h`, `d` or `w`.
//! Examples: `"90"`, `"30s"`, `"15m"`, `"12h"`, `"7d"`, `"2w"`.

use thiserror::Error;

/// Errors produced while parsing a duration string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("Duration string is empty")]
    Empty,

    #[error("Invalid duration amount in '{0}'")]
    InvalidAmount(String),

    #[error("Unknown duration unit '{unit}' in '{input}'")]
    UnknownUnit { input: String, unit: String },

    #[error("Duration '{0}' overflows")]
    Overflow(String),
}

/// Parse a duration string into whole seconds
pub fn parse_duration_seconds(input: &str) -> Result<u64, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split_at = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(split_at);

    let amount: u64 = amount
        .parse()
        .map_err(|_| DurationParseError::InvalidAmount(input.to_string()))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 60 * 60,
        "d" | "day" | "days" => 24 * 60 * 60,
        "w" | "week" | "weeks" => 7 * 24 * 60 * 60,
        other => {
            return Err(DurationParseError::UnknownUnit {
                input: input.to_string(),
                unit: other.to_string(),
            })
        }
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| DurationParseError::Overflow(input.to_string()))
}

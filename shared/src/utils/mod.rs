//! Common utility functions

pub mod client;
pub mod duration;

// Re-export commonly used utilities
pub use client::client_identifier;
pub use duration::{parse_duration_seconds, DurationParseError};

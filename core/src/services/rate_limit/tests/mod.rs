//! Tests for the progressive rate limiter

//! Token entities for JWT-based authentication.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type reported alongside issued tokens
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Which of the two token families a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on every request
    Access,
    /// Long-lived token exchanged for new access tokens
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "access" => Ok(TokenKind::Access),
            "refresh" => Ok(TokenKind::Refresh),
            _ => Err(format!("Invalid token kind: {}", s)),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// JWT ID, the key of the token's server-side record
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Token kind
    pub typ: TokenKind,

    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Creates claims for a new token with a fresh token id
    ///
    /// # Arguments
    ///
    /// * `subject` - The subject the token is issued to
    /// * `kind` - Access or refresh
    /// * `issuer` - Value of the `iss` claim
    /// * `lifetime_seconds` - Seconds until the token expires
    pub fn new(subject: &str, kind: TokenKind, issuer: &str, lifetime_seconds: u64) -> Self {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime_seconds).unwrap_or(i64::MAX);

        Self {
            sub: subject.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now.saturating_add(lifetime),
            typ: kind,
            iss: issuer.to_string(),
        }
    }

    /// Parses the token id, if it is a valid UUID
    pub fn token_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.jti).ok()
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Server-side record that makes a signed token revocable
///
/// Stored in the cache for exactly the token's lifetime. A token verifies
/// only while its record exists and is marked valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: Uuid,
    pub subject_id: String,
    pub kind: TokenKind,
    pub valid: bool,
}

impl TokenRecord {
    /// Creates a valid record for a freshly issued token
    pub fn issued(token_id: Uuid, subject_id: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            token_id,
            subject_id: subject_id.into(),
            kind,
            valid: true,
        }
    }
}

/// Token pair returned after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: String,

    /// Access token expiry in seconds
    pub access_expires_in: u64,

    /// Refresh token expiry in seconds
    pub refresh_expires_in: u64,

    /// Always `Bearer`
    pub token_type: String,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: u64,
        refresh_expires_in: u64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}

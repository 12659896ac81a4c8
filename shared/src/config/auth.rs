//! Authentication and token configuration

use serde::{Deserialize, Serialize};

/// Authentication configuration section (`authentication.*`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthenticationConfig {
    /// JWT signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,
}

/// JWT signing configuration (`authentication.jwt.*`)
///
/// Secrets default to empty; the token service refuses to start without them.
/// Lifetimes are duration strings such as `"15m"` or `"7d"` and are parsed
/// once when the token service is constructed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HS256 secret for access tokens
    #[serde(default)]
    pub access_secret: String,

    /// HS256 secret for refresh tokens
    #[serde(default)]
    pub refresh_secret: String,

    /// Access token lifetime
    #[serde(default = "default_access_expires_in")]
    pub access_expires_in: String,

    /// Refresh token lifetime
    #[serde(default = "default_refresh_expires_in")]
    pub refresh_expires_in: String,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_expires_in: default_access_expires_in(),
            refresh_expires_in: default_refresh_expires_in(),
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Create a JWT configuration with both secrets set
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Override the access token lifetime
    pub fn with_access_expires_in(mut self, expires_in: impl Into<String>) -> Self {
        self.access_expires_in = expires_in.into();
        self
    }

    /// Override the refresh token lifetime
    pub fn with_refresh_expires_in(mut self, expires_in: impl Into<String>) -> Self {
        self.refresh_expires_in = expires_in.into();
        self
    }

    /// True when either signing secret is missing
    pub fn has_missing_secret(&self) -> bool {
        self.access_secret.trim().is_empty() || self.refresh_secret.trim().is_empty()
    }
}

fn default_access_expires_in() -> String {
    String::from("15m")
}

fn default_refresh_expires_in() -> String {
    String::from("7d")
}

fn default_issuer() -> String {
    String::from("gatekeeper")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_defaults() {
        let config = JwtConfig::default();
        assert_eq!(config.access_expires_in, "15m");
        assert_eq!(config.refresh_expires_in, "7d");
        assert!(config.has_missing_secret());
    }

    #[test]
    fn test_jwt_builder() {
        let config = JwtConfig::new("access", "refresh")
            .with_access_expires_in("5m")
            .with_refresh_expires_in("1d");
        assert!(!config.has_missing_secret());
        assert_eq!(config.access_expires_in, "5m");
        assert_eq!(config.refresh_expires_in, "1d");
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let config = JwtConfig::new("   ", "refresh");
        assert!(config.has_missing_secret());
    }
}

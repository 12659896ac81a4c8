//! Configuration for the token service

use gk_shared::{parse_duration_seconds, JwtConfig};

use crate::domain::entities::token::TokenKind;
use crate::errors::{DomainError, DomainResult};

/// Resolved token settings with lifetimes parsed to seconds
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 secret for access tokens
    pub access_secret: String,
    /// HS256 secret for refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_lifetime_seconds: u64,
    /// Refresh token lifetime in seconds
    pub refresh_lifetime_seconds: u64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl TokenServiceConfig {
    /// Validate a [`JwtConfig`] and parse its duration strings
    ///
    /// # Errors
    /// * `DomainError::Configuration` - A secret is blank, or a lifetime is
    ///   malformed or zero
    pub fn from_jwt_config(config: &JwtConfig) -> DomainResult<Self> {
        if config.access_secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT access secret must be configured"));
        }
        if config.refresh_secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT refresh secret must be configured"));
        }

        Ok(Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_lifetime_seconds: parse_lifetime("access_expires_in", &config.access_expires_in)?,
            refresh_lifetime_seconds: parse_lifetime(
                "refresh_expires_in",
                &config.refresh_expires_in,
            )?,
            issuer: config.issuer.clone(),
        })
    }

    /// Signing secret for a token kind
    pub fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }

    /// Lifetime in seconds for a token kind
    pub fn lifetime_seconds(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access_lifetime_seconds,
            TokenKind::Refresh => self.refresh_lifetime_seconds,
        }
    }
}

fn parse_lifetime(field: &str, value: &str) -> DomainResult<u64> {
    let seconds = parse_duration_seconds(value).map_err(|e| {
        DomainError::configuration(format!("Invalid authentication.jwt.{}: {}", field, e))
    })?;
    if seconds == 0 {
        return Err(DomainError::configuration(format!(
            "authentication.jwt.{} must be greater than zero",
            field
        )));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetimes_are_parsed() {
        let config = TokenServiceConfig::from_jwt_config(&JwtConfig::new("a", "r")).unwrap();
        assert_eq!(config.lifetime_seconds(TokenKind::Access), 15 * 60);
        assert_eq!(config.lifetime_seconds(TokenKind::Refresh), 7 * 24 * 60 * 60);
        assert_eq!(config.secret(TokenKind::Refresh), "r");
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let result = TokenServiceConfig::from_jwt_config(&JwtConfig::new("", "r"));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result = TokenServiceConfig::from_jwt_config(&JwtConfig::new("a", "  "));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_bad_lifetime_is_configuration_error() {
        let config = JwtConfig::new("a", "r").with_access_expires_in("soon");
        assert!(matches!(
            TokenServiceConfig::from_jwt_config(&config),
            Err(DomainError::Configuration { .. })
        ));

        let config = JwtConfig::new("a", "r").with_refresh_expires_in("0d");
        assert!(matches!(
            TokenServiceConfig::from_jwt_config(&config),
            Err(DomainError::Configuration { .. })
        ));
    }
}

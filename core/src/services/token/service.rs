//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use tracing::{debug, error, info};

use gk_shared::JwtConfig;

use crate::cache::{CacheKeyGenerator, CacheService, CacheServiceExt, KeyArg};
use crate::domain::entities::token::{Claims, TokenKind, TokenPair, TokenRecord};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};

use super::config::TokenServiceConfig;

/// Cache namespace holding token records
const TOKEN_NAMESPACE: &str = "token";

/// The only claim revocation needs
#[derive(Deserialize)]
struct TokenIdClaim {
    jti: String,
}

/// HS256 key material for one token kind
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Service issuing, verifying and revoking cache-tracked JWTs
///
/// Every issued token gets a [`TokenRecord`] in the cache that lives exactly
/// as long as the token. A token verifies only if its signature and expiry
/// check out and its record is still present, which is what makes
/// server-side revocation possible.
pub struct TokenService {
    cache: Arc<dyn CacheService>,
    key_generator: Arc<dyn CacheKeyGenerator>,
    config: TokenServiceConfig,
    access_keys: SigningKeys,
    refresh_keys: SigningKeys,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - JWT secrets, lifetimes and issuer
    /// * `cache` - Store for token records
    /// * `key_generator` - Derives the cache key of each record
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `DomainError::Configuration` when a secret is
    /// missing or a lifetime cannot be parsed
    pub fn new(
        config: &JwtConfig,
        cache: Arc<dyn CacheService>,
        key_generator: Arc<dyn CacheKeyGenerator>,
    ) -> DomainResult<Self> {
        let config = TokenServiceConfig::from_jwt_config(config)?;
        Ok(Self::with_config(config, cache, key_generator))
    }

    /// Creates a token service from already resolved settings
    pub fn with_config(
        config: TokenServiceConfig,
        cache: Arc<dyn CacheService>,
        key_generator: Arc<dyn CacheKeyGenerator>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            cache,
            key_generator,
            access_keys: SigningKeys::from_secret(&config.access_secret),
            refresh_keys: SigningKeys::from_secret(&config.refresh_secret),
            config,
            validation,
        }
    }

    /// Lifetime in seconds of tokens of the given kind
    pub fn lifetime_seconds(&self, kind: TokenKind) -> u64 {
        self.config.lifetime_seconds(kind)
    }

    /// Issues an access token for a subject
    pub async fn issue_access_token(&self, subject: &str) -> DomainResult<String> {
        self.issue(subject, TokenKind::Access).await
    }

    /// Issues a refresh token for a subject
    pub async fn issue_refresh_token(&self, subject: &str) -> DomainResult<String> {
        self.issue(subject, TokenKind::Refresh).await
    }

    /// Issues a signed token and records it in the cache
    ///
    /// # Arguments
    ///
    /// * `subject` - Identifier of the authenticated principal
    /// * `kind` - Access or refresh
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError)` - Empty subject, signing failure or cache failure
    pub async fn issue(&self, subject: &str, kind: TokenKind) -> DomainResult<String> {
        if subject.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "subject".to_string(),
            }
            .into());
        }

        let lifetime = self.config.lifetime_seconds(kind);
        let claims = Claims::new(subject, kind, &self.config.issuer, lifetime);
        let token_id = claims
            .token_id()
            .ok_or(DomainError::Token(TokenError::TokenGenerationFailed))?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys(kind).encoding)
            .map_err(|e| {
                error!(error = %e, kind = %kind, "Failed to sign token");
                DomainError::Token(TokenError::TokenGenerationFailed)
            })?;

        let record = TokenRecord::issued(token_id, subject, kind);
        self.cache
            .set_json(&self.record_key(&claims.jti, kind), &record, Some(lifetime))
            .await?;

        info!(
            subject = subject,
            token_id = %token_id,
            kind = %kind,
            ttl_seconds = lifetime,
            "Issued token"
        );

        Ok(token)
    }

    /// Issues an access and a refresh token for a subject
    pub async fn issue_token_pair(&self, subject: &str) -> DomainResult<TokenPair> {
        let access_token = self.issue_access_token(subject).await?;
        let refresh_token = self.issue_refresh_token(subject).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_lifetime_seconds,
            self.config.refresh_lifetime_seconds,
        ))
    }

    /// Verifies a token and returns its subject
    ///
    /// Returns `None` for a bad signature, a malformed or expired token, a
    /// token of the other kind, and a token whose record was revoked or has
    /// left the cache. The reason is only logged.
    pub async fn verify(&self, token: &str, kind: TokenKind) -> Option<String> {
        let claims = match decode::<Claims>(token, &self.keys(kind).decoding, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, kind = %kind, "Token failed cryptographic validation");
                return None;
            }
        };

        if claims.typ != kind {
            debug!(expected = %kind, actual = %claims.typ, "Token kind mismatch");
            return None;
        }

        let key = self.record_key(&claims.jti, kind);
        let record = match self.cache.get_json::<TokenRecord>(&key).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, token_id = %claims.jti, "Failed to load token record");
                return None;
            }
        };

        match record {
            Some(record) if record.valid && record.kind == kind && record.subject_id == claims.sub => {
                Some(claims.sub)
            }
            Some(_) => {
                info!(token_id = %claims.jti, kind = %kind, "Token record invalidated");
                None
            }
            None => {
                info!(token_id = %claims.jti, kind = %kind, "Token not found in cache");
                None
            }
        }
    }

    /// Revokes a token by deleting its record
    ///
    /// The signature is not checked, so revoking is possible with any copy of
    /// the token. Malformed input and cache failures are logged and ignored.
    pub async fn revoke(&self, token: &str, kind: TokenKind) {
        let Some(token_id) = Self::unverified_token_id(token) else {
            debug!(kind = %kind, "Ignoring revocation of undecodable token");
            return;
        };

        match self.cache.delete(&self.record_key(&token_id, kind)).await {
            Ok(()) => info!(token_id = %token_id, kind = %kind, "Revoked token"),
            Err(e) => error!(error = %e, token_id = %token_id, "Failed to revoke token"),
        }
    }

    /// Seconds left on a token's record, or 0 when it is unknown
    pub async fn remaining_ttl(&self, kind: TokenKind, token_id: &str) -> u64 {
        match self.cache.get_ttl(&self.record_key(token_id, kind)).await {
            Ok(ttl) => ttl.unwrap_or(0),
            Err(e) => {
                error!(error = %e, token_id = token_id, "Failed to read token TTL");
                0
            }
        }
    }

    /// Exchanges a valid refresh token for a new access token
    ///
    /// # Errors
    /// * `DomainError::Auth(AuthError::InvalidToken)` - The refresh token does not verify
    pub async fn refresh_access_token(&self, refresh_token: &str) -> DomainResult<String> {
        let subject = self
            .verify(refresh_token, TokenKind::Refresh)
            .await
            .ok_or(DomainError::Auth(AuthError::InvalidToken))?;

        self.issue_access_token(&subject).await
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access_keys,
            TokenKind::Refresh => &self.refresh_keys,
        }
    }

    fn record_key(&self, token_id: &str, kind: TokenKind) -> String {
        self.key_generator.generate_key(
            TOKEN_NAMESPACE,
            &[KeyArg::from(token_id), KeyArg::from(kind.as_str())],
        )
    }

    /// Reads the `jti` claim without checking signature or expiry
    fn unverified_token_id(token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenIdClaim>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims.jti)
            .filter(|jti| !jti.is_empty())
    }
}

//! Main authentication service implementation

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use gk_shared::client_identifier;

use crate::domain::entities::token::{TokenKind, TokenPair};
use crate::domain::entities::user::UserRecord;
use crate::domain::value_objects::{LoginRequest, RegisterRequest};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::CredentialStore;
use crate::services::rate_limit::RateLimiterTrait;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;
use super::validation::RegistrationValidator;

/// Fallback username base when the email local part has no usable characters
const DEFAULT_USERNAME_BASE: &str = "user";

/// Authentication service for registration, login and session handling
pub struct AuthService<U, H, R>
where
    U: CredentialStore,
    H: PasswordHasher,
    R: RateLimiterTrait,
{
    /// Store holding users and password hashes
    credential_store: Arc<U>,
    /// One-way password hashing
    password_hasher: Arc<H>,
    /// Throttles credential checks per client
    rate_limiter: Arc<R>,
    /// Issues and verifies tokens
    token_service: Arc<TokenService>,
    /// Registration input rules
    validator: RegistrationValidator,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, H, R> AuthService<U, H, R>
where
    U: CredentialStore,
    H: PasswordHasher,
    R: RateLimiterTrait,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `credential_store` - Store for user records
    /// * `password_hasher` - Password hashing implementation
    /// * `rate_limiter` - Login throttling
    /// * `token_service` - Token issuance and verification
    /// * `config` - Service configuration
    pub fn new(
        credential_store: Arc<U>,
        password_hasher: Arc<H>,
        rate_limiter: Arc<R>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            credential_store,
            password_hasher,
            rate_limiter,
            token_service,
            validator: RegistrationValidator::new(),
            config,
        }
    }

    /// Register a new user
    ///
    /// # Returns
    ///
    /// * `Ok(UserRecord)` - The created user
    /// * `Err(DomainError::ValidationErr)` - Malformed email or weak password
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email taken
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<UserRecord> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }

        let email = request.email.trim().to_string();
        let request = RegisterRequest { email, ..request };
        self.validator.validate(&request)?;

        if self
            .credential_store
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let username = self.generate_username(&request.email).await?;
        let password_hash = self.password_hasher.hash(&request.password).await?;

        let user = self
            .credential_store
            .create(UserRecord::new(request.email, username, password_hash))
            .await?;

        info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    /// Check credentials and issue a token pair
    ///
    /// Attempts are counted per client address and attempted email. A failed
    /// check keeps its attempt; a successful one clears the counter.
    ///
    /// # Arguments
    ///
    /// * `request` - Email and password
    /// * `client_ip` - Address of the caller, if known
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Access and refresh tokens
    /// * `Err(DomainError::Auth(AuthError::RateLimited { .. }))` - Too many attempts
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown email or wrong password
    pub async fn login(
        &self,
        request: LoginRequest,
        client_ip: Option<&str>,
    ) -> DomainResult<TokenPair> {
        let email = request.email.trim();
        let identifier = client_identifier(client_ip, Some(email));

        if !self.rate_limiter.record_attempt(&identifier).await? {
            let retry_after_seconds = self
                .rate_limiter
                .get_block_time_remaining(&identifier)
                .await?;
            return Err(AuthError::RateLimited { retry_after_seconds }.into());
        }

        let Some(user) = self.credential_store.find_by_email(email).await? else {
            warn!(
                client_ip = client_ip.unwrap_or("unknown"),
                "Login attempt for unknown account"
            );
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self
            .password_hasher
            .compare(&request.password, &user.password_hash)
            .await?
        {
            warn!(
                user_id = %user.id,
                client_ip = client_ip.unwrap_or("unknown"),
                "Login attempt with wrong password"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        self.rate_limiter.reset_attempts(&identifier).await?;
        let tokens = self.token_service.issue_token_pair(&user.id.to_string()).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<String> {
        self.token_service.refresh_access_token(refresh_token).await
    }

    /// Revoke the tokens of a session
    ///
    /// Best effort: tokens that cannot be decoded are ignored.
    pub async fn logout(&self, access_token: &str, refresh_token: Option<&str>) {
        self.token_service.revoke(access_token, TokenKind::Access).await;
        if let Some(refresh_token) = refresh_token {
            self.token_service
                .revoke(refresh_token, TokenKind::Refresh)
                .await;
        }
    }

    /// Resolve the user behind an access token
    ///
    /// # Errors
    /// * `DomainError::Auth(AuthError::InvalidToken)` - The token does not
    ///   verify or its user no longer exists
    pub async fn authenticate(&self, access_token: &str) -> DomainResult<UserRecord> {
        let subject = self
            .token_service
            .verify(access_token, TokenKind::Access)
            .await
            .ok_or(DomainError::Auth(AuthError::InvalidToken))?;

        let user_id =
            Uuid::parse_str(&subject).map_err(|_| DomainError::Auth(AuthError::InvalidToken))?;

        self.credential_store
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidToken))
    }

    /// Derive a free username from the email local part plus a random suffix
    async fn generate_username(&self, email: &str) -> DomainResult<String> {
        let base = username_base(email);

        for _ in 0..self.config.username_attempts {
            let suffix: u32 = rand::thread_rng().gen_range(0..1000);
            let candidate = format!("{}{}", base, suffix);
            if !self.credential_store.exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        // Crowded base; a longer suffix is practically collision free
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}{}", base, &suffix[..8]))
    }
}

/// Lowercased alphanumeric-and-underscore part of the email before `@`
fn username_base(email: &str) -> String {
    let base: String = email
        .split('@')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if base.is_empty() {
        DEFAULT_USERNAME_BASE.to_string()
    } else {
        base
    }
}

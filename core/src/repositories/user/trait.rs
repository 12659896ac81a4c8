//! Credential store trait defining the interface for user persistence.
//!
//! Authentication only needs a narrow view of user storage: lookup by login
//! identifier, creation at registration, and the usual maintenance
//! operations. Durable implementations live outside this crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::errors::DomainError;

/// Store holding users and their password hashes
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by login identifier, which may be an email or a username
    ///
    /// # Returns
    /// * `Ok(Some(UserRecord))` - User found
    /// * `Ok(None)` - No user matches the identifier
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Find a user by email, ignoring ASCII case
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError>;

    /// Create a new user
    ///
    /// # Errors
    /// * `DomainError::Auth(AuthError::UserAlreadyExists)` - Email or username taken
    async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError>;

    /// Replace an existing user
    ///
    /// # Errors
    /// * `DomainError::NotFound` - No user with that id
    async fn update(&self, user: UserRecord) -> Result<UserRecord, DomainError>;

    /// Delete a user
    ///
    /// # Errors
    /// * `DomainError::NotFound` - No user with that id
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Check whether an identifier (email or username) is taken
    async fn exists(&self, identifier: &str) -> Result<bool, DomainError>;
}

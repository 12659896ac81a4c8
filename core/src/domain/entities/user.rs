//! User entity held by the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::cache::KeyArg;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email, unique per store
    pub email: String,

    /// Display handle derived at registration
    pub username: String,

    /// Password hash produced by the configured hasher
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a new user with a fresh id
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Updates the last modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Users become identity records for key derivation, so only the id is used
impl From<&UserRecord> for KeyArg {
    fn from(user: &UserRecord) -> Self {
        KeyArg::Record(json!({
            "id": user.id.to_string(),
            "email": user.email,
            "username": user.username,
        }))
    }
}

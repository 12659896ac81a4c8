//! bcrypt implementation of the password hashing contract

use async_trait::async_trait;
use tracing::warn;

use gk_core::errors::DomainResult;
use gk_core::services::auth::PasswordHasher;

use crate::InfrastructureError;

/// bcrypt hasher running its work on the blocking thread pool
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit work factor
    ///
    /// # Errors
    /// * `InfrastructureError::Config` - `cost` is outside bcrypt's 4..=31 range
    pub fn new(cost: u32) -> Result<Self, InfrastructureError> {
        if !(4..=31).contains(&cost) {
            return Err(InfrastructureError::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_string();
        let cost = self.cost;

        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(InfrastructureError::from)?
            .map_err(InfrastructureError::from)?;
        Ok(hashed)
    }

    async fn compare(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(InfrastructureError::from)?;

        match verified {
            Ok(matches) => Ok(matches),
            // A corrupt stored hash can never match
            Err(e) => {
                warn!(error = %e, "Stored password hash could not be parsed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_compare() {
        let hasher = BcryptPasswordHasher::new(4).unwrap();

        let hash = hasher.hash("Correct#Horse9").await.unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert_ne!(hash, "Correct#Horse9");

        assert!(hasher.compare("Correct#Horse9", &hash).await.unwrap());
        assert!(!hasher.compare("Wrong#Horse9", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = BcryptPasswordHasher::new(4).unwrap();
        let first = hasher.hash("Repeat#Me1").await.unwrap();
        let second = hasher.hash("Repeat#Me1").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_hash_never_matches() {
        let hasher = BcryptPasswordHasher::new(4).unwrap();
        assert!(!hasher.compare("anything", "not-a-bcrypt-hash").await.unwrap());
    }

    #[test]
    fn test_cost_bounds() {
        assert!(BcryptPasswordHasher::new(3).is_err());
        assert!(BcryptPasswordHasher::new(32).is_err());
        assert_eq!(BcryptPasswordHasher::new(10).unwrap().cost(), 10);
        assert_eq!(BcryptPasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}

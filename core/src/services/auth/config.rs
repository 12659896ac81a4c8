//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether new users may register
    pub allow_registration: bool,
    /// Attempts at finding a free username before giving up
    pub username_attempts: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            username_attempts: 5,
        }
    }
}

//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{Claims, TokenKind, TokenPair, TokenRecord, BEARER_TOKEN_TYPE};
pub use user::UserRecord;

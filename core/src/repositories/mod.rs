pub mod user;

pub use user::{CredentialStore, InMemoryCredentialStore};

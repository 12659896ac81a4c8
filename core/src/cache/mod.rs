//! Time-bounded key/value cache contracts and implementations
//!
//! - `traits` - the [`CacheService`] contract and typed JSON helpers
//! - `memory` - process-local store with lazy expiry
//! - `key_generator` - deterministic keys that never embed personal data

mod key_generator;
mod memory;
mod traits;

#[cfg(test)]
mod tests;

pub use key_generator::{CacheKeyGenerator, KeyArg, Sha256KeyGenerator, MAX_KEY_LENGTH};
pub use memory::MemoryCacheService;
pub use traits::{CacheService, CacheServiceExt};

//! Password hashing implementations

pub mod bcrypt_hasher;

pub use bcrypt_hasher::BcryptPasswordHasher;

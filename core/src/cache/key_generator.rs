//! Cache key derivation that keeps personal data out of keys and logs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Keys with more characters than this are replaced by their digest
pub const MAX_KEY_LENGTH: usize = 100;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern is a valid regex")
});

/// One component of a cache key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyArg {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Structured value; an object with an `id` field is treated as an identity record
    Record(Value),
}

impl From<&str> for KeyArg {
    fn from(value: &str) -> Self {
        KeyArg::Text(value.to_string())
    }
}

impl From<String> for KeyArg {
    fn from(value: String) -> Self {
        KeyArg::Text(value)
    }
}

impl From<&String> for KeyArg {
    fn from(value: &String) -> Self {
        KeyArg::Text(value.clone())
    }
}

impl From<Uuid> for KeyArg {
    fn from(value: Uuid) -> Self {
        KeyArg::Text(value.to_string())
    }
}

impl From<i64> for KeyArg {
    fn from(value: i64) -> Self {
        KeyArg::Integer(value)
    }
}

impl From<u32> for KeyArg {
    fn from(value: u32) -> Self {
        KeyArg::Integer(i64::from(value))
    }
}

impl From<f64> for KeyArg {
    fn from(value: f64) -> Self {
        KeyArg::Float(value)
    }
}

impl From<bool> for KeyArg {
    fn from(value: bool) -> Self {
        KeyArg::Bool(value)
    }
}

impl From<Value> for KeyArg {
    fn from(value: Value) -> Self {
        KeyArg::Record(value)
    }
}

/// Trait for deriving cache keys
pub trait CacheKeyGenerator: Send + Sync {
    /// Build a deterministic key for `namespace` from `args`
    fn generate_key(&self, namespace: &str, args: &[KeyArg]) -> String;
}

/// Key generator that hashes anything resembling personal data with SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256KeyGenerator;

impl Sha256KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase hex SHA-256 digest
    pub fn digest(value: &str) -> String {
        hex::encode(Sha256::digest(value.as_bytes()))
    }

    fn might_contain_pii(value: &str) -> bool {
        value.contains('@') || EMAIL_PATTERN.is_match(value) || UUID_PATTERN.is_match(value)
    }

    fn identity_id(args: &[KeyArg]) -> Option<String> {
        match args {
            [KeyArg::Record(Value::Object(fields))] => fields.get("id").map(|id| match id {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }

    fn render(arg: &KeyArg) -> String {
        match arg {
            KeyArg::Text(text) if Self::might_contain_pii(text) => Self::digest(text),
            KeyArg::Text(text) => text.clone(),
            KeyArg::Integer(n) => n.to_string(),
            KeyArg::Float(n) => n.to_string(),
            KeyArg::Bool(b) => b.to_string(),
            KeyArg::Record(value) => Self::digest(&value.to_string()),
        }
    }
}

impl CacheKeyGenerator for Sha256KeyGenerator {
    fn generate_key(&self, namespace: &str, args: &[KeyArg]) -> String {
        // Only the id of an identity record ever reaches the key
        if let Some(id) = Self::identity_id(args) {
            return format!("{}:id:{}", namespace, id);
        }

        let mut key = String::from(namespace);
        for arg in args {
            key.push(':');
            key.push_str(&Self::render(arg));
        }

        if key.chars().count() > MAX_KEY_LENGTH {
            return Self::digest(&key);
        }
        key
    }
}

//! Key-value persistence boundary.
//!
//! A slot holds one string value under one string key. Record stores write
//! their whole serialized collection into a single slot; nothing here knows
//! about records.

mod file;
mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;

/// Error type for key-value backends.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot exists but its content is not text.
    #[error("stored value is not valid UTF-8: {0}")]
    Undecodable(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Opaque get/set string storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. Returns None if the slot is empty.
    fn get_item(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Overwrite the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Clear the slot. Returns true if a value existed.
    fn remove_item(&self, key: &str) -> Result<bool, KvError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Arc<K> {
    fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, KvError> {
        (**self).remove_item(key)
    }
}

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{KeyValueStore, KvError};

/// File-backed key-value store: one `<key>.json` file per slot under a base
/// directory.
///
/// Keys take the form `@Namespace:name` and map to file names by dropping
/// the `@` and replacing `:` with `_`, so `@CarApp:cars` lives in
/// `CarApp_cars.json`. Keys without the `@` or containing `_` are rejected,
/// which keeps the mapping one-to-one.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new file store rooted at `base_path`. The directory is
    /// created on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub(crate) fn slot_path(&self, key: &str) -> Result<PathBuf, KvError> {
        let file_stem = Self::file_stem(key)?;
        Ok(self.base_path.join(format!("{file_stem}.json")))
    }

    /// Map a key to a file stem, rejecting anything that could escape the
    /// base directory or collide with another key's file.
    fn file_stem(key: &str) -> Result<String, KvError> {
        let Some(name) = key.strip_prefix('@') else {
            return Err(KvError::InvalidKey(format!(
                "key must start with `@`: {key:?}"
            )));
        };
        if name.is_empty() {
            return Err(KvError::InvalidKey("key cannot be empty".to_string()));
        }
        if name.contains('_') || name.contains('@') {
            return Err(KvError::InvalidKey(format!(
                "key contains reserved characters: {key:?}"
            )));
        }
        let stem = name.replace(':', "_");
        if stem.contains('/') || stem.contains('\\') || stem.contains("..") || stem.contains('\0')
        {
            return Err(KvError::InvalidKey(format!(
                "key contains invalid characters: {key:?}"
            )));
        }
        if stem.chars().any(|c| c.is_control()) {
            return Err(KvError::InvalidKey(format!(
                "key contains control characters: {key:?}"
            )));
        }
        Ok(stem)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| KvError::Undecodable(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Io(e)),
        }
    }

    /// Writes atomically: temp file in the same directory, fsync, rename.
    fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.base_path)?;

        let mut tmp = NamedTempFile::new_in(&self.base_path)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| KvError::Io(e.error))?;

        debug!(key, path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, KvError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KvError::Io(e)),
        }
    }
}

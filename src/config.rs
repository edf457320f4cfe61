//! Catalog configuration and wiring.
//!
//! Settings come from code (`with_*` builders) or the environment:
//!
//! - `AUTOSHOP_STORAGE_DIR`: directory for the file-backed slots. Unset keeps
//!   every slot in memory.
//! - `AUTOSHOP_ID_STRATEGY`: `sequential` (default) or `timestamp`.
//! - `AUTOSHOP_PERSIST_REVIEWS`: `true` (default) or `false`.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use crate::record::{Car, Review};
use crate::store::{IdStrategy, RecordStore, StoreError};

pub const ENV_STORAGE_DIR: &str = "AUTOSHOP_STORAGE_DIR";
pub const ENV_ID_STRATEGY: &str = "AUTOSHOP_ID_STRATEGY";
pub const ENV_PERSIST_REVIEWS: &str = "AUTOSHOP_PERSIST_REVIEWS";

/// Backend handle shared by every store in a catalog.
pub type SharedKeyValueStore = Arc<dyn KeyValueStore>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub storage_dir: Option<PathBuf>,
    pub id_strategy: IdStrategy,
    /// When false the review list lives in memory only.
    pub persist_reviews: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            id_strategy: IdStrategy::Sequential,
            persist_reviews: true,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_review_persistence(mut self, enabled: bool) -> Self {
        self.persist_reviews = enabled;
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset or
    /// unrecognised values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|dir| !dir.is_empty()) {
            config.storage_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup(ENV_ID_STRATEGY) {
            match raw.parse::<IdStrategy>() {
                Ok(strategy) => config.id_strategy = strategy,
                Err(err) => warn!(variable = ENV_ID_STRATEGY, error = %err, "using default"),
            }
        }

        if let Some(raw) = lookup(ENV_PERSIST_REVIEWS) {
            match parse_bool(&raw) {
                Some(enabled) => config.persist_reviews = enabled,
                None => warn!(variable = ENV_PERSIST_REVIEWS, value = %raw, "using default"),
            }
        }

        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

/// The two stores of the app, wired to one backend.
pub struct Catalog {
    pub cars: RecordStore<Car, SharedKeyValueStore>,
    pub reviews: RecordStore<Review, SharedKeyValueStore>,
}

impl Catalog {
    /// Open the backend named by `config` and load both collections.
    pub fn open(config: &CatalogConfig) -> Result<Self, StoreError> {
        let backend: SharedKeyValueStore = match &config.storage_dir {
            Some(dir) => Arc::new(FileKeyValueStore::new(dir.clone())),
            None => Arc::new(InMemoryKeyValueStore::new()),
        };
        Self::with_backend(backend, config)
    }

    pub fn with_backend(
        backend: SharedKeyValueStore,
        config: &CatalogConfig,
    ) -> Result<Self, StoreError> {
        let cars: RecordStore<Car, SharedKeyValueStore> =
            RecordStore::load(Arc::clone(&backend), config.id_strategy)?;
        let reviews: RecordStore<Review, SharedKeyValueStore> = if config.persist_reviews {
            RecordStore::load(backend, config.id_strategy)?
        } else {
            RecordStore::new(config.id_strategy)
        };

        info!(
            cars = cars.len(),
            reviews = reviews.len(),
            strategy = %config.id_strategy,
            storage = ?config.storage_dir,
            "catalog opened"
        );
        Ok(Self { cars, reviews })
    }
}

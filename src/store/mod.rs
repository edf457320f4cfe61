//! Record stores - the authoritative ordered collection for one record kind.
//!
//! A store is optionally attached to a [`KeyValueStore`]. When it is, the
//! whole collection is serialized to JSON and written under the record's
//! `STORAGE_KEY` after every mutation; a failed write rolls the mutation back
//! and is returned to the caller.
//!
//! ## Example
//!
//! ```ignore
//! use autoshop_catalog::{Car, IdStrategy, InMemoryKeyValueStore, RecordStore};
//!
//! let kv = InMemoryKeyValueStore::new();
//! let mut cars = RecordStore::<Car, _>::load(kv.clone(), IdStrategy::Sequential)?;
//! let id = cars.add(car)?;
//! cars.remove(id)?;
//! ```

mod events;
mod id;

use std::collections::HashSet;
use std::fmt;

use event_emitter_rs::EventEmitter;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::form::Intent;
use crate::kv::{InMemoryKeyValueStore, KeyValueStore, KvError};
use crate::record::{Record, RecordId};

pub use events::{ChangeEvent, ChangeKind};
pub use id::{IdAllocator, IdStrategy};

use events::CHANGED;

/// Error type for record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {collection}:{id}")]
    NotFound {
        collection: &'static str,
        id: RecordId,
    },

    #[error("index {index} out of bounds for {collection} (len {len})")]
    IndexOutOfBounds {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("persistence error: {0}")]
    Persistence(#[from] KvError),

    #[error("record serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no identifiers left for {collection}")]
    IdsExhausted { collection: &'static str },
}

/// A mutation the store refused, handed back together with the intent that
/// asked for it so the caller can reopen the form.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected<R: Record> {
    pub intent: Intent<R>,
    #[source]
    pub error: StoreError,
}

/// What the initial read of the persistence slot found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No backend attached; the store lives in memory only.
    Detached,
    /// The slot was empty.
    Empty,
    /// The slot held this many records.
    Loaded(usize),
    /// The slot held something that is not a record collection. The store
    /// started empty; the next mutation overwrites the slot.
    Corrupt(String),
    /// The backend failed to read. Only produced by
    /// [`RecordStore::load_or_default`].
    Unreadable(String),
}

/// Result of applying a form [`Intent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<R> {
    Created(RecordId),
    Updated(RecordId),
    Deleted(R),
}

/// Ordered, identifier-keyed collection of one record kind.
pub struct RecordStore<R: Record, K: KeyValueStore = InMemoryKeyValueStore> {
    records: Vec<R>,
    backend: Option<K>,
    ids: IdAllocator,
    emitter: EventEmitter,
    seq: u64,
    outcome: LoadOutcome,
}

impl<R: Record, K: KeyValueStore> RecordStore<R, K> {
    /// Create an empty store that is not mirrored anywhere.
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            records: Vec::new(),
            backend: None,
            ids: IdAllocator::new(strategy),
            emitter: EventEmitter::new(),
            seq: 0,
            outcome: LoadOutcome::Detached,
        }
    }

    /// Create a store attached to `backend`, seeded from whatever the slot
    /// holds.
    ///
    /// An empty slot and an unusable slot (not text, not a record
    /// collection, or ids past the identifier space) both start the store
    /// empty; the difference is reported through
    /// [`load_outcome`](Self::load_outcome). A backend read failure is
    /// returned as an error.
    pub fn load(backend: K, strategy: IdStrategy) -> Result<Self, StoreError> {
        let raw = match backend.get_item(R::STORAGE_KEY) {
            Ok(raw) => Ok(raw),
            Err(KvError::Undecodable(reason)) => Err(reason),
            Err(err) => return Err(err.into()),
        };
        Ok(Self::attach(backend, strategy, raw))
    }

    /// Like [`load`](Self::load), but a backend read failure is logged and
    /// the store starts empty instead.
    pub fn load_or_default(backend: K, strategy: IdStrategy) -> Self {
        match backend.get_item(R::STORAGE_KEY) {
            Ok(raw) => Self::attach(backend, strategy, Ok(raw)),
            Err(KvError::Undecodable(reason)) => Self::attach(backend, strategy, Err(reason)),
            Err(err) => {
                error!(
                    collection = R::COLLECTION,
                    key = R::STORAGE_KEY,
                    error = %err,
                    "failed to read stored collection, starting empty"
                );
                let mut store = Self::new(strategy);
                store.backend = Some(backend);
                store.outcome = LoadOutcome::Unreadable(err.to_string());
                store
            }
        }
    }

    /// `raw` is the slot content, or why it could not be decoded.
    fn attach(backend: K, strategy: IdStrategy, raw: Result<Option<String>, String>) -> Self {
        let mut store = Self::new(strategy);
        store.backend = Some(backend);
        let outcome = match raw.and_then(|raw| store.seed(raw)) {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(
                    collection = R::COLLECTION,
                    key = R::STORAGE_KEY,
                    error = %reason,
                    "stored collection is unusable, starting empty"
                );
                store.records.clear();
                store.ids = IdAllocator::new(strategy);
                LoadOutcome::Corrupt(reason)
            }
        };
        store.outcome = outcome;
        store
    }

    fn seed(&mut self, raw: Option<String>) -> Result<LoadOutcome, String> {
        let Some(raw) = raw else {
            info!(collection = R::COLLECTION, "no stored collection");
            return Ok(LoadOutcome::Empty);
        };

        let records = serde_json::from_str::<Vec<R>>(&raw).map_err(|err| err.to_string())?;
        let reassigned = self.adopt(records).map_err(|err| err.to_string())?;
        if reassigned > 0 {
            warn!(
                collection = R::COLLECTION,
                reassigned, "stored records without a unique id were given new ids"
            );
        }
        info!(collection = R::COLLECTION, len = self.records.len(), "collection loaded");
        Ok(LoadOutcome::Loaded(self.records.len()))
    }

    /// Take ownership of loaded records, giving a fresh id to any record
    /// whose id is missing or duplicated. Returns how many were reassigned.
    fn adopt(&mut self, records: Vec<R>) -> Result<usize, StoreError> {
        for record in &records {
            self.ids.observe(record.id());
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut reassigned = 0;
        for mut record in records {
            if !record.id().is_assigned() || !seen.insert(record.id()) {
                let id = self.allocate()?;
                record.set_id(id);
                seen.insert(id);
                reassigned += 1;
            }
            self.records.push(record);
        }
        Ok(reassigned)
    }

    fn allocate(&mut self) -> Result<RecordId, StoreError> {
        self.ids.next_id().ok_or(StoreError::IdsExhausted {
            collection: R::COLLECTION,
        })
    }

    /// Append `record` with a freshly assigned identifier.
    ///
    /// Any identifier already on `record` is overwritten.
    pub fn add(&mut self, mut record: R) -> Result<RecordId, StoreError> {
        let id = self.allocate()?;
        record.set_id(id);
        self.records.push(record);

        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }

        debug!(collection = R::COLLECTION, %id, len = self.records.len(), "record added");
        self.notify(ChangeKind::Added, id);
        Ok(id)
    }

    /// Replace the record with the same identifier, in place.
    pub fn update(&mut self, record: R) -> Result<(), StoreError> {
        let id = record.id();
        let index = self.position(id).ok_or(StoreError::NotFound {
            collection: R::COLLECTION,
            id,
        })?;

        let previous = std::mem::replace(&mut self.records[index], record);
        if let Err(err) = self.persist() {
            self.records[index] = previous;
            return Err(err);
        }

        debug!(collection = R::COLLECTION, %id, index, "record updated");
        self.notify(ChangeKind::Updated, id);
        Ok(())
    }

    /// Remove the record with identifier `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: RecordId) -> Result<R, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound {
            collection: R::COLLECTION,
            id,
        })?;
        self.remove_index(index)
    }

    /// Remove the record at `index` as currently rendered.
    pub fn remove_at(&mut self, index: usize) -> Result<R, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfBounds {
                collection: R::COLLECTION,
                index,
                len: self.records.len(),
            });
        }
        self.remove_index(index)
    }

    fn remove_index(&mut self, index: usize) -> Result<R, StoreError> {
        let record = self.records.remove(index);
        if let Err(err) = self.persist() {
            self.records.insert(index, record);
            return Err(err);
        }

        let id = record.id();
        debug!(collection = R::COLLECTION, %id, index, "record removed");
        self.notify(ChangeKind::Removed, id);
        Ok(record)
    }

    /// Dispatch an intent produced by a form controller.
    ///
    /// A refused intent comes back inside [`Rejected`] so nothing the user
    /// typed is lost; see [`FormController::restore`](crate::FormController::restore).
    pub fn apply(&mut self, intent: Intent<R>) -> Result<Applied<R>, Rejected<R>> {
        let result = match &intent {
            Intent::Create(record) => self.add(record.clone()).map(Applied::Created),
            Intent::Update(record) => {
                let id = record.id();
                self.update(record.clone()).map(|()| Applied::Updated(id))
            }
            Intent::Delete(id) => self.remove(*id).map(Applied::Deleted),
        };
        result.map_err(|error| Rejected { intent, error })
    }

    /// Register a listener for committed mutations.
    ///
    /// Listeners run on the emitter's own threads, after the mutation has
    /// been persisted, so two events can arrive out of order; order them by
    /// [`ChangeEvent::seq`]. Returns the listener id.
    pub fn on_change<F>(&mut self, listener: F) -> String
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        self.emitter.on(CHANGED, move |payload: String| {
            match serde_json::from_str::<ChangeEvent>(&payload) {
                Ok(event) => listener(event),
                Err(err) => warn!(error = %err, "dropping malformed change event"),
            }
        })
    }

    fn notify(&mut self, kind: ChangeKind, id: RecordId) {
        self.seq += 1;
        let event = ChangeEvent {
            seq: self.seq,
            collection: R::COLLECTION.to_string(),
            kind,
            id,
            len: self.records.len(),
        };
        match serde_json::to_string(&event) {
            Ok(payload) => {
                self.emitter.emit(CHANGED, payload);
            }
            Err(err) => warn!(error = %err, "failed to encode change event"),
        }
    }

    /// Write the whole collection to the backend, if one is attached.
    fn persist(&self) -> Result<(), StoreError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let payload = serde_json::to_string(&self.records)?;
        backend.set_item(R::STORAGE_KEY, &payload).map_err(|err| {
            error!(
                collection = R::COLLECTION,
                key = R::STORAGE_KEY,
                error = %err,
                "failed to persist collection"
            );
            StoreError::from(err)
        })
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.ids.strategy()
    }
}

impl<'a, R: Record, K: KeyValueStore> IntoIterator for &'a RecordStore<R, K> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R: Record, K: KeyValueStore> fmt::Debug for RecordStore<R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("collection", &R::COLLECTION)
            .field("len", &self.records.len())
            .field("persistent", &self.backend.is_some())
            .field("strategy", &self.ids.strategy())
            .field("outcome", &self.outcome)
            .finish()
    }
}

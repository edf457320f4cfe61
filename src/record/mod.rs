//! Records - the flat entities a catalog stores.
//!
//! Every record kind names the collection it belongs to and the persistence
//! key its whole collection is mirrored under. Identifiers are assigned by the
//! [`RecordStore`](crate::RecordStore), never by callers.

mod car;
mod review;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

pub use car::Car;
pub use review::Review;

/// Trait for types that can live in a [`RecordStore`](crate::RecordStore).
///
/// Usually derived with `#[derive(Record)]`.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync {
    /// The collection name for this record type (e.g. "cars", "reviews").
    const COLLECTION: &'static str;

    /// The key-value slot holding the serialized collection.
    const STORAGE_KEY: &'static str;

    /// Returns the identifier, [`RecordId::UNASSIGNED`] until stored.
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);
}

/// Store-assigned record identifier.
///
/// Serialized as a bare number. Zero means "not assigned yet", which is also
/// what a stored record without an `id` field deserializes to.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const UNASSIGNED: RecordId = RecordId(0);

    pub const fn new(value: u64) -> Self {
        RecordId(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

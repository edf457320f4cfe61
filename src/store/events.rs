use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// Emitter event name for committed mutations.
pub(crate) const CHANGED: &str = "changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

/// Payload delivered to `on_change` listeners after a mutation has been
/// committed (and persisted, when a backend is attached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Per-store sequence number, starting at 1 and increasing by one per
    /// committed mutation. Listeners run on separate threads and may receive
    /// events out of order; anything with a lower `seq` than the last one
    /// handled is stale.
    pub seq: u64,
    pub collection: String,
    pub kind: ChangeKind,
    pub id: RecordId,
    /// Collection length after the mutation.
    pub len: usize,
}

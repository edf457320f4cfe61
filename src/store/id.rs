use std::fmt;
use std::str::FromStr;

use chrono::Utc;

use crate::record::RecordId;

/// How a store picks the identifier for a newly created record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// One past the highest identifier seen this session.
    #[default]
    Sequential,
    /// Milliseconds since the Unix epoch, bumped past the last identifier
    /// when two creates land in the same millisecond.
    Timestamp,
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(IdStrategy::Sequential),
            "timestamp" | "ts" => Ok(IdStrategy::Timestamp),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Sequential => write!(f, "sequential"),
            IdStrategy::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Hands out strictly increasing identifiers. Deleted identifiers are never
/// handed out again within a session.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    strategy: IdStrategy,
    last: u64,
}

impl IdAllocator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, last: 0 }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// The most recently issued (or observed) identifier.
    pub fn last(&self) -> RecordId {
        RecordId::new(self.last)
    }

    /// Record an identifier that already exists, e.g. one loaded from storage.
    pub fn observe(&mut self, id: RecordId) {
        self.last = self.last.max(id.get());
    }

    /// The next identifier, or None once the identifier space is used up.
    pub fn next_id(&mut self) -> Option<RecordId> {
        let floor = self.last.checked_add(1)?;
        let candidate = match self.strategy {
            IdStrategy::Sequential => floor,
            IdStrategy::Timestamp => {
                let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
                now.max(floor)
            }
        };
        self.last = candidate;
        Some(RecordId::new(candidate))
    }
}

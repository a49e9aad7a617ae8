//! The persisted record format.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrysalis_types::Candidate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Durable snapshot of one Chrysalis instance.
///
/// Missing fields default to empty or zero and unknown fields are ignored,
/// so older and newer records both load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedRecord {
    /// Last bound state.
    pub state: Candidate,
    /// Completed cycles across every lifetime.
    pub cycle_count: u64,
    /// Append-only synthesized vocabulary: key to marker value.
    pub vocabulary_expansions: BTreeMap<String, Value>,
    /// When this record was written.
    pub last_saved: DateTime<Utc>,
    /// When the first lifetime began.
    pub birth: Option<DateTime<Utc>>,
    /// Recent results and survivors, oldest first.
    pub history: Vec<Candidate>,
}

impl PersistedRecord {
    /// Stamp the record with the current time.
    pub fn stamped(mut self) -> Self {
        self.last_saved = Utc::now();
        self
    }
}

//! Binder (Etheric layer): commits a resolved candidate to process state.
//!
//! A bind replaces state wholesale. Keys absent from the new candidate are
//! dropped, never merged.

use chrysalis_etheric::{PersistedRecord, RecordStore};
use chrysalis_types::{ground, Candidate};
use tracing::{error, info};

/// Owner of process state, the cycle counter and the attached substrate.
pub struct Binder {
    state: Candidate,
    cycle_count: u64,
    store: Option<Box<dyn RecordStore>>,
}

impl Binder {
    pub fn new() -> Self {
        Self {
            state: ground(),
            cycle_count: 0,
            store: None,
        }
    }

    /// Adopt state from a previous lifetime.
    pub fn restore(&mut self, state: Candidate, cycle_count: u64) {
        self.state = state;
        self.cycle_count = cycle_count;
    }

    /// Attach a persistence substrate for subsequent binds.
    pub fn attach(&mut self, store: Box<dyn RecordStore>) {
        self.store = Some(store);
    }

    pub fn store(&self) -> Option<&dyn RecordStore> {
        self.store.as_deref()
    }

    pub fn state(&self) -> &Candidate {
        &self.state
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Replace state and count the cycle. Returns the new cycle number.
    pub fn bind(&mut self, candidate: Candidate) -> u64 {
        self.state = candidate;
        self.cycle_count += 1;
        info!(cycle = self.cycle_count, "state bound");
        self.cycle_count
    }

    /// Write `record` to the attached substrate.
    ///
    /// Returns whether it was written. Failures are logged, not raised: the
    /// bind has already happened and the next successful save supersedes it.
    pub fn persist(&self, record: &PersistedRecord) -> bool {
        let Some(store) = self.store.as_deref() else {
            return false;
        };
        match store.save(record) {
            Ok(()) => true,
            Err(e) => {
                error!(location = %store.location(), error = %e, "failed to persist bind");
                false
            }
        }
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("state", &self.state)
            .field("cycle_count", &self.cycle_count)
            .field("store", &self.store.as_ref().map(|s| s.location()))
            .finish()
    }
}

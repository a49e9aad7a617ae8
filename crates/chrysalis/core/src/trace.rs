//! Crystallization traces: the path from potential to form for one cycle.

use chrono::{DateTime, Utc};
use chrysalis_types::Candidate;
use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintDescriptor;
use crate::narrowing::NarrowingStep;

/// Unique identifier for a crystallization trace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trace:{}", self.0)
    }
}

/// Record of one completed crystallization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrystallizationTrace {
    pub id: TraceId,
    /// Cycle number assigned by the bind.
    pub cycle: u64,
    /// Void: the candidates that entered.
    pub domain: Vec<Candidate>,
    /// Mental: constraints active during narrowing.
    pub constraints: Vec<ConstraintDescriptor>,
    /// Astral: survivor counts around each constraint.
    pub narrowing: Vec<NarrowingStep>,
    /// Astral: every candidate that survived all constraints.
    pub survivors: Vec<Candidate>,
    /// Etheric/Physical: the chosen and bound candidate.
    pub result: Candidate,
    pub bound_at: DateTime<Utc>,
    /// Whether the bind reached the persistence substrate.
    pub persisted: bool,
}

impl CrystallizationTrace {
    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    pub fn survivor_count(&self) -> usize {
        self.survivors.len()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.survivors.len() > 1
    }
}

impl std::fmt::Display for CrystallizationTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crystallization(cycle={}, domain={}, survivors={})",
            self.cycle,
            self.domain_size(),
            self.survivor_count(),
        )
    }
}

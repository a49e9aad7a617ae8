//! Narrowing engine (Astral layer).
//!
//! Applies constraints in declaration order to a domain, recording how many
//! candidates survive each one. Survivor counts never increase across steps.

use chrysalis_types::Candidate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constraint::Constraint;
use crate::error::{ChrysalisError, ChrysalisResult};

/// Survivor counts around one constraint application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowingStep {
    pub constraint: String,
    pub before: usize,
    pub after: usize,
}

impl NarrowingStep {
    pub fn eliminated(&self) -> usize {
        self.before - self.after
    }
}

impl std::fmt::Display for NarrowingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.constraint, self.before, self.after)
    }
}

/// Outcome of exploring a domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    /// Candidates that passed every applied constraint, in domain order.
    pub survivors: Vec<Candidate>,
    /// One entry per applied constraint.
    pub steps: Vec<NarrowingStep>,
}

impl Exploration {
    /// The deterministic choice: first survivor in domain order.
    pub fn chosen(&self) -> Option<&Candidate> {
        self.survivors.first()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.survivors.len() > 1
    }
}

/// Narrow `domain` through `constraints`.
///
/// Stops once nothing survives; the steps recorded up to that point are
/// complete, including the one that emptied the set.
pub fn explore(domain: &[Candidate], constraints: &[Constraint]) -> Exploration {
    let mut survivors: Vec<Candidate> = domain.to_vec();
    let mut steps = Vec::with_capacity(constraints.len());

    for constraint in constraints {
        if survivors.is_empty() {
            break;
        }
        let before = survivors.len();
        survivors.retain(|candidate| constraint.satisfied(candidate));
        let after = survivors.len();
        debug!(constraint = %constraint.name, before, after, "narrowed");
        steps.push(NarrowingStep {
            constraint: constraint.name.clone(),
            before,
            after,
        });
    }

    Exploration { survivors, steps }
}

/// Resolve `domain` to a single candidate.
pub fn resolve(domain: &[Candidate], constraints: &[Constraint]) -> ChrysalisResult<Candidate> {
    explore(domain, constraints)
        .survivors
        .into_iter()
        .next()
        .ok_or(ChrysalisError::Unsatisfiable {
            domain_size: domain.len(),
            constraint_count: constraints.len(),
        })
}

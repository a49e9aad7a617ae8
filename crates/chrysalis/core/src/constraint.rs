//! Constraints and the registry that holds them (Mental layer).
//!
//! A constraint is a named predicate tagged with a layer and a source. The
//! registry keeps them in declaration order and rejects duplicate names.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use chrysalis_types::{Candidate, ConstraintSource, ConstraintSpec, Layer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChrysalisError, ChrysalisResult};

/// A native predicate closure.
pub type NativePredicate = Box<dyn Fn(&Candidate) -> bool + Send + Sync>;

// ── Predicate ───────────────────────────────────────────────────────

/// How a constraint tests candidates.
pub enum Predicate {
    /// A serialisable description.
    Spec(ConstraintSpec),
    /// Arbitrary code. Not inspectable, not persistable.
    Native(NativePredicate),
}

impl Predicate {
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        Self::Native(Box::new(f))
    }

    /// Evaluate against `candidate`. A native predicate that panics counts
    /// as unsatisfied; with `panic = "abort"` the process still aborts.
    pub fn test(&self, candidate: &Candidate) -> bool {
        match self {
            Self::Spec(spec) => spec.evaluate(candidate),
            Self::Native(f) => panic::catch_unwind(AssertUnwindSafe(|| f(candidate)))
                .unwrap_or_else(|_| {
                    warn!("native predicate panicked, candidate treated as unsatisfied");
                    false
                }),
        }
    }

    pub fn spec(&self) -> Option<&ConstraintSpec> {
        match self {
            Self::Spec(spec) => Some(spec),
            Self::Native(_) => None,
        }
    }
}

impl From<ConstraintSpec> for Predicate {
    fn from(spec: ConstraintSpec) -> Self {
        Self::Spec(spec)
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spec(spec) => write!(f, "Spec({})", spec),
            Self::Native(_) => write!(f, "Native(..)"),
        }
    }
}

// ── Constraint ──────────────────────────────────────────────────────

/// A reduction of possibility.
#[derive(Debug)]
pub struct Constraint {
    pub name: String,
    pub predicate: Predicate,
    pub layer: Layer,
    pub source: ConstraintSource,
    /// Cycle count at declaration time.
    pub declared_at: u64,
    /// Position in declaration order.
    pub order: usize,
}

impl Constraint {
    /// Whether a candidate satisfies this constraint.
    pub fn satisfied(&self, candidate: &Candidate) -> bool {
        self.predicate.test(candidate)
    }

    /// Self-description.
    pub fn describe(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: self.name.clone(),
            layer: self.layer,
            source: self.source,
            declared_at: self.declared_at,
            order: self.order,
            spec: self.predicate.spec().cloned(),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, from {})", self.name, self.layer, self.source)
    }
}

/// Serialisable description of a constraint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub layer: Layer,
    pub source: ConstraintSource,
    pub declared_at: u64,
    pub order: usize,
    /// Present when the predicate is a description rather than code.
    pub spec: Option<ConstraintSpec>,
}

// ── Registry ────────────────────────────────────────────────────────

/// Named constraints in declaration order.
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    constraints: Vec<Constraint>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint. Fails if the name is taken; the registry is
    /// left unchanged in that case.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
        layer: Layer,
        source: ConstraintSource,
        declared_at: u64,
    ) -> ChrysalisResult<&Constraint> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ChrysalisError::DuplicateConstraint(name));
        }

        let order = self.constraints.len();
        debug!(constraint = %name, %layer, %source, order, "constraint declared");
        self.constraints.push(Constraint {
            name,
            predicate,
            layer,
            source,
            declared_at,
            order,
        });
        Ok(&self.constraints[order])
    }

    /// Active constraints, oldest first.
    pub fn list_active(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn descriptors(&self) -> Vec<ConstraintDescriptor> {
        self.constraints.iter().map(Constraint::describe).collect()
    }

    /// Constraint count per layer. Every layer is present.
    pub fn layer_census(&self) -> BTreeMap<Layer, usize> {
        let mut census: BTreeMap<Layer, usize> = Layer::all().iter().map(|l| (*l, 0)).collect();
        for c in &self.constraints {
            *census.entry(c.layer).or_insert(0) += 1;
        }
        census
    }

    /// Constraint count per source. Every source is present.
    pub fn source_census(&self) -> BTreeMap<ConstraintSource, usize> {
        let mut census: BTreeMap<ConstraintSource, usize> = ConstraintSource::all()
            .iter()
            .map(|s| (*s, 0))
            .collect();
        for c in &self.constraints {
            *census.entry(c.source).or_insert(0) += 1;
        }
        census
    }
}

//! Chrysalis: a self-evolving constraint-narrowing engine.
//!
//! Each cycle passes through five layers of crystallization:
//! 1. **Void**: a candidate domain is generated from experience
//!    ([`void`]);
//! 2. **Mental**: named constraints are declared ([`constraint`]);
//! 3. **Astral**: the domain is narrowed constraint by constraint
//!    ([`narrowing`]);
//! 4. **Etheric**: the first survivor is bound and persisted ([`binder`]);
//! 5. **Physical**: the result and its trace are observable
//!    ([`trace`], [`observe`]).
//!
//! Between cycles the system grows itself: [`reflector`] turns ambiguous
//! results into new constraints and [`perturbator`] invents vocabulary when
//! results stop changing. [`evolution`] drives both.

#![deny(unsafe_code)]

pub mod binder;
pub mod chrysalis;
pub mod constraint;
pub mod error;
pub mod evolution;
pub mod narrowing;
pub mod observe;
pub mod perturbator;
pub mod reflector;
pub mod trace;
pub mod void;

// ── Re-exports ──────────────────────────────────────────────────────

pub use binder::Binder;
pub use chrysalis::Chrysalis;
pub use constraint::{Constraint, ConstraintDescriptor, ConstraintRegistry, NativePredicate, Predicate};
pub use error::{ChrysalisError, ChrysalisResult};
pub use evolution::{PerturbationEvent, ReflectionEvent, Trajectory, TrajectoryEntry};
pub use narrowing::{explore, resolve, Exploration, NarrowingStep};
pub use observe::{render_trace, render_trajectory, SelfDescription};
pub use perturbator::{Perturbator, VocabularyExpansions};
pub use reflector::{differentiating_keys, Proposal, Reflector};
pub use trace::{CrystallizationTrace, TraceId};
pub use void::{seed_domain, DomainGenerator, Experience, Vocabulary};

pub use chrysalis_types::{
    Candidate, ChrysalisConfig, ConfigError, ConstraintSource, ConstraintSpec, Domain, Layer,
};

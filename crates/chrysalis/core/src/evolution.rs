//! Iterated self-evolution.
//!
//! Each step crystallizes a freshly generated domain, then reflects on the
//! result. Perturbation only runs on a fixed-point step where reflection
//! found nothing to disambiguate.

use chrysalis_types::Candidate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chrysalis::Chrysalis;
use crate::error::{ChrysalisError, ChrysalisResult};

/// A constraint added by reflection during a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionEvent {
    pub constraint: String,
    pub key: String,
}

/// Outcome of a perturbation attempt during a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerturbationEvent {
    /// A new key was added to the vocabulary expansions.
    Expanded { key: String },
    /// No new key could be composed; the run is stagnating.
    Exhausted { vocabulary_size: usize },
}

/// One step of an evolution run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    pub step: usize,
    pub cycle: u64,
    pub domain_size: usize,
    pub survivor_count: usize,
    pub result: Candidate,
    pub reflection: Option<ReflectionEvent>,
    pub perturbation: Option<PerturbationEvent>,
    /// Result equals the previous step's result.
    pub fixed_point: bool,
    /// First step of a run of identical results.
    pub fixed_point_reached: bool,
    /// Earliest step of this run with the same result, when the result
    /// has been seen before.
    #[serde(default)]
    pub repeats_step: Option<usize>,
}

/// Ordered record of an evolution run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub entries: Vec<TrajectoryEntry>,
    pub first_fixed_point: Option<usize>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TrajectoryEntry) {
        if entry.fixed_point && self.first_fixed_point.is_none() {
            self.first_fixed_point = Some(entry.step);
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn final_result(&self) -> Option<&Candidate> {
        self.entries.last().map(|e| &e.result)
    }

    pub fn reflections(&self) -> impl Iterator<Item = &ReflectionEvent> {
        self.entries.iter().filter_map(|e| e.reflection.as_ref())
    }

    pub fn perturbations(&self) -> impl Iterator<Item = &PerturbationEvent> {
        self.entries.iter().filter_map(|e| e.perturbation.as_ref())
    }
}

impl Chrysalis {
    /// Run `steps` rounds of crystallize, reflect and (at a fixed point with
    /// nothing to reflect on) perturb.
    ///
    /// An unsatisfiable step aborts the run with its error.
    pub fn evolve(&mut self, steps: usize) -> ChrysalisResult<Trajectory> {
        let mut trajectory = Trajectory::new();

        for step in 0..steps {
            let trace = self.crystallize()?;

            let repeats_step = trajectory
                .entries
                .iter()
                .find(|e| e.result == trace.result)
                .map(|e| e.step);
            let previous = trajectory.entries.last();
            let fixed_point = previous.map(|p| p.result == trace.result).unwrap_or(false);
            let fixed_point_reached = fixed_point && previous.map(|p| !p.fixed_point).unwrap_or(false);
            if fixed_point_reached {
                info!(step, cycle = trace.cycle, "fixed point reached");
            }

            let reflection = self
                .reflect_on_key()?
                .map(|(descriptor, key)| ReflectionEvent {
                    constraint: descriptor.name,
                    key,
                });

            let perturbation = if fixed_point && reflection.is_none() {
                match self.perturb() {
                    Ok(key) => Some(PerturbationEvent::Expanded { key }),
                    Err(ChrysalisError::PerturbationExhausted { vocabulary_size }) => {
                        warn!(step, vocabulary_size, "perturbation exhausted, evolution stagnating");
                        Some(PerturbationEvent::Exhausted { vocabulary_size })
                    }
                    Err(e) => return Err(e),
                }
            } else {
                None
            };

            debug!(
                step,
                cycle = trace.cycle,
                survivors = trace.survivor_count(),
                fixed_point,
                "evolution step"
            );

            trajectory.push(TrajectoryEntry {
                step,
                cycle: trace.cycle,
                domain_size: trace.domain_size(),
                survivor_count: trace.survivor_count(),
                result: trace.result,
                reflection,
                perturbation,
                fixed_point,
                fixed_point_reached,
                repeats_step,
            });
        }

        Ok(trajectory)
    }
}

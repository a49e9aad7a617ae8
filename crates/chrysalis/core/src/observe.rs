//! Observation surface: self-description and text renderings.
//!
//! Every operation here is read-only. Rendered text is restricted to
//! printable ASCII; anything else in candidate values is escaped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrysalis_types::{portable, render_candidate, Candidate, ConstraintSource, Layer, RENDER_WIDTH};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chrysalis::Chrysalis;
use crate::constraint::ConstraintDescriptor;
use crate::evolution::{PerturbationEvent, Trajectory};
use crate::trace::CrystallizationTrace;

const RULE_WIDTH: usize = 60;
const CENSUS_BAR_WIDTH: usize = 10;

/// Machine-readable description of an instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfDescription {
    pub cycle_count: u64,
    pub birth: DateTime<Utc>,
    pub constraint_count: usize,
    pub constraints: Vec<ConstraintDescriptor>,
    pub constraints_by_source: BTreeMap<ConstraintSource, usize>,
    pub layer_census: BTreeMap<Layer, usize>,
    pub state: Candidate,
    pub vocabulary_expansions: BTreeMap<String, Value>,
    /// Distinct candidates currently held as experience. Bounded by the
    /// history window, so it is not a count of cycles; see `cycle_count`.
    pub experience_length: usize,
    /// Location of the persistence substrate, if one is attached.
    pub substrate: Option<String>,
}

impl Chrysalis {
    pub fn describe_self(&self) -> SelfDescription {
        let registry = self.registry();
        SelfDescription {
            cycle_count: self.cycle_count(),
            birth: self.birth(),
            constraint_count: registry.len(),
            constraints: registry.descriptors(),
            constraints_by_source: registry.source_census(),
            layer_census: registry.layer_census(),
            state: self.state().clone(),
            vocabulary_expansions: self.expansions().to_map(),
            experience_length: self.experience().len(),
            substrate: self.substrate(),
        }
    }

    /// Human-readable self-description.
    pub fn introspect(&self) -> String {
        render_description(&self.describe_self(), Utc::now())
    }
}

fn census_bar(count: usize) -> String {
    let filled = count.min(CENSUS_BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(CENSUS_BAR_WIDTH - filled))
}

fn render_description(desc: &SelfDescription, observed: DateTime<Utc>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        format!("  CHRYSALIS -- Cycle {}", desc.cycle_count),
        format!("  Born: {}", desc.birth.to_rfc3339()),
        format!("  Observed: {}", observed.to_rfc3339()),
        rule.clone(),
        String::new(),
        format!("  Constraints: {}", desc.constraint_count),
        format!("  State: {}", render_candidate(&desc.state, RENDER_WIDTH)),
        String::new(),
        "  Layer Census:".to_string(),
    ];

    for layer in Layer::all() {
        let count = desc.layer_census.get(layer).copied().unwrap_or(0);
        lines.push(format!(
            "    {:10} [{}] {}",
            layer.as_str(),
            census_bar(count),
            count
        ));
    }

    lines.push(String::new());
    lines.push("  Sources:".to_string());
    for source in ConstraintSource::all() {
        let count = desc.constraints_by_source.get(source).copied().unwrap_or(0);
        lines.push(format!("    {:16} {}", source.as_str(), count));
    }

    lines.push(String::new());
    lines.push("  Declared Constraints:".to_string());
    if desc.constraints.is_empty() {
        lines.push("    (none)".to_string());
    }
    for c in &desc.constraints {
        lines.push(format!(
            "    [{:8}] {} (from: {}, cycle: {})",
            c.layer.as_str(),
            c.name,
            c.source,
            c.declared_at
        ));
    }

    lines.push(String::new());
    if desc.vocabulary_expansions.is_empty() {
        lines.push("  Vocabulary Expansions: (none)".to_string());
    } else {
        let keys: Vec<&str> = desc.vocabulary_expansions.keys().map(String::as_str).collect();
        lines.push(format!("  Vocabulary Expansions: {}", keys.join(", ")));
    }
    lines.push(format!("  Experience Depth: {}", desc.experience_length));
    lines.push(format!(
        "  Substrate: {}",
        desc.substrate.as_deref().unwrap_or("(unbound)")
    ));
    lines.push(rule);

    portable(&lines.join("\n"))
}

fn render_list(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| render_candidate(c, RENDER_WIDTH))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one crystallization layer by layer.
pub fn render_trace(trace: &CrystallizationTrace) -> String {
    let indent = " ".repeat(13);
    let mut lines = vec![
        "  - - - CRYSTALLIZATION - - -".to_string(),
        String::new(),
        format!("  [VOID]     {} candidates enter as potential", trace.domain_size()),
    ];
    if !trace.domain.is_empty() {
        lines.push(format!("{}{}", indent, render_list(&trace.domain)));
    }

    lines.push(String::new());
    lines.push(format!("  [MENTAL]   {} constraints active", trace.constraints.len()));
    for c in &trace.constraints {
        lines.push(format!("{}- {} ({}, from {})", indent, c.name, c.layer, c.source));
    }

    lines.push(String::new());
    lines.push("  [ASTRAL]   Narrowing:".to_string());
    for step in &trace.narrowing {
        let arrow = format!("{} -> {}", step.before, step.after);
        let tag = match step.eliminated() {
            0 => "(all survive)".to_string(),
            n => format!("({} eliminated)", n),
        };
        lines.push(format!("{}{:20} {:10} {}", indent, step.constraint, arrow, tag));
    }
    lines.push(format!("{}Survivors: {}", indent, trace.survivor_count()));
    if !trace.survivors.is_empty() {
        lines.push(format!("{}{}", indent, render_list(&trace.survivors)));
    }

    lines.push(String::new());
    lines.push(format!(
        "  [ETHERIC]  Bound to state at cycle {}: {}{}",
        trace.cycle,
        render_candidate(&trace.result, RENDER_WIDTH),
        if trace.persisted { " (persisted)" } else { "" }
    ));
    lines.push(String::new());
    lines.push(format!(
        "  [PHYSICAL] Result: {}",
        render_candidate(&trace.result, RENDER_WIDTH)
    ));

    portable(&lines.join("\n"))
}

/// Render an evolution run, one line per step.
pub fn render_trajectory(trajectory: &Trajectory) -> String {
    let mut lines = vec![format!("  EVOLUTION -- {} steps", trajectory.len())];

    for entry in &trajectory.entries {
        let mut line = format!(
            "  [{:>3}] cycle {:<4} {:>3} -> {:<3} {}",
            entry.step,
            entry.cycle,
            entry.domain_size,
            entry.survivor_count,
            render_candidate(&entry.result, RENDER_WIDTH)
        );
        if entry.fixed_point_reached {
            line.push_str("  [FIXED POINT]");
        } else if entry.fixed_point {
            line.push_str("  [fixed]");
        }
        if let Some(r) = &entry.reflection {
            line.push_str(&format!("  +reflect {}", r.constraint));
        }
        match &entry.perturbation {
            Some(PerturbationEvent::Expanded { key }) => {
                line.push_str(&format!("  +perturb {}", key));
            }
            Some(PerturbationEvent::Exhausted { vocabulary_size }) => {
                line.push_str(&format!("  [STAGNANT: {} keys]", vocabulary_size));
            }
            None => {}
        }
        lines.push(line);
    }

    match trajectory.first_fixed_point {
        Some(step) => lines.push(format!("  First fixed point at step {}", step)),
        None => lines.push("  No fixed point reached".to_string()),
    }

    portable(&lines.join("\n"))
}

//! Ontological layers and constraint provenance.

use serde::{Deserialize, Serialize};

// ── Layer ───────────────────────────────────────────────────────────

/// The five layers of progressive crystallization.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Unconstrained potential.
    Void,
    /// Constraint declarations.
    #[default]
    Mental,
    /// Constraint resolution over the candidate space.
    Astral,
    /// Binding of the resolved form to durable state.
    Etheric,
    /// Observable output.
    Physical,
}

impl Layer {
    /// All layers in stack order.
    pub fn all() -> &'static [Layer] {
        &[
            Layer::Void,
            Layer::Mental,
            Layer::Astral,
            Layer::Etheric,
            Layer::Physical,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Mental => "mental",
            Self::Astral => "astral",
            Self::Etheric => "etheric",
            Self::Physical => "physical",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Constraint Source ───────────────────────────────────────────────

/// Where a constraint came from.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintSource {
    /// Declared by code or an operator.
    #[default]
    External,
    /// Synthesised by reflecting on an ambiguous crystallization.
    SelfReflection,
    /// Synthesised while escaping a fixed point.
    SelfPerturbation,
}

impl ConstraintSource {
    pub fn all() -> &'static [ConstraintSource] {
        &[
            ConstraintSource::External,
            ConstraintSource::SelfReflection,
            ConstraintSource::SelfPerturbation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::SelfReflection => "self-reflection",
            Self::SelfPerturbation => "self-perturbation",
        }
    }
}

impl std::fmt::Display for ConstraintSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

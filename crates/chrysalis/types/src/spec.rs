//! Constraint description language.
//!
//! Opaque predicate closures cannot be persisted or inspected. A
//! `ConstraintSpec` is a small tagged description that evaluates the same way
//! and serialises as `{"kind": "key_truthy", "key": "aware"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::{is_truthy, Candidate};

/// A serialisable predicate over candidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintSpec {
    /// The candidate is not the ground candidate.
    Exists,
    /// The candidate is a key/value mapping.
    IsMapping,
    /// The mapping contains `key`, whatever its value.
    KeyPresent { key: String },
    /// The mapping contains `key` bound to a truthy value.
    KeyTruthy { key: String },
    /// The mapping binds `key` to exactly `value`.
    KeyEquals { key: String, value: Value },
    /// Negation.
    Not { spec: Box<ConstraintSpec> },
    /// Every inner spec holds. Empty is true.
    All { specs: Vec<ConstraintSpec> },
    /// At least one inner spec holds. Empty is false.
    Any { specs: Vec<ConstraintSpec> },
}

impl ConstraintSpec {
    pub fn key_present(key: impl Into<String>) -> Self {
        Self::KeyPresent { key: key.into() }
    }

    pub fn key_truthy(key: impl Into<String>) -> Self {
        Self::KeyTruthy { key: key.into() }
    }

    pub fn key_equals(key: impl Into<String>, value: Value) -> Self {
        Self::KeyEquals {
            key: key.into(),
            value,
        }
    }

    pub fn negate(spec: ConstraintSpec) -> Self {
        Self::Not {
            spec: Box::new(spec),
        }
    }

    /// Evaluate this description against a candidate.
    pub fn evaluate(&self, candidate: &Candidate) -> bool {
        match self {
            Self::Exists => !candidate.is_null(),
            Self::IsMapping => candidate.is_object(),
            Self::KeyPresent { key } => candidate
                .as_object()
                .map(|m| m.contains_key(key))
                .unwrap_or(false),
            Self::KeyTruthy { key } => candidate
                .as_object()
                .and_then(|m| m.get(key))
                .map(is_truthy)
                .unwrap_or(false),
            Self::KeyEquals { key, value } => candidate
                .as_object()
                .and_then(|m| m.get(key))
                .map(|v| v == value)
                .unwrap_or(false),
            Self::Not { spec } => !spec.evaluate(candidate),
            Self::All { specs } => specs.iter().all(|s| s.evaluate(candidate)),
            Self::Any { specs } => specs.iter().any(|s| s.evaluate(candidate)),
        }
    }
}

impl std::fmt::Display for ConstraintSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::IsMapping => write!(f, "is_mapping"),
            Self::KeyPresent { key } => write!(f, "key_present({})", key),
            Self::KeyTruthy { key } => write!(f, "key_truthy({})", key),
            Self::KeyEquals { key, value } => write!(f, "key_equals({}={})", key, value),
            Self::Not { spec } => write!(f, "not({})", spec),
            Self::All { specs } => {
                let inner: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
                write!(f, "all({})", inner.join(", "))
            }
            Self::Any { specs } => {
                let inner: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
                write!(f, "any({})", inner.join(", "))
            }
        }
    }
}

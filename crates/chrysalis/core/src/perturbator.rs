//! Perturbation: synthesising new vocabulary to escape a fixed point.
//!
//! # Escalation
//!
//! Compounds are built from the sorted vocabulary keys the caller passes;
//! the engine passes observed keys only, never expansions. A compound is new
//! when neither the vocabulary nor the existing expansions contain it. The
//! first new compound wins:
//!
//! 1. pairs `a_b` for every `i < j`;
//! 2. triples `a_b_c` for every `i < j < k`;
//! 3. depth-marked pairs `a_b_d{n}` for `n` in `2..=max_depth`.
//!
//! Every tier is finite. Fewer than two keys, or all tiers taken, is
//! reported as `PerturbationExhausted`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{ChrysalisError, ChrysalisResult};

/// Marker value bound to every synthesised key.
pub fn expansion_marker() -> Value {
    Value::Bool(true)
}

// ── Vocabulary Expansions ───────────────────────────────────────────

/// Append-only synthesised vocabulary.
///
/// Kept apart from state so that a wholesale bind cannot erase it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyExpansions {
    entries: BTreeMap<String, Value>,
}

impl VocabularyExpansions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Add a key bound to the marker. Returns false if it already exists;
    /// existing entries are never replaced.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, expansion_marker());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Perturbator ─────────────────────────────────────────────────────

/// Composes existing keys into genuinely new ones.
#[derive(Clone, Debug)]
pub struct Perturbator {
    max_depth: u32,
}

impl Perturbator {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Find the next new compound key without recording it.
    pub fn synthesize(
        &self,
        vocabulary: &BTreeSet<String>,
        expansions: &VocabularyExpansions,
    ) -> ChrysalisResult<String> {
        let keys: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
        let mut known: BTreeSet<&str> = keys.iter().copied().collect();
        known.extend(expansions.keys());

        let exhausted = ChrysalisError::PerturbationExhausted {
            vocabulary_size: keys.len(),
        };
        if keys.len() < 2 {
            return Err(exhausted);
        }

        let n = keys.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let key = format!("{}_{}", keys[i], keys[j]);
                if !known.contains(key.as_str()) {
                    return Ok(key);
                }
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let key = format!("{}_{}_{}", keys[i], keys[j], keys[k]);
                    if !known.contains(key.as_str()) {
                        return Ok(key);
                    }
                }
            }
        }

        for depth in 2..=self.max_depth {
            for i in 0..n {
                for j in (i + 1)..n {
                    let key = format!("{}_{}_d{}", keys[i], keys[j], depth);
                    if !known.contains(key.as_str()) {
                        return Ok(key);
                    }
                }
            }
        }

        Err(exhausted)
    }

    /// Synthesise a new key and append it to `expansions`.
    pub fn perturb(
        &self,
        vocabulary: &BTreeSet<String>,
        expansions: &mut VocabularyExpansions,
    ) -> ChrysalisResult<String> {
        let key = self.synthesize(vocabulary, expansions)?;
        expansions.insert(key.clone());
        info!(key = %key, expansions = expansions.len(), "vocabulary perturbed");
        Ok(key)
    }
}

impl Default for Perturbator {
    fn default() -> Self {
        Self::new(8)
    }
}

//! Domain generation (Void layer).
//!
//! Builds the candidate domain for a cycle from vocabulary: the keys seen in
//! accumulated experience and, per key, the values observed for it.
//!
//! # Composition rule
//!
//! Every key is independently omitted or bound to one of its observed
//! values, and every such combination is a candidate. Order is fixed:
//!
//! 1. the ground candidate (`null`);
//! 2. mappings by ascending number of bound keys, so `{}` comes second;
//! 3. within one size, lexicographic order of the sorted
//!    `(key, canonical value)` sequence.
//!
//! Remembered mappings (the current state, then experience from newest to
//! oldest) take their slots under the cap first. Composed candidates are
//! produced lazily in the order above and fill the remaining slots. The two
//! sets are merged into that same order, so a survivor that justified a
//! constraint stays reachable however narrow the domain becomes.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrysalis_types::{canonical, ground, Candidate, Domain};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::perturbator::VocabularyExpansions;

/// The domain used when experience yields no vocabulary.
pub fn seed_domain() -> Domain {
    vec![
        ground(),
        json!({}),
        json!({"alive": true}),
        json!({"alive": true, "aware": true}),
    ]
}

// ── Experience ──────────────────────────────────────────────────────

/// Bounded rolling memory of recent results and survivors.
///
/// Re-observing a candidate moves it to the most recent position instead
/// of storing it twice; the oldest entries fall off past `window`.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    window: usize,
    entries: VecDeque<Candidate>,
}

impl Experience {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Rebuild from persisted history, keeping the most recent entries.
    pub fn from_history(window: usize, history: Vec<Candidate>) -> Self {
        let mut experience = Self::new(window);
        for candidate in history {
            experience.remember(candidate);
        }
        experience
    }

    /// Record one cycle's result and survivors.
    pub fn record(&mut self, result: &Candidate, survivors: &[Candidate]) {
        self.remember(result.clone());
        for survivor in survivors {
            self.remember(survivor.clone());
        }
    }

    /// Record a single candidate as the most recent entry.
    pub fn remember(&mut self, candidate: Candidate) {
        if let Some(pos) = self.entries.iter().position(|c| *c == candidate) {
            self.entries.remove(pos);
        }
        self.entries.push_back(candidate);
        while self.entries.len() > self.window {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    /// Entries from newest to oldest.
    pub fn recent(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().rev()
    }

    pub fn to_history(&self) -> Vec<Candidate> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

// ── Vocabulary ──────────────────────────────────────────────────────

/// Keys and, per key, the distinct observed values (by canonical form).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    entries: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract vocabulary from the current state, experience and expansions.
    pub fn extract(
        state: &Candidate,
        experience: &Experience,
        expansions: &VocabularyExpansions,
    ) -> Self {
        let mut vocabulary = Self::new();
        vocabulary.observe(state);
        for candidate in experience.entries() {
            vocabulary.observe(candidate);
        }
        for (key, marker) in expansions.iter() {
            vocabulary.insert(key, marker.clone());
        }
        vocabulary
    }

    /// Add every key/value of a mapping candidate. Scalars add nothing.
    pub fn observe(&mut self, candidate: &Candidate) {
        if let Value::Object(map) = candidate {
            for (key, value) in map {
                self.insert(key, value.clone());
            }
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(canonical(&value), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn key_set(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Observed values for `key`, in canonical order.
    pub fn values(&self, key: &str) -> Vec<&Value> {
        self.entries
            .get(key)
            .map(|vals| vals.values().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Domain Generator ────────────────────────────────────────────────

/// Deterministic, capped domain generator.
#[derive(Clone, Debug)]
pub struct DomainGenerator {
    max_domain_size: usize,
}

impl DomainGenerator {
    pub fn new(max_domain_size: usize) -> Self {
        Self {
            max_domain_size: max_domain_size.max(1),
        }
    }

    pub fn max_domain_size(&self) -> usize {
        self.max_domain_size
    }

    /// Generate the domain for the next cycle.
    pub fn generate_domain(
        &self,
        state: &Candidate,
        experience: &Experience,
        expansions: &VocabularyExpansions,
    ) -> Domain {
        let remembered: Vec<Candidate> = std::iter::once(state)
            .chain(experience.recent())
            .cloned()
            .collect();
        self.generate_with(&Vocabulary::extract(state, experience, expansions), &remembered)
    }

    /// Compose candidates from a vocabulary.
    pub fn generate(&self, vocabulary: &Vocabulary) -> Domain {
        self.generate_with(vocabulary, &[])
    }

    /// Compose candidates from a vocabulary, reserving slots for the
    /// `remembered` mappings in the order given. Scalars are skipped.
    pub fn generate_with(&self, vocabulary: &Vocabulary, remembered: &[Candidate]) -> Domain {
        if vocabulary.is_empty() {
            debug!("no vocabulary, using seed domain");
            let mut domain = seed_domain();
            domain.truncate(self.max_domain_size);
            return domain;
        }

        let slots = self.max_domain_size - 1;
        let mut kept: Vec<Candidate> = Vec::new();
        for candidate in remembered {
            if kept.len() >= slots {
                break;
            }
            if candidate.is_object() && !kept.contains(candidate) {
                kept.push(candidate.clone());
            }
        }

        let entries: Vec<(&str, Vec<&Value>)> = vocabulary
            .keys()
            .map(|k| (k, vocabulary.values(k)))
            .collect();

        let composed = {
            let mut composer = Composer {
                entries: &entries,
                skip: &kept,
                limit: slots - kept.len(),
                current: Map::new(),
                out: Vec::new(),
            };
            for size in 0..=entries.len() {
                if !composer.compose(0, size) {
                    break;
                }
            }
            composer.out
        };
        let reserved = kept.len();

        let mut body = kept;
        body.extend(composed);
        body.sort_by_cached_key(order_key);

        let mut domain = Vec::with_capacity(body.len() + 1);
        domain.push(ground());
        domain.extend(body);

        debug!(
            keys = entries.len(),
            reserved,
            domain_size = domain.len(),
            cap = self.max_domain_size,
            "domain generated"
        );
        domain
    }
}

/// Position of a mapping in the composition order.
fn order_key(candidate: &Candidate) -> (usize, Vec<(String, String)>) {
    match candidate {
        Value::Object(map) => {
            let mut bindings: Vec<(String, String)> = map
                .iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect();
            bindings.sort();
            (map.len(), bindings)
        }
        _ => (0, Vec::new()),
    }
}

/// Lazy omit-or-bind product over the vocabulary entries.
struct Composer<'a> {
    entries: &'a [(&'a str, Vec<&'a Value>)],
    skip: &'a [Candidate],
    limit: usize,
    current: Map<String, Value>,
    out: Vec<Candidate>,
}

impl Composer<'_> {
    /// Depth-first composition of `remaining` more bindings from keys at
    /// `start..`. Returns false once `limit` candidates are produced.
    fn compose(&mut self, start: usize, remaining: usize) -> bool {
        if self.out.len() >= self.limit {
            return false;
        }
        if remaining == 0 {
            let candidate = Value::Object(self.current.clone());
            if !self.skip.contains(&candidate) {
                self.out.push(candidate);
            }
            return self.out.len() < self.limit;
        }

        let entries = self.entries;
        for i in start..entries.len() {
            if entries.len() - i < remaining {
                break;
            }
            let (key, values) = &entries[i];
            for value in values {
                self.current.insert(key.to_string(), (*value).clone());
                let more = self.compose(i + 1, remaining - 1);
                self.current.remove(*key);
                if !more {
                    return false;
                }
            }
        }
        true
    }
}

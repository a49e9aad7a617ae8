//! Reflection: turning an ambiguous crystallization into a new constraint.
//!
//! The reflector looks at every survivor of the last cycle, not just the
//! chosen one. Keys present in some survivors but not all are
//! *differentiating*; the first usable one in sorted order becomes a
//! `requires_<key>` constraint demanding that key be present and truthy.

use std::collections::BTreeSet;

use chrysalis_types::{is_truthy, key_set, Candidate, ConstraintSpec};

/// A constraint proposed by reflection.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub name: String,
    pub key: String,
    pub spec: ConstraintSpec,
}

/// Keys present in at least one survivor but missing from another.
pub fn differentiating_keys(survivors: &[Candidate]) -> BTreeSet<String> {
    let mut union: BTreeSet<&str> = BTreeSet::new();
    let mut common: Option<BTreeSet<&str>> = None;

    for survivor in survivors {
        let keys = key_set(survivor);
        union.extend(keys.iter().copied());
        common = Some(match common {
            None => keys,
            Some(c) => c.intersection(&keys).copied().collect(),
        });
    }

    let common = common.unwrap_or_default();
    union
        .difference(&common)
        .map(|k| k.to_string())
        .collect()
}

/// Name of the constraint synthesised for `key`.
pub fn requirement_name(key: &str) -> String {
    format!("requires_{}", key)
}

/// Stateless reflection policy.
#[derive(Clone, Debug, Default)]
pub struct Reflector;

impl Reflector {
    pub fn new() -> Self {
        Self
    }

    /// Propose a constraint for `survivors`, or nothing if they are not
    /// ambiguous.
    ///
    /// A differentiating key qualifies when at least one survivor binds it to
    /// a truthy value (otherwise the requirement would eliminate every
    /// survivor) and `is_taken` does not report its name as registered.
    pub fn propose(
        &self,
        survivors: &[Candidate],
        is_taken: impl Fn(&str) -> bool,
    ) -> Option<Proposal> {
        if survivors.len() < 2 {
            return None;
        }

        differentiating_keys(survivors).into_iter().find_map(|key| {
            let name = requirement_name(&key);
            let satisfiable = survivors.iter().any(|s| {
                s.as_object()
                    .and_then(|m| m.get(&key))
                    .map(is_truthy)
                    .unwrap_or(false)
            });
            if !satisfiable || is_taken(&name) {
                return None;
            }
            Some(Proposal {
                name,
                spec: ConstraintSpec::key_truthy(key.clone()),
                key,
            })
        })
    }
}

//! Property tests: generated domains are capped, grounded and deterministic.

use chrysalis_core::*;
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_mapping() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]{1,2}", prop_oneof![Just(json!(true)), (0i64..4).prop_map(|n| json!(n))], 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_experience(window: usize) -> impl Strategy<Value = Experience> {
    prop::collection::vec(arb_mapping(), 0..8)
        .prop_map(move |history| Experience::from_history(window, history))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn domain_respects_cap_and_contains_ground(
        cap in 1usize..64,
        state in arb_mapping(),
        experience in arb_experience(16),
    ) {
        let generator = DomainGenerator::new(cap);
        let domain = generator.generate_domain(&state, &experience, &VocabularyExpansions::new());

        prop_assert!(!domain.is_empty());
        prop_assert!(domain.len() <= cap);
        prop_assert!(domain[0].is_null());
    }

    #[test]
    fn state_is_always_reachable(
        cap in 2usize..64,
        state in arb_mapping(),
        experience in arb_experience(16),
    ) {
        let domain = DomainGenerator::new(cap)
            .generate_domain(&state, &experience, &VocabularyExpansions::new());
        prop_assert!(domain.contains(&state));
    }

    #[test]
    fn domain_has_no_duplicates(state in arb_mapping(), experience in arb_experience(16)) {
        let domain = DomainGenerator::new(128)
            .generate_domain(&state, &experience, &VocabularyExpansions::new());
        for (i, a) in domain.iter().enumerate() {
            prop_assert!(!domain[i + 1..].contains(a));
        }
    }

    #[test]
    fn domain_sizes_never_shrink_along_the_order(state in arb_mapping(), experience in arb_experience(16)) {
        let domain = DomainGenerator::new(128)
            .generate_domain(&state, &experience, &VocabularyExpansions::new());
        let sizes: Vec<usize> = domain[1..]
            .iter()
            .map(|c| c.as_object().map(|m| m.len()).unwrap_or(0))
            .collect();
        prop_assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn generation_is_deterministic(state in arb_mapping(), experience in arb_experience(16)) {
        let generator = DomainGenerator::new(64);
        let expansions = VocabularyExpansions::new();
        prop_assert_eq!(
            generator.generate_domain(&state, &experience, &expansions),
            generator.generate_domain(&state, &experience, &expansions)
        );
    }

    #[test]
    fn experience_stays_within_window(
        window in 1usize..8,
        history in prop::collection::vec(arb_mapping(), 0..24),
    ) {
        let experience = Experience::from_history(window, history);
        prop_assert!(experience.len() <= window);
    }

    #[test]
    fn seed_domain_truncates_to_cap(cap in 1usize..8) {
        let domain = DomainGenerator::new(cap)
            .generate_domain(&json!(null), &Experience::new(4), &VocabularyExpansions::new());
        let expected: Vec<Value> = seed_domain().into_iter().take(cap).collect();
        prop_assert_eq!(domain, expected);
    }
}

//! Property tests: perturbation always invents a key nobody has seen.

use std::collections::BTreeSet;

use chrysalis_core::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_vocabulary() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,4}", 0..5)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn perturbed_keys_are_new(vocabulary in arb_vocabulary(), rounds in 1usize..12) {
        let perturbator = Perturbator::new(4);
        let mut expansions = VocabularyExpansions::new();

        for _ in 0..rounds {
            let before = expansions.clone();
            match perturbator.perturb(&vocabulary, &mut expansions) {
                Ok(key) => {
                    prop_assert!(!vocabulary.contains(&key));
                    prop_assert!(!before.contains(&key));
                    prop_assert_eq!(expansions.len(), before.len() + 1);
                }
                Err(ChrysalisError::PerturbationExhausted { vocabulary_size }) => {
                    prop_assert_eq!(vocabulary_size, vocabulary.len());
                    prop_assert_eq!(&expansions, &before);
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn small_vocabularies_are_exhausted(key in "[a-z]{1,4}", single in any::<bool>()) {
        let vocabulary: BTreeSet<String> = if single {
            std::iter::once(key).collect()
        } else {
            BTreeSet::new()
        };
        let result = Perturbator::default().synthesize(&vocabulary, &VocabularyExpansions::new());
        let is_exhausted = matches!(result, Err(ChrysalisError::PerturbationExhausted { .. }));
        prop_assert!(is_exhausted);
    }

    #[test]
    fn perturbation_terminates(vocabulary in prop::collection::btree_set("[a-c]", 2..4)) {
        // Every tier is finite, so repeated perturbation must end in exhaustion.
        let perturbator = Perturbator::new(3);
        let mut expansions = VocabularyExpansions::new();
        let mut produced = 0;
        while perturbator.perturb(&vocabulary, &mut expansions).is_ok() {
            produced += 1;
            prop_assert!(produced < 100);
        }
        prop_assert_eq!(expansions.len(), produced);
    }
}

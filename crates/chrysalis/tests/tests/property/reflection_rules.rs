//! Property tests: reflection only fires on real ambiguity, and what it adds
//! keeps some survivor alive.

use chrysalis_core::*;
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_survivor() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(
        prop::sample::select(vec!["a", "b", "c", "d"]),
        prop_oneof![Just(json!(true)), Just(json!(false)), Just(json!(1))],
        0..4,
    )
    .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect()))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_survivor_reflects_nothing(survivor in arb_survivor()) {
        prop_assert!(Reflector::new().propose(&[survivor], |_| false).is_none());
    }

    #[test]
    fn proposal_is_differentiating_and_satisfiable(
        survivors in prop::collection::vec(arb_survivor(), 2..6),
    ) {
        if let Some(proposal) = Reflector::new().propose(&survivors, |_| false) {
            prop_assert!(differentiating_keys(&survivors).contains(&proposal.key));
            prop_assert_eq!(&proposal.name, &format!("requires_{}", proposal.key));
            prop_assert!(survivors.iter().any(|s| proposal.spec.evaluate(s)));
            prop_assert!(!survivors.iter().all(|s| proposal.spec.evaluate(s)));
        }
    }

    #[test]
    fn reflected_constraint_narrows_the_same_domain(
        survivors in prop::collection::vec(arb_survivor(), 2..6),
    ) {
        let mut c = Chrysalis::new();
        c.declare_spec("mapping", ConstraintSpec::IsMapping, Layer::Mental, ConstraintSource::External)
            .unwrap();
        let first = c.cycle(survivors.clone()).unwrap();

        if c.reflect().unwrap().is_some() {
            let second = c.cycle(survivors.clone()).unwrap();
            prop_assert!(second.survivor_count() >= 1);
            prop_assert!(second.survivor_count() < first.survivor_count());
        }
    }
}

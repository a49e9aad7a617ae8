//! Property tests: narrowing only ever removes candidates.

use chrysalis_core::*;
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const KEYS: [&str; 4] = ["alive", "aware", "calm", "deep"];

/// A candidate: ground, a small integer, or a mapping over a fixed key set.
fn arb_candidate() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!(null)),
        (-3i64..3).prop_map(|n| json!(n)),
        prop::collection::btree_map(
            prop::sample::select(KEYS.to_vec()),
            prop_oneof![Just(json!(true)), Just(json!(false)), (0i64..3).prop_map(|n| json!(n))],
            0..4,
        )
        .prop_map(|m| {
            let map: serde_json::Map<String, Value> =
                m.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
            Value::Object(map)
        }),
    ]
}

fn arb_spec() -> impl Strategy<Value = ConstraintSpec> {
    let leaf = prop_oneof![
        Just(ConstraintSpec::Exists),
        Just(ConstraintSpec::IsMapping),
        prop::sample::select(KEYS.to_vec()).prop_map(ConstraintSpec::key_present),
        prop::sample::select(KEYS.to_vec()).prop_map(ConstraintSpec::key_truthy),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(ConstraintSpec::negate),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|specs| ConstraintSpec::All { specs }),
            prop::collection::vec(inner, 1..3).prop_map(|specs| ConstraintSpec::Any { specs }),
        ]
    })
}

fn instance_with(specs: &[ConstraintSpec]) -> Chrysalis {
    let mut c = Chrysalis::new();
    for (i, spec) in specs.iter().enumerate() {
        c.declare_spec(format!("c{}", i), spec.clone(), Layer::Mental, ConstraintSource::External)
            .unwrap();
    }
    c
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn survivors_never_increase(
        domain in prop::collection::vec(arb_candidate(), 0..12),
        specs in prop::collection::vec(arb_spec(), 0..5),
    ) {
        let c = instance_with(&specs);
        let exploration = c.explore(&domain);

        let mut previous = domain.len();
        for step in &exploration.steps {
            prop_assert_eq!(step.before, previous);
            prop_assert!(step.after <= step.before);
            previous = step.after;
        }
        prop_assert_eq!(exploration.survivors.len(), previous);
    }

    #[test]
    fn survivors_satisfy_every_constraint(
        domain in prop::collection::vec(arb_candidate(), 0..12),
        specs in prop::collection::vec(arb_spec(), 0..5),
    ) {
        let c = instance_with(&specs);
        for survivor in c.explore(&domain).survivors {
            prop_assert!(specs.iter().all(|s| s.evaluate(&survivor)));
            prop_assert!(domain.contains(&survivor));
        }
    }

    #[test]
    fn failed_cycle_binds_nothing(
        domain in prop::collection::vec(arb_candidate(), 0..12),
        specs in prop::collection::vec(arb_spec(), 0..5),
    ) {
        let mut c = instance_with(&specs);
        match c.cycle(domain.clone()) {
            Ok(trace) => {
                prop_assert_eq!(c.cycle_count(), 1);
                prop_assert_eq!(c.state(), &trace.result);
                prop_assert_eq!(Some(&trace.result), trace.survivors.first());
            }
            Err(ChrysalisError::Unsatisfiable { domain_size, .. }) => {
                prop_assert_eq!(domain_size, domain.len());
                prop_assert_eq!(c.cycle_count(), 0);
                prop_assert!(c.state().is_null());
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}

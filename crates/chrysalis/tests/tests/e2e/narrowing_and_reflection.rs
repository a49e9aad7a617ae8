//! E2E: a cycle narrows the living domain, reflection removes its ambiguity.

use chrysalis_core::*;
use serde_json::json;

fn living_domain() -> Domain {
    vec![
        json!(null),
        json!({}),
        json!({"alive": true}),
        json!({"alive": true, "aware": true}),
    ]
}

fn declare_axioms(c: &mut Chrysalis) {
    c.declare_spec("exists", ConstraintSpec::Exists, Layer::Mental, ConstraintSource::External)
        .unwrap();
    c.declare_spec(
        "alive",
        ConstraintSpec::key_truthy("alive"),
        Layer::Astral,
        ConstraintSource::External,
    )
    .unwrap();
}

fn counts(trace: &CrystallizationTrace) -> Vec<(usize, usize)> {
    trace.narrowing.iter().map(|s| (s.before, s.after)).collect()
}

#[test]
fn narrows_reflects_and_renarrows() {
    let mut c = Chrysalis::new();
    declare_axioms(&mut c);

    let first = c.cycle(living_domain()).unwrap();
    assert_eq!(counts(&first), vec![(4, 3), (3, 2)]);
    assert_eq!(
        first.survivors,
        vec![json!({"alive": true}), json!({"alive": true, "aware": true})]
    );
    assert_eq!(first.result, json!({"alive": true}));

    let reflected = c.reflect().unwrap().unwrap();
    assert_eq!(reflected.name, "requires_aware");
    assert_eq!(reflected.layer, Layer::Astral);
    assert_eq!(reflected.declared_at, 1);
    assert_eq!(reflected.spec, Some(ConstraintSpec::key_truthy("aware")));

    let second = c.cycle(living_domain()).unwrap();
    assert_eq!(counts(&second), vec![(4, 3), (3, 2), (2, 1)]);
    assert_eq!(second.survivors, vec![json!({"alive": true, "aware": true})]);
    assert_eq!(c.state(), &json!({"alive": true, "aware": true}));

    assert!(c.reflect().unwrap().is_none());
    assert_eq!(c.registry().len(), 3);
}

#[test]
fn resolve_does_not_bind() {
    let mut c = Chrysalis::new();
    declare_axioms(&mut c);

    assert_eq!(c.resolve(&living_domain()).unwrap(), json!({"alive": true}));
    assert_eq!(c.cycle_count(), 0);
    assert!(c.state().is_null());
}

#[test]
fn native_and_described_constraints_mix() {
    let mut c = Chrysalis::new();
    c.declare_spec("mapping", ConstraintSpec::IsMapping, Layer::Mental, ConstraintSource::External)
        .unwrap();
    c.declare(
        "small",
        |v| v.as_object().map(|m| m.len() <= 1).unwrap_or(false),
        Layer::Mental,
        ConstraintSource::External,
    )
    .unwrap();

    let trace = c.cycle(living_domain()).unwrap();
    assert_eq!(counts(&trace), vec![(4, 3), (3, 2)]);
    assert_eq!(trace.result, json!({}));

    let descriptors = c.registry().descriptors();
    assert!(descriptors[0].spec.is_some());
    assert!(descriptors[1].spec.is_none());
}

#[test]
fn unsatisfiable_leaves_everything_untouched() {
    let mut c = Chrysalis::new();
    declare_axioms(&mut c);
    c.cycle(living_domain()).unwrap();

    c.declare_spec(
        "dead",
        ConstraintSpec::negate(ConstraintSpec::key_truthy("alive")),
        Layer::Mental,
        ConstraintSource::External,
    )
    .unwrap();

    let before = (c.state().clone(), c.cycle_count(), c.experience().to_history());
    let err = c.cycle(living_domain()).unwrap_err();
    assert!(matches!(
        err,
        ChrysalisError::Unsatisfiable {
            domain_size: 4,
            constraint_count: 3
        }
    ));
    assert_eq!(before, (c.state().clone(), c.cycle_count(), c.experience().to_history()));
}

//! E2E: lifetimes continue through the persisted record.

use chrysalis_core::*;
use chrysalis_etheric::{JsonFileStore, PersistedRecord, RecordStore};
use serde_json::json;

fn axiomatic() -> Chrysalis {
    let mut c = Chrysalis::new();
    c.declare_spec("exists", ConstraintSpec::Exists, Layer::Mental, ConstraintSource::External)
        .unwrap();
    c.declare_spec(
        "alive",
        ConstraintSpec::key_truthy("alive"),
        Layer::Astral,
        ConstraintSource::External,
    )
    .unwrap();
    c
}

#[test]
fn save_then_load_reproduces_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");

    let mut original = axiomatic();
    original.evolve(3).unwrap();
    original.save(&path).unwrap();

    let mut restored = axiomatic();
    assert!(restored.load(&path).unwrap());
    assert_eq!(restored.state(), original.state());
    assert_eq!(restored.cycle_count(), original.cycle_count());
    assert_eq!(restored.expansions(), original.expansions());
    assert_eq!(restored.experience().to_history(), original.experience().to_history());
}

#[test]
fn bound_instance_continues_counting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("record.json");

    let mut first = axiomatic();
    assert!(!first.bind_etheric(&path));
    first.crystallize().unwrap();
    first.crystallize().unwrap();
    assert!(path.exists());

    let mut second = axiomatic();
    assert!(second.bind_etheric(&path));
    assert_eq!(second.cycle_count(), 2);
    assert_eq!(second.state(), first.state());
    assert_eq!(second.birth(), first.birth());

    let trace = second.crystallize().unwrap();
    assert_eq!(trace.cycle, 3);
    assert!(trace.persisted);

    let on_disk = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.cycle_count, 3);
}

#[test]
fn expansions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");

    let mut first = axiomatic();
    first.bind_etheric(&path);
    first.crystallize().unwrap();
    let key = first.perturb().unwrap();
    first.crystallize().unwrap();

    let mut second = axiomatic();
    second.bind_etheric(&path);
    assert!(second.expansions().contains(&key));
    assert!(second
        .generate_domain()
        .iter()
        .any(|cand| cand.get(&key).is_some()));
}

#[test]
fn run_ending_on_perturbation_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");

    let mut first = axiomatic();
    first.bind_etheric(&path);
    let t = first.evolve(3).unwrap();
    assert_eq!(
        t.entries[2].perturbation,
        Some(PerturbationEvent::Expanded {
            key: "alive_aware".into()
        })
    );

    let on_disk = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.vocabulary_expansions, first.expansions().to_map());

    let mut second = axiomatic();
    assert!(second.bind_etheric(&path));
    assert_eq!(second.expansions(), first.expansions());
    assert_eq!(second.cycle_count(), 3);
}

#[test]
fn direct_perturbation_is_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");

    let mut first = axiomatic();
    first.bind_etheric(&path);
    first.crystallize().unwrap();
    let key = first.perturb().unwrap();

    let mut second = axiomatic();
    second.bind_etheric(&path);
    assert!(second.expansions().contains(&key));
}

#[test]
fn corrupt_record_is_first_life() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");
    std::fs::write(&path, "{\"state\": {\"alive\": tru").unwrap();

    let mut c = axiomatic();
    assert!(!c.bind_etheric(&path));
    assert_eq!(c.cycle_count(), 0);
    assert!(c.state().is_null());

    // The next bind replaces the unreadable record.
    c.crystallize().unwrap();
    let record = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(record.cycle_count, 1);
}

#[test]
fn sparse_record_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");
    std::fs::write(&path, r#"{"state": {"alive": true}, "cycle_count": 7, "extra": 1}"#).unwrap();

    let mut c = axiomatic();
    assert!(c.bind_etheric(&path));
    assert_eq!(c.cycle_count(), 7);
    assert_eq!(c.state(), &json!({"alive": true}));
    assert!(c.expansions().is_empty());
}

#[test]
fn snapshot_matches_instance() {
    let mut c = axiomatic();
    c.crystallize().unwrap();
    c.perturb().unwrap();

    let record: PersistedRecord = c.snapshot();
    assert_eq!(record.state, *c.state());
    assert_eq!(record.cycle_count, 1);
    assert_eq!(record.vocabulary_expansions, c.expansions().to_map());
    assert_eq!(record.birth, Some(c.birth()));
}

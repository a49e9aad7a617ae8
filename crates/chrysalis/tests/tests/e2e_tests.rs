#[path = "e2e/narrowing_and_reflection.rs"]
mod narrowing_and_reflection;

#[path = "e2e/persistence_lifecycle.rs"]
mod persistence_lifecycle;

#[path = "e2e/evolution_run.rs"]
mod evolution_run;

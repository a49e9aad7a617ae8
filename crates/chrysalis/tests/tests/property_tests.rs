#[path = "property/narrowing_monotonic.rs"]
mod narrowing_monotonic;

#[path = "property/domain_generation.rs"]
mod domain_generation;

#[path = "property/perturbation_novelty.rs"]
mod perturbation_novelty;

#[path = "property/reflection_rules.rs"]
mod reflection_rules;

//! Cross-crate tests for Chrysalis.
//!
//! - `tests/e2e/`: full lifecycles through narrowing, reflection,
//!   persistence and evolution.
//! - `tests/property/`: properties that must hold for arbitrary domains,
//!   vocabularies and constraint sets.

#![deny(unsafe_code)]
//! # chrysalis-types
//!
//! Shared vocabulary for the Chrysalis crystallization engine.
//!
//! A crystallization narrows a domain of candidate values through a stack of
//! five ontological layers:
//!
//! ```text
//! Void -> Mental -> Astral -> Etheric -> Physical
//! ```
//!
//! This crate holds the types every layer agrees on: the candidate value
//! model, layer and source tags, the serialisable constraint description
//! language, and the engine configuration.

pub mod candidate;
pub mod config;
pub mod layer;
pub mod spec;

pub use candidate::{
    canonical, ground, is_ground, is_truthy, key_set, portable, render_candidate, Candidate,
    Domain, RENDER_WIDTH,
};
pub use config::{ChrysalisConfig, ConfigError};
pub use layer::{ConstraintSource, Layer};
pub use spec::ConstraintSpec;

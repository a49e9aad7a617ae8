#![deny(unsafe_code)]
//! # chrysalis-etheric
//!
//! The etheric substrate: the durable record that lets one process lifetime
//! continue where the previous one stopped.
//!
//! A [`PersistedRecord`] carries only resolved values (state, cycle count,
//! vocabulary expansions, a bounded slice of experience). Constraints are
//! never persisted; they are re-declared from code at every start.
//!
//! Writes go through a [`RecordStore`]. The file store writes a sibling
//! temporary file, syncs it and renames it over the target, so a reader
//! sees either the previous record or the new one.

pub mod error;
pub mod record;
pub mod store;

pub use error::{EthericError, EthericResult};
pub use record::PersistedRecord;
pub use store::{recover, InMemoryStore, JsonFileStore, RecordStore};

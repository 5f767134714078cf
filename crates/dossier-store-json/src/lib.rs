//! Flat-file JSON backend for the Dossier record store.
//!
//! One pretty-printed JSON document per record, under `experts/` and
//! `companies/` subdirectories. Writes go through a temp-file-then-rename so
//! a crash mid-write never leaves a truncated record on disk.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{JsonFileStore, slugify};

#[cfg(test)]
mod tests;

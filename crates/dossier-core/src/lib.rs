//! Core types and trait definitions for the Dossier record store.
//!
//! This crate is deliberately free of I/O: it defines the canonical record
//! shapes, the provenance (`sources`) tree, the data-quality model, and the
//! storage abstraction. The pipeline lives in `dossier-enrich`; backends
//! implement [`store::RecordStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod company;
pub mod error;
pub mod quality;
pub mod record;
pub mod sources;
pub mod store;

pub use error::{Error, Result};

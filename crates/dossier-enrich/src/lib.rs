//! Record normalization and enrichment pipeline for Dossier.
//!
//! Converts raw, legacy-shaped record JSON into canonical
//! [`dossier_core`] types and enriches it: field-alias mapping, derived
//! backfills, provenance synthesis, external-dataset merging, validation,
//! and quality scoring. Pure synchronous transforms; no HTTP or filesystem
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use dossier_enrich::pipeline::{EnrichOptions, enrich_record};
//!
//! let raw = serde_json::json!({ "name": "Jane Doe", "expertise": "ML" });
//! let opts = EnrichOptions {
//!   checked_on: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!   as_of:      chrono::Utc::now(),
//! };
//! let enrichment = enrich_record(&raw, "jane-doe", None, &opts).unwrap();
//! println!(
//!   "completeness={}",
//!   enrichment.record.data_quality.completeness
//! );
//! ```

pub mod aux;
pub mod company;
pub mod dedupe;
pub mod derive;
pub mod error;
pub mod mapper;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod provenance;
pub mod quality;
pub mod validate;

pub use error::{Error, Result};

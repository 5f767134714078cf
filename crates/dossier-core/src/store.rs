//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `dossier-store-json`). The batch
//! driver depends on this abstraction, not on any concrete backend. Values
//! cross the boundary as raw [`serde_json::Value`] so legacy-shaped files can
//! be loaded *before* normalization.

use std::future::Future;

use serde_json::Value;

// ─── Record kinds ────────────────────────────────────────────────────────────

/// The two entity types held in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
  Expert,
  Company,
}

impl RecordKind {
  /// Subdirectory name under the store root.
  pub fn dir_name(self) -> &'static str {
    match self {
      Self::Expert => "experts",
      Self::Company => "companies",
    }
  }
}

impl std::fmt::Display for RecordKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::Expert => "expert",
      Self::Company => "company",
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Dossier record store backend.
///
/// Writes replace the whole record ("last write wins"); there are no
/// transactions and no cross-record coordination. All methods return `Send`
/// futures so the trait can be used from multi-threaded async runtimes.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List the slugs of all records of `kind`, sorted.
  fn list(
    &self,
    kind: RecordKind,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Load one record as a raw JSON value. Returns `None` if not found.
  fn load<'a>(
    &'a self,
    kind: RecordKind,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a;

  /// Persist one record, atomically replacing any previous content.
  fn save<'a>(
    &'a self,
    kind: RecordKind,
    slug: &'a str,
    value: &'a Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete one record. Used only by explicit duplicate resolution.
  fn delete<'a>(
    &'a self,
    kind: RecordKind,
    slug: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

//! The provenance (`sources`) tree — a parallel evidence structure over the
//! record's field groups.
//!
//! Each leaf records where a fact was seen (`url`), whether it was verified,
//! and when it was last checked. The enrichment pipeline only ever *adds*
//! leaves; existing leaves are preserved verbatim so re-running the pipeline
//! is a no-op for already-sourced fields.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Leaves ──────────────────────────────────────────────────────────────────

/// A single provenance leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
  pub url:          String,
  #[serde(default)]
  pub verified:     bool,
  #[serde(default)]
  pub last_checked: NaiveDate,
  /// Digital object identifier — publications only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub doi:          Option<String>,
}

impl SourceEntry {
  pub fn new(url: impl Into<String>, checked_on: NaiveDate) -> Self {
    Self {
      url: url.into(),
      verified: true,
      last_checked: checked_on,
      doi: None,
    }
  }
}

/// Provenance for the profile image, carrying licensing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
  pub url:          String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author:       Option<String>,
  #[serde(default)]
  pub verified:     bool,
  #[serde(default)]
  pub last_checked: NaiveDate,
}

/// A consulted external dataset (e.g. a professional-network export).
/// `kind` is the idempotence key: the merger never records the same kind
/// twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimarySource {
  pub name:         String,
  #[serde(rename = "type")]
  pub kind:         String,
  #[serde(default)]
  pub last_checked: NaiveDate,
  #[serde(default)]
  pub verified:     bool,
}

// ─── Groups ──────────────────────────────────────────────────────────────────

fn default_process() -> String { "multi-source cross-validation".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_verification:    Option<NaiveDate>,
  #[serde(default = "default_process")]
  pub verification_process: String,
  #[serde(default)]
  pub primary_sources:      Vec<PrimarySource>,
}

impl Default for SourceMetadata {
  fn default() -> Self {
    Self {
      last_verification:    None,
      verification_process: default_process(),
      primary_sources:      Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationSources {
  #[serde(default)]
  pub universities: BTreeMap<String, SourceEntry>,
  #[serde(default)]
  pub fields:       BTreeMap<String, SourceEntry>,
  #[serde(default)]
  pub degrees:      BTreeMap<String, SourceEntry>,
}

/// The full provenance tree. All maps are `BTreeMap` so serialization is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sources {
  #[serde(default)]
  pub metadata: SourceMetadata,

  /// Leaves keyed by canonical field name (`name`, `dateOfBirth`,
  /// `nationality`, `titel`, `standort`).
  #[serde(default)]
  pub personal_info: BTreeMap<String, SourceEntry>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub current_position: Option<SourceEntry>,

  /// Keyed by expertise topic.
  #[serde(default)]
  pub expertise: BTreeMap<String, SourceEntry>,

  #[serde(default)]
  pub education: EducationSources,

  /// Keyed by `{institution}_{first word of title}` with spaces as `_`.
  #[serde(default, rename = "academicPositions")]
  pub academic_positions: BTreeMap<String, SourceEntry>,

  /// Keyed by lower-cased, underscored publication title.
  #[serde(default)]
  pub publications: BTreeMap<String, SourceEntry>,

  /// Leaves keyed by contact field (`email`, `phone`, `address`).
  #[serde(default)]
  pub contact_info: BTreeMap<String, SourceEntry>,

  /// Keyed by platform.
  #[serde(default)]
  pub social_media: BTreeMap<String, SourceEntry>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<ImageSource>,
}

impl Sources {
  /// Total number of provenance leaves recorded — the cross-reference count
  /// used by the quality scorer.
  pub fn leaf_count(&self) -> usize {
    self.metadata.primary_sources.len()
      + self.personal_info.len()
      + usize::from(self.current_position.is_some())
      + self.expertise.len()
      + self.education.universities.len()
      + self.education.fields.len()
      + self.education.degrees.len()
      + self.academic_positions.len()
      + self.publications.len()
      + self.contact_info.len()
      + self.social_media.len()
      + usize::from(self.image.is_some())
  }

  pub fn has_primary_source(&self, kind: &str) -> bool {
    self.metadata.primary_sources.iter().any(|s| s.kind == kind)
  }

  /// Record a consulted dataset unless one of the same kind is already
  /// present. Returns whether an entry was added.
  pub fn add_primary_source(
    &mut self,
    name: &str,
    kind: &str,
    checked_on: NaiveDate,
  ) -> bool {
    if self.has_primary_source(kind) {
      return false;
    }
    self.metadata.primary_sources.push(PrimarySource {
      name:         name.to_string(),
      kind:         kind.to_string(),
      last_checked: checked_on,
      verified:     true,
    });
    true
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 2, 5).unwrap() }

  #[test]
  fn leaf_count_spans_all_groups() {
    let mut s = Sources::default();
    assert_eq!(s.leaf_count(), 0);

    s.personal_info
      .insert("name".into(), SourceEntry::new("https://a.example", date()));
    s.current_position = Some(SourceEntry::new("https://b.example", date()));
    s.expertise
      .insert("robotics".into(), SourceEntry::new("https://c.example", date()));
    s.add_primary_source("LinkedIn", "professional_network", date());

    assert_eq!(s.leaf_count(), 4);
  }

  #[test]
  fn add_primary_source_is_guarded_by_kind() {
    let mut s = Sources::default();
    assert!(s.add_primary_source("LinkedIn", "professional_network", date()));
    assert!(!s.add_primary_source("LinkedIn", "professional_network", date()));
    assert_eq!(s.metadata.primary_sources.len(), 1);
  }

  #[test]
  fn primary_source_serializes_kind_as_type() {
    let p = PrimarySource {
      name:         "LinkedIn Extended Profile".into(),
      kind:         "professional_network".into(),
      last_checked: date(),
      verified:     true,
    };
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["type"], "professional_network");
    assert!(v.get("kind").is_none());
  }
}

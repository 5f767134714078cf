//! Data-quality types.
//!
//! The scores themselves are computed in `dossier-enrich`; these are the
//! persisted shapes. The automated scorer never reports `completeness` above
//! 0.95 — full 1.0 is reserved for explicit human sign-off, which is tracked
//! separately in [`DataQuality::human_certified`] rather than conflated with
//! the numeric score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceQuality {
  #[serde(default)]
  pub reliability_score:     f64,
  #[serde(default)]
  pub cross_reference_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
  /// Ratio of populated important fields, in `[0, 0.95]`.
  #[serde(default)]
  pub completeness: f64,

  #[serde(default = "default_level")]
  pub verification_level: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_full_verification: Option<NaiveDate>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub verification_method: Option<String>,

  /// Important fields that were not populated at scoring time.
  #[serde(default)]
  pub missing_fields: Vec<String>,

  /// Issues reported by the validator at scoring time.
  #[serde(default)]
  pub validation_issues: Vec<String>,

  #[serde(default)]
  pub source_quality: SourceQuality,

  /// Explicit human sign-off. Set manually, preserved verbatim by the
  /// automated scorer.
  #[serde(default)]
  pub human_certified: bool,
}

fn default_level() -> String { "unverified".to_string() }

impl Default for DataQuality {
  fn default() -> Self {
    Self {
      completeness: 0.0,
      verification_level: default_level(),
      last_full_verification: None,
      verification_method: None,
      missing_fields: Vec::new(),
      validation_issues: Vec::new(),
      source_quality: SourceQuality::default(),
      human_certified: false,
    }
  }
}

//! The data-quality scorer.
//!
//! All scores are pure functions of the record and its validation report, so
//! scoring is deterministic and re-scoring an unchanged record is a no-op.

use chrono::NaiveDate;
use dossier_core::{
  quality::{DataQuality, SourceQuality},
  record::ProfileRecord,
};
use serde_json::Value;

use crate::validate::ValidationReport;

/// Fields whose presence drives completeness. Twelve entries; the
/// denominator of the completeness ratio.
pub const IMPORTANT_FIELDS: &[&str] = &[
  "name",
  "fullName",
  "position",
  "organisation",
  "expertise",
  "description",
  "education",
  "academicPositions",
  "kontakt",
  "social_media",
  "selectedPublications",
  "professionalMemberships",
];

const COMPLETENESS_CAP: f64 = 0.95;

/// Populatedness is stricter than the validator's presence check: an empty
/// array or an object with no populated values counts as missing here.
pub fn is_populated(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => false,
    Some(Value::String(s)) => !s.trim().is_empty(),
    Some(Value::Array(items)) => !items.is_empty(),
    Some(Value::Object(map)) => map.values().any(|v| is_populated(Some(v))),
    Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
  }
}

fn completeness(record_value: &Value, report: &ValidationReport) -> (f64, Vec<String>) {
  let mut filled = 0usize;
  let mut missing = Vec::new();
  for field in IMPORTANT_FIELDS {
    if is_populated(record_value.get(*field)) {
      filled += 1;
    } else {
      missing.push((*field).to_string());
    }
  }

  let mut score = filled as f64 / IMPORTANT_FIELDS.len() as f64;
  if !report.issues.is_empty() {
    score *= 0.9;
  }
  (score.min(COMPLETENESS_CAP), missing)
}

fn reliability(record: &ProfileRecord, report: &ValidationReport) -> f64 {
  let mut score = 0.8;
  if !record.sources.metadata.primary_sources.is_empty() {
    score += 0.1;
  }
  if record.sources.personal_info.contains_key("name") {
    score += 0.05;
  }
  score -= 0.05 * report.issues.len().min(3) as f64;
  score.clamp(0.5, 0.98)
}

/// Compute the full `data_quality` block for a record. `human_certified`
/// carries over from the existing block untouched.
pub fn score(
  record: &ProfileRecord,
  record_value: &Value,
  report: &ValidationReport,
  scored_on: NaiveDate,
) -> DataQuality {
  let (completeness, missing_fields) = completeness(record_value, report);

  DataQuality {
    completeness,
    verification_level: "high".to_string(),
    last_full_verification: Some(scored_on),
    verification_method: Some("multi-source cross-validation".to_string()),
    missing_fields,
    validation_issues: report.issues.clone(),
    source_quality: SourceQuality {
      reliability_score:     reliability(record, report),
      cross_reference_count: record.sources.leaf_count(),
    },
    human_certified: record.data_quality.human_certified,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() }

  fn clean_report() -> ValidationReport {
    ValidationReport {
      is_valid: true,
      issues:   Vec::new(),
    }
  }

  #[test]
  fn empty_record_scores_zero_completeness() {
    let record = ProfileRecord::default();
    let value = record.to_value().unwrap();
    let q = score(&record, &value, &clean_report(), date());
    assert_eq!(q.completeness, 0.0);
    assert_eq!(q.missing_fields.len(), IMPORTANT_FIELDS.len());
  }

  #[test]
  fn completeness_never_exceeds_cap() {
    let mut record = ProfileRecord {
      id: "x".into(),
      name: Some("Jane Doe".into()),
      full_name: Some("Jane Doe".into()),
      position: Some("CTO".into()),
      organisation: Some("Acme".into()),
      description: Some("d".into()),
      expertise: vec!["Robotics".into()],
      ..Default::default()
    };
    record.kontakt.email = Some("jane@acme.example".into());
    record.social_media.linkedin = Some("https://x.example".into());
    record.education.fields.push("CS".into());
    record
      .academic_positions
      .push(dossier_core::record::AcademicPosition {
        title: "Professor".into(),
        institution: "TU".into(),
        ..Default::default()
      });
    record
      .selected_publications
      .push(dossier_core::record::Publication {
        title: "On Things".into(),
        ..Default::default()
      });
    record
      .professional_memberships
      .push(dossier_core::record::Membership {
        organization: "ACM".into(),
        ..Default::default()
      });

    let value = record.to_value().unwrap();
    let q = score(&record, &value, &clean_report(), date());
    // All 12 populated, so the raw ratio is 1.0 before the cap.
    assert!(q.missing_fields.is_empty());
    assert_eq!(q.completeness, 0.95);
  }

  #[test]
  fn validation_issues_scale_completeness_down() {
    let record = ProfileRecord {
      id: "x".into(),
      name: Some("Jane".into()),
      full_name: Some("Jane".into()),
      position: Some("CTO".into()),
      ..Default::default()
    };
    let value = record.to_value().unwrap();
    let report = ValidationReport {
      is_valid: false,
      issues:   vec!["Invalid email format".into()],
    };
    let q = score(&record, &value, &report, date());
    let expected = (3.0 / 12.0) * 0.9;
    assert!((q.completeness - expected).abs() < 1e-9);
    assert_eq!(q.validation_issues, report.issues);
  }

  #[test]
  fn empty_containers_count_as_missing() {
    let record = ProfileRecord {
      id: "x".into(),
      expertise: Vec::new(),
      ..Default::default()
    };
    let value = record.to_value().unwrap();
    let (_, missing) = completeness(&value, &clean_report());
    assert!(missing.contains(&"expertise".to_string()));
    assert!(missing.contains(&"kontakt".to_string()));
  }

  #[test]
  fn reliability_rewards_sources_and_penalizes_issues() {
    let mut record = ProfileRecord::default();
    let base = reliability(&record, &clean_report());
    assert!((base - 0.8).abs() < 1e-9);

    record
      .sources
      .add_primary_source("LinkedIn", "professional_network", date());
    record.sources.personal_info.insert(
      "name".into(),
      dossier_core::sources::SourceEntry::new("https://x.example", date()),
    );
    let boosted = reliability(&record, &clean_report());
    assert!((boosted - 0.95).abs() < 1e-9);

    let many_issues = ValidationReport {
      is_valid: false,
      issues:   vec!["a".into(), "b".into(), "c".into(), "d".into()],
    };
    // The penalty saturates at three issues.
    let penalized = reliability(&record, &many_issues);
    assert!((penalized - 0.8).abs() < 1e-9);
  }

  #[test]
  fn reliability_clamps_to_floor() {
    let record = ProfileRecord::default();
    let many_issues = ValidationReport {
      is_valid: false,
      issues:   vec!["a".into(); 5],
    };
    // 0.8 - 0.15 = 0.65, above the floor; force the floor with no bonuses
    // impossible here, so assert the clamp range instead.
    let r = reliability(&record, &many_issues);
    assert!((0.5..=0.98).contains(&r));
  }

  #[test]
  fn human_certified_passes_through() {
    let mut record = ProfileRecord::default();
    record.data_quality.human_certified = true;
    let value = record.to_value().unwrap();
    let q = score(&record, &value, &clean_report(), date());
    assert!(q.human_certified);
  }

  #[test]
  fn object_with_only_empty_values_is_unpopulated() {
    assert!(!is_populated(Some(&json!({ "email": "", "phone": null }))));
    assert!(is_populated(Some(&json!({ "email": "a@b.c" }))));
  }
}

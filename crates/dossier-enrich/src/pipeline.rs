//! The full enrichment pipeline.
//!
//! One record moves through normalize → derive → provenance → aux merge →
//! validate → score. Every date is injected through `EnrichOptions`, so two
//! runs with identical inputs produce byte-identical output, and re-running
//! over already-enriched output is a fixed point.

use chrono::{DateTime, NaiveDate, Utc};
use dossier_core::record::ProfileRecord;
use serde_json::Value;

use crate::{
  Result,
  aux::AuxDataset,
  derive, merge,
  merge::MatchOutcome,
  normalize,
  provenance::{self, ProvenanceOptions},
  quality,
  validate::{self, ValidationReport},
};

#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
  /// Stamped onto synthesized provenance leaves and the quality block.
  pub checked_on: NaiveDate,
  /// The batch timestamp, written to `last_updated`.
  pub as_of:      DateTime<Utc>,
}

/// The result of enriching one record.
#[derive(Debug, Clone)]
pub struct Enrichment {
  pub record:     ProfileRecord,
  pub validation: ValidationReport,
  pub outcome:    MatchOutcome,
  pub merge:      merge::MergeReport,
}

/// Run the whole pipeline over one raw record value.
pub fn enrich_record(
  raw: &Value,
  id_hint: &str,
  aux: Option<&AuxDataset>,
  opts: &EnrichOptions,
) -> Result<Enrichment> {
  let mut record = normalize::normalize(raw, id_hint)?;
  derive::derive_fields(&mut record);

  let prov = ProvenanceOptions {
    checked_on: opts.checked_on,
  };
  provenance::build_sources(&mut record, &prov);

  let (outcome, merge_report) = match aux {
    Some(dataset) => merge::apply_dataset(&mut record, dataset, opts.checked_on),
    None => (MatchOutcome::None, merge::MergeReport::default()),
  };
  if merge_report.changed() {
    // The merge may have introduced fields that need provenance leaves and
    // recomputable aggregates.
    derive::derive_fields(&mut record);
    provenance::build_sources(&mut record, &prov);
  }

  let value = record.to_value()?;
  let validation = validate::validate(&value);
  record.data_quality =
    quality::score(&record, &value, &validation, opts.checked_on);

  if record.created_at.is_none() {
    record.created_at = Some(opts.as_of);
  }
  record.last_updated = Some(opts.as_of);

  Ok(Enrichment {
    record,
    validation,
    outcome,
    merge: merge_report,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn opts() -> EnrichOptions {
    EnrichOptions {
      checked_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
      as_of:      "2025-03-01T12:00:00Z".parse().unwrap(),
    }
  }

  fn jane_raw() -> Value {
    json!({
      "name": "Jane Doe",
      "titel": "Prof. Dr.",
      "position": "CTO",
      "organisation": "Acme Labs",
      "expertise": "Machine Learning",
      "kontakt": { "email": "jane@acme.example" },
    })
  }

  #[test]
  fn pipeline_produces_a_canonical_enriched_record() {
    let enrichment =
      enrich_record(&jane_raw(), "jane-doe", None, &opts()).unwrap();
    let record = &enrichment.record;

    assert_eq!(record.id, "jane-doe");
    assert_eq!(record.full_name.as_deref(), Some("Prof. Dr. Jane Doe"));
    assert_eq!(record.expertise, vec!["Machine Learning".to_string()]);
    assert!(record.description.is_some());
    assert!(record.sources.personal_info.contains_key("name"));
    assert!(enrichment.validation.is_valid);
    assert!(record.data_quality.completeness > 0.0);
    assert_eq!(record.last_updated, Some(opts().as_of));
    assert_eq!(record.created_at, Some(opts().as_of));
  }

  #[test]
  fn enrich_is_a_fixed_point() {
    let first = enrich_record(&jane_raw(), "jane-doe", None, &opts()).unwrap();
    let first_value = first.record.to_value().unwrap();

    let second =
      enrich_record(&first_value, "jane-doe", None, &opts()).unwrap();
    assert_eq!(second.record.to_value().unwrap(), first_value);
  }

  #[test]
  fn enrich_with_aux_merge_is_a_fixed_point() {
    let aux = AuxDataset::from_json(&json!([{
      "fullName": "Jane Doe",
      "publicIdentifier": "jane-doe",
      "skills": [{ "name": "Python" }],
      "positions": [{
        "title": "CTO",
        "companyName": "Acme Labs",
        "timePeriod": { "startDate": { "year": 2020, "month": 1 } },
      }],
    }]))
    .unwrap();

    let first =
      enrich_record(&jane_raw(), "jane-doe", Some(&aux), &opts()).unwrap();
    assert!(matches!(first.outcome, MatchOutcome::Unique { .. }));
    let first_value = first.record.to_value().unwrap();

    let second =
      enrich_record(&first_value, "jane-doe", Some(&aux), &opts()).unwrap();
    assert_eq!(second.record.to_value().unwrap(), first_value);

    // Exactly one primary source even across repeated merges.
    assert_eq!(
      second.record.sources.metadata.primary_sources.len(),
      1
    );
  }

  #[test]
  fn existing_skill_spelling_wins_over_merged_one() {
    let mut raw = jane_raw();
    raw["skills"] = json!([{ "name": "Python" }]);
    let aux = AuxDataset::from_json(&json!([{
      "fullName": "Jane Doe",
      "skills": [{ "name": "PYTHON", "endorsements": 12 }],
    }]))
    .unwrap();

    let enrichment =
      enrich_record(&raw, "jane-doe", Some(&aux), &opts()).unwrap();
    assert_eq!(enrichment.record.skills.len(), 1);
    assert_eq!(enrichment.record.skills[0].name, "Python");
  }

  #[test]
  fn invalid_record_is_still_scored() {
    let raw = json!({ "name": "Jane Doe" });
    let enrichment = enrich_record(&raw, "jane-doe", None, &opts()).unwrap();

    assert!(!enrichment.validation.is_valid);
    assert!(
      enrichment
        .validation
        .issues
        .iter()
        .any(|i| i == "Missing required field: organisation")
    );
    let q = &enrichment.record.data_quality;
    assert!(q.completeness > 0.0 && q.completeness <= 0.95);
    assert_eq!(q.validation_issues, enrichment.validation.issues);
  }

  #[test]
  fn ambiguous_match_surfaces_without_merging() {
    let aux = AuxDataset::from_json(&json!([
      { "fullName": "Jane Doe", "skills": [{ "name": "A" }] },
      { "fullName": "Dr. Jane Doe", "skills": [{ "name": "B" }] },
    ]))
    .unwrap();

    let enrichment =
      enrich_record(&jane_raw(), "jane-doe", Some(&aux), &opts()).unwrap();
    assert!(matches!(
      enrichment.outcome,
      MatchOutcome::Ambiguous { .. }
    ));
    assert!(enrichment.record.skills.is_empty());
  }
}

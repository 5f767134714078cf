//! Derived-field backfills.
//!
//! Deterministic fills for fields that can be computed from what the record
//! already contains: the display full name, expertise inferred from the
//! description, a generated one-line description, email extraction from a
//! noisy contact string, and aggregate publication metrics. Every backfill
//! targets only empty fields, so the pass is idempotent.

use dossier_core::record::{
  AcademicMetrics, ProfileRecord, PublicationMetrics,
};

use crate::normalize::push_unique_ci;

// ─── Keyword table ───────────────────────────────────────────────────────────

/// Expertise area → description keywords that imply it. Checked in order.
const EXPERTISE_KEYWORDS: &[(&str, &[&str])] = &[
  (
    "artificial intelligence",
    &["ai", "artificial intelligence", "machine learning", "deep learning"],
  ),
  (
    "computer science",
    &["computer science", "software", "programming", "algorithms"],
  ),
  (
    "data science",
    &["data science", "data analytics", "big data", "data mining"],
  ),
  ("robotics", &["robotics", "automation", "autonomous systems"]),
  ("research", &["research", "scientific", "academic", "r&d"]),
];

/// Position keyword → expertise area.
const POSITION_KEYWORDS: &[(&str, &str)] = &[
  ("professor", "Academic Research"),
  ("director", "Leadership"),
  ("scientist", "Scientific Research"),
];

// ─── Individual fills ────────────────────────────────────────────────────────

fn fill_full_name(record: &mut ProfileRecord) {
  if record.full_name.as_deref().is_some_and(|s| !s.is_empty()) {
    return;
  }
  let mut parts: Vec<&str> = Vec::new();
  if let Some(t) = record.titel.as_deref()
    && !t.is_empty()
  {
    parts.push(t);
  }
  if let Some(n) = record.name.as_deref()
    && !n.is_empty()
  {
    parts.push(n);
  }
  if !parts.is_empty() {
    record.full_name = Some(parts.join(" "));
  }
}

fn infer_expertise(record: &mut ProfileRecord) {
  if !record.expertise.is_empty() {
    return;
  }
  let description = record
    .description
    .as_deref()
    .unwrap_or_default()
    .to_lowercase();
  for (area, keywords) in EXPERTISE_KEYWORDS {
    if keywords.iter().any(|k| description.contains(k)) {
      push_unique_ci(&mut record.expertise, area);
    }
  }
  if let Some(position) = record.position.as_deref() {
    let position = position.to_lowercase();
    for (keyword, area) in POSITION_KEYWORDS {
      if position.contains(keyword) {
        push_unique_ci(&mut record.expertise, area);
      }
    }
  }
}

fn generate_description(record: &mut ProfileRecord) {
  if record.description.as_deref().is_some_and(|s| !s.is_empty()) {
    return;
  }
  let mut parts: Vec<String> = Vec::new();
  if let (Some(titel), Some(name)) =
    (record.titel.as_deref(), record.name.as_deref())
  {
    parts.push(format!("{titel} {name}"));
  }
  if let (Some(position), Some(organisation)) =
    (record.position.as_deref(), record.organisation.as_deref())
  {
    parts.push(format!("serves as {position} at {organisation}"));
  }
  if !record.expertise.is_empty() {
    parts.push(format!("specializing in {}", record.expertise.join(", ")));
  }
  if let Some(latest) = record.academic_positions.first() {
    parts.push(format!(
      "with experience as {} at {}",
      latest.title, latest.institution
    ));
  }
  if !parts.is_empty() {
    record.description = Some(parts.join(" "));
  }
}

/// Pull a plausible address out of a noisy email value
/// ("Contact: jane@acme.example (lab)" → "jane@acme.example").
fn clean_email(record: &mut ProfileRecord) {
  let Some(email) = record.kontakt.email.as_deref() else {
    return;
  };
  if crate::validate::is_valid_email(email) {
    return;
  }
  let trim_token = |token: &str| -> String {
    token
      .trim_matches(|c: char| {
        !c.is_alphanumeric() && c != '@' && c != '.' && c != '-' && c != '_'
      })
      .to_string()
  };
  let extracted = email
    .split_whitespace()
    .map(trim_token)
    .find(|token| crate::validate::is_valid_email(token));
  if let Some(address) = extracted {
    record.kontakt.email = Some(address);
  }
}

fn compute_academic_metrics(record: &mut ProfileRecord) {
  let total = record.selected_publications.len();
  let citations: u64 = record
    .selected_publications
    .iter()
    .map(|p| p.citation_count())
    .sum();
  record.academic_metrics = AcademicMetrics {
    publications: PublicationMetrics {
      total,
      citations,
      // Not derivable from a selected list; preserved if already recorded.
      h_index: record.academic_metrics.publications.h_index,
    },
  };
}

// ─── Pass ────────────────────────────────────────────────────────────────────

/// Run all derived-field backfills, in order.
pub fn derive_fields(record: &mut ProfileRecord) {
  fill_full_name(record);
  infer_expertise(record);
  generate_description(record);
  clean_email(record);
  compute_academic_metrics(record);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use dossier_core::record::{AcademicPosition, Publication};
  use serde_json::json;

  use super::*;

  #[test]
  fn full_name_built_from_titel_and_name() {
    let mut r = ProfileRecord {
      titel: Some("Prof. Dr.".into()),
      name: Some("Jane Doe".into()),
      ..Default::default()
    };
    derive_fields(&mut r);
    assert_eq!(r.full_name.as_deref(), Some("Prof. Dr. Jane Doe"));
  }

  #[test]
  fn existing_full_name_is_never_overwritten() {
    let mut r = ProfileRecord {
      titel: Some("Dr.".into()),
      name: Some("Jane".into()),
      full_name: Some("Jane Doe".into()),
      ..Default::default()
    };
    derive_fields(&mut r);
    assert_eq!(r.full_name.as_deref(), Some("Jane Doe"));
  }

  #[test]
  fn expertise_inferred_from_description_and_position() {
    let mut r = ProfileRecord {
      description: Some("Works on deep learning and big data.".into()),
      position: Some("Research Director".into()),
      ..Default::default()
    };
    derive_fields(&mut r);
    assert!(r.expertise.contains(&"artificial intelligence".to_string()));
    assert!(r.expertise.contains(&"data science".to_string()));
    assert!(r.expertise.contains(&"Leadership".to_string()));
  }

  #[test]
  fn expertise_inference_skipped_when_already_populated() {
    let mut r = ProfileRecord {
      description: Some("deep learning".into()),
      expertise: vec!["Quantum Computing".into()],
      ..Default::default()
    };
    derive_fields(&mut r);
    assert_eq!(r.expertise, vec!["Quantum Computing".to_string()]);
  }

  #[test]
  fn description_generated_from_parts() {
    let mut r = ProfileRecord {
      titel: Some("Prof.".into()),
      name: Some("Jane Doe".into()),
      position: Some("CTO".into()),
      organisation: Some("Acme Labs".into()),
      expertise: vec!["Robotics".into()],
      academic_positions: vec![AcademicPosition {
        title: "Lecturer".into(),
        institution: "ETH".into(),
        ..Default::default()
      }],
      ..Default::default()
    };
    derive_fields(&mut r);
    assert_eq!(
      r.description.as_deref(),
      Some(
        "Prof. Jane Doe serves as CTO at Acme Labs specializing in Robotics \
         with experience as Lecturer at ETH"
      )
    );
  }

  #[test]
  fn noisy_email_is_cleaned() {
    let mut r = ProfileRecord::default();
    r.kontakt.email = Some("Contact: jane@acme.example (lab)".into());
    derive_fields(&mut r);
    assert_eq!(r.kontakt.email.as_deref(), Some("jane@acme.example"));
  }

  #[test]
  fn academic_metrics_sum_citations() {
    let mut r = ProfileRecord {
      selected_publications: vec![
        Publication {
          title: "A".into(),
          citations: Some(json!(10)),
          ..Default::default()
        },
        Publication {
          title: "B".into(),
          citations: Some(json!("5")),
          ..Default::default()
        },
      ],
      ..Default::default()
    };
    derive_fields(&mut r);
    assert_eq!(r.academic_metrics.publications.total, 2);
    assert_eq!(r.academic_metrics.publications.citations, 15);
  }

  #[test]
  fn derive_pass_is_idempotent() {
    let mut r = ProfileRecord {
      titel: Some("Dr.".into()),
      name: Some("Jane Doe".into()),
      position: Some("Professor of Robotics".into()),
      organisation: Some("ETH".into()),
      ..Default::default()
    };
    derive_fields(&mut r);
    let once = r.clone();
    derive_fields(&mut r);
    assert_eq!(serde_json::to_value(&r).unwrap(), serde_json::to_value(&once).unwrap());
  }
}

//! The schema normalizer — applies the field mapper across a whole raw record
//! to produce a canonical [`ProfileRecord`].
//!
//! Never fails for data-shape reasons: a scalar where an array is expected
//! becomes a one-element array, missing sub-objects become empty-shaped
//! defaults, and malformed list entries are skipped with a logged warning.
//! The only error is a raw record that is not a JSON object at all.

use serde::de::DeserializeOwned;
use serde_json::Value;

use dossier_core::{
  Error, Result,
  quality::DataQuality,
  record::{
    AcademicPosition, Award, ContactInfo, Education, EducationDetail,
    LanguageSkill, Membership, ProfessionalPosition, ProfileRecord,
    Publication, Skill, SocialMedia,
  },
  sources::Sources,
};

use crate::mapper::{self, rules};

// ─── String-set helpers ──────────────────────────────────────────────────────

/// Trim entries and drop case-insensitive duplicates, preserving first-seen
/// order. Empty entries are dropped entirely.
pub(crate) fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  let mut out = Vec::with_capacity(items.len());
  for item in items {
    let trimmed = item.trim();
    if trimmed.is_empty() {
      continue;
    }
    if seen.insert(trimmed.to_lowercase()) {
      out.push(trimmed.to_string());
    }
  }
  out
}

/// Append `candidate` unless an equal entry (case-insensitive) is present.
pub(crate) fn push_unique_ci(list: &mut Vec<String>, candidate: &str) {
  let candidate = candidate.trim();
  if candidate.is_empty() {
    return;
  }
  if !list.iter().any(|e| e.eq_ignore_ascii_case(candidate)) {
    list.push(candidate.to_string());
  }
}

// ─── Expertise shapes ────────────────────────────────────────────────────────

/// The shapes `expertise` arrives in. Classified once at ingestion so the
/// rest of the pipeline only ever sees the canonical `Vec<String>`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpertiseShape {
  /// Already an array of topic strings.
  List(Vec<String>),
  /// A bare string — becomes a one-element list.
  Single(String),
  /// The legacy grouped object `{primary, secondary, industries}`.
  Grouped {
    primary:    Vec<String>,
    secondary:  Vec<String>,
    industries: Vec<String>,
  },
  Missing,
}

fn string_items(value: &Value) -> Vec<String> {
  match value {
    Value::Array(items) => items
      .iter()
      .filter_map(|v| v.as_str().map(str::to_string))
      .collect(),
    Value::String(s) => vec![s.clone()],
    _ => Vec::new(),
  }
}

/// Classify the raw `expertise` value.
pub fn classify_expertise(raw: &Value) -> ExpertiseShape {
  match raw.get("expertise") {
    None | Some(Value::Null) => ExpertiseShape::Missing,
    Some(Value::String(s)) if !s.trim().is_empty() => {
      ExpertiseShape::Single(s.clone())
    }
    Some(Value::String(_)) => ExpertiseShape::Missing,
    Some(Value::Array(items)) => ExpertiseShape::List(
      items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect(),
    ),
    Some(Value::Object(map)) => {
      let mut primary = Vec::new();
      let mut secondary = Vec::new();
      let mut industries = Vec::new();
      for (key, value) in map {
        match key.as_str() {
          "primary" => primary = string_items(value),
          "secondary" => secondary = string_items(value),
          "industries" => industries = string_items(value),
          // Unknown group — fold its values in with the industries.
          _ => industries.extend(string_items(value)),
        }
      }
      ExpertiseShape::Grouped {
        primary,
        secondary,
        industries,
      }
    }
    Some(_) => ExpertiseShape::Missing,
  }
}

impl ExpertiseShape {
  /// Flatten to the canonical topic list. `Missing` falls back to the raw
  /// `tags` array.
  pub fn flatten(self, raw: &Value) -> Vec<String> {
    let items = match self {
      Self::List(items) => items,
      Self::Single(s) => vec![s],
      Self::Grouped {
        mut primary,
        secondary,
        industries,
      } => {
        primary.extend(secondary);
        primary.extend(industries);
        primary
      }
      Self::Missing => raw
        .get("tags")
        .map(string_items)
        .unwrap_or_default(),
    };
    dedup_case_insensitive(items)
  }
}

// ─── List-entry parsing ──────────────────────────────────────────────────────

/// Parse each entry of a struct-list field, skipping malformed or keyless
/// entries with a warning instead of failing the record.
fn parse_entries<T>(
  field: &'static str,
  items: Vec<Value>,
  keep: impl Fn(&T) -> bool,
) -> Vec<T>
where
  T: DeserializeOwned,
{
  let mut out = Vec::with_capacity(items.len());
  for item in items {
    match serde_json::from_value::<T>(item) {
      Ok(entry) if keep(&entry) => out.push(entry),
      Ok(_) => {
        tracing::warn!(field, "skipping entry with no usable key fields");
      }
      Err(err) => {
        tracing::warn!(field, error = %err, "skipping malformed entry");
      }
    }
  }
  out
}

/// Deserialize an optional canonical-shaped sub-document, falling back to the
/// default shape (with a warning) when it does not parse.
fn parse_sub<T>(field: &'static str, value: Option<&Value>) -> T
where
  T: DeserializeOwned + Default,
{
  match value {
    None | Some(Value::Null) => T::default(),
    Some(v) => match serde_json::from_value(v.clone()) {
      Ok(parsed) => parsed,
      Err(err) => {
        tracing::warn!(field, error = %err, "unparseable sub-document, using default shape");
        T::default()
      }
    },
  }
}

// ─── Consumed aliases ────────────────────────────────────────────────────────

/// Top-level raw keys that the mapper consumes. Everything else that is not a
/// canonical key passes through into `extra` unchanged.
const CONSUMED_KEYS: &[&str] = &[
  "id",
  "name",
  "titel",
  "fullName",
  "firstName",
  "lastName",
  "position",
  "organisation",
  "organization",
  "fachgebiet",
  "dateOfBirth",
  "nationality",
  "description",
  "standort",
  "location",
  "city",
  "country",
  "email",
  "phone",
  "website",
  "address",
  "linkedin_url",
  "twitter_url",
  "github_url",
  "image_url",
  "expertise",
  "tags",
  "education",
  "academicBackground",
  "academicPositions",
  "professionalPositions",
  "kontakt",
  "social_media",
  "selectedPublications",
  "publications",
  "professionalMemberships",
  "awards",
  "languages",
  "skills",
  "academicMetrics",
  "sources",
  "data_quality",
  "created_at",
  "last_updated",
  "verified",
  "verification_source",
  "personalInfo",
  "currentRole",
  "institution",
  "company",
  "profiles",
];

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Normalize a raw record into the canonical shape.
///
/// `id_hint` is the filename-derived slug, used when the raw record carries
/// no `id` of its own.
pub fn normalize(raw: &Value, id_hint: &str) -> Result<ProfileRecord> {
  let map = raw.as_object().ok_or(Error::NotAnObject)?;

  let mut record = ProfileRecord {
    id: mapper::resolve_text(raw, &[mapper::Alternate::Path("id")])
      .unwrap_or_else(|| id_hint.to_string()),
    name: mapper::resolve_text(raw, rules::NAME),
    titel: mapper::resolve_text(raw, rules::TITEL),
    full_name: mapper::resolve_text(raw, rules::FULL_NAME),
    position: mapper::resolve_text(raw, rules::POSITION),
    organisation: mapper::resolve_text(raw, rules::ORGANISATION),
    fachgebiet: mapper::resolve_text(raw, rules::FACHGEBIET),
    date_of_birth: mapper::resolve_text(raw, rules::DATE_OF_BIRTH),
    nationality: mapper::resolve_text(raw, rules::NATIONALITY),
    description: mapper::resolve_text(raw, rules::DESCRIPTION),
    standort: mapper::resolve_text(raw, rules::STANDORT),
    image_url: mapper::resolve_text(raw, rules::IMAGE_URL),
    ..ProfileRecord::default()
  };

  // Expertise: classify the shape once, flatten to the canonical list.
  record.expertise = classify_expertise(raw).flatten(raw);

  // Education: flat arrays plus structured details, kept in sync.
  record.education = Education {
    fields: dedup_case_insensitive(mapper::resolve_string_list(
      raw,
      rules::EDUCATION_FIELDS,
    )),
    universities: dedup_case_insensitive(mapper::resolve_string_list(
      raw,
      rules::EDUCATION_UNIVERSITIES,
    )),
    degrees: dedup_case_insensitive(mapper::resolve_string_list(
      raw,
      rules::EDUCATION_DEGREES,
    )),
    details: parse_entries(
      "education.details",
      mapper::resolve_list(raw, rules::EDUCATION_DETAILS),
      |d: &EducationDetail| {
        !(d.degree.is_empty() && d.field.is_empty() && d.institution.is_empty())
      },
    ),
  };
  sync_education_arrays(&mut record.education);

  // Contact and social media.
  record.kontakt = ContactInfo {
    email:   mapper::resolve_text(raw, rules::EMAIL),
    phone:   mapper::resolve_text(raw, rules::PHONE),
    website: mapper::resolve_text(raw, rules::WEBSITE),
    address: mapper::resolve_text(raw, rules::ADDRESS),
  };
  record.social_media = SocialMedia {
    linkedin: mapper::resolve_text(raw, rules::LINKEDIN),
    twitter: mapper::resolve_text(raw, rules::TWITTER),
    github: mapper::resolve_text(raw, rules::GITHUB),
    extra: raw
      .get("social_media")
      .and_then(Value::as_object)
      .map(|m| {
        m.iter()
          .filter(|(k, v)| {
            !matches!(k.as_str(), "linkedin" | "twitter" | "github")
              && !mapper::is_empty_value(v)
          })
          .map(|(k, v)| (k.clone(), v.clone()))
          .collect()
      })
      .unwrap_or_default(),
  };

  // Struct lists.
  record.academic_positions = parse_entries(
    "academicPositions",
    mapper::resolve_list(raw, &[mapper::Alternate::Path("academicPositions")]),
    |p: &AcademicPosition| !(p.title.is_empty() && p.institution.is_empty()),
  );
  record.professional_positions = parse_entries(
    "professionalPositions",
    mapper::resolve_list(
      raw,
      &[mapper::Alternate::Path("professionalPositions")],
    ),
    |p: &ProfessionalPosition| !(p.title.is_empty() && p.company.is_empty()),
  );
  record.selected_publications = parse_entries(
    "selectedPublications",
    mapper::resolve_list(raw, rules::PUBLICATIONS),
    |p: &Publication| !p.title.is_empty(),
  );
  record.professional_memberships = parse_entries(
    "professionalMemberships",
    mapper::resolve_list(
      raw,
      &[mapper::Alternate::Path("professionalMemberships")],
    ),
    |m: &Membership| !m.organization.is_empty(),
  );
  record.awards = parse_entries(
    "awards",
    mapper::resolve_list(raw, &[mapper::Alternate::Path("awards")]),
    |a: &Award| !a.title.is_empty(),
  );
  record.languages = parse_entries(
    "languages",
    mapper::resolve_list(raw, &[mapper::Alternate::Path("languages")]),
    |l: &LanguageSkill| !l.language.is_empty(),
  );
  record.skills = parse_entries(
    "skills",
    mapper::resolve_list(raw, &[mapper::Alternate::Path("skills")]),
    |s: &Skill| !s.name.is_empty(),
  );
  record.academic_metrics = parse_sub("academicMetrics", raw.get("academicMetrics"));

  // Evidence and quality carry over when already canonical-shaped.
  record.sources = parse_sub::<Sources>("sources", raw.get("sources"));
  record.data_quality =
    parse_sub::<DataQuality>("data_quality", raw.get("data_quality"));

  // Audit fields.
  record.created_at = raw
    .get("created_at")
    .and_then(Value::as_str)
    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.to_utc());
  record.last_updated = raw
    .get("last_updated")
    .and_then(Value::as_str)
    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.to_utc());
  record.verified = raw.get("verified").and_then(Value::as_bool).unwrap_or(true);
  record.verification_source = raw
    .get("verification_source")
    .and_then(Value::as_str)
    .map(str::to_string);

  // Pass through anything the mapper did not consume.
  for (key, value) in map {
    if !CONSUMED_KEYS.contains(&key.as_str()) {
      record.extra.insert(key.clone(), value.clone());
    }
  }

  Ok(record)
}

/// Sync structured education details into the flat summary arrays.
pub(crate) fn sync_education_arrays(education: &mut Education) {
  // Split borrows: collect first, then push.
  let entries: Vec<(String, String, String)> = education
    .details
    .iter()
    .map(|d| (d.field.clone(), d.institution.clone(), d.degree.clone()))
    .collect();
  for (field, institution, degree) in entries {
    push_unique_ci(&mut education.fields, &field);
    push_unique_ci(&mut education.universities, &institution);
    push_unique_ci(&mut education.degrees, &degree);
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn scalar_expertise_becomes_single_element_array() {
    let raw = json!({ "name": "Jane Doe", "expertise": "Machine Learning" });
    let r = normalize(&raw, "jane-doe").unwrap();
    assert_eq!(r.expertise, vec!["Machine Learning".to_string()]);
  }

  #[test]
  fn grouped_expertise_flattens_primary_first() {
    let raw = json!({
      "expertise": {
        "primary": ["Robotics"],
        "secondary": ["Vision", "robotics"],
        "industries": ["Automotive"],
      }
    });
    let r = normalize(&raw, "x").unwrap();
    // "robotics" deduped case-insensitively against "Robotics".
    assert_eq!(r.expertise, vec!["Robotics", "Vision", "Automotive"]);
  }

  #[test]
  fn missing_expertise_falls_back_to_tags() {
    let raw = json!({ "tags": ["AI", "ai", " AI "] });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.expertise, vec!["AI"]);
  }

  #[test]
  fn empty_record_gets_empty_shaped_containers() {
    let raw = json!({ "name": "Jane Doe", "position": "CTO" });
    let r = normalize(&raw, "jane-doe").unwrap();
    assert!(r.expertise.is_empty());
    assert!(r.education.fields.is_empty());
    assert!(r.education.universities.is_empty());
    assert!(r.education.degrees.is_empty());
    assert!(r.education.details.is_empty());
    assert_eq!(r.kontakt, Default::default());
    assert_eq!(r.id, "jane-doe");
  }

  #[test]
  fn legacy_aliases_are_mapped_and_not_duplicated_into_extra() {
    let raw = json!({
      "organization": "Acme Labs",
      "linkedin_url": "https://www.linkedin.com/in/jane",
      "personalInfo": { "email": "jane@acme.example" },
    });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.organisation.as_deref(), Some("Acme Labs"));
    assert_eq!(
      r.social_media.linkedin.as_deref(),
      Some("https://www.linkedin.com/in/jane")
    );
    assert_eq!(r.kontakt.email.as_deref(), Some("jane@acme.example"));
    assert!(r.extra.is_empty());
  }

  #[test]
  fn unknown_keys_pass_through() {
    let raw = json!({ "name": "Jane", "myCustomField": { "a": 1 } });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.extra.get("myCustomField"), Some(&json!({ "a": 1 })));
  }

  #[test]
  fn malformed_list_entries_are_skipped_not_fatal() {
    let raw = json!({
      "academicPositions": [
        { "title": "Professor", "institution": "ETH" },
        "not an object",
        { "title": 12 },
      ]
    });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.academic_positions.len(), 1);
    assert_eq!(r.academic_positions[0].title, "Professor");
  }

  #[test]
  fn education_details_sync_into_flat_arrays() {
    let raw = json!({
      "education": {
        "universities": ["ETH Zurich"],
        "details": [
          { "degree": "PhD", "field": "Robotics", "institution": "ETH Zurich" },
          { "degree": "MSc", "field": "CS", "institution": "TU Munich" },
        ]
      }
    });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.education.universities, vec!["ETH Zurich", "TU Munich"]);
    assert_eq!(r.education.fields, vec!["Robotics", "CS"]);
    assert_eq!(r.education.degrees, vec!["PhD", "MSc"]);
  }

  #[test]
  fn academic_background_aliases_feed_education() {
    let raw = json!({
      "academicBackground": {
        "fields": ["Physics"],
        "universities": ["MIT"],
        "degrees": ["PhD"],
      }
    });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.education.fields, vec!["Physics"]);
    assert_eq!(r.education.universities, vec!["MIT"]);
  }

  #[test]
  fn non_object_record_is_the_only_error() {
    assert!(normalize(&json!("just a string"), "x").is_err());
    assert!(normalize(&json!({}), "x").is_ok());
  }

  #[test]
  fn canonical_sources_survive_normalization() {
    let raw = json!({
      "name": "Jane",
      "sources": {
        "personal_info": {
          "name": { "url": "https://x", "verified": true, "last_checked": "2020-01-01" }
        }
      }
    });
    let r = normalize(&raw, "x").unwrap();
    assert_eq!(r.sources.personal_info["name"].url, "https://x");
  }
}

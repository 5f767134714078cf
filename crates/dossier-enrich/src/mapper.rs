//! The field mapper — resolves a canonical value for a logical field from any
//! of its known legacy/alternate input shapes.
//!
//! Each logical field has a fixed, ordered list of [`Alternate`]s. Probing
//! stops at the first non-empty hit; partial values are never merged across
//! alternates, except for explicit [`Alternate::Join`] concatenation rules.
//! The tables in [`rules`] are the single auditable artifact for probing
//! order — there is no inline fallback logic anywhere else.

use serde_json::Value;

// ─── Alternates ──────────────────────────────────────────────────────────────

/// One way a logical field may appear in a raw record.
#[derive(Debug, Clone, Copy)]
pub enum Alternate {
  /// A dot path into the raw object. Numeric segments index into arrays
  /// (`"tags.0"`).
  Path(&'static str),
  /// Concatenate the values at `parts`, dropping empty parts, joined by
  /// `sep`.
  Join {
    parts: &'static [&'static str],
    sep:   &'static str,
  },
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Ordered-alternates tables, one per logical field. Order is load-bearing:
/// first match wins.
pub mod rules {
  use super::Alternate::{self, Join, Path};

  pub const NAME: &[Alternate] =
    &[Path("name"), Path("personalInfo.name"), Path("fullName")];

  pub const TITEL: &[Alternate] = &[Path("titel"), Path("personalInfo.title")];

  pub const FULL_NAME: &[Alternate] = &[
    Path("fullName"),
    Join {
      parts: &["firstName", "lastName"],
      sep:   " ",
    },
    Path("name"),
  ];

  pub const POSITION: &[Alternate] = &[
    Path("position"),
    Path("currentRole.title"),
    Path("institution.position"),
  ];

  pub const ORGANISATION: &[Alternate] = &[
    Path("organisation"),
    Path("organization"),
    Path("company.name"),
    Path("institution.name"),
  ];

  pub const FACHGEBIET: &[Alternate] =
    &[Path("fachgebiet"), Path("expertise.primary.0"), Path("tags.0")];

  pub const DATE_OF_BIRTH: &[Alternate] =
    &[Path("dateOfBirth"), Path("personalInfo.dateOfBirth")];

  pub const NATIONALITY: &[Alternate] =
    &[Path("nationality"), Path("personalInfo.nationality")];

  pub const DESCRIPTION: &[Alternate] = &[Path("description")];

  pub const STANDORT: &[Alternate] = &[
    Path("standort"),
    Path("location"),
    Join {
      parts: &["city", "country"],
      sep:   ", ",
    },
  ];

  pub const EMAIL: &[Alternate] =
    &[Path("kontakt.email"), Path("email"), Path("personalInfo.email")];

  pub const PHONE: &[Alternate] =
    &[Path("kontakt.phone"), Path("phone"), Path("personalInfo.phone")];

  pub const WEBSITE: &[Alternate] =
    &[Path("kontakt.website"), Path("website"), Path("company.url")];

  pub const ADDRESS: &[Alternate] = &[
    Path("kontakt.address"),
    Path("address"),
    Path("personalInfo.address"),
  ];

  pub const LINKEDIN: &[Alternate] = &[
    Path("social_media.linkedin"),
    Path("linkedin_url"),
    Path("profiles.linkedin"),
  ];

  pub const TWITTER: &[Alternate] =
    &[Path("social_media.twitter"), Path("twitter_url")];

  pub const GITHUB: &[Alternate] =
    &[Path("social_media.github"), Path("github_url")];

  pub const IMAGE_URL: &[Alternate] = &[
    Path("image_url"),
    Path("personalInfo.imageUrl"),
    Path("sources.image.url"),
  ];

  pub const PUBLICATIONS: &[Alternate] =
    &[Path("selectedPublications"), Path("publications")];

  pub const EDUCATION_FIELDS: &[Alternate] =
    &[Path("education.fields"), Path("academicBackground.fields")];

  pub const EDUCATION_UNIVERSITIES: &[Alternate] = &[
    Path("education.universities"),
    Path("academicBackground.universities"),
  ];

  pub const EDUCATION_DEGREES: &[Alternate] =
    &[Path("education.degrees"), Path("academicBackground.degrees")];

  pub const EDUCATION_DETAILS: &[Alternate] = &[Path("education.details")];
}

// ─── Probing ─────────────────────────────────────────────────────────────────

/// Walk a dot path into `raw`. Numeric segments index into arrays.
pub fn lookup_path<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
  let mut current = raw;
  for segment in path.split('.') {
    current = match current {
      Value::Object(map) => map.get(segment)?,
      Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
      _ => return None,
    };
  }
  Some(current)
}

/// Empty for probing purposes: null, blank string, empty array/object.
pub fn is_empty_value(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.trim().is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    Value::Bool(_) | Value::Number(_) => false,
  }
}

fn text_of(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => {
      let s = s.trim();
      if s.is_empty() { None } else { Some(s.to_string()) }
    }
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Resolve the first non-empty alternate as a raw value.
pub fn resolve(raw: &Value, alternates: &[Alternate]) -> Option<Value> {
  for alt in alternates {
    match alt {
      Alternate::Path(path) => {
        if let Some(v) = lookup_path(raw, path)
          && !is_empty_value(v)
        {
          return Some(v.clone());
        }
      }
      Alternate::Join { parts, sep } => {
        let joined: Vec<String> = parts
          .iter()
          .filter_map(|p| lookup_path(raw, p).and_then(text_of))
          .collect();
        if !joined.is_empty() {
          return Some(Value::String(joined.join(sep)));
        }
      }
    }
  }
  None
}

/// Resolve to trimmed text. Non-string scalars other than numbers yield
/// nothing.
pub fn resolve_text(raw: &Value, alternates: &[Alternate]) -> Option<String> {
  resolve(raw, alternates).as_ref().and_then(text_of)
}

/// Resolve to a list, coercing a scalar hit into a single-element list.
pub fn resolve_list(raw: &Value, alternates: &[Alternate]) -> Vec<Value> {
  match resolve(raw, alternates) {
    Some(Value::Array(items)) => items,
    Some(other) => vec![other],
    None => Vec::new(),
  }
}

/// Resolve to a list of trimmed strings (non-string entries dropped).
pub fn resolve_string_list(
  raw: &Value,
  alternates: &[Alternate],
) -> Vec<String> {
  resolve_list(raw, alternates)
    .iter()
    .filter_map(text_of)
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

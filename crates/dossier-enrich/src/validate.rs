//! The validator — structural and format checks over a canonical record.
//!
//! Operates on the serialized JSON value rather than the typed struct so the
//! container-type checks are honest (a legacy value checked before
//! normalization gets the same treatment). All violations are collected; the
//! validator never short-circuits and never fails.

use serde_json::Value;

// ─── Rule tables ─────────────────────────────────────────────────────────────

pub const REQUIRED_FIELDS: &[&str] =
  &["id", "name", "fullName", "position", "organisation", "expertise"];

pub const ARRAY_FIELDS: &[&str] = &[
  "expertise",
  "academicPositions",
  "professionalPositions",
  "selectedPublications",
  "professionalMemberships",
  "awards",
  "languages",
];

pub const OBJECT_FIELDS: &[&str] = &[
  "education",
  "kontakt",
  "social_media",
  "sources",
  "data_quality",
  "academicMetrics",
];

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
  pub is_valid: bool,
  pub issues:   Vec<String>,
}

impl ValidationReport {
  fn from_issues(issues: Vec<String>) -> Self {
    Self {
      is_valid: issues.is_empty(),
      issues,
    }
  }
}

// ─── Format checks ───────────────────────────────────────────────────────────

/// Standard email shape: one `@` with non-empty halves, no whitespace, and a
/// dot with characters on both sides somewhere in the domain.
pub fn is_valid_email(s: &str) -> bool {
  if s.is_empty() || s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// `http://…` or `https://…` with at least one character after the scheme.
pub fn is_valid_url(s: &str) -> bool {
  s.strip_prefix("https://")
    .or_else(|| s.strip_prefix("http://"))
    .is_some_and(|rest| !rest.is_empty())
}

// ─── Presence semantics ──────────────────────────────────────────────────────

/// A required field is missing when absent, `null`, or an empty string.
/// An empty array or object still counts as present here — populatedness is
/// the quality scorer's concern, not the validator's.
fn is_missing(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.trim().is_empty(),
    Some(_) => false,
  }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Validate a record value. Checks run in a fixed order: required-field
/// presence, container types, formats.
pub fn validate(record: &Value) -> ValidationReport {
  let mut issues = Vec::new();

  for field in REQUIRED_FIELDS {
    if is_missing(record.get(*field)) {
      issues.push(format!("Missing required field: {field}"));
    }
  }

  for field in ARRAY_FIELDS {
    if let Some(v) = record.get(*field)
      && !v.is_null()
      && !v.is_array()
    {
      issues.push(format!("Field {field} should be an array"));
    }
  }

  for field in OBJECT_FIELDS {
    if let Some(v) = record.get(*field)
      && !v.is_null()
      && !v.is_object()
    {
      issues.push(format!("Field {field} should be an object"));
    }
  }

  if let Some(email) = record
    .pointer("/kontakt/email")
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    && !is_valid_email(email)
  {
    issues.push("Invalid email format".to_string());
  }

  if let Some(social) = record.get("social_media").and_then(Value::as_object) {
    for (platform, url) in social {
      if let Some(url) = url.as_str()
        && !url.is_empty()
        && !is_valid_url(url)
      {
        issues.push(format!("Invalid URL format for {platform}"));
      }
    }
  }

  ValidationReport::from_issues(issues)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

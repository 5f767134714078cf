//! The canonical profile record — the fixed-shape document every expert file
//! conforms to after normalization.
//!
//! Canonical on-disk keys follow the legacy store (`fullName`, `titel`,
//! `kontakt`, `standort`, camelCase list fields) so that files written before
//! this rewrite remain readable. Unknown top-level keys survive a
//! normalize/save round trip through the flattened `extra` map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, quality::DataQuality, sources::Sources};

// ─── Sub-objects ─────────────────────────────────────────────────────────────

/// One degree programme. Uniqueness key: degree + institution
/// (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationDetail {
  #[serde(default)]
  pub degree:      String,
  #[serde(default)]
  pub field:       String,
  #[serde(default)]
  pub institution: String,
  #[serde(
    default,
    rename = "startDate",
    skip_serializing_if = "Option::is_none"
  )]
  pub start_year:  Option<i32>,
  #[serde(default, rename = "endDate", skip_serializing_if = "Option::is_none")]
  pub end_year:    Option<i32>,
}

/// Education summary. The flat `fields`/`universities`/`degrees` arrays are
/// kept in sync with `details` by the normalizer and the merger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
  #[serde(default)]
  pub fields:       Vec<String>,
  #[serde(default)]
  pub universities: Vec<String>,
  #[serde(default)]
  pub degrees:      Vec<String>,
  #[serde(default)]
  pub details:      Vec<EducationDetail>,
}

impl Education {
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
      && self.universities.is_empty()
      && self.degrees.is_empty()
      && self.details.is_empty()
  }
}

/// Contact details (`kontakt` on disk). Always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
}

/// Social media profile URLs. Known platforms are typed; anything else rides
/// in `extra` (platform name → URL).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMedia {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github:   Option<String>,
  #[serde(flatten)]
  pub extra:    BTreeMap<String, Value>,
}

impl SocialMedia {
  /// All populated (platform, url) pairs, typed fields first.
  pub fn platforms(&self) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    if let Some(u) = &self.linkedin {
      out.push(("linkedin", u.as_str()));
    }
    if let Some(u) = &self.twitter {
      out.push(("twitter", u.as_str()));
    }
    if let Some(u) = &self.github {
      out.push(("github", u.as_str()));
    }
    for (platform, v) in &self.extra {
      if let Some(u) = v.as_str()
        && !u.is_empty()
      {
        out.push((platform.as_str(), u));
      }
    }
    out
  }

  pub fn is_empty(&self) -> bool { self.platforms().is_empty() }
}

// ─── List-of-struct fields ───────────────────────────────────────────────────

/// A held academic post. Uniqueness key: title + institution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicPosition {
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub institution: String,
  #[serde(flatten)]
  pub extra:       BTreeMap<String, Value>,
}

/// A held industry post. Uniqueness key: title + company.
/// Dates are `YYYY-MM` strings (month zero-padded), as in the legacy store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalPosition {
  #[serde(default)]
  pub title:       String,
  #[serde(default)]
  pub company:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:    Option<String>,
  #[serde(
    default,
    rename = "startDate",
    skip_serializing_if = "Option::is_none"
  )]
  pub start_date:  Option<String>,
  #[serde(default, rename = "endDate", skip_serializing_if = "Option::is_none")]
  pub end_date:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// A selected publication. Uniqueness key: title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
  #[serde(default)]
  pub title:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub doi:       Option<String>,
  /// Citation counts arrive as numbers or numeric strings in legacy files.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub citations: Option<Value>,
  #[serde(flatten)]
  pub extra:     BTreeMap<String, Value>,
}

impl Publication {
  /// Citation count, tolerating both `123` and `"123"`.
  pub fn citation_count(&self) -> u64 {
    match &self.citations {
      Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
      Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
      _ => 0,
    }
  }
}

/// Membership in a professional body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Membership {
  #[serde(default)]
  pub organization: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:         Option<String>,
  #[serde(flatten)]
  pub extra:        BTreeMap<String, Value>,
}

/// A received award.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
  #[serde(default)]
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub year:  Option<i32>,
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

/// A spoken language. Uniqueness key: language (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
  #[serde(default)]
  pub language:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub proficiency: Option<String>,
}

/// An endorsed skill. Uniqueness key: name (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
  #[serde(default)]
  pub name:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub endorsements: Option<u32>,
}

// ─── Derived metrics ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationMetrics {
  #[serde(default)]
  pub total:     usize,
  #[serde(default)]
  pub citations: u64,
  #[serde(default)]
  pub h_index:   u32,
}

/// Aggregate publication metrics, recomputed from `selectedPublications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicMetrics {
  #[serde(default)]
  pub publications: PublicationMetrics,
}

// ─── ProfileRecord ───────────────────────────────────────────────────────────

/// The canonical expert record. Every array/object field is always present
/// (possibly empty); scalar fields are omitted from JSON when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
  /// Stable, filename-derived identity.
  #[serde(default)]
  pub id: String,

  // ── Scalars ───────────────────────────────────────────────────────────
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:          Option<String>,
  /// Honorific / academic title ("Prof. Dr.").
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub titel:         Option<String>,
  #[serde(default, rename = "fullName", skip_serializing_if = "Option::is_none")]
  pub full_name:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub organisation:  Option<String>,
  /// Primary discipline.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fachgebiet:    Option<String>,
  #[serde(
    default,
    rename = "dateOfBirth",
    skip_serializing_if = "Option::is_none"
  )]
  pub date_of_birth: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub nationality:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:   Option<String>,
  /// Location.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub standort:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:     Option<String>,

  // ── Containers (always present) ───────────────────────────────────────
  #[serde(default)]
  pub expertise:    Vec<String>,
  #[serde(default)]
  pub education:    Education,
  #[serde(default)]
  pub kontakt:      ContactInfo,
  #[serde(default)]
  pub social_media: SocialMedia,

  #[serde(default, rename = "academicPositions")]
  pub academic_positions:       Vec<AcademicPosition>,
  #[serde(default, rename = "professionalPositions")]
  pub professional_positions:   Vec<ProfessionalPosition>,
  #[serde(default, rename = "selectedPublications")]
  pub selected_publications:    Vec<Publication>,
  #[serde(default, rename = "professionalMemberships")]
  pub professional_memberships: Vec<Membership>,
  #[serde(default)]
  pub awards:                   Vec<Award>,
  #[serde(default)]
  pub languages:                Vec<LanguageSkill>,
  #[serde(default)]
  pub skills:                   Vec<Skill>,
  #[serde(default, rename = "academicMetrics")]
  pub academic_metrics:         AcademicMetrics,

  // ── Evidence & quality ────────────────────────────────────────────────
  #[serde(default)]
  pub sources:      Sources,
  #[serde(default)]
  pub data_quality: DataQuality,

  // ── Audit ─────────────────────────────────────────────────────────────
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:          Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_updated:        Option<DateTime<Utc>>,
  #[serde(default = "default_verified")]
  pub verified:            bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub verification_source: Option<String>,

  /// Unknown top-level keys, passed through unchanged.
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

fn default_verified() -> bool { true }

impl Default for ProfileRecord {
  fn default() -> Self {
    Self {
      id: String::new(),
      name: None,
      titel: None,
      full_name: None,
      position: None,
      organisation: None,
      fachgebiet: None,
      date_of_birth: None,
      nationality: None,
      description: None,
      standort: None,
      image_url: None,
      expertise: Vec::new(),
      education: Education::default(),
      kontakt: ContactInfo::default(),
      social_media: SocialMedia::default(),
      academic_positions: Vec::new(),
      professional_positions: Vec::new(),
      selected_publications: Vec::new(),
      professional_memberships: Vec::new(),
      awards: Vec::new(),
      languages: Vec::new(),
      skills: Vec::new(),
      academic_metrics: AcademicMetrics::default(),
      sources: Sources::default(),
      data_quality: DataQuality::default(),
      created_at: None,
      last_updated: None,
      verified: default_verified(),
      verification_source: None,
      extra: BTreeMap::new(),
    }
  }
}

impl ProfileRecord {
  /// The name used for matching and display: `fullName`, falling back to
  /// `name`.
  pub fn display_name(&self) -> Option<&str> {
    self
      .full_name
      .as_deref()
      .or(self.name.as_deref())
      .filter(|s| !s.trim().is_empty())
  }

  /// Serialize to a JSON value (the representation the validator and the
  /// quality scorer operate on).
  pub fn to_value(&self) -> Result<Value> {
    Ok(serde_json::to_value(self)?)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

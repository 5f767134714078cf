//! The canonical company record.
//!
//! Companies share the store, the provenance-leaf shape, and the quality
//! model with expert profiles, but carry their own field groups
//! (funding, products, specialties) and their own sources tree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  quality::DataQuality,
  sources::{ImageSource, SourceEntry},
};

// ─── Sub-objects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Funding {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total:             Option<String>,
  #[serde(default)]
  pub rounds:            Vec<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_funding_date: Option<String>,
}

/// Provenance tree for a company record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySources {
  /// Leaves keyed by field (`name`, `founding_date`, `location`,
  /// `employees`).
  #[serde(default)]
  pub company_info:      BTreeMap<String, SourceEntry>,
  /// Keyed by product name.
  #[serde(default)]
  pub products_services: BTreeMap<String, SourceEntry>,
  /// Keyed by specialty.
  #[serde(default)]
  pub specialties:       BTreeMap<String, SourceEntry>,
  /// Keyed by partner name.
  #[serde(default)]
  pub partnerships:      BTreeMap<String, SourceEntry>,
  /// Leaves keyed by contact field (`email`, `phone`, `address`).
  #[serde(default)]
  pub contact_info:      BTreeMap<String, SourceEntry>,
  /// Keyed by platform.
  #[serde(default)]
  pub social_media:      BTreeMap<String, SourceEntry>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:             Option<ImageSource>,
}

// ─── CompanyRecord ───────────────────────────────────────────────────────────

/// Canonical company record, one JSON file per company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
  #[serde(default)]
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub founded:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub employees:   Option<String>,

  #[serde(default)]
  pub specialties:  Vec<String>,
  #[serde(default)]
  pub products:     Vec<String>,
  #[serde(default)]
  pub partnerships: Vec<String>,
  #[serde(default)]
  pub technologies: Vec<String>,
  #[serde(default)]
  pub funding:      Funding,
  #[serde(default)]
  pub social_media: BTreeMap<String, String>,

  #[serde(default = "default_category", rename = "category")]
  pub category:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subcategory: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:   Option<String>,

  #[serde(default)]
  pub sources:      CompanySources,
  #[serde(default)]
  pub data_quality: DataQuality,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:          Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_updated:        Option<DateTime<Utc>>,
  #[serde(default)]
  pub verified:            bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub verification_source: Option<String>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

fn default_category() -> String { "AI Company".to_string() }

impl Default for CompanyRecord {
  fn default() -> Self {
    Self {
      name: String::new(),
      description: None,
      website: None,
      location: None,
      founded: None,
      employees: None,
      specialties: Vec::new(),
      products: Vec::new(),
      partnerships: Vec::new(),
      technologies: Vec::new(),
      funding: Funding::default(),
      social_media: BTreeMap::new(),
      category: default_category(),
      subcategory: None,
      image_url: None,
      sources: CompanySources::default(),
      data_quality: DataQuality::default(),
      created_at: None,
      last_updated: None,
      verified: false,
      verification_source: None,
      extra: BTreeMap::new(),
    }
  }
}

//! Auxiliary external-source datasets.
//!
//! A scraped professional-network export is a list of profile objects with
//! their own field vocabulary. Parsing is lenient: unknown keys are ignored
//! and entries that fail to deserialize are skipped with a warning rather
//! than failing the whole dataset.

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

// ─── Profile shape ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxProfile {
  pub first_name:        Option<String>,
  pub last_name:         Option<String>,
  pub full_name:         Option<String>,
  pub headline:          Option<String>,
  pub summary:           Option<String>,
  pub public_identifier: Option<String>,
  pub picture_url:       Option<String>,
  pub geo_location_name: Option<String>,
  pub geo_country_name:  Option<String>,
  pub positions:         Vec<AuxPosition>,
  pub educations:        Vec<AuxEducation>,
  pub skills:            Vec<AuxSkill>,
  pub languages:         Vec<AuxLanguage>,
}

impl AuxProfile {
  /// Display name for matching: `fullName` when present, otherwise the
  /// first/last pair joined.
  pub fn full_name(&self) -> Option<String> {
    if let Some(name) = &self.full_name
      && !name.trim().is_empty()
    {
      return Some(name.trim().to_string());
    }
    let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
      .into_iter()
      .flatten()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    (!joined.is_empty()).then_some(joined)
  }

  /// Location string for backfilling: the geo location, falling back to the
  /// bare country.
  pub fn location(&self) -> Option<&str> {
    self
      .geo_location_name
      .as_deref()
      .or(self.geo_country_name.as_deref())
      .map(str::trim)
      .filter(|s| !s.is_empty())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxPosition {
  pub title:        Option<String>,
  pub company_name: Option<String>,
  pub location:     Option<String>,
  pub description:  Option<String>,
  pub time_period:  AuxTimePeriod,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxTimePeriod {
  pub start_date: Option<AuxYearMonth>,
  pub end_date:   Option<AuxYearMonth>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AuxYearMonth {
  pub year:  i32,
  #[serde(default)]
  pub month: Option<u32>,
}

impl AuxYearMonth {
  /// `YYYY-MM` when the month is known, bare `YYYY` otherwise.
  pub fn format(&self) -> String {
    match self.month {
      Some(m) => format!("{}-{:02}", self.year, m),
      None => self.year.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxEducation {
  pub school_name:    Option<String>,
  pub degree_name:    Option<String>,
  pub field_of_study: Option<String>,
  pub time_period:    AuxTimePeriod,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxSkill {
  pub name:         Option<String>,
  pub endorsements: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuxLanguage {
  pub name:        Option<String>,
  pub proficiency: Option<String>,
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AuxDataset {
  pub profiles: Vec<AuxProfile>,
}

impl AuxDataset {
  /// Parse a dataset from its JSON value. Accepts either a bare array of
  /// profiles or an object with a `profiles` array.
  pub fn from_json(value: &Value) -> Result<Self> {
    let items = match value {
      Value::Array(items) => items.as_slice(),
      Value::Object(map) => match map.get("profiles") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => return Err(Error::MalformedAuxDataset),
      },
      _ => return Err(Error::MalformedAuxDataset),
    };

    let mut profiles = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
      match serde_json::from_value::<AuxProfile>(item.clone()) {
        Ok(profile) => profiles.push(profile),
        Err(error) => {
          tracing::warn!(%error, index, "skipping malformed profile entry");
        }
      }
    }
    Ok(Self { profiles })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn full_name_prefers_explicit_field() {
    let profile: AuxProfile = serde_json::from_value(json!({
      "fullName": "Dr. Jane Doe",
      "firstName": "Jane",
      "lastName": "Doe",
    }))
    .unwrap();
    assert_eq!(profile.full_name().as_deref(), Some("Dr. Jane Doe"));
  }

  #[test]
  fn full_name_joins_first_and_last() {
    let profile: AuxProfile = serde_json::from_value(json!({
      "firstName": "Jane",
      "lastName": "Doe",
    }))
    .unwrap();
    assert_eq!(profile.full_name().as_deref(), Some("Jane Doe"));
  }

  #[test]
  fn year_month_formatting() {
    let ym = AuxYearMonth {
      year:  2021,
      month: Some(3),
    };
    assert_eq!(ym.format(), "2021-03");
    let y = AuxYearMonth {
      year:  2021,
      month: None,
    };
    assert_eq!(y.format(), "2021");
  }

  #[test]
  fn dataset_accepts_bare_array_and_wrapped_object() {
    let bare = json!([{ "firstName": "Jane" }]);
    assert_eq!(AuxDataset::from_json(&bare).unwrap().profiles.len(), 1);

    let wrapped = json!({ "profiles": [{ "firstName": "Jane" }] });
    assert_eq!(AuxDataset::from_json(&wrapped).unwrap().profiles.len(), 1);

    assert!(AuxDataset::from_json(&json!("nope")).is_err());
  }

  #[test]
  fn malformed_entries_are_skipped() {
    let value = json!([
      { "firstName": "Jane" },
      { "positions": "not-a-list" },
    ]);
    let dataset = AuxDataset::from_json(&value).unwrap();
    assert_eq!(dataset.profiles.len(), 1);
  }
}

//! External-source matching and merging.
//!
//! A record is matched against an auxiliary dataset by display name. One
//! unambiguous match merges additively into the record; zero matches leave it
//! untouched; two or more candidates are surfaced for manual review rather
//! than merged, since a wrong merge is far more expensive than a skipped one.

use chrono::NaiveDate;
use dossier_core::record::{
  EducationDetail, LanguageSkill, ProfessionalPosition, ProfileRecord, Skill,
};

use crate::aux::{AuxDataset, AuxProfile};

// ─── Matching ────────────────────────────────────────────────────────────────

/// How a record fared against the auxiliary dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
  /// No candidate matched; the record is unchanged.
  None,
  /// Exactly one candidate matched and was merged.
  Unique { matched_name: String },
  /// Two or more candidates matched. Nothing was merged; the candidate
  /// names are reported so a human can resolve the collision.
  Ambiguous { candidate_names: Vec<String> },
}

fn names_match(record_name: &str, profile_name: &str) -> bool {
  let a = record_name.trim().to_lowercase();
  let b = profile_name.trim().to_lowercase();
  if a.is_empty() || b.is_empty() {
    return false;
  }
  a == b || a.contains(&b) || b.contains(&a)
}

/// Find candidates for `record` in the dataset. Matching is case-insensitive
/// on the display name, with substring containment tolerated so that
/// "Dr. Jane Doe" still finds "Jane Doe".
pub fn find_candidates<'a>(
  record: &ProfileRecord,
  dataset: &'a AuxDataset,
) -> Vec<&'a AuxProfile> {
  let Some(record_name) = record.display_name() else {
    return Vec::new();
  };
  dataset
    .profiles
    .iter()
    .filter(|p| {
      p.full_name()
        .is_some_and(|name| names_match(record_name, &name))
    })
    .collect()
}

// ─── Merging ─────────────────────────────────────────────────────────────────

/// What a merge changed, for the batch summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
  pub skills_added:    usize,
  pub languages_added: usize,
  pub positions_added: usize,
  pub education_added: usize,
  pub scalars_filled:  Vec<&'static str>,
}

impl MergeReport {
  pub fn changed(&self) -> bool {
    self.skills_added > 0
      || self.languages_added > 0
      || self.positions_added > 0
      || self.education_added > 0
      || !self.scalars_filled.is_empty()
  }
}

fn eq_ci(a: &str, b: &str) -> bool { a.trim().eq_ignore_ascii_case(b.trim()) }

fn fill_scalar(
  target: &mut Option<String>,
  value: Option<&str>,
  name: &'static str,
  report: &mut MergeReport,
) {
  if target.as_deref().is_none_or(|s| s.trim().is_empty())
    && let Some(v) = value
    && !v.trim().is_empty()
  {
    *target = Some(v.trim().to_string());
    report.scalars_filled.push(name);
  }
}

/// Merge one auxiliary profile into the record. Additive and fill-only:
/// existing list entries and populated scalars are never overwritten, so
/// merging the same profile twice is a no-op the second time.
pub fn merge_profile(
  record: &mut ProfileRecord,
  profile: &AuxProfile,
  checked_on: NaiveDate,
) -> MergeReport {
  let mut report = MergeReport::default();

  for skill in &profile.skills {
    let Some(name) = skill.name.as_deref().map(str::trim) else {
      continue;
    };
    if name.is_empty() || record.skills.iter().any(|s| eq_ci(&s.name, name)) {
      continue;
    }
    record.skills.push(Skill {
      name:         name.to_string(),
      endorsements: skill.endorsements,
    });
    report.skills_added += 1;
  }

  for language in &profile.languages {
    let Some(name) = language.name.as_deref().map(str::trim) else {
      continue;
    };
    if name.is_empty()
      || record.languages.iter().any(|l| eq_ci(&l.language, name))
    {
      continue;
    }
    record.languages.push(LanguageSkill {
      language:    name.to_string(),
      proficiency: language.proficiency.clone(),
    });
    report.languages_added += 1;
  }

  for position in &profile.positions {
    let title = position.title.as_deref().unwrap_or("").trim();
    let company = position.company_name.as_deref().unwrap_or("").trim();
    if title.is_empty() && company.is_empty() {
      continue;
    }
    let exists = record
      .professional_positions
      .iter()
      .any(|p| eq_ci(&p.title, title) && eq_ci(&p.company, company));
    if exists {
      continue;
    }
    record.professional_positions.push(ProfessionalPosition {
      title:       title.to_string(),
      company:     company.to_string(),
      location:    position.location.clone(),
      start_date:  position
        .time_period
        .start_date
        .as_ref()
        .map(|d| d.format()),
      end_date:    position.time_period.end_date.as_ref().map(|d| d.format()),
      description: position.description.clone(),
    });
    report.positions_added += 1;
  }

  for education in &profile.educations {
    let school = education.school_name.as_deref().unwrap_or("").trim();
    let degree = education.degree_name.as_deref().unwrap_or("").trim();
    if school.is_empty() && degree.is_empty() {
      continue;
    }
    let exists = record
      .education
      .details
      .iter()
      .any(|d| eq_ci(&d.degree, degree) && eq_ci(&d.institution, school));
    if exists {
      continue;
    }
    record.education.details.push(EducationDetail {
      degree:      degree.to_string(),
      field:       education
        .field_of_study
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string(),
      institution: school.to_string(),
      start_year:  education.time_period.start_date.map(|d| d.year),
      end_year:    education.time_period.end_date.map(|d| d.year),
    });
    report.education_added += 1;
  }
  if report.education_added > 0 {
    crate::normalize::sync_education_arrays(&mut record.education);
  }

  fill_scalar(
    &mut record.image_url,
    profile.picture_url.as_deref(),
    "image_url",
    &mut report,
  );
  fill_scalar(
    &mut record.standort,
    profile.location(),
    "standort",
    &mut report,
  );
  let linkedin_url = profile
    .public_identifier
    .as_deref()
    .map(|id| format!("https://www.linkedin.com/in/{id}"));
  fill_scalar(
    &mut record.social_media.linkedin,
    linkedin_url.as_deref(),
    "social_media.linkedin",
    &mut report,
  );

  // A match means the dataset was consulted, even when nothing new came of
  // it. `add_primary_source` keeps re-runs from stacking entries.
  record.sources.add_primary_source(
    "LinkedIn Extended Profile",
    "professional_network",
    checked_on,
  );

  report
}

/// Match and merge in one step: the single-candidate case merges, everything
/// else is reported back untouched.
pub fn apply_dataset(
  record: &mut ProfileRecord,
  dataset: &AuxDataset,
  checked_on: NaiveDate,
) -> (MatchOutcome, MergeReport) {
  let candidates = find_candidates(record, dataset);
  match candidates.as_slice() {
    [] => (MatchOutcome::None, MergeReport::default()),
    [profile] => {
      let matched_name = profile.full_name().unwrap_or_default();
      let report = merge_profile(record, profile, checked_on);
      (MatchOutcome::Unique { matched_name }, report)
    }
    many => {
      let candidate_names =
        many.iter().filter_map(|p| p.full_name()).collect();
      (MatchOutcome::Ambiguous { candidate_names }, MergeReport::default())
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! Duplicate detection across a set of record files.
//!
//! Detection only. Each candidate pair names the key that collided and the
//! two files involved; removal is a separate explicit command.

use std::{collections::HashMap, fmt};

use serde_json::Value;

use crate::mapper::{self, rules};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Which identity key two files collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
  Name,
  Email,
  Linkedin,
}

impl fmt::Display for DuplicateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Name => "name",
      Self::Email => "email",
      Self::Linkedin => "linkedin",
    })
  }
}

/// A pair of files sharing an identity key. `first` is the file seen first
/// in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCandidate {
  pub key:    DuplicateKey,
  pub value:  String,
  pub first:  String,
  pub second: String,
}

// ─── Key normalization ───────────────────────────────────────────────────────

/// Reduce a LinkedIn URL or handle to its bare profile identifier:
/// scheme, `www.`, and the `linkedin.com/in/` prefix stripped, trailing
/// slash removed, lowercased.
pub fn normalize_linkedin_handle(url: &str) -> String {
  let mut s = url.trim();
  s = s
    .strip_prefix("https://")
    .or_else(|| s.strip_prefix("http://"))
    .unwrap_or(s);
  s = s.strip_prefix("www.").unwrap_or(s);
  s = s.strip_prefix("linkedin.com/in/").unwrap_or(s);
  s.trim_end_matches('/').to_lowercase()
}

fn name_key(raw: &Value) -> Option<String> {
  mapper::resolve_text(raw, rules::FULL_NAME)
    .or_else(|| mapper::resolve_text(raw, rules::NAME))
    .map(|s| s.to_lowercase())
}

fn email_key(raw: &Value) -> Option<String> {
  mapper::resolve_text(raw, rules::EMAIL).map(|s| s.to_lowercase())
}

fn linkedin_key(raw: &Value) -> Option<String> {
  mapper::resolve_text(raw, rules::LINKEDIN)
    .map(|s| normalize_linkedin_handle(&s))
    .filter(|s| !s.is_empty())
}

// ─── Detection ───────────────────────────────────────────────────────────────

/// Scan `(file, record)` pairs for colliding identity keys. Single pass in
/// input order; a key's first bearer is reported as `first` in every pair it
/// participates in. Keys are resolved through the field-alias tables so
/// legacy-shaped files participate too.
pub fn find_duplicates(records: &[(String, Value)]) -> Vec<DuplicateCandidate> {
  let mut by_name: HashMap<String, &str> = HashMap::new();
  let mut by_email: HashMap<String, &str> = HashMap::new();
  let mut by_linkedin: HashMap<String, &str> = HashMap::new();
  let mut candidates = Vec::new();

  for (file, raw) in records {
    if let Some(name) = name_key(raw) {
      match by_name.get(&name) {
        Some(first) => candidates.push(DuplicateCandidate {
          key:    DuplicateKey::Name,
          value:  name,
          first:  (*first).to_string(),
          second: file.clone(),
        }),
        None => {
          by_name.insert(name, file.as_str());
        }
      }
    }
    if let Some(email) = email_key(raw) {
      match by_email.get(&email) {
        Some(first) => candidates.push(DuplicateCandidate {
          key:    DuplicateKey::Email,
          value:  email,
          first:  (*first).to_string(),
          second: file.clone(),
        }),
        None => {
          by_email.insert(email, file.as_str());
        }
      }
    }
    if let Some(handle) = linkedin_key(raw) {
      match by_linkedin.get(&handle) {
        Some(first) => candidates.push(DuplicateCandidate {
          key:    DuplicateKey::Linkedin,
          value:  handle,
          first:  (*first).to_string(),
          second: file.clone(),
        }),
        None => {
          by_linkedin.insert(handle, file.as_str());
        }
      }
    }
  }

  candidates
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! [`JsonFileStore`] — the flat-file implementation of [`RecordStore`].

use std::path::{Path, PathBuf};

use dossier_core::store::{RecordKind, RecordStore};
use serde_json::Value;
use tokio::io::AsyncWriteExt as _;

use crate::{Error, Result};

/// File-name slug for a record: lowercased, every run of non-alphanumeric
/// characters collapsed to a single hyphen.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut last_hyphen = true;
  for c in name.trim().to_lowercase().chars() {
    if c.is_ascii_alphanumeric() {
      slug.push(c);
      last_hyphen = false;
    } else if !last_hyphen {
      slug.push('-');
      last_hyphen = true;
    }
  }
  while slug.ends_with('-') {
    slug.pop();
  }
  slug
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Dossier record store backed by a directory of JSON files.
///
/// Layout: `{root}/experts/{slug}.json` and `{root}/companies/{slug}.json`.
/// Cloning is cheap.
#[derive(Clone)]
pub struct JsonFileStore {
  root: PathBuf,
}

impl JsonFileStore {
  /// Open (or create) a store rooted at `root`, creating the per-kind
  /// subdirectories.
  pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    for kind in [RecordKind::Expert, RecordKind::Company] {
      let dir = root.join(kind.dir_name());
      tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::io(&dir, e))?;
    }
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  fn file_path(&self, kind: RecordKind, slug: &str) -> Result<PathBuf> {
    // Slugs never contain path separators or dots; anything else is a bug
    // in the caller, not a record to look up.
    if slug.is_empty()
      || !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
      return Err(Error::InvalidSlug(slug.to_string()));
    }
    Ok(self.root.join(kind.dir_name()).join(format!("{slug}.json")))
  }
}

impl RecordStore for JsonFileStore {
  type Error = Error;

  async fn list(&self, kind: RecordKind) -> Result<Vec<String>> {
    let dir = self.root.join(kind.dir_name());
    let mut entries = tokio::fs::read_dir(&dir)
      .await
      .map_err(|e| Error::io(&dir, e))?;

    let mut slugs = Vec::new();
    while let Some(entry) = entries
      .next_entry()
      .await
      .map_err(|e| Error::io(&dir, e))?
    {
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some("json") {
        continue;
      }
      let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        continue;
      };
      // Seed and template files live alongside real records; they are not
      // records themselves.
      if stem.contains("default") || stem.contains("template") {
        tracing::debug!(%kind, stem, "skipping non-record file");
        continue;
      }
      slugs.push(stem.to_string());
    }
    slugs.sort();
    Ok(slugs)
  }

  async fn load(&self, kind: RecordKind, slug: &str) -> Result<Option<Value>> {
    let path = self.file_path(kind, slug)?;
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(Error::io(&path, e)),
    };
    let value = serde_json::from_slice(&bytes)
      .map_err(|source| Error::MalformedRecord { path, source })?;
    Ok(Some(value))
  }

  async fn save(
    &self,
    kind: RecordKind,
    slug: &str,
    value: &Value,
  ) -> Result<()> {
    let path = self.file_path(kind, slug)?;
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');

    // Write to a sibling temp file, then rename over the target so readers
    // never observe a partial record.
    let tmp = path.with_extension("json.tmp");
    let mut file = tokio::fs::File::create(&tmp)
      .await
      .map_err(|e| Error::io(&tmp, e))?;
    file
      .write_all(&body)
      .await
      .map_err(|e| Error::io(&tmp, e))?;
    file.sync_all().await.map_err(|e| Error::io(&tmp, e))?;
    tokio::fs::rename(&tmp, &path)
      .await
      .map_err(|e| Error::io(&path, e))?;
    tracing::debug!(%kind, slug, bytes = body.len(), "wrote record");
    Ok(())
  }

  async fn delete(&self, kind: RecordKind, slug: &str) -> Result<()> {
    let path = self.file_path(kind, slug)?;
    tokio::fs::remove_file(&path)
      .await
      .map_err(|e| Error::io(&path, e))
  }
}

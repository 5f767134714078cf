//! `dossier` — batch driver for the Dossier record pipeline.
//!
//! Reads `dossier.toml` (or `DOSSIER_*` environment variables) for the data
//! directory, then runs one of the batch commands over the flat-file store.
//!
//! # Usage
//!
//! ```
//! dossier standardize
//! dossier enrich --aux linkedin-export.json
//! dossier dedupe
//! dossier remove jane-doe-2
//! dossier import-companies --input crunchbase-dump.json
//! ```
//!
//! Individual record failures are logged and skipped; the exit code is
//! non-zero only for environment-level failures (unreadable data directory,
//! unparseable aux dataset).

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dossier_core::store::{RecordKind, RecordStore};
use dossier_enrich::{
  aux::AuxDataset,
  company, dedupe,
  merge::MatchOutcome,
  normalize,
  pipeline::{EnrichOptions, enrich_record},
};
use dossier_store_json::{JsonFileStore, slugify};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "dossier", about = "Batch driver for the Dossier record pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "dossier.toml")]
  config: PathBuf,

  /// Root of the record store (overrides config file and environment).
  #[arg(long, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Normalize every record file in place (shape coercions only).
  Standardize {
    /// Restrict to one record kind.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
  },
  /// Run the full enrichment pipeline over all expert files.
  Enrich {
    /// JSON export of an external professional-network dataset.
    #[arg(long, value_name = "FILE")]
    aux: Option<PathBuf>,
  },
  /// Report candidate duplicate expert files. Never deletes.
  Dedupe,
  /// Delete one expert record by slug.
  Remove { slug: String },
  /// Import a Crunchbase-style dump into company record files.
  ImportCompanies {
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
  Expert,
  Company,
}

impl From<KindArg> for RecordKind {
  fn from(kind: KindArg) -> Self {
    match kind {
      KindArg::Expert => RecordKind::Expert,
      KindArg::Company => RecordKind::Company,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Settings {
  #[serde(default = "default_data_dir")]
  data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("DOSSIER"))
    .build()
    .context("failed to read config")?;
  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let data_dir = cli.data_dir.unwrap_or(settings.data_dir);
  let store = JsonFileStore::open(&data_dir)
    .await
    .with_context(|| format!("failed to open store at {data_dir:?}"))?;

  match cli.command {
    Command::Standardize { kind } => standardize(&store, kind).await,
    Command::Enrich { aux } => enrich(&store, aux.as_deref()).await,
    Command::Dedupe => run_dedupe(&store).await,
    Command::Remove { slug } => remove(&store, &slug).await,
    Command::ImportCompanies { input } => import_companies(&store, &input).await,
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn standardize(
  store: &JsonFileStore,
  kind: Option<KindArg>,
) -> anyhow::Result<()> {
  let kinds: Vec<RecordKind> = match kind {
    Some(k) => vec![k.into()],
    None => vec![RecordKind::Expert, RecordKind::Company],
  };

  let mut updated = 0usize;
  let mut failed = 0usize;
  for kind in kinds {
    for slug in store.list(kind).await? {
      let raw = match store.load(kind, &slug).await {
        Ok(Some(raw)) => raw,
        Ok(None) => continue,
        Err(error) => {
          tracing::warn!(%kind, slug, %error, "skipping unreadable record");
          failed += 1;
          continue;
        }
      };
      let result = match kind {
        RecordKind::Expert => normalize::normalize(&raw, &slug)
          .map_err(anyhow::Error::from)
          .and_then(|r| Ok(r.to_value()?)),
        RecordKind::Company => {
          serde_json::from_value::<dossier_core::company::CompanyRecord>(
            raw.clone(),
          )
          .map_err(anyhow::Error::from)
          .and_then(|r| Ok(serde_json::to_value(&r)?))
        }
      };
      match result {
        Ok(canonical) => {
          if canonical != raw {
            match store.save(kind, &slug, &canonical).await {
              Ok(()) => updated += 1,
              Err(error) => {
                tracing::warn!(%kind, slug, %error, "failed to write record");
                failed += 1;
              }
            }
          }
        }
        Err(error) => {
          tracing::warn!(%kind, slug, %error, "skipping unstandardizable record");
          failed += 1;
        }
      }
    }
  }

  println!("standardize: {updated} updated, {failed} failed");
  Ok(())
}

async fn enrich(
  store: &JsonFileStore,
  aux_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
  let aux = match aux_path {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading aux dataset {}", path.display()))?;
      let value: serde_json::Value =
        serde_json::from_str(&raw).context("parsing aux dataset")?;
      Some(AuxDataset::from_json(&value).context("loading aux dataset")?)
    }
    None => None,
  };

  let as_of = Utc::now();
  let opts = EnrichOptions {
    checked_on: as_of.date_naive(),
    as_of,
  };

  let mut processed = 0usize;
  let mut enriched = 0usize;
  let mut skipped = 0usize;
  let mut failed = 0usize;
  let mut ambiguous: Vec<(String, Vec<String>)> = Vec::new();
  let mut invalid: Vec<(String, Vec<String>)> = Vec::new();

  for slug in store.list(RecordKind::Expert).await? {
    let raw = match store.load(RecordKind::Expert, &slug).await {
      Ok(Some(raw)) => raw,
      Ok(None) => continue,
      Err(error) => {
        tracing::warn!(slug, %error, "skipping unreadable record");
        failed += 1;
        continue;
      }
    };
    processed += 1;

    // Already-complete records are left alone.
    let completeness = raw
      .pointer("/data_quality/completeness")
      .and_then(serde_json::Value::as_f64)
      .unwrap_or(0.0);
    if completeness >= 0.95 {
      skipped += 1;
      continue;
    }

    match enrich_record(&raw, &slug, aux.as_ref(), &opts) {
      Ok(enrichment) => {
        if let MatchOutcome::Ambiguous { candidate_names } = &enrichment.outcome
        {
          ambiguous.push((slug.clone(), candidate_names.clone()));
        }
        if !enrichment.validation.is_valid {
          invalid.push((slug.clone(), enrichment.validation.issues.clone()));
        }
        let saved = match enrichment.record.to_value() {
          Ok(value) => store
            .save(RecordKind::Expert, &slug, &value)
            .await
            .map_err(anyhow::Error::from),
          Err(error) => Err(error.into()),
        };
        match saved {
          Ok(()) => enriched += 1,
          Err(error) => {
            tracing::warn!(slug, %error, "failed to write record");
            failed += 1;
          }
        }
      }
      Err(error) => {
        tracing::warn!(slug, %error, "skipping unenrichable record");
        failed += 1;
      }
    }
  }

  println!(
    "enrich: {processed} processed, {enriched} enriched, {skipped} skipped, \
     {failed} failed"
  );
  if !invalid.is_empty() {
    println!("\nvalidation issues:");
    for (slug, issues) in &invalid {
      println!("  {slug}:");
      for issue in issues {
        println!("    - {issue}");
      }
    }
  }
  if !ambiguous.is_empty() {
    println!("\nambiguous matches (not merged, resolve manually):");
    for (slug, names) in &ambiguous {
      println!("  {slug}: {}", names.join(", "));
    }
  }
  Ok(())
}

async fn run_dedupe(store: &JsonFileStore) -> anyhow::Result<()> {
  let mut records = Vec::new();
  for slug in store.list(RecordKind::Expert).await? {
    match store.load(RecordKind::Expert, &slug).await {
      Ok(Some(value)) => records.push((format!("{slug}.json"), value)),
      Ok(None) => {}
      Err(error) => tracing::warn!(slug, %error, "skipping unreadable record"),
    }
  }

  let candidates = dedupe::find_duplicates(&records);
  if candidates.is_empty() {
    println!("dedupe: no candidate duplicates in {} records", records.len());
    return Ok(());
  }

  println!(
    "dedupe: {} candidate pair(s) in {} records",
    candidates.len(),
    records.len()
  );
  for c in &candidates {
    println!("  [{}] {:?}: {} <-> {}", c.key, c.value, c.first, c.second);
  }
  println!("\nresolve with: dossier remove <slug>");
  Ok(())
}

async fn remove(store: &JsonFileStore, slug: &str) -> anyhow::Result<()> {
  store
    .delete(RecordKind::Expert, slug)
    .await
    .with_context(|| format!("removing expert {slug:?}"))?;
  println!("removed {slug}");
  Ok(())
}

async fn import_companies(
  store: &JsonFileStore,
  input: &std::path::Path,
) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(input)
    .with_context(|| format!("reading dump {}", input.display()))?;
  let entries: Vec<serde_json::Value> =
    serde_json::from_str(&raw).context("parsing company dump")?;

  let as_of = Utc::now();
  let mut imported = 0usize;
  let mut skipped = 0usize;
  for entry in &entries {
    let Some(record) = company::from_crunchbase(entry, as_of) else {
      tracing::warn!("skipping company entry without a name");
      skipped += 1;
      continue;
    };
    let slug = slugify(&record.name);
    let value = serde_json::to_value(&record)?;
    match store.save(RecordKind::Company, &slug, &value).await {
      Ok(()) => imported += 1,
      Err(error) => {
        tracing::warn!(slug, %error, "failed to write company record");
        skipped += 1;
      }
    }
  }

  println!("import-companies: {imported} imported, {skipped} skipped");
  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  async fn store_with(
    files: &[(&str, &str)],
  ) -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).await.unwrap();
    for (name, body) in files {
      std::fs::write(dir.path().join("experts").join(name), body).unwrap();
    }
    (dir, store)
  }

  #[tokio::test]
  async fn standardize_skips_unreadable_files_and_continues() {
    let (_dir, store) = store_with(&[
      ("broken.json", "{ not json"),
      (
        "zoe-chen.json",
        r#"{ "name": "Zoe Chen", "personalInfo": { "title": "Dr." } }"#,
      ),
    ])
    .await;

    // "broken" sorts first; the batch must survive it.
    standardize(&store, Some(KindArg::Expert)).await.unwrap();

    let value = store
      .load(RecordKind::Expert, "zoe-chen")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(value["titel"], "Dr.");
    assert!(value.get("personalInfo").is_none());
  }

  #[tokio::test]
  async fn enrich_skips_unreadable_files_and_continues() {
    let (_dir, store) = store_with(&[
      ("broken.json", "not even json"),
      ("zoe-chen.json", r#"{ "name": "Zoe Chen" }"#),
    ])
    .await;

    enrich(&store, None).await.unwrap();

    let value = store
      .load(RecordKind::Expert, "zoe-chen")
      .await
      .unwrap()
      .unwrap();
    assert!(value["data_quality"]["completeness"].as_f64().is_some());
  }
}

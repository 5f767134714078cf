//! Integration tests for `JsonFileStore` against a temp directory.

use dossier_core::store::{RecordKind, RecordStore};
use serde_json::json;

use crate::{Error, JsonFileStore, slugify};

async fn store() -> (tempfile::TempDir, JsonFileStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = JsonFileStore::open(dir.path()).await.expect("store");
  (dir, store)
}

#[tokio::test]
async fn open_creates_kind_directories() {
  let (dir, _store) = store().await;
  assert!(dir.path().join("experts").is_dir());
  assert!(dir.path().join("companies").is_dir());
}

#[tokio::test]
async fn save_and_load_round_trip() {
  let (_dir, s) = store().await;
  let record = json!({ "id": "jane-doe", "name": "Jane Doe" });

  s.save(RecordKind::Expert, "jane-doe", &record).await.unwrap();
  let loaded = s.load(RecordKind::Expert, "jane-doe").await.unwrap();
  assert_eq!(loaded, Some(record));
}

#[tokio::test]
async fn load_missing_returns_none() {
  let (_dir, s) = store().await;
  let loaded = s.load(RecordKind::Expert, "nobody").await.unwrap();
  assert!(loaded.is_none());
}

#[tokio::test]
async fn list_is_sorted_and_skips_templates() {
  let (_dir, s) = store().await;
  let v = json!({});
  s.save(RecordKind::Expert, "zeta", &v).await.unwrap();
  s.save(RecordKind::Expert, "alpha", &v).await.unwrap();
  s.save(RecordKind::Expert, "default-expert", &v).await.unwrap();
  s.save(RecordKind::Expert, "expert-template", &v).await.unwrap();
  s.save(RecordKind::Company, "acme", &v).await.unwrap();

  let experts = s.list(RecordKind::Expert).await.unwrap();
  assert_eq!(experts, vec!["alpha", "zeta"]);

  let companies = s.list(RecordKind::Company).await.unwrap();
  assert_eq!(companies, vec!["acme"]);
}

#[tokio::test]
async fn save_replaces_previous_content() {
  let (_dir, s) = store().await;
  s.save(RecordKind::Expert, "jane", &json!({ "v": 1 })).await.unwrap();
  s.save(RecordKind::Expert, "jane", &json!({ "v": 2 })).await.unwrap();

  let loaded = s.load(RecordKind::Expert, "jane").await.unwrap().unwrap();
  assert_eq!(loaded["v"], 2);
}

#[tokio::test]
async fn saved_files_are_pretty_printed_with_trailing_newline() {
  let (dir, s) = store().await;
  s.save(RecordKind::Expert, "jane", &json!({ "id": "jane", "name": "J" }))
    .await
    .unwrap();

  let text =
    std::fs::read_to_string(dir.path().join("experts/jane.json")).unwrap();
  assert!(text.starts_with("{\n  \""));
  assert!(text.ends_with("\n"));
  // No leftover temp file after the rename.
  assert!(!dir.path().join("experts/jane.json.tmp").exists());
}

#[tokio::test]
async fn delete_removes_the_file() {
  let (_dir, s) = store().await;
  s.save(RecordKind::Expert, "jane", &json!({})).await.unwrap();
  s.delete(RecordKind::Expert, "jane").await.unwrap();
  assert!(s.load(RecordKind::Expert, "jane").await.unwrap().is_none());

  // Deleting again is an error the caller can report.
  assert!(s.delete(RecordKind::Expert, "jane").await.is_err());
}

#[tokio::test]
async fn malformed_record_errors_carry_the_path() {
  let (dir, s) = store().await;
  std::fs::write(dir.path().join("experts/broken.json"), "{ not json").unwrap();

  let err = s.load(RecordKind::Expert, "broken").await.unwrap_err();
  match err {
    Error::MalformedRecord { path, .. } => {
      assert!(path.ends_with("experts/broken.json"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn slugs_with_path_separators_are_rejected() {
  let (_dir, s) = store().await;
  let err = s.load(RecordKind::Expert, "../etc/passwd").await.unwrap_err();
  assert!(matches!(err, Error::InvalidSlug(_)));
}

#[test]
fn slugify_collapses_punctuation() {
  assert_eq!(slugify("Dr. Jane  Doe"), "dr-jane-doe");
  assert_eq!(slugify("  Acme Labs, Inc. "), "acme-labs-inc");
  assert_eq!(slugify("ACME"), "acme");
}

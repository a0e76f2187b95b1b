//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use folio_core::{
  form::FormValues,
  record::{SubmissionRecord, Timestamp},
  schema::FormSchema,
  store::DocumentStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn inquiry(name: &str, timestamp: Timestamp) -> SubmissionRecord {
  let form = FormValues::new()
    .with("name", name)
    .with("phone", "0550000000")
    .with("place", "Dubai Marina");
  SubmissionRecord::from_form(&FormSchema::inquiry(), &form, timestamp).unwrap()
}

#[tokio::test]
async fn append_then_list_returns_flat_document() {
  let s = store().await;
  let id = s
    .append("inquiries", &inquiry("Asha", Timestamp::Server))
    .await
    .unwrap();

  let docs = s.list("inquiries").await.unwrap();
  assert_eq!(docs.len(), 1);
  let doc = &docs[0];
  assert_eq!(doc.document_id, id);
  assert_eq!(doc.collection, "inquiries");
  assert_eq!(doc.body["name"], "Asha");
  assert_eq!(doc.body["place"], "Dubai Marina");
  assert_eq!(doc.body["botim"], "");
  assert_eq!(doc.body["source"], "heroInquiry");
  assert_eq!(doc.body["createdAt"], doc.created_at.to_rfc3339());
}

#[tokio::test]
async fn client_timestamp_is_stored_as_given() {
  let s = store().await;
  let at = Utc.with_ymd_and_hms(2024, 12, 1, 9, 30, 0).unwrap();
  s.append("inquiries", &inquiry("Asha", Timestamp::Client(at)))
    .await
    .unwrap();

  let docs = s.list("inquiries").await.unwrap();
  assert_eq!(docs[0].body["createdAt"], at.to_rfc3339());
}

#[tokio::test]
async fn collections_are_kept_apart() {
  let s = store().await;
  s.append("inquiries", &inquiry("Asha", Timestamp::Server)).await.unwrap();
  s.append("inquiries", &inquiry("Meera", Timestamp::Server)).await.unwrap();
  s.append("contacts", &inquiry("Ravi", Timestamp::Server)).await.unwrap();

  let inquiries = s.list("inquiries").await.unwrap();
  assert_eq!(inquiries.len(), 2);
  assert_eq!(inquiries[0].body["name"], "Asha");
  assert_eq!(inquiries[1].body["name"], "Meera");
  assert_eq!(s.list("contacts").await.unwrap().len(), 1);
  assert!(s.list("footer_contacts").await.unwrap().is_empty());
}

#[tokio::test]
async fn every_append_gets_a_fresh_id() {
  let s = store().await;
  let record = inquiry("Asha", Timestamp::Server);
  let a = s.append("inquiries", &record).await.unwrap();
  let b = s.append("inquiries", &record).await.unwrap();
  assert_ne!(a, b);
}

#[tokio::test]
async fn file_store_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("folio.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.append("contacts", &inquiry("Ravi", Timestamp::Server)).await.unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.list("contacts").await.unwrap().len(), 1);
}

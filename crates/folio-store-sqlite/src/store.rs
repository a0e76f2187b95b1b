//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use folio_core::{
  record::{DocumentId, SubmissionRecord},
  store::DocumentStore,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawDocument, encode_body, encode_dt},
  schema::SCHEMA,
};

// ─── Stored document ─────────────────────────────────────────────────────────

/// A document as persisted, with its timestamp already resolved.
#[derive(Debug, Clone)]
pub struct StoredDocument {
  pub document_id: DocumentId,
  pub collection:  String,
  pub body:        Map<String, Value>,
  pub created_at:  DateTime<Utc>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// All documents in `collection`, oldest first.
  pub async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
    let collection = collection.to_owned();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT document_id, collection, body_json, created_at
           FROM documents
           WHERE collection = ?1
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], |row| {
            Ok(RawDocument {
              document_id: row.get(0)?,
              collection:  row.get(1)?,
              body_json:   row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = crate::Error;

  async fn append(
    &self,
    collection: &str,
    record: &SubmissionRecord,
  ) -> Result<DocumentId> {
    let document_id = Uuid::new_v4().simple().to_string();
    let created_at  = Utc::now();

    let id_str     = document_id.clone();
    let coll_str   = collection.to_owned();
    let body_str   = encode_body(&record.to_document(created_at))?;
    let at_str     = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (document_id, collection, body_json, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, coll_str, body_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(%collection, %document_id, "document appended");
    Ok(DocumentId(document_id))
  }
}

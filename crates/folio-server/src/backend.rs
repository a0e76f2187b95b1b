//! The configured document store, chosen at startup.

use folio_core::{
  record::{DocumentId, SubmissionRecord, Timestamp},
  store::DocumentStore,
};
use folio_firestore::FirestoreStore;
use folio_store_sqlite::SqliteStore;
use thiserror::Error;

use crate::config::{StoreConfig, expand_tilde};

#[derive(Debug, Error)]
pub enum BackendError {
  #[error(transparent)]
  Sqlite(#[from] folio_store_sqlite::Error),

  #[error(transparent)]
  Firestore(#[from] folio_firestore::Error),
}

/// One of the supported stores.
///
/// An enum rather than a trait object: `DocumentStore` returns `impl Future`
/// and so cannot be made into one.
#[derive(Clone)]
pub enum Backend {
  Sqlite(SqliteStore),
  Firestore(FirestoreStore),
}

impl Backend {
  pub async fn open(config: &StoreConfig) -> Result<Self, BackendError> {
    match config {
      StoreConfig::Sqlite { path } => {
        let path = expand_tilde(path);
        tracing::info!(path = %path.display(), "opening sqlite store");
        Ok(Self::Sqlite(SqliteStore::open(&path).await?))
      }
      StoreConfig::Firestore(fs) => {
        tracing::info!(project = %fs.project_id, database = %fs.database, "using firestore");
        Ok(Self::Firestore(FirestoreStore::new(fs.clone())?))
      }
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Sqlite(_) => "sqlite",
      Self::Firestore(_) => "firestore",
    }
  }
}

impl DocumentStore for Backend {
  type Error = BackendError;

  async fn append(
    &self,
    collection: &str,
    record: &SubmissionRecord,
  ) -> Result<DocumentId, BackendError> {
    match self {
      Self::Sqlite(s) => Ok(s.append(collection, record).await?),
      Self::Firestore(f) => Ok(f.append(collection, record).await?),
    }
  }

  fn server_timestamp(&self) -> Timestamp {
    match self {
      Self::Sqlite(s) => s.server_timestamp(),
      Self::Firestore(f) => f.server_timestamp(),
    }
  }
}

#[cfg(test)]
mod tests {
  use folio_core::{form::FormValues, schema::FormSchema};

  use super::*;

  #[tokio::test]
  async fn sqlite_backend_appends() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Backend::open(&StoreConfig::Sqlite { path: dir.path().join("f.db") })
      .await
      .unwrap();
    assert_eq!(backend.name(), "sqlite");

    let form = FormValues::new().with("name", "Ravi").with("email", "r@e.com");
    let record =
      SubmissionRecord::from_form(&FormSchema::footer_contact(), &form, backend.server_timestamp())
        .unwrap();
    backend.append("contacts", &record).await.unwrap();

    let Backend::Sqlite(store) = &backend else { unreachable!() };
    assert_eq!(store.list("contacts").await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn firestore_backend_builds_without_network() {
    let cfg = StoreConfig::Firestore(folio_firestore::FirestoreConfig::new("p", "k"));
    let backend = Backend::open(&cfg).await.unwrap();
    assert_eq!(backend.name(), "firestore");
    assert!(backend.server_timestamp().is_server());
  }
}

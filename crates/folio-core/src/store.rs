//! The `DocumentStore` trait — the only seam between the submission workflow
//! and wherever records are persisted.
//!
//! Implemented by `folio-firestore` (the hosted store) and
//! `folio-store-sqlite` (a local file). Nothing above this trait knows which
//! one is in use.

use std::future::Future;

use chrono::Utc;

use crate::{
  record::{DocumentId, SubmissionRecord, Timestamp},
  schema::TimestampPolicy,
};

/// An append-only document store.
///
/// `append` settles exactly once per call, with either the identifier the
/// store assigned or an error. No retry, timeout or failure classification is
/// assumed beyond that.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append `record` as a new document in `collection`.
  fn append<'a>(
    &'a self,
    collection: &'a str,
    record: &'a SubmissionRecord,
  ) -> impl Future<Output = Result<DocumentId, Self::Error>> + Send + 'a;

  /// A timestamp the store resolves to its own clock at write time.
  fn server_timestamp(&self) -> Timestamp { Timestamp::Server }
}

impl TimestampPolicy {
  /// The timestamp a record built under this policy should carry.
  pub fn stamp<S: DocumentStore + ?Sized>(self, store: &S) -> Timestamp {
    match self {
      Self::Server => store.server_timestamp(),
      Self::Client => Timestamp::Client(Utc::now()),
    }
  }
}

//! [`FirestoreStore`] — the hosted implementation of [`DocumentStore`].

use folio_core::{
  record::{DocumentId, SubmissionRecord},
  store::DocumentStore,
};
use reqwest::Client;

use crate::{
  FirestoreConfig,
  encode::{auto_id, commit_request, error_message},
  error::{Error, Result},
};

/// Appends documents through the Firestore REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FirestoreStore {
  client: Client,
  config: FirestoreConfig,
}

impl FirestoreStore {
  pub fn new(config: FirestoreConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, config })
  }
}

impl DocumentStore for FirestoreStore {
  type Error = Error;

  async fn append(
    &self,
    collection: &str,
    record: &SubmissionRecord,
  ) -> Result<DocumentId> {
    let id = auto_id();
    let body = commit_request(self.config.document_name(collection, &id), record);

    let mut req = self
      .client
      .post(self.config.commit_url())
      .query(&[("key", self.config.api_key.as_str())])
      .json(&body);
    if let Some(token) = &self.config.id_token {
      req = req.bearer_auth(token);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
      let text = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), message: error_message(&text) });
    }

    tracing::debug!(%collection, document = %id, "document committed");
    Ok(DocumentId(id))
  }
}

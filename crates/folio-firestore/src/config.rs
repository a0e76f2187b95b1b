//! Connection settings for the hosted store.

use std::time::Duration;

use serde::Deserialize;

fn default_database() -> String { "(default)".to_owned() }

fn default_base_url() -> String { "https://firestore.googleapis.com".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

/// Project coordinates and credentials for the Firestore REST API.
///
/// The API key is the web key the site itself ships with; write access is
/// governed by the project's security rules, not by this client.
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
  pub project_id:   String,
  pub api_key:      String,
  #[serde(default = "default_database")]
  pub database:     String,
  /// Overridable so tests and the local emulator can stand in for the
  /// hosted service.
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Optional end-user ID token, sent as a bearer credential.
  #[serde(default)]
  pub id_token:     Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl FirestoreConfig {
  pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      project_id:   project_id.into(),
      api_key:      api_key.into(),
      database:     default_database(),
      base_url:     default_base_url(),
      id_token:     None,
      timeout_secs: default_timeout_secs(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  /// `projects/{p}/databases/{db}`
  pub fn database_path(&self) -> String {
    format!("projects/{}/databases/{}", self.project_id, self.database)
  }

  /// Fully qualified resource name of a document.
  pub fn document_name(&self, collection: &str, id: &str) -> String {
    format!("{}/documents/{collection}/{id}", self.database_path())
  }

  pub fn commit_url(&self) -> String {
    format!(
      "{}/v1/{}/documents:commit",
      self.base_url.trim_end_matches('/'),
      self.database_path()
    )
  }
}

//! Runtime configuration.
//!
//! Read from an optional TOML file, then overlaid with `FOLIO_`-prefixed
//! environment variables (`FOLIO_PORT=8080`, `FOLIO_STORE__BACKEND=firestore`,
//! `FOLIO_ADMIN__AUTO_PUSH=true`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use folio_core::schema::{FormCatalog, FormSchema};
use folio_firestore::FirestoreConfig;
use serde::Deserialize;

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_cors_origins() -> Vec<String> {
  vec!["http://localhost:5000".to_owned(), "http://127.0.0.1:5000".to_owned()]
}

fn default_feedback_interval_ms() -> u64 { 2600 }

fn default_db_path() -> PathBuf { PathBuf::from("folio.db") }

fn default_username() -> String { "admin".to_owned() }

fn default_data_dir() -> PathBuf { PathBuf::from("data") }

fn default_branch() -> String { "main".to_owned() }

// ─── Sections ────────────────────────────────────────────────────────────────

/// Where submissions are appended.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
  Sqlite {
    #[serde(default = "default_db_path")]
    path: PathBuf,
  },
  Firestore(FirestoreConfig),
}

impl Default for StoreConfig {
  fn default() -> Self { Self::Sqlite { path: default_db_path() } }
}

/// The content administration backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
  #[serde(default = "default_username")]
  pub username:      String,
  /// argon2 PHC string; generate one with `folio hash-password`. While empty,
  /// every admin request is rejected.
  #[serde(default)]
  pub password_hash: String,
  #[serde(default = "default_data_dir")]
  pub data_dir:      PathBuf,
  /// The page whose marked sections are regenerated on every change.
  #[serde(default)]
  pub site_html:     Option<PathBuf>,
  /// Git checkout holding the site; publishing is disabled without one.
  #[serde(default)]
  pub repo_path:     Option<PathBuf>,
  #[serde(default = "default_branch")]
  pub git_branch:    String,
  #[serde(default)]
  pub auto_push:     bool,
}

impl Default for AdminConfig {
  fn default() -> Self {
    Self {
      username:      default_username(),
      password_hash: String::new(),
      data_dir:      default_data_dir(),
      site_html:     None,
      repo_path:     None,
      git_branch:    default_branch(),
      auto_push:     false,
    }
  }
}

// ─── Root ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_cors_origins")]
  pub cors_origins:         Vec<String>,
  #[serde(default = "default_feedback_interval_ms")]
  pub feedback_interval_ms: u64,
  #[serde(default)]
  pub store:                StoreConfig,
  #[serde(default)]
  pub admin:                AdminConfig,
  /// Replaces the built-in inquiry and footer contact forms when set.
  #[serde(default)]
  pub forms:                Option<Vec<FormSchema>>,
}

impl ServerConfig {
  /// Layer `path` (if given and present) under the environment.
  pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    builder
      .add_source(
        config::Environment::with_prefix("FOLIO")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn feedback_interval(&self) -> Duration {
    Duration::from_millis(self.feedback_interval_ms)
  }

  pub fn catalog(&self) -> Result<FormCatalog, folio_core::Error> {
    match &self.forms {
      Some(forms) => FormCatalog::new(forms.clone()),
      None => Ok(FormCatalog::canonical()),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(text: &str) -> ServerConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.toml");
    std::fs::write(&path, text).unwrap();
    ServerConfig::load(Some(&path)).unwrap()
  }

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.feedback_interval(), Duration::from_millis(2600));
    assert!(matches!(cfg.store, StoreConfig::Sqlite { ref path } if path == Path::new("folio.db")));
    assert_eq!(cfg.admin.git_branch, "main");
    assert!(!cfg.admin.auto_push);
    assert_eq!(cfg.catalog().unwrap().len(), 2);
  }

  #[test]
  fn firestore_backend_is_selected_by_tag() {
    let cfg = from_toml(
      r#"
        port = 8080

        [store]
        backend    = "firestore"
        project_id = "shivs-studio"
        api_key    = "web-key"

        [admin]
        username  = "studio"
        repo_path = "/srv/site"
        auto_push = true
      "#,
    );
    assert_eq!(cfg.port, 8080);
    match cfg.store {
      StoreConfig::Firestore(fs) => {
        assert_eq!(fs.project_id, "shivs-studio");
        assert_eq!(fs.database, "(default)");
      }
      other => panic!("expected firestore, got {other:?}"),
    }
    assert_eq!(cfg.admin.username, "studio");
    assert_eq!(cfg.admin.repo_path.as_deref(), Some(Path::new("/srv/site")));
    assert!(cfg.admin.auto_push);
  }

  #[test]
  fn configured_forms_replace_the_catalogue() {
    let cfg = from_toml(
      r#"
        [[forms]]
        id         = "newsletter"
        collection = "subscribers"
        fields     = [{ name = "email" }]
        required   = ["email"]
        messages   = { success = "Subscribed", invalid = "Email needed", error = "Error" }
      "#,
    );
    let catalog = cfg.catalog().unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.lookup("newsletter").unwrap().collection, "subscribers");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = ServerConfig::load(Some(Path::new("/nonexistent/folio.toml"))).unwrap();
    assert_eq!(cfg.port, 5000);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/site/index.html")), Path::new(&home).join("site/index.html"));
    assert_eq!(expand_tilde(Path::new("/abs")), Path::new("/abs"));
  }
}

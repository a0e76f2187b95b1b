//! Error type for `folio-content`.

use thiserror::Error;

use crate::item::ContentKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("{kind} item {id} not found")]
  NotFound { kind: ContentKind, id: u64 },

  #[error("invalid {kind} item: {reason}")]
  Invalid { kind: ContentKind, reason: String },

  #[error("not a git repository: {0}")]
  NotARepository(String),

  #[error("no remote repository configured; add one with `git remote add origin <url>`")]
  NoRemote,

  #[error("git is not installed or not on PATH")]
  GitMissing,

  #[error("publishing is not configured")]
  PublishingDisabled,

  #[error("`git {command}` failed: {output}")]
  CommandFailed { command: String, output: String },
}

impl Error {
  /// Whether the caller asked for something that does not exist, as opposed
  /// to the backend failing.
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

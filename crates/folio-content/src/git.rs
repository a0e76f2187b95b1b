//! Committing and pushing the regenerated site.
//!
//! `git` is always invoked with an argument vector, never through a shell, so
//! commit messages are passed through verbatim.

use std::{fmt, io::ErrorKind, path::PathBuf, process::Output};

use tokio::process::Command;

use crate::{Error, Result};

/// Default commit message for a publish request that does not supply one.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update website content";

/// What a publish request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
  /// The working tree was clean; nothing was committed or pushed.
  NothingToCommit,
  Pushed { message: String },
}

impl fmt::Display for PublishOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NothingToCommit => f.write_str("No changes to commit"),
      Self::Pushed { message } => write!(f, "Successfully committed and pushed: {message}"),
    }
  }
}

/// Runs git in the site repository.
#[derive(Debug, Clone)]
pub struct GitPublisher {
  repo:   PathBuf,
  branch: String,
}

impl GitPublisher {
  pub fn new(repo: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
    Self { repo: repo.into(), branch: branch.into() }
  }

  async fn output(&self, args: &[&str]) -> Result<Output> {
    Command::new("git")
      .args(args)
      .current_dir(&self.repo)
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::GitMissing,
        _ => Error::Io(e),
      })
  }

  /// Run `git args…`, returning stdout on success.
  async fn run(&self, args: &[&str]) -> Result<String> {
    let out = self.output(args).await?;
    let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
    if out.status.success() {
      return Ok(stdout);
    }
    let stderr = String::from_utf8_lossy(&out.stderr);
    Err(Error::CommandFailed {
      command: args.join(" "),
      output:  format!("{}{}", stdout, stderr).trim().to_owned(),
    })
  }

  pub async fn is_repository(&self) -> Result<bool> {
    if !self.repo.is_dir() {
      return Ok(false);
    }
    Ok(self.output(&["rev-parse", "--git-dir"]).await?.status.success())
  }

  pub async fn has_remote(&self) -> Result<bool> {
    Ok(!self.run(&["remote"]).await?.trim().is_empty())
  }

  async fn ensure_repository(&self) -> Result<()> {
    if self.is_repository().await? {
      Ok(())
    } else {
      Err(Error::NotARepository(self.repo.display().to_string()))
    }
  }

  /// Human-readable `git status` of the repository.
  pub async fn status(&self) -> Result<String> {
    self.ensure_repository().await?;
    self.run(&["status"]).await
  }

  /// Whether the working tree has anything to commit.
  pub async fn has_changes(&self) -> Result<bool> {
    self.ensure_repository().await?;
    Ok(!self.run(&["status", "--porcelain"]).await?.trim().is_empty())
  }

  /// Stage everything, commit with `message` and push to `origin`.
  #[tracing::instrument(skip(self), fields(repo = %self.repo.display(), branch = %self.branch))]
  pub async fn publish(&self, message: &str) -> Result<PublishOutcome> {
    self.ensure_repository().await?;
    if !self.has_remote().await? {
      return Err(Error::NoRemote);
    }

    if !self.has_changes().await? {
      tracing::info!("working tree clean; nothing to publish");
      return Ok(PublishOutcome::NothingToCommit);
    }

    self.run(&["add", "--all"]).await?;
    match self.run(&["commit", "-m", message]).await {
      Ok(_) => {}
      Err(Error::CommandFailed { output, .. })
        if output.to_lowercase().contains("nothing to commit") =>
      {
        tracing::info!("working tree clean; nothing to publish");
        return Ok(PublishOutcome::NothingToCommit);
      }
      Err(e) => return Err(e),
    }

    self.run(&["push", "origin", &self.branch]).await?;
    tracing::info!("site changes pushed");
    Ok(PublishOutcome::Pushed { message: message.to_owned() })
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
      .args(args)
      .current_dir(dir)
      .output()
      .unwrap();
    assert!(status.status.success(), "git {args:?}: {}", String::from_utf8_lossy(&status.stderr));
  }

  fn git_available() -> bool {
    std::process::Command::new("git").arg("--version").output().is_ok()
  }

  fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Studio Admin"]);
    git(dir, &["config", "user.email", "admin@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
  }

  #[tokio::test]
  async fn plain_directory_is_not_a_repository() {
    if !git_available() {
      return;
    }
    let dir = tempfile::tempdir().unwrap();
    let publisher = GitPublisher::new(dir.path(), "main");
    assert!(!publisher.is_repository().await.unwrap());
    assert!(matches!(publisher.status().await, Err(Error::NotARepository(_))));
    assert!(matches!(publisher.publish("x").await, Err(Error::NotARepository(_))));
  }

  #[tokio::test]
  async fn repository_without_remote_refuses_to_publish() {
    if !git_available() {
      return;
    }
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());

    let publisher = GitPublisher::new(dir.path(), "main");
    assert!(publisher.status().await.is_ok());
    assert!(matches!(publisher.publish("x").await, Err(Error::NoRemote)));
  }

  #[tokio::test]
  async fn publish_pushes_then_reports_clean_tree() {
    if !git_available() {
      return;
    }
    let remote = tempfile::tempdir().unwrap();
    git(remote.path(), &["init", "-q", "--bare"]);

    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    let remote_path = remote.path().to_string_lossy().into_owned();
    git(dir.path(), &["remote", "add", "origin", &remote_path]);
    std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

    let publisher = GitPublisher::new(dir.path(), "main");
    assert!(publisher.has_changes().await.unwrap());

    let message = "Update \"reviews\"; rm -rf /";
    let outcome = publisher.publish(message).await.unwrap();
    assert_eq!(outcome, PublishOutcome::Pushed { message: message.to_owned() });
    assert!(!publisher.has_changes().await.unwrap());

    let again = publisher.publish(DEFAULT_COMMIT_MESSAGE).await.unwrap();
    assert_eq!(again, PublishOutcome::NothingToCommit);
    assert_eq!(again.to_string(), "No changes to commit");

    let log = std::process::Command::new("git")
      .args(["log", "-1", "--format=%s", "main"])
      .current_dir(remote.path())
      .output()
      .unwrap();
    assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), message);
  }
}

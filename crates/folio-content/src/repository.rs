//! [`JsonRepository`] — one content kind persisted as a JSON array file.

use std::{
  io::ErrorKind,
  marker::PhantomData,
  path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{Error, Result, item::ContentItem};

/// Write `bytes` to a sibling temp file, then rename it over `path`, so a
/// crash never leaves a half-written file behind.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
  let mut tmp = path.as_os_str().to_owned();
  tmp.push(".tmp");
  let tmp = PathBuf::from(tmp);
  tokio::fs::write(&tmp, bytes).await?;
  tokio::fs::rename(&tmp, path).await?;
  Ok(())
}

/// The items of one kind, in insertion order.
///
/// Every read-modify-write cycle holds the repository's lock, so concurrent
/// admin requests never lose each other's changes.
pub struct JsonRepository<T> {
  path:    PathBuf,
  lock:    Mutex<()>,
  _marker: PhantomData<fn() -> T>,
}

impl<T: ContentItem> JsonRepository<T> {
  /// A repository for `T` under `data_dir`. The file is created on first
  /// write.
  pub fn new(data_dir: &Path) -> Self {
    Self {
      path:    data_dir.join(T::KIND.file_name()),
      lock:    Mutex::new(()),
      _marker: PhantomData,
    }
  }

  /// All items. A missing file reads as an empty list.
  pub async fn list(&self) -> Result<Vec<T>> {
    let _guard = self.lock.lock().await;
    self.load().await
  }

  /// Append a new item under the next free id and return it together with
  /// the full updated list.
  pub async fn create(&self, new: T::New) -> Result<(T, Vec<T>)> {
    let _guard = self.lock.lock().await;
    let mut items = self.load().await?;
    let id = items.iter().map(T::id).max().unwrap_or(0) + 1;
    let item = T::create(id, new, Utc::now())?;
    items.push(item.clone());
    self.save(&items).await?;
    tracing::info!(kind = %T::KIND, id, "content item created");
    Ok((item, items))
  }

  /// Apply `patch` to item `id`.
  pub async fn update(&self, id: u64, patch: T::Patch) -> Result<(T, Vec<T>)> {
    let _guard = self.lock.lock().await;
    let mut items = self.load().await?;
    let item = items
      .iter_mut()
      .find(|i| i.id() == id)
      .ok_or(Error::NotFound { kind: T::KIND, id })?;
    item.apply(patch, Utc::now())?;
    let updated = item.clone();
    self.save(&items).await?;
    tracing::info!(kind = %T::KIND, id, "content item updated");
    Ok((updated, items))
  }

  /// Remove item `id` and return the remaining list.
  pub async fn delete(&self, id: u64) -> Result<Vec<T>> {
    let _guard = self.lock.lock().await;
    let mut items = self.load().await?;
    let before = items.len();
    items.retain(|i| i.id() != id);
    if items.len() == before {
      return Err(Error::NotFound { kind: T::KIND, id });
    }
    self.save(&items).await?;
    tracing::info!(kind = %T::KIND, id, "content item deleted");
    Ok(items)
  }

  async fn load(&self) -> Result<Vec<T>> {
    match tokio::fs::read(&self.path).await {
      Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
      Err(e) => Err(e.into()),
    }
  }

  async fn save(&self, items: &[T]) -> Result<()> {
    if let Some(dir) = self.path.parent() {
      tokio::fs::create_dir_all(dir).await?;
    }
    let mut bytes = serde_json::to_vec_pretty(items)?;
    bytes.push(b'\n');
    write_atomic(&self.path, &bytes).await
  }
}

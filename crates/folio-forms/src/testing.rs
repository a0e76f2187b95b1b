//! Test doubles shared by this crate's unit tests.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use folio_core::{
  record::{DocumentId, SubmissionRecord},
  store::DocumentStore,
};

use crate::feedback::{ControlState, SubmitControl};

/// Records every state a control was asked to render.
#[derive(Default)]
pub struct RecordingControl {
  history: Mutex<Vec<ControlState>>,
}

impl RecordingControl {
  pub fn last(&self) -> Option<ControlState> {
    self.history.lock().unwrap().last().cloned()
  }

  pub fn count(&self, state: &ControlState) -> usize {
    self.history.lock().unwrap().iter().filter(|s| *s == state).count()
  }

  pub fn history(&self) -> Vec<ControlState> { self.history.lock().unwrap().clone() }
}

impl SubmitControl for RecordingControl {
  fn render(&self, state: &ControlState) {
    self.history.lock().unwrap().push(state.clone());
  }
}

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct StoreDown;

/// An in-memory store that can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
  pub fail:    AtomicBool,
  appended:    Mutex<Vec<(String, SubmissionRecord)>>,
  next_id:     AtomicUsize,
}

impl MemoryStore {
  pub fn failing() -> Self {
    let store = Self::default();
    store.fail.store(true, Ordering::SeqCst);
    store
  }

  pub fn appended(&self) -> Vec<(String, SubmissionRecord)> {
    self.appended.lock().unwrap().clone()
  }
}

impl DocumentStore for MemoryStore {
  type Error = StoreDown;

  async fn append(
    &self,
    collection: &str,
    record: &SubmissionRecord,
  ) -> Result<DocumentId, StoreDown> {
    tokio::task::yield_now().await;
    if self.fail.load(Ordering::SeqCst) {
      return Err(StoreDown);
    }
    self
      .appended
      .lock()
      .unwrap()
      .push((collection.to_owned(), record.clone()));
    let n = self.next_id.fetch_add(1, Ordering::SeqCst);
    Ok(DocumentId(format!("doc-{n}")))
  }
}

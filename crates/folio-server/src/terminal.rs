//! A page with one form, driven from the command line.
//!
//! Lets the `submit` command run the exact on-page workflow (validation,
//! store call, reset, timed feedback) with the submit control printed to the
//! terminal instead of painted on a button.

use std::{
  collections::HashMap,
  io::Write as _,
  sync::{Arc, Mutex, PoisonError},
};

use folio_forms::{ControlState, Page, SubmitControl};

/// A submit button rendered as terminal lines.
pub struct TerminalControl {
  resting: String,
  shown:   Mutex<Vec<String>>,
}

impl TerminalControl {
  pub fn new(resting: impl Into<String>) -> Self {
    Self { resting: resting.into(), shown: Mutex::new(Vec::new()) }
  }

  /// Every line rendered so far.
  pub fn shown(&self) -> Vec<String> {
    self.shown.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  fn describe(&self, state: &ControlState) -> String {
    let label = state.label(&self.resting);
    let mut line = format!("[{label}]");
    if !state.is_enabled() {
      line.push_str(" disabled");
    }
    if state.is_alert() {
      line.push_str(" (alert)");
    }
    line
  }
}

impl SubmitControl for TerminalControl {
  fn render(&self, state: &ControlState) {
    let line = self.describe(state);
    let mut out = std::io::stderr().lock();
    let _ = writeln!(out, "{line}");
    self.shown.lock().unwrap_or_else(PoisonError::into_inner).push(line);
  }
}

/// The forms the terminal session exposes, each with its own control.
#[derive(Default)]
pub struct TerminalPage {
  controls: HashMap<String, Arc<TerminalControl>>,
}

impl TerminalPage {
  pub fn with_form(mut self, form_id: &str, resting_label: &str) -> Self {
    self
      .controls
      .insert(form_id.to_owned(), Arc::new(TerminalControl::new(resting_label)));
    self
  }
}

impl Page for TerminalPage {
  type Control = TerminalControl;

  fn has_form(&self, form_id: &str) -> bool { self.controls.contains_key(form_id) }

  fn submit_control(&self, form_id: &str) -> Option<Arc<TerminalControl>> {
    self.controls.get(form_id).cloned()
  }
}

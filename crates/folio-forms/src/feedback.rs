//! Transient feedback on a form's submit control.
//!
//! The control is disabled and dimmed while a submission is in flight and
//! while its outcome is on display, then reverts to its resting state after a
//! fixed interval. Each new cycle cancels the revert still pending from the
//! previous one, so a stale timer can never re-enable the control mid-flight.

use std::{
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use tokio::task::JoinHandle;

/// How long an outcome stays on the control before it reverts.
pub const DEFAULT_FEEDBACK_INTERVAL: Duration = Duration::from_millis(2600);

// ─── States ──────────────────────────────────────────────────────────────────

/// The kind of outcome being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Success,
  /// A required field was empty; nothing was sent.
  Invalid,
  /// The store rejected or never received the record.
  Error,
}

impl Tone {
  /// Invalid and error outcomes carry the alert accent (a red border).
  pub fn is_alert(self) -> bool { !matches!(self, Self::Success) }
}

/// Everything a submit control can be asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlState {
  /// Default label, enabled, undimmed, default border.
  Resting,
  /// A submission is in flight; label unchanged.
  Busy,
  /// An outcome is on display.
  Feedback { message: String, tone: Tone },
}

impl ControlState {
  pub fn is_enabled(&self) -> bool { matches!(self, Self::Resting) }

  pub fn is_dimmed(&self) -> bool { !self.is_enabled() }

  pub fn is_alert(&self) -> bool {
    matches!(self, Self::Feedback { tone, .. } if tone.is_alert())
  }

  /// The label to show, given the control's own resting label.
  pub fn label<'a>(&'a self, resting: &'a str) -> &'a str {
    match self {
      Self::Feedback { message, .. } => message,
      Self::Resting | Self::Busy => resting,
    }
  }
}

/// A form's submit control as seen by the workflow.
///
/// Implementations own the resting label and translate each state into
/// whatever the page needs (label text, `disabled`, opacity, border colour).
pub trait SubmitControl: Send + Sync + 'static {
  fn render(&self, state: &ControlState);
}

/// The control type of a handler with no page, such as an HTTP endpoint.
/// It has no values, so such a handler is always built without a control.
#[derive(Debug)]
pub enum Headless {}

impl SubmitControl for Headless {
  fn render(&self, _: &ControlState) { match *self {} }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// The number of the latest feedback cycle and the revert it armed.
#[derive(Default)]
struct Cycle {
  generation: u64,
  pending:    Option<JoinHandle<()>>,
}

impl Cycle {
  /// Start a new cycle. Returns its number and whether a revert was still
  /// pending.
  fn advance(&mut self) -> (u64, bool) {
    self.generation = self.generation.wrapping_add(1);
    let cancelled = match self.pending.take() {
      Some(handle) if !handle.is_finished() => {
        handle.abort();
        true
      }
      _ => false,
    };
    (self.generation, cancelled)
  }
}

fn lock(cycle: &Mutex<Cycle>) -> MutexGuard<'_, Cycle> {
  cycle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives one submit control through busy/feedback/resting cycles.
///
/// Every render happens under the cycle lock, and a revert only renders if
/// its cycle is still the latest one. A revert that already woke when a new
/// cycle began therefore stays silent even if `abort` came too late.
///
/// A controller without a control (the page has no submit button) accepts
/// every call and does nothing.
pub struct FeedbackControl<C> {
  control:  Option<Arc<C>>,
  interval: Duration,
  cycle:    Arc<Mutex<Cycle>>,
}

impl<C: SubmitControl> FeedbackControl<C> {
  pub fn new(control: Option<Arc<C>>, interval: Duration) -> Self {
    Self { control, interval, cycle: Arc::default() }
  }

  pub fn has_control(&self) -> bool { self.control.is_some() }

  /// Show the in-flight state.
  pub fn busy(&self) {
    let Some(control) = &self.control else { return };
    let mut cycle = lock(&self.cycle);
    cycle.advance();
    control.render(&ControlState::Busy);
  }

  /// Show `message` and arm the revert to [`ControlState::Resting`].
  ///
  /// Must be called from within a tokio runtime.
  pub fn flash(&self, message: &str, tone: Tone) {
    let Some(control) = &self.control else { return };
    let mut cycle = lock(&self.cycle);
    let (generation, _) = cycle.advance();
    control.render(&ControlState::Feedback { message: message.to_owned(), tone });

    let control = Arc::clone(control);
    let shared = Arc::clone(&self.cycle);
    let interval = self.interval;
    cycle.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(interval).await;
      let current = lock(&shared);
      if current.generation == generation {
        control.render(&ControlState::Resting);
      }
    }));
  }

  /// Abort the revert armed by the previous [`flash`](Self::flash), if it has
  /// not fired yet. Returns whether one was cancelled.
  pub fn cancel_pending(&self) -> bool { lock(&self.cycle).advance().1 }
}

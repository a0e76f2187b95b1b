//! The submission workflow: one generic handler instantiated per form.
//!
//! A [`SubmissionHandler`] turns a submit action on a
//! [`FormSurface`](folio_core::form::FormSurface) into a validated
//! [`SubmissionRecord`](folio_core::record::SubmissionRecord), appends it to
//! its schema's collection, and reflects the outcome on the form's submit
//! control through transient [`feedback`].

pub mod feedback;
pub mod handler;
pub mod registry;

pub use feedback::{
  ControlState, DEFAULT_FEEDBACK_INTERVAL, FeedbackControl, Headless, SubmitControl, Tone,
};
pub use handler::{SubmissionHandler, SubmitOutcome};
pub use registry::{FormRegistry, Page};

#[cfg(test)]
mod testing;

//! [`SubmissionHandler`] — the generic submit workflow for one form.

use std::{
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use folio_core::{
  ValidationError,
  form::FormSurface,
  record::{DocumentId, SubmissionRecord},
  schema::FormSchema,
  store::DocumentStore,
};

use crate::feedback::{FeedbackControl, SubmitControl, Tone};

/// What happened to one submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// The record was stored; the form has been reset.
  Submitted(DocumentId),
  /// A required field was empty; the store was not called and the form is
  /// unchanged.
  Invalid(ValidationError),
  /// The store call failed; the form is unchanged so the user can retry.
  Failed,
  /// A previous submission of this form was still in flight.
  Ignored,
}

impl SubmitOutcome {
  pub fn is_submitted(&self) -> bool { matches!(self, Self::Submitted(_)) }
}

/// Binds a [`FormSchema`] to a store and a submit control.
///
/// One handler exists per form on a page. Handlers share nothing but the
/// store, so submissions from different forms proceed independently.
pub struct SubmissionHandler<S, C> {
  schema:    FormSchema,
  store:     Arc<S>,
  feedback:  FeedbackControl<C>,
  in_flight: AtomicBool,
}

impl<S, C> SubmissionHandler<S, C>
where
  S: DocumentStore,
  C: SubmitControl,
{
  pub fn new(
    schema: FormSchema,
    store: Arc<S>,
    control: Option<Arc<C>>,
    interval: Duration,
  ) -> Self {
    Self {
      schema,
      store,
      feedback: FeedbackControl::new(control, interval),
      in_flight: AtomicBool::new(false),
    }
  }

  pub fn schema(&self) -> &FormSchema { &self.schema }

  pub fn feedback(&self) -> &FeedbackControl<C> { &self.feedback }

  /// Handle one submit action on `form`.
  ///
  /// Never panics on store failure and never propagates an error: every
  /// outcome is reported through the control and the returned value.
  #[tracing::instrument(skip_all, fields(form = %self.schema.id))]
  pub async fn submit<F>(&self, form: &mut F) -> SubmitOutcome
  where
    F: FormSurface + Send,
  {
    if self.in_flight.swap(true, Ordering::AcqRel) {
      tracing::debug!("submission already in flight; ignoring");
      return SubmitOutcome::Ignored;
    }
    let _in_flight = InFlight(&self.in_flight);

    let messages = &self.schema.messages;
    let timestamp = self.schema.timestamp_policy.stamp(self.store.as_ref());

    let record = match SubmissionRecord::from_form(&self.schema, &*form, timestamp) {
      Ok(record) => record,
      Err(err) => {
        tracing::warn!(missing = ?err.missing, "required fields empty");
        self.feedback.flash(&messages.invalid, Tone::Invalid);
        return SubmitOutcome::Invalid(err);
      }
    };

    self.feedback.busy();

    match self.store.append(&self.schema.collection, &record).await {
      Ok(id) => {
        tracing::info!(collection = %self.schema.collection, document = %id, "submission stored");
        form.reset();
        self.feedback.flash(&messages.success, Tone::Success);
        SubmitOutcome::Submitted(id)
      }
      Err(err) => {
        tracing::error!(collection = %self.schema.collection, error = %err, "failed to store submission");
        self.feedback.flash(&messages.error, Tone::Error);
        SubmitOutcome::Failed
      }
    }
  }
}

/// Clears the in-flight flag when the submission settles, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

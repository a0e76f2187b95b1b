//! Binding the form catalogue to whatever forms a page actually has.

use std::{collections::HashMap, sync::Arc, time::Duration};

use folio_core::{form::FormSurface, schema::FormCatalog, store::DocumentStore};

use crate::{
  feedback::SubmitControl,
  handler::{SubmissionHandler, SubmitOutcome},
};

/// The page a registry is attached to.
///
/// The element ids are the whole integration contract: a form the page lacks
/// is simply not bound, and a form without a submit control gets no feedback.
pub trait Page {
  type Control: SubmitControl;

  fn has_form(&self, form_id: &str) -> bool;

  fn submit_control(&self, form_id: &str) -> Option<Arc<Self::Control>>;
}

/// One [`SubmissionHandler`] per form present on the page.
pub struct FormRegistry<S, C> {
  store:    Arc<S>,
  interval: Duration,
  handlers: HashMap<String, SubmissionHandler<S, C>>,
}

impl<S, C> FormRegistry<S, C>
where
  S: DocumentStore,
  C: SubmitControl,
{
  pub fn new(store: Arc<S>, interval: Duration) -> Self {
    Self { store, interval, handlers: HashMap::new() }
  }

  /// Bind every catalogue form that `page` contains. Returns how many were
  /// bound.
  pub fn attach<P>(&mut self, page: &P, catalog: &FormCatalog) -> usize
  where
    P: Page<Control = C>,
  {
    let mut bound = 0;
    for schema in catalog.iter() {
      if !page.has_form(&schema.id) {
        tracing::debug!(form = %schema.id, "form not on page; skipping");
        continue;
      }
      let control = page.submit_control(&schema.id);
      if control.is_none() {
        tracing::debug!(form = %schema.id, "form has no submit control");
      }
      let handler = SubmissionHandler::new(
        schema.clone(),
        Arc::clone(&self.store),
        control,
        self.interval,
      );
      self.handlers.insert(schema.id.clone(), handler);
      bound += 1;
    }
    bound
  }

  pub fn is_bound(&self, form_id: &str) -> bool {
    self.handlers.contains_key(form_id)
  }

  pub fn handler(&self, form_id: &str) -> Option<&SubmissionHandler<S, C>> {
    self.handlers.get(form_id)
  }

  /// Route a submit action to the handler bound for `form_id`.
  ///
  /// Returns `None`, and touches nothing, when no such form is bound.
  pub async fn submit<F>(&self, form_id: &str, form: &mut F) -> Option<SubmitOutcome>
  where
    F: FormSurface + Send,
  {
    match self.handlers.get(form_id) {
      Some(handler) => Some(handler.submit(form).await),
      None => {
        tracing::debug!(form = %form_id, "submit for unbound form ignored");
        None
      }
    }
  }
}

//! The presence-check gate applied before anything reaches the store.
//!
//! This is a client-side courtesy, not integrity enforcement: the store's own
//! access rules must require the same fields.

use thiserror::Error;

use crate::schema::FormSchema;

/// One or more required fields were empty at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form {form:?} is missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
  pub form:    String,
  /// Record keys of the empty required fields, in schema order.
  pub missing: Vec<String>,
}

/// Check that every field in `schema.required` holds a non-empty value.
pub fn validate(
  schema: &FormSchema,
  values: &[(String, String)],
) -> Result<(), ValidationError> {
  let missing: Vec<String> = schema
    .required
    .iter()
    .filter(|key| {
      values
        .iter()
        .find(|(k, _)| k == *key)
        .is_none_or(|(_, v)| v.is_empty())
    })
    .cloned()
    .collect();

  if missing.is_empty() {
    Ok(())
  } else {
    Err(ValidationError { form: schema.id.clone(), missing })
  }
}

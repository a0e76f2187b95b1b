//! Error types for `folio-core`.

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("unknown form: {0:?}")]
  UnknownForm(String),

  #[error("form {0:?} is declared more than once")]
  DuplicateForm(String),

  #[error("collection {collection:?} is targeted by both {first:?} and {second:?}")]
  SharedCollection {
    collection: String,
    first:      String,
    second:     String,
  },

  #[error("form {0:?} declares no fields")]
  EmptySchema(String),

  #[error("form {form:?} requires undeclared field {field:?}")]
  UndeclaredRequired { form: String, field: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

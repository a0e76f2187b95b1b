//! Core types and trait definitions for the Folio site backend.
//!
//! Submission records, form schemas, the presence-check validation gate and
//! the [`store::DocumentStore`] abstraction live here. This crate carries no
//! HTTP, database or runtime dependencies; every other crate builds on it.

pub mod error;
pub mod form;
pub mod record;
pub mod schema;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use validation::ValidationError;

//! Wiring for the `folio` binary: configuration, store selection and the
//! terminal stand-in for a page's forms.

pub mod backend;
pub mod config;
pub mod terminal;

pub use backend::{Backend, BackendError};
pub use config::{AdminConfig, ServerConfig, StoreConfig};

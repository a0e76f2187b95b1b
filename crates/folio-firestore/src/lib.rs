//! Hosted document store client for Folio submissions.
//!
//! Talks to the Firestore REST API directly: each append is a single
//! `documents:commit` call that creates a new document under an
//! auto-generated id and, for server-stamped records, asks the service to
//! fill the timestamp field with its own request time.

mod encode;
mod store;

pub mod config;
pub mod error;

pub use config::FirestoreConfig;
pub use error::{Error, Result};
pub use store::FirestoreStore;

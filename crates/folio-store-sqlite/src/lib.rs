//! SQLite backend for Folio submissions.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Intended for local development and
//! tests; production deployments point at the hosted store instead.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, StoredDocument};

#[cfg(test)]
mod tests;

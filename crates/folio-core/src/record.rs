//! Submission records — the flat value built from a submitted form.
//!
//! A record is constructed once per submit action, handed to a
//! [`DocumentStore`](crate::store::DocumentStore), and never read back. It has
//! no setters: every field is fixed at construction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  form::FormSurface,
  schema::FormSchema,
  validation::{ValidationError, validate},
};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The identifier a store assigned to an appended document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Timestamp ───────────────────────────────────────────────────────────────

/// The creation instant attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
  /// Opaque sentinel; the store substitutes its own clock at write time.
  Server,
  /// An instant read from the submitting machine's clock.
  Client(DateTime<Utc>),
}

impl Timestamp {
  /// The concrete instant, substituting `write_time` for the server sentinel.
  pub fn resolve(self, write_time: DateTime<Utc>) -> DateTime<Utc> {
    match self {
      Self::Server => write_time,
      Self::Client(at) => at,
    }
  }

  pub fn is_server(self) -> bool { matches!(self, Self::Server) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A write-once submission built from form fields.
///
/// Every field declared by the producing schema is present, in declaration
/// order; unset fields hold the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
  fields:          Vec<(String, String)>,
  timestamp_field: String,
  timestamp:       Timestamp,
  source:          Option<String>,
}

impl SubmissionRecord {
  /// Read `form` through `schema`, apply the validation gate and build the
  /// record. Nothing about `form` is modified.
  pub fn from_form<F>(
    schema: &FormSchema,
    form: &F,
    timestamp: Timestamp,
  ) -> Result<Self, ValidationError>
  where
    F: FormSurface + ?Sized,
  {
    let fields = schema.extract(form);
    validate(schema, &fields)?;
    Ok(Self {
      fields,
      timestamp_field: schema.timestamp_field.clone(),
      timestamp,
      source: schema.source.clone(),
    })
  }

  /// Field values in declaration order.
  pub fn fields(&self) -> &[(String, String)] { &self.fields }

  /// Look up a single field value by record key.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// The record key holding the creation instant (`createdAt`, `timestamp`).
  pub fn timestamp_field(&self) -> &str { &self.timestamp_field }

  pub fn timestamp(&self) -> Timestamp { self.timestamp }

  /// Tag naming the form that produced the record, if the schema sets one.
  pub fn source(&self) -> Option<&str> { self.source.as_deref() }

  /// Flatten into a JSON object, resolving a server timestamp to
  /// `write_time`. Timestamps are written as RFC 3339 strings.
  pub fn to_document(&self, write_time: DateTime<Utc>) -> Map<String, Value> {
    let mut doc = Map::new();
    for (key, value) in &self.fields {
      doc.insert(key.clone(), Value::String(value.clone()));
    }
    doc.insert(
      self.timestamp_field.clone(),
      Value::String(self.timestamp.resolve(write_time).to_rfc3339()),
    );
    if let Some(source) = &self.source {
      doc.insert("source".to_owned(), Value::String(source.clone()));
    }
    doc
  }
}

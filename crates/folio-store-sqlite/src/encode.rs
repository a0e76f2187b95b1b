//! Conversions between stored column text and Rust values.
//!
//! Timestamps are RFC 3339 strings; document bodies are compact JSON objects.

use chrono::{DateTime, Utc};
use folio_core::record::DocumentId;
use serde_json::{Map, Value};

use crate::{Error, Result, store::StoredDocument};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_body(body: &Map<String, Value>) -> Result<String> {
  Ok(serde_json::to_string(body)?)
}

pub fn decode_body(s: &str) -> Result<Map<String, Value>> {
  match serde_json::from_str(s)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::NotAnObject(s.to_owned())),
  }
}

/// A `documents` row as read from SQLite, before decoding.
pub struct RawDocument {
  pub document_id: String,
  pub collection:  String,
  pub body_json:   String,
  pub created_at:  String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<StoredDocument> {
    Ok(StoredDocument {
      document_id: DocumentId(self.document_id),
      collection:  self.collection,
      body:        decode_body(&self.body_json)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

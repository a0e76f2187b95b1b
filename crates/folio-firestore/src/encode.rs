//! Wire encoding for `documents:commit`.

use folio_core::record::{SubmissionRecord, Timestamp};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use serde_json::{Map, Value};

// ─── Request body ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CommitRequest {
  pub writes: Vec<Write>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Write {
  pub update:            Document,
  pub current_document:  Precondition,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub update_transforms: Vec<FieldTransform>,
}

#[derive(Debug, Serialize)]
pub struct Document {
  pub name:   String,
  pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct Precondition {
  pub exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
  pub field_path:          String,
  pub set_to_server_value: &'static str,
}

/// Build a commit that creates `document_name` from `record`.
///
/// A server timestamp becomes a `REQUEST_TIME` transform; a client timestamp
/// is written as an ordinary `timestampValue`.
pub fn commit_request(document_name: String, record: &SubmissionRecord) -> CommitRequest {
  let mut fields = Map::new();
  for (key, value) in record.fields() {
    fields.insert(key.clone(), string_value(value));
  }
  if let Some(source) = record.source() {
    fields.insert("source".to_owned(), string_value(source));
  }

  let mut update_transforms = Vec::new();
  match record.timestamp() {
    Timestamp::Server => update_transforms.push(FieldTransform {
      field_path:          field_path(record.timestamp_field()),
      set_to_server_value: "REQUEST_TIME",
    }),
    Timestamp::Client(at) => {
      fields.insert(
        record.timestamp_field().to_owned(),
        serde_json::json!({ "timestampValue": at.to_rfc3339() }),
      );
    }
  }

  CommitRequest {
    writes: vec![Write {
      update: Document { name: document_name, fields },
      current_document: Precondition { exists: false },
      update_transforms,
    }],
  }
}

fn string_value(s: &str) -> Value { serde_json::json!({ "stringValue": s }) }

/// Field paths that are not plain identifiers must be backquoted.
fn field_path(key: &str) -> String {
  let simple = key
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
  if simple {
    key.to_owned()
  } else {
    format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
  }
}

// ─── Document ids ────────────────────────────────────────────────────────────

const AUTO_ID_ALPHABET: &[u8] =
  b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const AUTO_ID_LEN: usize = 20;

/// A 20-character alphanumeric id, the same shape the hosted SDKs generate.
pub fn auto_id() -> String {
  // Largest multiple of the alphabet size that fits in a byte; anything at or
  // above it is rejected to keep the distribution uniform.
  let limit = (256 / AUTO_ID_ALPHABET.len() * AUTO_ID_ALPHABET.len()) as u8;
  let mut id = String::with_capacity(AUTO_ID_LEN);
  let mut buf = [0u8; 32];
  while id.len() < AUTO_ID_LEN {
    OsRng.fill_bytes(&mut buf);
    for &b in buf.iter().filter(|&&b| b < limit) {
      if id.len() == AUTO_ID_LEN {
        break;
      }
      id.push(AUTO_ID_ALPHABET[b as usize % AUTO_ID_ALPHABET.len()] as char);
    }
  }
  id
}

// ─── Error bodies ────────────────────────────────────────────────────────────

/// Pull `error.message` out of a Google API error body, falling back to the
/// raw text.
pub fn error_message(body: &str) -> String {
  serde_json::from_str::<Value>(body)
    .ok()
    .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_else(|| body.trim().to_owned())
}

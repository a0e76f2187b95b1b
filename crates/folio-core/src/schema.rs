//! Form schemas — the per-form configuration of the submission workflow.
//!
//! One schema describes one form on the site: which inputs it reads, which of
//! them must be filled in, which collection its records land in, how the
//! record is timestamped and what the submit control says afterwards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, form::FormSurface};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// One input read by a form schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
  /// The input's name on the page.
  pub name: String,
  /// The record key written for this input; defaults to `name`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key:  Option<String>,
  /// Strip surrounding whitespace from the submitted value.
  #[serde(default = "default_trim")]
  pub trim: bool,
}

fn default_trim() -> bool { true }

impl FieldSpec {
  /// A trimmed text input whose record key equals its name.
  pub fn text(name: &str) -> Self {
    Self { name: name.to_owned(), key: None, trim: true }
  }

  /// A select or date input: read verbatim.
  pub fn verbatim(name: &str) -> Self {
    Self { name: name.to_owned(), key: None, trim: false }
  }

  /// Write this field under `key` instead of its input name.
  pub fn as_key(mut self, key: &str) -> Self {
    self.key = Some(key.to_owned());
    self
  }

  pub fn key(&self) -> &str { self.key.as_deref().unwrap_or(&self.name) }
}

// ─── Timestamp policy ────────────────────────────────────────────────────────

/// Which clock stamps a record's creation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
  /// Ask the store for its write-time sentinel.
  #[default]
  Server,
  /// Use the submitting machine's clock.
  Client,
}

// ─── Feedback ────────────────────────────────────────────────────────────────

/// Labels shown on the submit control after each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessages {
  pub success: String,
  pub invalid: String,
  pub error:   String,
}

// ─── Schema ──────────────────────────────────────────────────────────────────

fn default_timestamp_field() -> String { "createdAt".to_owned() }

/// Everything the submission workflow needs to know about one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
  /// The form's identifier on the page (`inquiryForm`, `footerContactForm`).
  pub id:               String,
  /// Target collection in the document store.
  pub collection:       String,
  pub fields:           Vec<FieldSpec>,
  /// Record keys that must be non-empty before anything is stored.
  #[serde(default)]
  pub required:         Vec<String>,
  #[serde(default = "default_timestamp_field")]
  pub timestamp_field:  String,
  #[serde(default)]
  pub timestamp_policy: TimestampPolicy,
  /// Value of the record's `source` tag; omitted from the record when unset.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source:           Option<String>,
  pub messages:         FeedbackMessages,
}

impl FormSchema {
  /// The hero-section event inquiry form.
  pub fn inquiry() -> Self {
    Self {
      id:               "inquiryForm".to_owned(),
      collection:       "inquiries".to_owned(),
      fields:           vec![
        FieldSpec::text("name"),
        FieldSpec::verbatim("eventType"),
        FieldSpec::text("place"),
        FieldSpec::verbatim("date").as_key("eventDate"),
        FieldSpec::text("phone"),
        FieldSpec::text("botim"),
        FieldSpec::text("details"),
      ],
      required:         vec!["name".to_owned(), "phone".to_owned()],
      timestamp_field:  default_timestamp_field(),
      timestamp_policy: TimestampPolicy::Server,
      source:           Some("heroInquiry".to_owned()),
      messages:         FeedbackMessages {
        success: "Submitted ✅".to_owned(),
        invalid: "Name & Phone needed".to_owned(),
        error:   "Error ❌".to_owned(),
      },
    }
  }

  /// The footer contact form.
  pub fn footer_contact() -> Self {
    Self {
      id:               "footerContactForm".to_owned(),
      collection:       "contacts".to_owned(),
      fields:           vec![
        FieldSpec::text("name"),
        FieldSpec::text("email"),
        FieldSpec::text("phone"),
        FieldSpec::text("message"),
      ],
      required:         vec!["name".to_owned(), "email".to_owned()],
      timestamp_field:  default_timestamp_field(),
      timestamp_policy: TimestampPolicy::Server,
      source:           Some("footerContact".to_owned()),
      messages:         FeedbackMessages {
        success: "Sent ✅".to_owned(),
        invalid: "Name & Email needed".to_owned(),
        error:   "Error ❌".to_owned(),
      },
    }
  }

  /// Read every declared field from `form`, keyed by record key.
  ///
  /// A missing input and an empty input both yield `""`, so the record shape
  /// never depends on what the page happened to contain.
  pub fn extract<F>(&self, form: &F) -> Vec<(String, String)>
  where
    F: FormSurface + ?Sized,
  {
    self
      .fields
      .iter()
      .map(|spec| {
        let raw = form.field_value(&spec.name).unwrap_or_default();
        let value = if spec.trim { raw.trim().to_owned() } else { raw };
        (spec.key().to_owned(), value)
      })
      .collect()
  }

  fn check(&self) -> Result<()> {
    if self.fields.is_empty() {
      return Err(Error::EmptySchema(self.id.clone()));
    }
    if let Some(field) = self
      .required
      .iter()
      .find(|r| !self.fields.iter().any(|f| f.key() == r.as_str()))
    {
      return Err(Error::UndeclaredRequired {
        form:  self.id.clone(),
        field: field.clone(),
      });
    }
    Ok(())
  }
}

// ─── Catalogue ───────────────────────────────────────────────────────────────

/// The set of forms a site exposes, keyed by form id.
///
/// Each collection is owned by exactly one form: two schemas writing to the
/// same collection are rejected rather than silently merged.
#[derive(Debug, Clone)]
pub struct FormCatalog {
  forms: Vec<FormSchema>,
}

impl FormCatalog {
  pub fn new(forms: Vec<FormSchema>) -> Result<Self> {
    let mut ids: HashSet<&str> = HashSet::new();
    let mut collections: HashMap<&str, &str> = HashMap::new();

    for form in &forms {
      form.check()?;
      if !ids.insert(&form.id) {
        return Err(Error::DuplicateForm(form.id.clone()));
      }
      if let Some(first) = collections.insert(&form.collection, &form.id) {
        return Err(Error::SharedCollection {
          collection: form.collection.clone(),
          first:      first.to_owned(),
          second:     form.id.clone(),
        });
      }
    }

    Ok(Self { forms })
  }

  /// The inquiry and footer contact forms.
  pub fn canonical() -> Self {
    Self { forms: vec![FormSchema::inquiry(), FormSchema::footer_contact()] }
  }

  pub fn get(&self, id: &str) -> Option<&FormSchema> {
    self.forms.iter().find(|f| f.id == id)
  }

  pub fn lookup(&self, id: &str) -> Result<&FormSchema> {
    self.get(id).ok_or_else(|| Error::UnknownForm(id.to_owned()))
  }

  pub fn iter(&self) -> impl Iterator<Item = &FormSchema> { self.forms.iter() }

  pub fn len(&self) -> usize { self.forms.len() }

  pub fn is_empty(&self) -> bool { self.forms.is_empty() }
}

impl Default for FormCatalog {
  fn default() -> Self { Self::canonical() }
}

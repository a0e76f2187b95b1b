//! The page-facing side of a form: reading inputs and resetting them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Abstraction over a form as rendered on a page.
///
/// Implementations decide how an input is located (element id, input name,
/// a posted body); the submission workflow only ever sees values by name.
pub trait FormSurface {
  /// Current value of the input called `name`, or `None` if the form has no
  /// such input.
  fn field_value(&self, name: &str) -> Option<String>;

  /// Return every input to its empty/default state.
  fn reset(&mut self);
}

/// A detached set of named form values.
///
/// Used wherever there is no live page: posted request bodies, the terminal
/// `submit` command, tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
  values: BTreeMap<String, String>,
}

impl FormValues {
  pub fn new() -> Self { Self::default() }

  /// Builder-style [`set`](Self::set).
  pub fn with(mut self, name: &str, value: &str) -> Self {
    self.set(name, value);
    self
  }

  pub fn set(&mut self, name: &str, value: &str) {
    self.values.insert(name.to_owned(), value.to_owned());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  /// True when no input holds a non-empty value.
  pub fn is_blank(&self) -> bool { self.values.values().all(String::is_empty) }
}

impl FormSurface for FormValues {
  fn field_value(&self, name: &str) -> Option<String> {
    self.values.get(name).cloned()
  }

  fn reset(&mut self) { self.values.values_mut().for_each(String::clear); }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reset_clears_values_but_keeps_inputs() {
    let mut form: FormValues =
      [("name", "Asha"), ("phone", "0550000000")].into_iter().collect();
    form.reset();
    assert!(form.is_blank());
    assert_eq!(form.field_value("name").as_deref(), Some(""));
    assert_eq!(form.field_value("email"), None);
  }

  #[test]
  fn deserialises_from_a_flat_object() {
    let form: FormValues =
      serde_json::from_str(r#"{"name":"Asha","phone":"0550000000"}"#).unwrap();
    assert_eq!(form.get("phone"), Some("0550000000"));
  }
}

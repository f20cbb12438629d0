//! People and name normalisation.
//!
//! A person has no identifier beyond their name. Two spellings that differ
//! only in case or surrounding whitespace are the same person.

use serde::{Deserialize, Serialize};

/// A volunteer who can appear in one or more eligibility pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub name: String,
}

impl Person {
  pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }

  /// Identity key: trimmed and lower-cased.
  pub fn key(&self) -> String { normalize_name(&self.name) }

  /// Title-cased name as it appears on the roster.
  pub fn display_name(&self) -> String { title_case(&self.name) }
}

pub fn normalize_name(name: &str) -> String { name.trim().to_lowercase() }

/// Lower-case the whole name, then upper-case the first letter of each
/// space-separated word.
pub fn title_case(name: &str) -> String {
  name
    .trim()
    .to_lowercase()
    .split(' ')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

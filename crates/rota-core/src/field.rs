//! Field values and shape normalisation.
//!
//! A roster cell is either text or explicitly unassigned. A field holds one
//! cell or an ordered pair, depending on its [`Role`]. Rows loaded from
//! storage or edited by hand may arrive in the wrong shape; they are repaired
//! with [`normalize_fields`], never rejected.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::role::Role;

/// Shown wherever an unassigned cell is presented to a reader.
pub const PLACEHOLDER: &str = "TBD";

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One value in a field. Serialises as a JSON string, or `null` when
/// unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Cell {
  Text(String),
  /// The engine found nobody eligible for this place.
  Unassigned,
}

impl Cell {
  pub fn text(s: impl Into<String>) -> Self { Self::Text(s.into()) }

  pub fn blank() -> Self { Self::Text(String::new()) }

  pub fn is_unassigned(&self) -> bool { matches!(self, Self::Unassigned) }

  /// `true` for empty or whitespace-only text. An unassigned cell is not
  /// blank: it prints as [`PLACEHOLDER`].
  pub fn is_blank(&self) -> bool {
    matches!(self, Self::Text(s) if s.trim().is_empty())
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      Self::Unassigned => None,
    }
  }

  /// Comparison key for duplicate detection: trimmed, lower-cased text.
  /// `None` for blank and unassigned cells.
  pub fn normalized(&self) -> Option<String> {
    match self {
      Self::Text(s) if !s.trim().is_empty() => Some(s.trim().to_lowercase()),
      _ => None,
    }
  }
}

impl Default for Cell {
  fn default() -> Self { Self::blank() }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) => f.write_str(s),
      Self::Unassigned => f.write_str(PLACEHOLDER),
    }
  }
}

impl From<Option<String>> for Cell {
  fn from(value: Option<String>) -> Self {
    value.map_or(Self::Unassigned, Self::Text)
  }
}

impl From<Cell> for Option<String> {
  fn from(cell: Cell) -> Self {
    match cell {
      Cell::Text(s) => Some(s),
      Cell::Unassigned => None,
    }
  }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// The value of one column in an unmerged row.
///
/// On the wire a scalar is a string (or `null`) and a pair is a two-element
/// array. Arrays of any length decode as a pair: short ones are padded with
/// blanks, long ones keep their first two entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFieldValue", into = "RawFieldValue")]
pub enum FieldValue {
  Scalar(Cell),
  Pair(Cell, Cell),
}

impl FieldValue {
  /// An empty value of the shape `role` expects.
  pub fn blank_for(role: Role) -> Self {
    if role.is_pair() {
      Self::Pair(Cell::blank(), Cell::blank())
    } else {
      Self::Scalar(Cell::blank())
    }
  }

  pub fn cells(&self) -> Vec<&Cell> {
    match self {
      Self::Scalar(c) => vec![c],
      Self::Pair(a, b) => vec![a, b],
    }
  }

  pub fn cell(&self, index: usize) -> Option<&Cell> {
    match (self, index) {
      (Self::Scalar(c), 0) | (Self::Pair(c, _), 0) | (Self::Pair(_, c), 1) => {
        Some(c)
      }
      _ => None,
    }
  }

  pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
    match (self, index) {
      (Self::Scalar(c), 0) | (Self::Pair(c, _), 0) | (Self::Pair(_, c), 1) => {
        Some(c)
      }
      _ => None,
    }
  }

  /// Non-blank cells joined with `", "`; unassigned cells print as
  /// [`PLACEHOLDER`].
  pub fn joined(&self) -> String {
    self
      .cells()
      .into_iter()
      .filter(|c| !c.is_blank())
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  }

  /// Convert to the shape `role` expects. A scalar becomes `(value, "")`; a
  /// pair in a scalar column collapses to its joined text.
  pub fn into_shape(self, role: Role) -> Self {
    match self {
      Self::Scalar(c) if role.is_pair() => Self::Pair(c, Cell::blank()),
      Self::Pair(a, b) if !role.is_pair() => {
        if b.is_blank() {
          Self::Scalar(a)
        } else {
          Self::Scalar(Cell::Text(Self::Pair(a, b).joined()))
        }
      }
      value => value,
    }
  }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawFieldValue {
  List(Vec<Option<String>>),
  One(Option<String>),
}

impl From<RawFieldValue> for FieldValue {
  fn from(raw: RawFieldValue) -> Self {
    match raw {
      RawFieldValue::One(v) => Self::Scalar(v.into()),
      RawFieldValue::List(items) => {
        let mut cells = items.into_iter().map(Cell::from);
        let first = cells.next().unwrap_or_default();
        let second = cells.next().unwrap_or_default();
        Self::Pair(first, second)
      }
    }
  }
}

impl From<FieldValue> for RawFieldValue {
  fn from(value: FieldValue) -> Self {
    match value {
      FieldValue::Scalar(c) => Self::One(c.into()),
      FieldValue::Pair(a, b) => Self::List(vec![a.into(), b.into()]),
    }
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The per-column values of an unmerged row, keyed by heading on the wire.
pub type Fields = BTreeMap<Role, FieldValue>;

/// A complete field set with every column blank.
pub fn blank_fields() -> Fields {
  Role::iter().map(|r| (r, FieldValue::blank_for(r))).collect()
}

/// Repair `fields` in place: insert every missing column blank and convert
/// every present value to the shape its column expects.
pub fn normalize_fields(fields: &mut Fields) {
  for role in Role::iter() {
    let value = fields
      .remove(&role)
      .map_or_else(|| FieldValue::blank_for(role), |v| v.into_shape(role));
    fields.insert(role, value);
  }
}

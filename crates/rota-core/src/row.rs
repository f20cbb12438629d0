//! Roster rows and the merge/unmerge state machine.
//!
//! A row is either a set of per-column fields or a single merged free-text
//! string. Merging keeps the field set aside so unmerging restores it
//! exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  field::{Cell, FieldValue, Fields, blank_fields, normalize_fields},
  lookup::LookupContent,
  role::Role,
};

/// Separator between column values in merged text.
pub const MERGE_SEPARATOR: &str = " | ";

/// What a row holds besides its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowBody {
  Fields {
    fields: Fields,
  },
  Merged {
    content:         String,
    /// The field set as it was at merge time.
    original_fields: Fields,
  },
}

/// One service day on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
  pub id:   Uuid,
  /// Rows added by hand start without a date.
  pub date: Option<NaiveDate>,
  pub body: RowBody,
}

impl RosterRow {
  /// A row with every column blank.
  pub fn new(date: Option<NaiveDate>) -> Self {
    Self::with_fields(date, blank_fields())
  }

  pub fn with_fields(date: Option<NaiveDate>, fields: Fields) -> Self {
    Self {
      id: Uuid::new_v4(),
      date,
      body: RowBody::Fields { fields },
    }
  }

  pub fn is_merged(&self) -> bool { matches!(self.body, RowBody::Merged { .. }) }

  /// The field set of an unmerged row.
  pub fn fields(&self) -> Option<&Fields> {
    match &self.body {
      RowBody::Fields { fields } => Some(fields),
      RowBody::Merged { .. } => None,
    }
  }

  pub fn fields_mut(&mut self) -> Option<&mut Fields> {
    match &mut self.body {
      RowBody::Fields { fields } => Some(fields),
      RowBody::Merged { .. } => None,
    }
  }

  pub fn merged_content(&self) -> Option<&str> {
    match &self.body {
      RowBody::Merged { content, .. } => Some(content),
      RowBody::Fields { .. } => None,
    }
  }

  pub fn cell(&self, role: Role, index: usize) -> Option<&Cell> {
    self.fields()?.get(&role)?.cell(index)
  }

  // ── Merge state machine ─────────────────────────────────────────────────

  /// Collapse the fields into one string: each non-empty column's joined
  /// value, in column order, separated by [`MERGE_SEPARATOR`]. Returns
  /// `false` if the row is already merged.
  pub fn merge(&mut self) -> bool {
    let RowBody::Fields { fields } = &mut self.body else {
      return false;
    };
    let original_fields = std::mem::take(fields);
    let content = merged_text(&original_fields);
    self.body = RowBody::Merged {
      content,
      original_fields,
    };
    true
  }

  /// Restore the field set captured by [`merge`](Self::merge) and drop the
  /// merged text. Returns `false` if the row is not merged.
  pub fn unmerge(&mut self) -> bool {
    let RowBody::Merged { original_fields, .. } = &mut self.body else {
      return false;
    };
    let fields = std::mem::take(original_fields);
    self.body = RowBody::Fields { fields };
    true
  }

  // ── Editing ─────────────────────────────────────────────────────────────

  /// Overwrite one cell of an unmerged row. Returns `false` when the row is
  /// merged or `index` does not exist for the column's shape.
  pub fn set_text(&mut self, role: Role, index: usize, text: impl Into<String>) -> bool {
    let Some(fields) = self.fields_mut() else {
      return false;
    };
    let value = fields.entry(role).or_insert_with(|| FieldValue::blank_for(role));
    match value.cell_mut(index) {
      Some(cell) => {
        *cell = Cell::Text(text.into());
        true
      }
      None => false,
    }
  }

  /// Overwrite the text of a merged row. Returns `false` when unmerged.
  pub fn set_merged_content(&mut self, text: impl Into<String>) -> bool {
    match &mut self.body {
      RowBody::Merged { content, .. } => {
        *content = text.into();
        true
      }
      RowBody::Fields { .. } => false,
    }
  }

  /// Fill the scripture passage, memory verse and theme columns. A column
  /// stored flat keeps the comma-joined form; otherwise it gets the pair. The
  /// theme is left alone when the lookup has none. Merged rows are untouched.
  pub fn apply_lookup(&mut self, content: &LookupContent) {
    let Some(fields) = self.fields_mut() else {
      return;
    };
    let flat = |role| matches!(fields.get(&role), Some(FieldValue::Scalar(_)));
    let passage = if flat(Role::ScripturePassage) {
      FieldValue::Scalar(Cell::text(content.joined_passages()))
    } else {
      pair(&content.passages)
    };
    let verse = if flat(Role::Mv) {
      FieldValue::Scalar(Cell::text(content.joined_verses()))
    } else {
      pair(&content.verses)
    };
    fields.insert(Role::ScripturePassage, passage);
    fields.insert(Role::Mv, verse);
    if let Some(theme) = &content.theme {
      fields.insert(Role::MessageTheme, FieldValue::Scalar(Cell::text(theme.as_str())));
    }
  }

  /// Blank every column, keeping the id and date, and drop any merge.
  pub fn clear(&mut self) { self.body = RowBody::Fields { fields: blank_fields() }; }

  /// Repair field shapes, including the field set held by a merged row.
  pub fn normalize(&mut self) {
    match &mut self.body {
      RowBody::Fields { fields } => normalize_fields(fields),
      RowBody::Merged { original_fields, .. } => normalize_fields(original_fields),
    }
  }
}

fn pair([a, b]: &[String; 2]) -> FieldValue {
  FieldValue::Pair(Cell::text(a.as_str()), Cell::text(b.as_str()))
}

fn merged_text(fields: &Fields) -> String {
  fields
    .values()
    .map(FieldValue::joined)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(MERGE_SEPARATOR)
}

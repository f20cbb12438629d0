//! Duplicate/consistency checking over a month's rows.
//!
//! Every non-blank value is normalised (trimmed, lower-cased) and indexed by
//! where it occurs. A value seen in two or more places flags all of those
//! places. The check is a pure function of the rows, so re-running it after
//! an edit always reflects the current content.

use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  fmt,
};

use serde::{Serialize, Serializer};

use crate::{
  role::Role,
  row::{RosterRow, RowBody},
};

/// A place a value can occur in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
  Role(Role),
  /// The free text of a merged row.
  MergedContent,
}

impl fmt::Display for FieldKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Role(role) => f.write_str(role.heading()),
      Self::MergedContent => f.write_str("MergedContent"),
    }
  }
}

impl Serialize for FieldKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Row index → the fields in that row holding a duplicated value.
pub type DuplicateFlags = BTreeMap<usize, BTreeSet<FieldKey>>;

pub fn find_duplicates(rows: &[RosterRow]) -> DuplicateFlags {
  let mut occurrences: HashMap<String, Vec<(usize, FieldKey)>> = HashMap::new();

  for (index, row) in rows.iter().enumerate() {
    match &row.body {
      RowBody::Merged { content, .. } => {
        let key = content.trim().to_lowercase();
        if !key.is_empty() {
          occurrences
            .entry(key)
            .or_default()
            .push((index, FieldKey::MergedContent));
        }
      }
      RowBody::Fields { fields } => {
        for (role, value) in fields {
          for key in value.cells().into_iter().filter_map(|c| c.normalized()) {
            occurrences
              .entry(key)
              .or_default()
              .push((index, FieldKey::Role(*role)));
          }
        }
      }
    }
  }

  let mut flags = DuplicateFlags::new();
  for places in occurrences.into_values().filter(|p| p.len() > 1) {
    for (index, field) in places {
      flags.entry(index).or_default().insert(field);
    }
  }
  flags
}

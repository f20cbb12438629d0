//! Month blocks: one displayed month of roster rows.

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::{
  calendar::{month_index, service_days},
  duplicates::{DuplicateFlags, find_duplicates},
  lookup::{LookupContent, ScriptureLookup},
  row::RosterRow,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBlock {
  pub month: Month,
  pub rows:  Vec<RosterRow>,
}

impl MonthBlock {
  /// One blank row per service day of `month` in `year`, with curated
  /// content from `lookup` already applied.
  pub fn generate<L>(month: Month, year: i32, lookup: &L) -> Self
  where
    L: ScriptureLookup + ?Sized,
  {
    let rows = service_days(month_index(month), year)
      .into_iter()
      .map(|date| {
        let mut row = RosterRow::new(Some(date));
        if let Some(entry) = lookup.lookup(year, date) {
          row.apply_lookup(&LookupContent::from_entry(entry));
        }
        row
      })
      .collect();
    Self { month, rows }
  }

  pub fn month_index(&self) -> u32 { month_index(self.month) }

  /// Append a blank, undated row.
  pub fn add_row(&mut self) -> &mut RosterRow {
    self.rows.push(RosterRow::new(None));
    let last = self.rows.len() - 1;
    &mut self.rows[last]
  }

  /// Remove the row at `index`. Refused (returns `None`) when it is the only
  /// row left or the index is out of range.
  pub fn remove_row(&mut self, index: usize) -> Option<RosterRow> {
    (self.rows.len() > 1 && index < self.rows.len()).then(|| self.rows.remove(index))
  }

  pub fn duplicates(&self) -> DuplicateFlags { find_duplicates(&self.rows) }

  pub fn normalize(&mut self) { self.rows.iter_mut().for_each(RosterRow::normalize); }

  pub fn clear(&mut self) { self.rows.iter_mut().for_each(RosterRow::clear); }
}

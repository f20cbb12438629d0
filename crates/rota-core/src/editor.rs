//! A month being edited by hand, with its duplicate flags.
//!
//! Flags appear only after an explicit check. While flags are showing, every
//! edit re-runs the check so they never go stale; a merge or unmerge clears
//! them because they refer to a field layout the row no longer has.

use crate::{
  duplicates::DuplicateFlags,
  month::MonthBlock,
  role::Role,
};

#[derive(Debug, Clone)]
pub struct MonthEditor {
  block: MonthBlock,
  flags: DuplicateFlags,
}

impl MonthEditor {
  pub fn new(block: MonthBlock) -> Self {
    Self {
      block,
      flags: DuplicateFlags::new(),
    }
  }

  pub fn block(&self) -> &MonthBlock { &self.block }

  pub fn into_block(self) -> MonthBlock { self.block }

  pub fn flags(&self) -> &DuplicateFlags { &self.flags }

  /// Run the duplicate check and show its result.
  pub fn check_duplicates(&mut self) -> &DuplicateFlags {
    self.flags = self.block.duplicates();
    &self.flags
  }

  /// Edit one cell. Returns `false` if the row does not exist, is merged, or
  /// has no such cell.
  pub fn edit(&mut self, row: usize, role: Role, index: usize, text: &str) -> bool {
    let changed = self
      .block
      .rows
      .get_mut(row)
      .is_some_and(|r| r.set_text(role, index, text));
    self.refresh(changed);
    changed
  }

  /// Edit the text of a merged row.
  pub fn edit_merged(&mut self, row: usize, text: &str) -> bool {
    let changed = self
      .block
      .rows
      .get_mut(row)
      .is_some_and(|r| r.set_merged_content(text));
    self.refresh(changed);
    changed
  }

  /// Merge an unmerged row or unmerge a merged one. Clears the flags.
  pub fn toggle_merge(&mut self, row: usize) -> bool {
    let Some(r) = self.block.rows.get_mut(row) else {
      return false;
    };
    if r.is_merged() { r.unmerge() } else { r.merge() };
    self.flags.clear();
    true
  }

  pub fn add_row(&mut self) {
    self.block.add_row();
    self.refresh(true);
  }

  pub fn remove_row(&mut self, row: usize) -> bool {
    let removed = self.block.remove_row(row).is_some();
    self.refresh(removed);
    removed
  }

  fn refresh(&mut self, changed: bool) {
    if changed && !self.flags.is_empty() {
      self.flags = self.block.duplicates();
    }
  }
}

//! Run-scoped fairness state.
//!
//! Counts and recency are global across the whole window; the "already used
//! this month" set is cleared at every month boundary. A tracker lives for a
//! single generation run and is never persisted.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::role::Role;

/// Coarse global ordering of slots: `month * stride + slot`.
pub type Position = i64;

/// `last_position` of someone never assigned.
pub const NEVER_ASSIGNED: Position = -10;

/// Default distance between the first slots of consecutive months.
pub const SLOT_STRIDE: Position = 10;

/// Position of slot `slot` in month `month`. `stride` must exceed the number
/// of slots in any month or positions collide.
pub fn position(month: usize, slot: usize, stride: Position) -> Position {
  debug_assert!((slot as Position) < stride, "slot {slot} overflows stride {stride}");
  month as Position * stride + slot as Position
}

/// What the tracker knows about one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
  pub role_count:    u32,
  pub last_position: Position,
  /// `"<Role> (M<m>S<s>)"` for every assignment, in order.
  pub history:       Vec<String>,
}

impl Default for PersonRecord {
  fn default() -> Self {
    Self {
      role_count:    0,
      last_position: NEVER_ASSIGNED,
      history:       Vec::new(),
    }
  }
}

/// Per-person counters keyed by normalised name.
#[derive(Debug, Clone, Default)]
pub struct FairnessTracker {
  people:          BTreeMap<String, PersonRecord>,
  used_this_month: HashSet<String>,
}

impl FairnessTracker {
  /// Start a run knowing every eligible person, so people never picked still
  /// show up with zero assignments.
  pub fn new<I>(keys: I) -> Self
  where
    I: IntoIterator<Item = String>,
  {
    Self {
      people:          keys.into_iter().map(|k| (k, PersonRecord::default())).collect(),
      used_this_month: HashSet::new(),
    }
  }

  /// Commit one assignment of `key` to `role` at `position`.
  pub fn record_assignment(
    &mut self,
    key: &str,
    position: Position,
    role: Role,
    slot_label: &str,
  ) {
    let record = self.people.entry(key.to_string()).or_default();
    debug_assert!(
      position >= record.last_position,
      "positions must be visited in increasing order"
    );
    record.role_count += 1;
    record.last_position = position;
    record.history.push(format!("{role} ({slot_label})"));
    self.used_this_month.insert(key.to_string());
  }

  /// Forget who was used this month. Counts and recency are kept.
  pub fn reset_month(&mut self) { self.used_this_month.clear(); }

  pub fn is_used_this_month(&self, key: &str) -> bool {
    self.used_this_month.contains(key)
  }

  pub fn role_count(&self, key: &str) -> u32 {
    self.people.get(key).map_or(0, |r| r.role_count)
  }

  pub fn last_position(&self, key: &str) -> Position {
    self.people.get(key).map_or(NEVER_ASSIGNED, |r| r.last_position)
  }

  pub fn record(&self, key: &str) -> Option<&PersonRecord> { self.people.get(key) }

  /// Every known person, ordered by key.
  pub fn records(&self) -> impl Iterator<Item = (&str, &PersonRecord)> {
    self.people.iter().map(|(k, r)| (k.as_str(), r))
  }
}

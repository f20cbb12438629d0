//! Roster snapshots: the three month blocks of one year's window, plus the
//! display colours the printable document uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  calendar::month_from_index,
  lookup::ScriptureLookup,
  month::MonthBlock,
};

/// Months in one roster window.
pub const WINDOW_MONTHS: u32 = 3;

pub const DEFAULT_BG_COLOR: &str = "#0a2942";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// The unit of persistence: everything needed to reload and print a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
  pub year:       i32,
  pub months:     Vec<MonthBlock>,
  #[serde(default = "default_bg")]
  pub bg_color:   String,
  #[serde(default = "default_text")]
  pub text_color: String,
  /// Set by the store on save.
  #[serde(default)]
  pub saved_at:   Option<DateTime<Utc>>,
}

fn default_bg() -> String { DEFAULT_BG_COLOR.to_string() }

fn default_text() -> String { DEFAULT_TEXT_COLOR.to_string() }

impl RosterSnapshot {
  /// Default month blocks for `year`, starting at the zero-based
  /// `start_month`. A window that would run past December is pulled back so
  /// it ends in December.
  pub fn fresh<L>(year: i32, start_month: u32, lookup: &L) -> Result<Self>
  where
    L: ScriptureLookup + ?Sized,
  {
    month_from_index(start_month)?;
    let start = start_month.min(12 - WINDOW_MONTHS);
    let months = (start..start + WINDOW_MONTHS)
      .map(|i| month_from_index(i).map(|m| MonthBlock::generate(m, year, lookup)))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self {
      year,
      months,
      bg_color: default_bg(),
      text_color: default_text(),
      saved_at: None,
    })
  }

  /// Repair every row's field shapes.
  pub fn normalize(&mut self) { self.months.iter_mut().for_each(MonthBlock::normalize); }

  /// Blank every row, keeping dates; the "reset all" action.
  pub fn clear(&mut self) { self.months.iter_mut().for_each(MonthBlock::clear); }

  /// `"Order of Sunday : July - September"`, or fewer parts when the window
  /// is short.
  pub fn title(&self) -> String {
    let first = self.months.first().map(|m| m.month.name());
    let last = self.months.last().map(|m| m.month.name());
    match (first, last) {
      (Some(a), Some(b)) if a != b => format!("Order of Sunday : {a} - {b}"),
      (Some(a), _) => format!("Order of Sunday : {a}"),
      _ => "Order of Sunday".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Month;

  use super::*;
  use crate::{Error, lookup::NoLookup, role::Role};

  #[test]
  fn fresh_window_is_three_consecutive_months() {
    let snap = RosterSnapshot::fresh(2025, 6, &NoLookup).unwrap();
    let months: Vec<_> = snap.months.iter().map(|m| m.month).collect();
    assert_eq!(months, [Month::July, Month::August, Month::September]);
    assert_eq!(snap.bg_color, DEFAULT_BG_COLOR);
    assert_eq!(snap.title(), "Order of Sunday : July - September");
  }

  #[test]
  fn late_start_is_pulled_back() {
    let snap = RosterSnapshot::fresh(2025, 11, &NoLookup).unwrap();
    assert_eq!(snap.months[0].month, Month::October);
    assert_eq!(snap.months[2].month, Month::December);
  }

  #[test]
  fn invalid_start_month_is_an_error() {
    assert!(matches!(
      RosterSnapshot::fresh(2025, 12, &NoLookup),
      Err(Error::InvalidMonth(12))
    ));
  }

  #[test]
  fn json_round_trip_is_exact() {
    let mut snap = RosterSnapshot::fresh(2025, 0, &NoLookup).unwrap();
    snap.months[0].rows[0].set_text(Role::ScriptureReading, 0, "Ann");
    snap.months[1].rows[2].merge();
    let json = serde_json::to_string(&snap).unwrap();
    let back: RosterSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
  }

  #[test]
  fn clear_blanks_everything() {
    let mut snap = RosterSnapshot::fresh(2025, 0, &NoLookup).unwrap();
    snap.months[0].rows[0].set_text(Role::OpeningPrayer, 0, "Ann");
    snap.months[0].rows[1].merge();
    snap.clear();
    assert!(snap.months.iter().flat_map(|m| &m.rows).all(|r| !r.is_merged()));
    assert!(snap.months[0].duplicates().is_empty());
    assert_eq!(snap.months[0].rows[0].cell(Role::OpeningPrayer, 0).unwrap().to_string(), "");
  }
}

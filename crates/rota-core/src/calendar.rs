//! Calendar generation: the service days of a month.

use chrono::{Datelike, Days, Month, NaiveDate, Weekday};

use crate::{Error, Result};

/// The weekday every roster slot falls on.
pub const SERVICE_DAY: Weekday = Weekday::Sun;

/// Every [`SERVICE_DAY`] in the month, ascending.
///
/// `month_index` is zero-based. An out-of-range month or year yields an empty
/// list.
pub fn service_days(month_index: u32, year: i32) -> Vec<NaiveDate> {
  weekdays_in_month(SERVICE_DAY, month_index, year)
}

/// Every `weekday` in the month, ascending.
pub fn weekdays_in_month(
  weekday: Weekday,
  month_index: u32,
  year: i32,
) -> Vec<NaiveDate> {
  let Some(first) = month_index
    .checked_add(1)
    .and_then(|m| NaiveDate::from_ymd_opt(year, m, 1))
  else {
    return Vec::new();
  };
  let offset = (7 + weekday.num_days_from_monday()
    - first.weekday().num_days_from_monday())
    % 7;
  let Some(start) = first.checked_add_days(Days::new(u64::from(offset))) else {
    return Vec::new();
  };
  start
    .iter_weeks()
    .take_while(|d| d.month() == first.month())
    .collect()
}

/// `Month` for a zero-based index.
pub fn month_from_index(month_index: u32) -> Result<Month> {
  month_index
    .checked_add(1)
    .and_then(|n| u8::try_from(n).ok())
    .and_then(|n| Month::try_from(n).ok())
    .ok_or(Error::InvalidMonth(month_index))
}

/// Zero-based index of a `Month`.
pub fn month_index(month: Month) -> u32 { month.number_from_month() - 1 }

// ─── Date keys ───────────────────────────────────────────────────────────────

const LOOKUP_FORMAT: &str = "%d-%m-%Y";

/// `DD-MM-YYYY`, the key the scripture lookup is indexed by.
pub fn lookup_key(date: NaiveDate) -> String {
  date.format(LOOKUP_FORMAT).to_string()
}

pub fn parse_lookup_key(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), LOOKUP_FORMAT).map_err(|_| {
    Error::InvalidDate {
      what:   "lookup date",
      value:  s.to_string(),
      format: "DD-MM-YYYY",
    }
  })
}

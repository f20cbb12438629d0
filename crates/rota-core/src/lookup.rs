//! Scripture and theme lookup.
//!
//! Reading content is curated outside the roster and keyed by date. Absence
//! is normal: plenty of Sundays have no curated entry, and their content
//! fields stay blank.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, calendar::parse_lookup_key};

/// One passage with its memory verse and, optionally, the message theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scripture {
  #[serde(default)]
  pub passage:       String,
  #[serde(default)]
  pub mv:            String,
  #[serde(
    default,
    rename = "messageTheme",
    skip_serializing_if = "Option::is_none"
  )]
  pub message_theme: Option<String>,
}

/// The curated content for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
  pub date:       NaiveDate,
  pub scriptures: Vec<Scripture>,
}

/// Read-only source of curated content.
pub trait ScriptureLookup {
  /// The entry for `date` in the `year` collection, if any.
  fn lookup(&self, year: i32, date: NaiveDate) -> Option<&LookupEntry>;
}

/// A lookup with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl ScriptureLookup for NoLookup {
  fn lookup(&self, _year: i32, _date: NaiveDate) -> Option<&LookupEntry> {
    None
  }
}

// ─── Derived content ─────────────────────────────────────────────────────────

/// What a lookup entry contributes to a row's content fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupContent {
  pub passages: [String; 2],
  pub verses:   [String; 2],
  pub theme:    Option<String>,
}

impl LookupContent {
  /// Take the first two scriptures in order; with only one, the second place
  /// stays empty. The theme comes from the first scripture that has a
  /// non-empty one.
  pub fn from_entry(entry: &LookupEntry) -> Self {
    let mut content = Self::default();
    for (i, s) in entry.scriptures.iter().take(2).enumerate() {
      content.passages[i] = s.passage.clone();
      content.verses[i] = s.mv.clone();
    }
    content.theme = entry
      .scriptures
      .iter()
      .filter_map(|s| s.message_theme.as_deref())
      .find(|t| !t.is_empty())
      .map(str::to_owned);
    content
  }

  /// Passages as flat text: `"first, second"`, or just the first when there
  /// is no second.
  pub fn joined_passages(&self) -> String { join_pair(&self.passages) }

  pub fn joined_verses(&self) -> String { join_pair(&self.verses) }
}

fn join_pair([a, b]: &[String; 2]) -> String {
  if b.is_empty() { a.clone() } else { format!("{a}, {b}") }
}

// ─── In-memory lookup ────────────────────────────────────────────────────────

/// Curated content for several years, loaded from the scripture-portion JSON
/// file.
#[derive(Debug, Clone, Default)]
pub struct ScripturePortions {
  by_year: BTreeMap<i32, BTreeMap<NaiveDate, LookupEntry>>,
}

impl ScripturePortions {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, year: i32, entry: LookupEntry) {
    self.by_year.entry(year).or_default().insert(entry.date, entry);
  }

  pub fn len(&self) -> usize { self.by_year.values().map(BTreeMap::len).sum() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Parse the scripture-portion file.
  ///
  /// ```json
  /// { "scripturePortions": { "2025": [
  ///   { "date": "06-07-2025",
  ///     "scriptures": [{ "passage": "...", "mv": "...", "messageTheme": "..." }] }
  /// ] } }
  /// ```
  pub fn from_json(input: &str) -> Result<Self> {
    let raw: RawPortions = serde_json::from_str(input)?;
    let mut portions = Self::new();
    for (year, entries) in raw.scripture_portions {
      let year: i32 = year.trim().parse().map_err(|_| Error::InvalidDate {
        what:   "lookup year",
        value:  year.clone(),
        format: "YYYY",
      })?;
      for entry in entries {
        portions.insert(year, LookupEntry {
          date:       parse_lookup_key(&entry.date)?,
          scriptures: entry.scriptures,
        });
      }
    }
    Ok(portions)
  }
}

impl ScriptureLookup for ScripturePortions {
  fn lookup(&self, year: i32, date: NaiveDate) -> Option<&LookupEntry> {
    self.by_year.get(&year)?.get(&date)
  }
}

#[derive(Deserialize)]
struct RawPortions {
  #[serde(rename = "scripturePortions", default)]
  scripture_portions: HashMap<String, Vec<RawEntry>>,
}

#[derive(Deserialize)]
struct RawEntry {
  date:       String,
  #[serde(default)]
  scriptures: Vec<Scripture>,
}

//! The fixed set of roster columns.
//!
//! Every column after the date is a [`Role`]. Five of them are duties filled
//! by the assignment engine; the rest are content fields filled from the
//! scripture lookup or typed by hand.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::Error;

/// One roster column. Declaration order is display and print order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
pub enum Role {
  #[serde(rename = "Opening Prayer")]
  #[strum(serialize = "Opening Prayer")]
  OpeningPrayer,
  #[serde(rename = "Praise & Worship")]
  #[strum(serialize = "Praise & Worship")]
  PraiseWorship,
  #[serde(rename = "Scripture Passage")]
  #[strum(serialize = "Scripture Passage")]
  ScripturePassage,
  #[serde(rename = "MV")]
  #[strum(serialize = "MV")]
  Mv,
  #[serde(rename = "Scripture Reading")]
  #[strum(serialize = "Scripture Reading")]
  ScriptureReading,
  #[serde(rename = "Message Theme")]
  #[strum(serialize = "Message Theme")]
  MessageTheme,
  #[serde(rename = "Message")]
  #[strum(serialize = "Message")]
  Message,
  #[serde(rename = "Intercessory Prayer")]
  #[strum(serialize = "Intercessory Prayer")]
  IntercessoryPrayer,
  #[serde(rename = "Offertory Prayer")]
  #[strum(serialize = "Offertory Prayer")]
  OffertoryPrayer,
}

impl Role {
  /// Duties the engine fills, in the order it fills them for each slot.
  pub const ASSIGNABLE: [Role; 5] = [
    Role::OpeningPrayer,
    Role::PraiseWorship,
    Role::ScriptureReading,
    Role::IntercessoryPrayer,
    Role::OffertoryPrayer,
  ];

  /// Column heading, e.g. `"Praise & Worship"`.
  pub fn heading(self) -> &'static str { self.into() }

  pub fn is_assignable(self) -> bool { Self::ASSIGNABLE.contains(&self) }

  /// Whether the column holds two ordered values instead of one.
  pub fn is_pair(self) -> bool {
    matches!(self, Self::ScriptureReading | Self::ScripturePassage | Self::Mv)
  }

  /// How many people the engine places in this column per slot; zero for
  /// content fields.
  pub fn required_slots(self) -> usize {
    match self {
      Self::ScriptureReading => 2,
      r if r.is_assignable() => 1,
      _ => 0,
    }
  }
}

/// Accepts a heading in any case, or a role-list file key such as
/// `"praiseandworship"`.
impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase();
    let by_key = match wanted.as_str() {
      "openingprayer" => Some(Self::OpeningPrayer),
      "praiseandworship" => Some(Self::PraiseWorship),
      "reading" | "sevinisunday" => Some(Self::ScriptureReading),
      "intercessory" => Some(Self::IntercessoryPrayer),
      "offertoryprayer" => Some(Self::OffertoryPrayer),
      _ => None,
    };
    by_key
      .or_else(|| Self::iter().find(|r| r.heading().to_lowercase() == wanted))
      .ok_or_else(|| Error::UnknownRole(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headings_follow_print_order() {
    let headings: Vec<_> = Role::iter().map(Role::heading).collect();
    assert_eq!(headings, [
      "Opening Prayer",
      "Praise & Worship",
      "Scripture Passage",
      "MV",
      "Scripture Reading",
      "Message Theme",
      "Message",
      "Intercessory Prayer",
      "Offertory Prayer",
    ]);
  }

  #[test]
  fn required_slots_per_role() {
    assert_eq!(Role::ScriptureReading.required_slots(), 2);
    assert_eq!(Role::OpeningPrayer.required_slots(), 1);
    assert_eq!(Role::OffertoryPrayer.required_slots(), 1);
    assert_eq!(Role::Mv.required_slots(), 0);
    assert_eq!(Role::Message.required_slots(), 0);
  }

  #[test]
  fn serde_uses_headings() {
    let json = serde_json::to_string(&Role::PraiseWorship).unwrap();
    assert_eq!(json, "\"Praise & Worship\"");
    let back: Role = serde_json::from_str("\"MV\"").unwrap();
    assert_eq!(back, Role::Mv);
  }

  #[test]
  fn parse_headings_and_file_keys() {
    assert_eq!("praise & worship".parse::<Role>().unwrap(), Role::PraiseWorship);
    assert_eq!(" reading ".parse::<Role>().unwrap(), Role::ScriptureReading);
    assert_eq!("mv".parse::<Role>().unwrap(), Role::Mv);
    assert!(matches!("Date".parse::<Role>(), Err(Error::UnknownRole(s)) if s == "Date"));
  }
}

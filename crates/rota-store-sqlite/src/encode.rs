//! Encoding and decoding helpers between roster snapshots and the plain-text
//! columns stored in SQLite.
//!
//! Timestamps are stored as RFC 3339 strings. The snapshot body is compact
//! JSON with `saved_at` removed, since that lives in its own column.

use chrono::{DateTime, Utc};
use rota_core::snapshot::RosterSnapshot;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

pub fn encode_snapshot(snapshot: &RosterSnapshot) -> Result<String> {
  let body = RosterSnapshot {
    saved_at: None,
    ..snapshot.clone()
  };
  Ok(serde_json::to_string(&body)?)
}

/// Raw row from the `snapshots` table.
pub struct RawSnapshot {
  pub year:          i32,
  pub snapshot_json: String,
  pub saved_at:      String,
}

impl RawSnapshot {
  pub fn into_snapshot(self) -> Result<RosterSnapshot> {
    let mut snapshot: RosterSnapshot = serde_json::from_str(&self.snapshot_json)?;
    if snapshot.year != self.year {
      return Err(Error::YearMismatch {
        row:  self.year,
        body: snapshot.year,
      });
    }
    snapshot.saved_at = Some(decode_dt(&self.saved_at)?);
    Ok(snapshot)
  }
}

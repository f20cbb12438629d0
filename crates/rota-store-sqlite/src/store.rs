//! [`SqliteStore`], the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rota_core::{snapshot::RosterSnapshot, store::RosterStore};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{RawSnapshot, encode_dt, encode_snapshot},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the database file at `path`, creating it and its table if needed.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  async fn save(&self, snapshot: RosterSnapshot) -> Result<RosterSnapshot> {
    let saved_at = Utc::now();
    let year = snapshot.year;
    let json = encode_snapshot(&snapshot)?;
    let at_str = encode_dt(saved_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO snapshots (year, snapshot_json, saved_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(year) DO UPDATE SET
             snapshot_json = excluded.snapshot_json,
             saved_at      = excluded.saved_at",
          rusqlite::params![year, json, at_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(year, "roster saved");
    Ok(RosterSnapshot {
      saved_at: Some(saved_at),
      ..snapshot
    })
  }

  async fn load(&self, year: i32) -> Result<Option<RosterSnapshot>> {
    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT year, snapshot_json, saved_at FROM snapshots WHERE year = ?1",
            rusqlite::params![year],
            |row| {
              Ok(RawSnapshot {
                year:          row.get(0)?,
                snapshot_json: row.get(1)?,
                saved_at:      row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSnapshot::into_snapshot).transpose()
  }

  async fn years(&self) -> Result<Vec<i32>> {
    let years = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT year FROM snapshots ORDER BY year")?;
        let years = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i32>>>()?;
        Ok(years)
      })
      .await?;
    Ok(years)
  }
}

//! Error type for `rota-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The stored JSON names a different year than the row it was saved under.
  #[error("snapshot stored under {row} claims year {body}")]
  YearMismatch { row: i32, body: i32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `rota-core`.
//!
//! Only data-file parsing and caller-supplied constructor arguments can fail.
//! Generation, selection, duplicate checking and merging never return errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("month index out of range: {0} (expected 0-11)")]
  InvalidMonth(u32),

  #[error("invalid {what} {value:?}: expected {format}")]
  InvalidDate {
    what:   &'static str,
    value:  String,
    format: &'static str,
  },

  #[error("unknown roster column: {0:?}")]
  UnknownRole(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

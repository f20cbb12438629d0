//! Handlers for row-level operations. None of them touch the store.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/duplicates` | Body: `{"rows":[...]}` for one month; row index to flagged columns |
//! | `POST` | `/rows/merge` | Body: one unmerged row; 400 if already merged |
//! | `POST` | `/rows/unmerge` | Body: one merged row; 400 if not merged |

use axum::Json;
use rota_core::{
  duplicates::{DuplicateFlags, find_duplicates},
  row::RosterRow,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RowsBody {
  pub rows: Vec<RosterRow>,
}

/// `POST /duplicates`
pub async fn duplicates(Json(body): Json<RowsBody>) -> Json<DuplicateFlags> {
  Json(find_duplicates(&body.rows))
}

/// `POST /rows/merge`
pub async fn merge(Json(mut row): Json<RosterRow>) -> Result<Json<RosterRow>, ApiError> {
  row.normalize();
  if !row.merge() {
    return Err(ApiError::BadRequest(format!("row {} is already merged", row.id)));
  }
  Ok(Json(row))
}

/// `POST /rows/unmerge`
pub async fn unmerge(Json(mut row): Json<RosterRow>) -> Result<Json<RosterRow>, ApiError> {
  if !row.unmerge() {
    return Err(ApiError::BadRequest(format!("row {} is not merged", row.id)));
  }
  Ok(Json(row))
}

//! Name suggestions for hand-editing.
//!
//! `GET /people?q=<text>[&role=<heading or role-list key>]`

use axum::{
  Json,
  extract::{Query, State},
};
use rota_core::{role::Role, store::RosterStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Suggestions returned per query.
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
  #[serde(default)]
  pub q:    String,
  pub role: Option<String>,
}

/// `GET /people`
pub async fn suggest<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: RosterStore,
{
  let names = match params.role {
    Some(role) => {
      let role: Role = role.parse()?;
      if !role.is_assignable() {
        return Err(ApiError::BadRequest(format!("{role} is not a duty people are assigned to")));
      }
      state.pools.suggest_for(role, &params.q, SUGGESTION_LIMIT)
    }
    None => state.pools.suggest(&params.q, SUGGESTION_LIMIT),
  };
  Ok(Json(names))
}

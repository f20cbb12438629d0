//! Handlers for `/rosters` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/rosters/{year}` | Stored roster, or a fresh default when none is usable |
//! | `PUT`  | `/rosters/{year}` | Body: snapshot; 400 if its year differs |
//! | `POST` | `/rosters/{year}/generate` | Body: snapshot; 409 while another run is in flight; not saved |
//! | `POST` | `/rosters/{year}/reset` | Body: snapshot; every row blanked; not saved |
//! | `POST` | `/rosters/{year}/render` | Body: snapshot; `text/plain` document |

use axum::{
  Json,
  extract::{Path, State},
};
use rota_core::{
  engine::Engine,
  render::{RosterRenderer as _, TextRenderer},
  snapshot::{RosterSnapshot, WINDOW_MONTHS},
  store::RosterStore,
  summary::GenerationSummary,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

fn check_year(year: i32, snapshot: &RosterSnapshot) -> Result<(), ApiError> {
  if snapshot.year != year {
    return Err(ApiError::BadRequest(format!(
      "roster is for {}, not {year}",
      snapshot.year
    )));
  }
  Ok(())
}

// ─── Load / save ──────────────────────────────────────────────────────────────

/// `GET /rosters/{year}`
///
/// A store failure is logged and answered with the default roster, the same
/// as a year that was never saved.
pub async fn load<S>(
  State(state): State<AppState<S>>,
  Path(year): Path<i32>,
) -> Result<Json<RosterSnapshot>, ApiError>
where
  S: RosterStore,
{
  let stored = match state.store.load(year).await {
    Ok(found) => found,
    Err(e) => {
      warn!(year, error = %e, "failed to load roster, using defaults");
      None
    }
  };

  let snapshot = match stored {
    Some(mut snapshot) if snapshot.months.len() == WINDOW_MONTHS as usize => {
      snapshot.normalize();
      snapshot
    }
    Some(snapshot) => {
      warn!(year, months = snapshot.months.len(), "stored roster has the wrong window, using defaults");
      state.defaults.fresh(year, &state.lookup)?
    }
    None => state.defaults.fresh(year, &state.lookup)?,
  };
  Ok(Json(snapshot))
}

/// `PUT /rosters/{year}`
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Path(year): Path<i32>,
  Json(mut snapshot): Json<RosterSnapshot>,
) -> Result<Json<RosterSnapshot>, ApiError>
where
  S: RosterStore,
{
  check_year(year, &snapshot)?;
  snapshot.normalize();
  let saved = state
    .store
    .save(snapshot)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  info!(year, "roster saved");
  Ok(Json(saved))
}

// ─── Generate ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Generated {
  pub snapshot: RosterSnapshot,
  pub summary:  GenerationSummary,
  /// The summary as text, ready to show.
  pub message:  String,
}

/// `POST /rosters/{year}/generate`
pub async fn generate<S>(
  State(state): State<AppState<S>>,
  Path(year): Path<i32>,
  Json(mut snapshot): Json<RosterSnapshot>,
) -> Result<Json<Generated>, ApiError>
where
  S: RosterStore,
{
  check_year(year, &snapshot)?;
  let claim = state
    .try_claim_generator()
    .ok_or_else(|| ApiError::Busy("a roster is already being generated".into()))?;

  snapshot.normalize();
  let pools = state.pools.clone();
  let lookup = state.lookup.clone();
  let generated = tokio::task::spawn_blocking(move || {
    // Held until the run ends, even if the request is dropped first.
    let _claim = claim;
    let mut rng = rand::thread_rng();
    let out = Engine::new(&pools, &*lookup).generate(year, &snapshot.months, &mut rng);
    (snapshot, out)
  })
  .await
  .map_err(|e| ApiError::Internal(format!("generation task failed: {e}")))?;

  let (snapshot, out) = generated;
  let message = out.summary.to_string();
  Ok(Json(Generated {
    snapshot: RosterSnapshot {
      months: out.months,
      ..snapshot
    },
    summary: out.summary,
    message,
  }))
}

// ─── Reset / render ───────────────────────────────────────────────────────────

/// `POST /rosters/{year}/reset`
pub async fn reset(
  Path(year): Path<i32>,
  Json(mut snapshot): Json<RosterSnapshot>,
) -> Result<Json<RosterSnapshot>, ApiError> {
  check_year(year, &snapshot)?;
  snapshot.clear();
  Ok(Json(snapshot))
}

/// `POST /rosters/{year}/render`
pub async fn render(
  Path(year): Path<i32>,
  Json(mut snapshot): Json<RosterSnapshot>,
) -> Result<String, ApiError> {
  check_year(year, &snapshot)?;
  snapshot.normalize();
  Ok(TextRenderer.render(&snapshot))
}

//! JSON API for the rota duty roster.
//!
//! Exposes an axum [`Router`] backed by any [`rota_core::store::RosterStore`].
//! Rosters are edited client-side; the API loads and saves them, runs the
//! assignment engine, and offers the pure roster operations (duplicate check,
//! merge, reset, render) so clients need not reimplement them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rota_api::api_router(state))
//! ```

pub mod error;
pub mod people;
pub mod rosters;
pub mod rows;

use std::{
  collections::BTreeMap,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use axum::{
  Router,
  routing::{get, post},
};
use rota_core::{
  lookup::ScripturePortions,
  pool::EligibilityPools,
  snapshot::{DEFAULT_BG_COLOR, DEFAULT_TEXT_COLOR, RosterSnapshot},
  store::RosterStore,
};

pub use error::ApiError;

// ─── Defaults ─────────────────────────────────────────────────────────────────

/// How a year's roster looks before anything was saved.
#[derive(Debug, Clone)]
pub struct RosterDefaults {
  /// Zero-based first month of the window for years not listed below.
  pub window_start:  u32,
  pub window_starts: BTreeMap<i32, u32>,
  pub bg_color:      String,
  pub text_color:    String,
}

impl Default for RosterDefaults {
  fn default() -> Self {
    Self {
      window_start:  0,
      window_starts: BTreeMap::new(),
      bg_color:      DEFAULT_BG_COLOR.to_string(),
      text_color:    DEFAULT_TEXT_COLOR.to_string(),
    }
  }
}

impl RosterDefaults {
  pub fn window_start(&self, year: i32) -> u32 {
    self.window_starts.get(&year).copied().unwrap_or(self.window_start)
  }

  /// A blank roster for `year` with lookup content applied.
  pub fn fresh(&self, year: i32, lookup: &ScripturePortions) -> rota_core::Result<RosterSnapshot> {
    let mut snapshot = RosterSnapshot::fresh(year, self.window_start(year), lookup)?;
    snapshot.bg_color = self.bg_color.clone();
    snapshot.text_color = self.text_color.clone();
    Ok(snapshot)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub pools:      Arc<EligibilityPools>,
  pub lookup:     Arc<ScripturePortions>,
  pub defaults:   Arc<RosterDefaults>,
  /// Set while a generation run is in flight.
  pub generating: Arc<AtomicBool>,
}

impl<S> AppState<S> {
  pub fn new(
    store: Arc<S>,
    pools: EligibilityPools,
    lookup: ScripturePortions,
    defaults: RosterDefaults,
  ) -> Self {
    Self {
      store,
      pools: Arc::new(pools),
      lookup: Arc::new(lookup),
      defaults: Arc::new(defaults),
      generating: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Claim the generator, or `None` if a run is already in flight. The claim
  /// is released when the guard drops.
  pub fn try_claim_generator(&self) -> Option<GeneratorGuard> {
    self
      .generating
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| GeneratorGuard(self.generating.clone()))
  }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      pools:      self.pools.clone(),
      lookup:     self.lookup.clone(),
      defaults:   self.defaults.clone(),
      generating: self.generating.clone(),
    }
  }
}

/// Holds the generator claim.
#[derive(Debug)]
pub struct GeneratorGuard(Arc<AtomicBool>);

impl Drop for GeneratorGuard {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The state is applied here, so the result nests under a parent router of
/// any state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Rosters
    .route("/rosters/{year}", get(rosters::load::<S>).put(rosters::save::<S>))
    .route("/rosters/{year}/generate", post(rosters::generate::<S>))
    .route("/rosters/{year}/reset", post(rosters::reset))
    .route("/rosters/{year}/render", post(rosters::render))
    // Rows
    .route("/duplicates", post(rows::duplicates))
    .route("/rows/merge", post(rows::merge))
    .route("/rows/unmerge", post(rows::unmerge))
    // People
    .route("/people", get(people::suggest::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;

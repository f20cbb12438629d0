//! Router tests against an in-memory store.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
  Json,
  body::Body,
  extract::{Path, State},
  http::{Request, StatusCode, header},
};
use rota_core::{
  lookup::ScripturePortions,
  pool::EligibilityPools,
  role::Role,
  row::RosterRow,
  snapshot::RosterSnapshot,
  store::RosterStore,
};
use rota_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, RosterDefaults, api_router};

const ROLE_LIST: &str = r#"{
  "openingprayer":    [{ "name": "anna" }, { "name": "ben" }, { "name": "cara" }, { "name": "dan" }, { "name": "eve" }],
  "praiseandworship": [{ "name": "choir" }, { "name": "youth band" }],
  "reading":          [{ "name": "faith" }, { "name": "gabe" }],
  "intercessory":     [{ "name": "hana" }],
  "offertoryprayer":  [{ "name": "ian" }, { "name": "jo" }],
  "sevinisunday":     { "kids": [{ "name": "kit" }, { "name": "lia" }], "adults": [{ "name": "Mary Ann" }] }
}"#;

fn defaults() -> RosterDefaults {
  RosterDefaults {
    window_starts: BTreeMap::from([(2025, 6)]),
    ..RosterDefaults::default()
  }
}

async fn state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(
    Arc::new(store),
    EligibilityPools::from_json(ROLE_LIST).unwrap(),
    ScripturePortions::new(),
    defaults(),
  )
}

async fn send<S>(
  state: AppState<S>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Vec<u8>)
where
  S: RosterStore + 'static,
{
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, bytes.to_vec())
}

fn json_of<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> T {
  serde_json::from_slice(bytes).unwrap()
}

async fn default_roster(state: &AppState<SqliteStore>) -> RosterSnapshot {
  let (status, body) = send(state.clone(), "GET", "/rosters/2025", None).await;
  assert_eq!(status, StatusCode::OK);
  json_of(&body)
}

// ── Load / save ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn unsaved_year_gets_the_default_window() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let months: Vec<_> = snap.months.iter().map(|m| m.month.name()).collect();
  assert_eq!(months, ["July", "August", "September"]);
  assert_eq!(snap.months[0].rows.len(), 4);
  assert_eq!(snap.bg_color, "#0a2942");
  assert!(snap.saved_at.is_none());
}

#[tokio::test]
async fn put_then_get_round_trips() {
  let state = state().await;
  let mut snap = default_roster(&state).await;
  snap.months[0].rows[0].set_text(Role::OpeningPrayer, 0, "Anna");
  snap.text_color = "#000000".into();

  let (status, body) = send(
    state.clone(),
    "PUT",
    "/rosters/2025",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let saved: RosterSnapshot = json_of(&body);
  assert!(saved.saved_at.is_some());

  let loaded = default_roster(&state).await;
  assert_eq!(loaded.months, snap.months);
  assert_eq!(loaded.text_color, "#000000");
}

#[tokio::test]
async fn put_rejects_another_year() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let (status, body) = send(
    state,
    "PUT",
    "/rosters/2026",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let err: Value = json_of(&body);
  assert!(err["error"].as_str().unwrap().contains("2025"));
}

#[tokio::test]
async fn load_repairs_field_shapes() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let mut raw = serde_json::to_value(&snap).unwrap();
  let fields = &mut raw["months"][0]["rows"][0]["body"]["fields"];
  fields["Scripture Reading"] = json!("Solo");
  fields.as_object_mut().unwrap().remove("Message");
  state.store.save(serde_json::from_value(raw).unwrap()).await.unwrap();

  let loaded = default_roster(&state).await;
  let row = &loaded.months[0].rows[0];
  assert_eq!(row.cell(Role::ScriptureReading, 0).unwrap().as_text(), Some("Solo"));
  assert!(row.cell(Role::ScriptureReading, 1).unwrap().is_blank());
  assert!(row.cell(Role::Message, 0).unwrap().is_blank());
}

struct BrokenStore;

impl RosterStore for BrokenStore {
  type Error = std::io::Error;

  async fn save(&self, _snapshot: RosterSnapshot) -> Result<RosterSnapshot, Self::Error> {
    Err(std::io::Error::other("disk on fire"))
  }

  async fn load(&self, _year: i32) -> Result<Option<RosterSnapshot>, Self::Error> {
    Err(std::io::Error::other("disk on fire"))
  }

  async fn years(&self) -> Result<Vec<i32>, Self::Error> { Ok(Vec::new()) }
}

#[tokio::test]
async fn store_failures_fall_back_on_load_and_surface_on_save() {
  let state = AppState::new(
    Arc::new(BrokenStore),
    EligibilityPools::new(),
    ScripturePortions::new(),
    defaults(),
  );
  let (status, body) = send(state.clone(), "GET", "/rosters/2025", None).await;
  assert_eq!(status, StatusCode::OK);
  let snap: RosterSnapshot = json_of(&body);
  assert_eq!(snap.months.len(), 3);

  let (status, _) = send(
    state,
    "PUT",
    "/rosters/2025",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Generate ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_fills_every_duty_without_saving() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let (status, body) = send(
    state.clone(),
    "POST",
    "/rosters/2025/generate",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let out: Value = json_of(&body);
  let generated: RosterSnapshot = serde_json::from_value(out["snapshot"].clone()).unwrap();
  for row in generated.months.iter().flat_map(|m| &m.rows) {
    for role in Role::ASSIGNABLE {
      for i in 0..role.required_slots() {
        let cell = row.cell(role, i).unwrap();
        assert!(cell.as_text().is_some_and(|t| !t.is_empty()), "{role} {i}");
      }
    }
  }
  assert_eq!(out["summary"]["placeholders"], 0);
  assert!(out["message"].as_str().unwrap().starts_with("Auto-generation completed!"));
  assert!(state.store.load(2025).await.unwrap().is_none());
  assert!(!state.generating.load(std::sync::atomic::Ordering::Acquire));
}

#[tokio::test]
async fn generate_refuses_while_busy() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let _claim = state.try_claim_generator().unwrap();
  let (status, body) = send(
    state.clone(),
    "POST",
    "/rosters/2025/generate",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  let err: Value = json_of(&body);
  assert!(err["error"].as_str().unwrap().contains("already"));
}

#[test]
fn generator_claim_is_released_on_drop() {
  let state = AppState::new(
    Arc::new(BrokenStore),
    EligibilityPools::new(),
    ScripturePortions::new(),
    RosterDefaults::default(),
  );
  let claim = state.try_claim_generator();
  assert!(claim.is_some());
  assert!(state.try_claim_generator().is_none());
  drop(claim);
  assert!(state.try_claim_generator().is_some());
}

#[tokio::test]
async fn dropped_generate_request_keeps_the_claim_until_the_run_ends() {
  let names: Vec<Value> = (0..500).map(|i| json!({ "name": format!("person {i}") })).collect();
  let pools = EligibilityPools::from_json(&json!({ "openingprayer": names }).to_string()).unwrap();
  let lookup = ScripturePortions::new();
  let state = AppState::new(Arc::new(BrokenStore), pools, lookup.clone(), defaults());
  let mut snap = defaults().fresh(2025, &lookup).unwrap();
  for month in &mut snap.months {
    for _ in 0..20 {
      month.add_row();
    }
  }

  let request = crate::rosters::generate(State(state.clone()), Path(2025), Json(snap));
  let outcome = tokio::time::timeout(Duration::ZERO, request).await;
  assert!(outcome.is_err(), "the run should still be going");
  assert!(state.try_claim_generator().is_none());

  let mut released = None;
  for _ in 0..600 {
    released = state.try_claim_generator();
    if released.is_some() {
      break;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
  }
  assert!(released.is_some());
}

// ── Reset / render ────────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_blanks_rows_and_keeps_dates() {
  let state = state().await;
  let mut snap = default_roster(&state).await;
  snap.months[1].rows[0].set_text(Role::OpeningPrayer, 0, "Anna");
  snap.months[1].rows[1].merge();
  let (status, body) = send(
    state,
    "POST",
    "/rosters/2025/reset",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let cleared: RosterSnapshot = json_of(&body);
  let august = &cleared.months[1];
  assert!(august.rows[0].cell(Role::OpeningPrayer, 0).unwrap().is_blank());
  assert!(!august.rows[1].is_merged());
  assert_eq!(august.rows[1].date, snap.months[1].rows[1].date);
}

#[tokio::test]
async fn render_returns_plain_text() {
  let state = state().await;
  let snap = default_roster(&state).await;
  let (status, body) = send(
    state,
    "POST",
    "/rosters/2025/render",
    Some(serde_json::to_value(&snap).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let text = String::from_utf8(body).unwrap();
  assert!(text.starts_with("Order of Sunday : July - September"));
  assert!(text.contains("| 06-07-2025 |"));
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicates_flag_both_rows() {
  let state = state().await;
  let mut a = RosterRow::new(None);
  let mut b = RosterRow::new(None);
  a.set_text(Role::OpeningPrayer, 0, "John Doe");
  b.set_text(Role::OpeningPrayer, 0, " john doe");
  let (status, body) = send(
    state,
    "POST",
    "/duplicates",
    Some(json!({ "rows": [a, b] })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let flags: Value = json_of(&body);
  assert_eq!(flags, json!({ "0": ["Opening Prayer"], "1": ["Opening Prayer"] }));
}

#[tokio::test]
async fn merge_then_unmerge_restores_the_row() {
  let state = state().await;
  let mut row = RosterRow::new(None);
  row.set_text(Role::OpeningPrayer, 0, "Anna");
  row.set_text(Role::ScriptureReading, 1, "Ben");

  let (status, body) = send(
    state.clone(),
    "POST",
    "/rows/merge",
    Some(serde_json::to_value(&row).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let merged: RosterRow = json_of(&body);
  assert_eq!(merged.merged_content(), Some("Anna | Ben"));

  let (status, _) = send(
    state.clone(),
    "POST",
    "/rows/merge",
    Some(serde_json::to_value(&merged).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = send(
    state,
    "POST",
    "/rows/unmerge",
    Some(serde_json::to_value(&merged).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let restored: RosterRow = json_of(&body);
  assert_eq!(restored, row);
}

// ── People ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn people_suggestions() {
  let state = state().await;
  let (status, body) = send(state.clone(), "GET", "/people?q=AN", None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<String> = json_of(&body);
  assert_eq!(names, ["Anna", "Dan", "Hana", "Ian", "Mary Ann"]);

  let (_, body) = send(state.clone(), "GET", "/people?q=a&role=reading", None).await;
  let names: Vec<String> = json_of(&body);
  assert_eq!(names, ["Faith", "Gabe", "Lia"]);

  let (status, _) = send(state, "GET", "/people?q=a&role=usher", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn people_suggestions_refuse_content_columns() {
  let state = state().await;
  for role in ["MV", "Scripture%20Passage", "Message%20Theme"] {
    let uri = format!("/people?q=a&role={role}");
    let (status, body) = send(state.clone(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{role}");
    let err: Value = json_of(&body);
    assert!(err["error"].as_str().unwrap().contains("not a duty"));
  }
}

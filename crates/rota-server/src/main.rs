//! rota server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), loads the
//! eligibility pools and scripture portions, opens an in-process SQLite store,
//! and serves the roster API under `/api`.
//!
//! # Printing a roster
//!
//! To print a year's stored roster (or its default) as text and exit:
//!
//! ```sh
//! cargo run -p rota-server -- --print 2025
//! ```

mod config;

use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use rota_api::{AppState, RosterDefaults};
use rota_core::{
  lookup::ScripturePortions,
  pool::EligibilityPools,
  render::{RosterRenderer as _, TextRenderer},
  store::RosterStore as _,
};
use rota_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "rota duty roster server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,

  /// Print the roster for a year as text and exit.
  #[arg(long, value_name = "YEAR")]
  print: Option<i32>,

  /// List the years with a saved roster and exit.
  #[arg(long)]
  years: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("ROTA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  let defaults = server_cfg.roster_defaults()?;

  // Load data files.
  let pools_path = expand_tilde(&server_cfg.pools_path);
  let pools = EligibilityPools::from_json(&read(&pools_path)?)
    .with_context(|| format!("failed to parse role list {pools_path:?}"))?;

  let lookup = match &server_cfg.scripture_path {
    Some(path) => {
      let path = expand_tilde(path);
      ScripturePortions::from_json(&read(&path)?)
        .with_context(|| format!("failed to parse scripture portions {path:?}"))?
    }
    None => ScripturePortions::new(),
  };
  tracing::info!(
    people = pools.all_keys().len(),
    scripture_entries = lookup.len(),
    "data files loaded"
  );

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper modes.
  if cli.years {
    for year in store.years().await.context("failed to list years")? {
      println!("{year}");
    }
    return Ok(());
  }
  if let Some(year) = cli.print {
    print_roster(&store, &defaults, &lookup, year).await?;
    return Ok(());
  }

  let state = AppState::new(Arc::new(store), pools, lookup, defaults);
  let app = Router::new()
    .nest("/api", rota_api::api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))
}

/// Print the stored roster for `year`, or the default one if none was saved.
async fn print_roster(
  store: &SqliteStore,
  defaults: &RosterDefaults,
  lookup: &ScripturePortions,
  year: i32,
) -> anyhow::Result<()> {
  let snapshot = match store.load(year).await.context("failed to load roster")? {
    Some(mut snapshot) => {
      snapshot.normalize();
      snapshot
    }
    None => {
      tracing::warn!(year, "no saved roster, printing the default");
      defaults.fresh(year, lookup)?
    }
  };
  print!("{}", TextRenderer.render(&snapshot));
  Ok(())
}

//! Runtime server configuration, deserialised from `config.toml` layered with
//! `ROTA_*` environment variables.
//!
//! ```toml
//! host           = "127.0.0.1"
//! port           = 8080
//! store_path     = "~/.local/share/rota/rota.db"
//! pools_path     = "data/roleList.json"
//! scripture_path = "data/scripturePortions.json"
//!
//! default_window_start = 0   # January
//!
//! [window_starts]
//! 2025 = 6                   # July
//! ```

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use rota_api::RosterDefaults;
use rota_core::{
  calendar::month_from_index,
  snapshot::{DEFAULT_BG_COLOR, DEFAULT_TEXT_COLOR},
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// Role-list JSON with the eligibility pools.
  pub pools_path:           PathBuf,
  /// Scripture-portion JSON. Without it every content column starts blank.
  #[serde(default)]
  pub scripture_path:       Option<PathBuf>,
  /// Zero-based month the window starts in, for years not in
  /// `window_starts`.
  #[serde(default)]
  pub default_window_start: u32,
  /// Per-year window start. Keys are years.
  #[serde(default)]
  pub window_starts:        BTreeMap<String, u32>,
  #[serde(default = "default_bg_color")]
  pub bg_color:             String,
  #[serde(default = "default_text_color")]
  pub text_color:           String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("rota.db") }

fn default_bg_color() -> String { DEFAULT_BG_COLOR.to_string() }

fn default_text_color() -> String { DEFAULT_TEXT_COLOR.to_string() }

impl ServerConfig {
  /// Validate the window settings and turn them into API defaults.
  pub fn roster_defaults(&self) -> anyhow::Result<RosterDefaults> {
    month_from_index(self.default_window_start).context("invalid default_window_start")?;

    let mut window_starts = BTreeMap::new();
    for (year, start) in &self.window_starts {
      let parsed: i32 = year
        .trim()
        .parse()
        .with_context(|| format!("window_starts key {year:?} is not a year"))?;
      month_from_index(*start).with_context(|| format!("invalid window start for {year}"))?;
      window_starts.insert(parsed, *start);
    }

    Ok(RosterDefaults {
      window_start: self.default_window_start,
      window_starts,
      bg_color: self.bg_color.clone(),
      text_color: self.text_color.clone(),
    })
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

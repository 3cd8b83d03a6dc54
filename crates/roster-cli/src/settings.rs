//! Loader configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `ROSTER_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "rosterdb.sqlite";
pub const DEFAULT_INPUT_PATH: &str = "roster_data.json";
pub const DEFAULT_PREVIEW_ROWS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
  /// SQLite database rebuilt on every run.
  pub store_path:   PathBuf,
  /// JSON roster document.
  pub input_path:   PathBuf,
  /// Rows printed by the first verification query.
  pub preview_rows: usize,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub store_path:   Option<PathBuf>,
  pub input_path:   Option<PathBuf>,
  pub preview_rows: Option<u32>,
}

impl LoaderConfig {
  pub fn load(file: &Path, overrides: Overrides) -> Result<Self> {
    let path_value = |p: Option<PathBuf>| p.map(|p| p.to_string_lossy().into_owned());

    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("input_path", DEFAULT_INPUT_PATH)?
      .set_default("preview_rows", DEFAULT_PREVIEW_ROWS)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ROSTER").try_parsing(true))
      .set_override_option("store_path", path_value(overrides.store_path))?
      .set_override_option("input_path", path_value(overrides.input_path))?
      .set_override_option("preview_rows", overrides.preview_rows.map(i64::from))?
      .build()
      .with_context(|| format!("failed to read config from {}", file.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise LoaderConfig")
  }
}

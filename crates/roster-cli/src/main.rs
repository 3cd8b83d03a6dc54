//! `roster` — load a JSON roster into a normalized SQLite database.
//!
//! # Usage
//!
//! ```
//! roster
//! roster --input roster_data.json --store rosterdb.sqlite
//! roster --config roster.toml
//! ```
//!
//! The database is rebuilt from scratch, then two verification queries are
//! printed: the first joined rows in descending order and the minimal
//! fingerprint.

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use settings::{LoaderConfig, Overrides};
use roster_core::{
  loader::rebuild,
  record::{RosterRecord, parse_records},
  store::RosterStore,
};
use roster_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Load a JSON roster into a normalized SQLite database")]
struct Cli {
  /// Path to an optional TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "roster.toml")]
  config: PathBuf,

  /// SQLite database file to rebuild.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// JSON roster document (a list of [name, title, role] lists).
  #[arg(short, long, value_name = "FILE")]
  input: Option<PathBuf>,

  /// Number of joined rows shown by the first verification query.
  #[arg(long, value_name = "N")]
  preview_rows: Option<u32>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // stdout carries the verification output; diagnostics go to stderr.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = LoaderConfig::load(&cli.config, Overrides {
    store_path:   cli.store,
    input_path:   cli.input,
    preview_rows: cli.preview_rows,
  })?;

  let raw = std::fs::read_to_string(&cfg.input_path)
    .with_context(|| format!("reading roster file {}", cfg.input_path.display()))?;
  let records = parse_records(&raw)
    .with_context(|| format!("decoding roster file {}", cfg.input_path.display()))?;
  tracing::info!(records = records.len(), input = %cfg.input_path.display(), "roster decoded");

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.store_path.display()))?;

  // Close the store regardless of how the run went.
  let run_result = run(&store, &records, cfg.preview_rows).await;
  let close_result = store.close().await.context("closing store");

  run_result?;
  close_result
}

async fn run<S: RosterStore>(store: &S, records: &[RosterRecord], preview_rows: usize) -> Result<()> {
  rebuild(store, records).await.context("loading roster")?;

  println!("\nFirst verification query:");
  let rows = store
    .joined_rows(Some(preview_rows))
    .await
    .context("running verification query")?;
  for row in rows {
    println!("{row}");
  }

  println!("\nFinal code (verification hash):");
  match store.min_fingerprint().await.context("computing fingerprint")? {
    Some(fingerprint) => println!("{fingerprint}"),
    None => tracing::warn!("roster is empty; no verification hash"),
  }

  Ok(())
}

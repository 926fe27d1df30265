//! Binary entrypoint: read one Report JSON object from stdin, write the scored
//! and sorted report to stdout.
//!
//! Optional `SCORE_ENGINE_CONFIG` holds the engine config as JSON.
//! Logs go to stderr (filter with `RUST_LOG`).

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use score_engine::{sort_report, Config, Report, Scorer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env())
    .init();

  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "score-engine error: {:#}", e);
    std::process::exit(1);
  }
}

fn load_config() -> Result<Config> {
  match std::env::var("SCORE_ENGINE_CONFIG") {
    Ok(raw) => serde_json::from_str(&raw).context("invalid SCORE_ENGINE_CONFIG"),
    Err(_) => Ok(Config::default()),
  }
}

fn run_binary() -> Result<()> {
  let scorer = Scorer::new(load_config()?);

  let mut raw = String::new();
  io::stdin()
    .lock()
    .read_to_string(&mut raw)
    .context("failed to read report from stdin")?;
  let report: Report = serde_json::from_str(&raw).context("failed to parse report JSON")?;

  let scored = sort_report(&scorer.score(&report)?);
  info!(
    "Scored report: {} plugins, {} categories",
    scored.plugins.len(),
    scored.categories.len()
  );

  let json = serde_json::to_vec(&scored)?;
  io::stdout().write_all(&json)?;
  Ok(())
}

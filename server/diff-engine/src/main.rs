//! Binary entrypoint: read `{"before": ScoredReport, "after": ScoredReport}`
//! from stdin, write the diff with its summary to stdout.
//!
//! Logs go to stderr (filter with `RUST_LOG`).

use std::io::{self, Read, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use diff_engine::{run, CompareInput};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env())
    .init();

  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "diff-engine error: {:#}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<()> {
  let mut raw = String::new();
  io::stdin()
    .lock()
    .read_to_string(&mut raw)
    .context("failed to read input from stdin")?;
  let input: CompareInput =
    serde_json::from_str(&raw).context("failed to parse {before, after} JSON")?;

  let date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
  let started = Instant::now();
  let mut out = run(&input, date, 0);
  out.duration = started.elapsed().as_millis() as u64;
  info!(
    "Diffed reports: outcome {}, {} audits changed",
    out.summary.outcome,
    out.summary.audits.changed()
  );

  let json = serde_json::to_vec(&out)?;
  io::stdout().write_all(&json)?;
  Ok(())
}

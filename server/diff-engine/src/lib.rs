//! Quality report diff engine: compares two scored reports.
//!
//! Matches categories, groups and audits across the two reports, computes
//! score and value deltas and classifies every change. Used by the binary for
//! stdin/stdout; can also be called as a library.

pub mod diff;
pub mod outcome;
pub mod summary;
pub mod types;

pub use diff::diff_reports;
pub use outcome::{classify, merge, DiffOutcome};
pub use summary::DiffSummary;
pub use types::{CompareInput, CompareOutput, ReportsDiff};

/// Diff the input pair and attach its summary (no I/O, no clock).
pub fn run(input: &CompareInput, date: String, duration: u64) -> CompareOutput {
  let diff = diff_reports(&input.before, &input.after);
  let summary = DiffSummary::from_diff(&diff);
  CompareOutput {
    diff,
    summary,
    date,
    duration,
  }
}

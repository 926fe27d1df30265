//! Quality report scoring engine: deterministic, pure computation.
//!
//! Resolves a report's audit -> group -> category reference graph, computes
//! weighted scores at every level, and orders the result for presentation.
//!
//! No DB, no network, no file access; every call builds its own state.

pub mod calculate;
pub mod config;
pub mod error;
pub mod index;
pub mod scoring;
pub mod sorting;
pub mod types;

pub use calculate::calculate_score;
pub use config::Config;
pub use error::{ScoreError, ScoringError};
pub use index::AuditIndex;
pub use scoring::Scorer;
pub use sorting::sort_report;
pub use types::{Report, ScoredReport};

/// Score a report with the default configuration.
pub fn score_report(report: &Report) -> Result<ScoredReport, ScoringError> {
  Scorer::with_defaults().score(report)
}

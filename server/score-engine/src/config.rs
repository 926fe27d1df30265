//! Engine configuration with sane defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ScoringError;

/// Tunable scoring behaviour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  /// Per-plugin pass threshold (plugin slug -> score in 0..=1). Audits of that
  /// plugin scoring at or above the target count as a full 1.0.
  pub score_targets: BTreeMap<String, f64>,
}

impl Config {
  pub fn validate(&self) -> Result<(), ScoringError> {
    for (plugin, target) in &self.score_targets {
      if !(0.0..=1.0).contains(target) {
        return Err(ScoringError::config(
          &format!("scoreTargets.{}", plugin),
          &format!("target {} is outside [0, 1]", target),
        ));
      }
    }
    Ok(())
  }

  /// Score an audit of `plugin` counts with once targets are applied.
  pub fn effective_score(&self, plugin: &str, score: f64) -> f64 {
    match self.score_targets.get(plugin) {
      Some(&target) if (0.0..=1.0).contains(&score) && score >= target => 1.0,
      _ => score,
    }
  }
}

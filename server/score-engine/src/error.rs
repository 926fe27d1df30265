//! Structured error types for the scoring engine.
//!
//! Every variant is a configuration or integrity error in the input report.
//! None of them are transient: a failing report fails the same way every time.

use thiserror::Error;

use crate::types::RefKind;

/// Failures of the weighted-average calculation over one ref set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
  #[error("ref list is empty, nothing to score")]
  EmptyRefs,

  #[error("ref `{slug}` has negative weight {weight}")]
  NegativeWeight { slug: String, weight: f64 },

  #[error("ref `{slug}` has non-finite weight {weight}")]
  NonFiniteWeight { slug: String, weight: f64 },

  #[error("weight sum overflows ({}), use smaller weights", .slugs.join(", "))]
  WeightOverflow { slugs: Vec<String> },

  #[error("all refs have zero weight ({}), set a positive weight on at least one", .slugs.join(", "))]
  ZeroWeightSum { slugs: Vec<String> },

  #[error("ref `{slug}` resolved to score {score}, expected a value in [0, 1]")]
  ScoreRange { slug: String, score: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
  /// Display names the owner only; the calculator failure is the error source.
  #[error("{owner}")]
  Score { owner: String, source: ScoreError },

  #[error("group `{group}` in plugin `{plugin}` references audit `{slug}`, which the plugin does not report")]
  GroupRefInvalid {
    plugin: String,
    group: String,
    slug: String,
  },

  #[error("category `{category}` references {kind} `{slug}` in plugin `{plugin}`, which does not exist")]
  CategoryRefInvalid {
    category: String,
    plugin: String,
    slug: String,
    kind: RefKind,
  },

  #[error("config: {field}: {reason}")]
  Config { field: String, reason: String },
}

impl ScoringError {
  pub fn config(field: &str, reason: &str) -> Self {
    Self::Config {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub(crate) fn in_group(plugin: &str, group: &str, source: ScoreError) -> Self {
    Self::Score {
      owner: format!("group {}/{}", plugin, group),
      source,
    }
  }

  pub(crate) fn in_category(category: &str, source: ScoreError) -> Self {
    Self::Score {
      owner: format!("category {}", category),
      source,
    }
  }
}

//! Per-level outcome counts for a reports diff.

use serde::{Deserialize, Serialize};

use crate::outcome::{merge, summarize, DiffOutcome, OutcomeCounts};
use crate::types::{Change, LevelDiff, ReportsDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
  pub outcome: DiffOutcome,
  pub improved: usize,
  pub regressed: usize,
  pub mixed: usize,
  pub unchanged: usize,
  pub added: usize,
  pub removed: usize,
}

impl LevelSummary {
  pub fn from_level<R, D: Change>(level: &LevelDiff<R, D>) -> Self {
    let OutcomeCounts {
      positive,
      negative,
      mixed,
      unchanged,
    } = summarize(level.outcomes());
    Self {
      outcome: merge(level.outcomes()),
      improved: positive,
      regressed: negative,
      mixed,
      unchanged: unchanged + level.unchanged.len(),
      added: level.added.len(),
      removed: level.removed.len(),
    }
  }

  pub fn changed(&self) -> usize {
    self.improved + self.regressed + self.mixed
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
  pub outcome: DiffOutcome,
  pub categories: LevelSummary,
  pub groups: LevelSummary,
  pub audits: LevelSummary,
}

impl DiffSummary {
  pub fn from_diff(diff: &ReportsDiff) -> Self {
    let categories = LevelSummary::from_level(&diff.categories);
    let groups = LevelSummary::from_level(&diff.groups);
    let audits = LevelSummary::from_level(&diff.audits);
    Self {
      outcome: merge([categories.outcome, groups.outcome, audits.outcome]),
      categories,
      groups,
      audits,
    }
  }

  /// True when nothing got worse at any level.
  pub fn is_regression_free(&self) -> bool {
    self.outcome == DiffOutcome::Positive || self.outcome == DiffOutcome::Unchanged
  }
}

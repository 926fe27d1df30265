//! Diff types (JSON contract: what we emit).

use serde::{Deserialize, Serialize};

use score_engine::types::{Commit, PluginMeta, ScoredReport};

use crate::outcome::{classify, DiffOutcome};
use crate::summary::DiffSummary;

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Numeric before/after pair with `diff = after - before`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberDiff {
  pub before: f64,
  pub after: f64,
  pub diff: f64,
}

impl NumberDiff {
  pub fn new(before: f64, after: f64) -> Self {
    Self {
      before,
      after,
      diff: after - before,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayValues {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub before: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub after: Option<String>,
}

/// Plugin identity attached to group and audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
  pub slug: String,
  pub title: String,
}

impl From<&PluginMeta> for PluginRef {
  fn from(meta: &PluginMeta) -> Self {
    Self {
      slug: meta.slug.clone(),
      title: meta.title.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitPair {
  pub before: Commit,
  pub after: Commit,
}

// ---------------------------------------------------------------------------
// Per-level results (unchanged/added/removed) and diffs (changed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
  pub slug: String,
  pub title: String,
  pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDiff {
  pub slug: String,
  pub title: String,
  pub scores: NumberDiff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
  pub slug: String,
  pub title: String,
  pub plugin: PluginRef,
  pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDiff {
  pub slug: String,
  pub title: String,
  pub plugin: PluginRef,
  pub scores: NumberDiff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
  pub slug: String,
  pub title: String,
  pub plugin: PluginRef,
  pub score: f64,
  pub value: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDiff {
  pub slug: String,
  pub title: String,
  pub plugin: PluginRef,
  pub scores: NumberDiff,
  pub values: NumberDiff,
  pub display_values: DisplayValues,
}

/// A changed item: exposes its deltas for classification and impact ordering.
pub trait Change {
  fn scores(&self) -> &NumberDiff;

  fn values(&self) -> Option<&NumberDiff> {
    None
  }

  fn outcome(&self) -> DiffOutcome {
    classify(self.scores().diff, self.values().map(|v| v.diff))
  }
}

impl Change for CategoryDiff {
  fn scores(&self) -> &NumberDiff {
    &self.scores
  }
}

impl Change for GroupDiff {
  fn scores(&self) -> &NumberDiff {
    &self.scores
  }
}

impl Change for AuditDiff {
  fn scores(&self) -> &NumberDiff {
    &self.scores
  }

  fn values(&self) -> Option<&NumberDiff> {
    Some(&self.values)
  }
}

/// Comparison of one level (categories, groups or audits) of two reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDiff<R, D> {
  pub changed: Vec<D>,
  pub unchanged: Vec<R>,
  pub added: Vec<R>,
  pub removed: Vec<R>,
}

impl<R, D> Default for LevelDiff<R, D> {
  fn default() -> Self {
    Self {
      changed: Vec::new(),
      unchanged: Vec::new(),
      added: Vec::new(),
      removed: Vec::new(),
    }
  }
}

impl<R, D: Change> LevelDiff<R, D> {
  pub fn outcomes(&self) -> impl Iterator<Item = DiffOutcome> + '_ {
    self.changed.iter().map(Change::outcome)
  }

  pub fn has_changes(&self) -> bool {
    !self.changed.is_empty() || !self.added.is_empty() || !self.removed.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsDiff {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub commits: Option<CommitPair>,
  pub categories: LevelDiff<CategoryResult, CategoryDiff>,
  pub groups: LevelDiff<GroupResult, GroupDiff>,
  pub audits: LevelDiff<AuditResult, AuditDiff>,
}

impl ReportsDiff {
  /// Dominant outcome over every changed category, group and audit.
  pub fn outcome(&self) -> DiffOutcome {
    crate::outcome::merge(
      self
        .categories
        .outcomes()
        .chain(self.groups.outcomes())
        .chain(self.audits.outcomes()),
    )
  }

  pub fn has_changes(&self) -> bool {
    self.categories.has_changes() || self.groups.has_changes() || self.audits.has_changes()
  }
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Binary input: two already scored reports.
#[derive(Debug, Clone, Deserialize)]
pub struct CompareInput {
  pub before: ScoredReport,
  pub after: ScoredReport,
}

/// Binary output: the diff plus summary and run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutput {
  #[serde(flatten)]
  pub diff: ReportsDiff,
  pub summary: DiffSummary,
  /// RFC 3339 time the comparison ran.
  pub date: String,
  /// Comparison time in milliseconds.
  pub duration: u64,
}

//! Core types for the scoring engine (JSON contracts + scored models).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Raw report (JSON contract: what plugins and the caller produce)
// ---------------------------------------------------------------------------

/// Git commit the report was produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
  pub hash: String,
  pub message: String,
  pub date: String,
  pub author: String,
}

/// Report-level metadata shared by raw and scored reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_name: Option<String>,
  pub version: String,
  pub date: String,
  /// Total run time in milliseconds.
  pub duration: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub commit: Option<Commit>,
}

/// The unscored aggregate of all plugin results. Unknown fields are silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
  #[serde(flatten)]
  pub meta: ReportMeta,
  pub plugins: Vec<PluginReport>,
  #[serde(default)]
  pub categories: Vec<CategoryConfig>,
}

/// Plugin metadata shared by raw and scored plugin reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMeta {
  pub slug: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub docs_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginReport {
  #[serde(flatten)]
  pub meta: PluginMeta,
  pub audits: Vec<AuditReport>,
  #[serde(default)]
  pub groups: Vec<Group>,
}

/// Result of running one audit once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
  pub slug: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub docs_url: Option<String>,
  pub score: f64,
  pub value: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_value: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub issues: Vec<Issue>,
  /// Tabular details; opaque to the engine.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub table: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
  pub message: String,
  pub severity: IssueSeverity,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
  pub file: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<SourcePosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
  pub start_line: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_column: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_line: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_column: Option<u32>,
}

// ---------------------------------------------------------------------------
// Issue severity (ordered: info < warning < error)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
  Info,
  Warning,
  Error,
}

// ---------------------------------------------------------------------------
// Groups, categories and their refs
// ---------------------------------------------------------------------------

/// Weighted collection of audits from one plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub slug: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub refs: Vec<GroupRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
  pub slug: String,
  pub weight: f64,
}

/// Top-level user-facing grouping; refs may span plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
  pub slug: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub refs: Vec<CategoryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
  #[serde(rename = "type")]
  pub kind: RefKind,
  pub plugin: String,
  pub slug: String,
  pub weight: f64,
}

/// What a ref points at. Also the `kind` part of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
  Audit,
  Group,
}

impl fmt::Display for RefKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Audit => f.write_str("audit"),
      Self::Group => f.write_str("group"),
    }
  }
}

/// A `{slug, weight}` pointer, as consumed by the score calculator.
pub trait WeightedRef {
  fn slug(&self) -> &str;
  fn weight(&self) -> f64;
}

impl WeightedRef for GroupRef {
  fn slug(&self) -> &str {
    &self.slug
  }

  fn weight(&self) -> f64 {
    self.weight
  }
}

impl WeightedRef for CategoryRef {
  fn slug(&self) -> &str {
    &self.slug
  }

  fn weight(&self) -> f64 {
    self.weight
  }
}

// ---------------------------------------------------------------------------
// Scored report (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReport {
  #[serde(flatten)]
  pub meta: ReportMeta,
  pub plugins: Vec<ScoredPluginReport>,
  #[serde(default)]
  pub categories: Vec<ScoredCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPluginReport {
  #[serde(flatten)]
  pub meta: PluginMeta,
  pub audits: Vec<ScoredAudit>,
  #[serde(default)]
  pub groups: Vec<ScoredGroup>,
}

/// Audit report enriched with the slug of the plugin that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAudit {
  #[serde(flatten)]
  pub audit: AuditReport,
  pub plugin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGroup {
  #[serde(flatten)]
  pub group: Group,
  pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCategory {
  #[serde(flatten)]
  pub category: CategoryConfig,
  pub score: f64,
}

impl ScoredReport {
  /// Iterate every audit of every plugin, in report order.
  pub fn audits(&self) -> impl Iterator<Item = &ScoredAudit> {
    self.plugins.iter().flat_map(|p| p.audits.iter())
  }

  /// Iterate every group paired with its plugin, in report order.
  pub fn groups(&self) -> impl Iterator<Item = (&PluginMeta, &ScoredGroup)> {
    self
      .plugins
      .iter()
      .flat_map(|p| p.groups.iter().map(move |g| (&p.meta, g)))
  }

  pub fn plugin(&self, slug: &str) -> Option<&ScoredPluginReport> {
    self.plugins.iter().find(|p| p.meta.slug == slug)
  }
}

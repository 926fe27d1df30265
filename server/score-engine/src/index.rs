//! Per-call lookup index for resolving audit and group refs.
//!
//! Built once per scoring/sorting call from the report being processed, then
//! queried once per ref. Resolution is O(1) per ref instead of a linear scan
//! over every audit of the plugin.

use rustc_hash::FxHashMap;

use crate::types::{RefKind, ScoredAudit, ScoredGroup, ScoredReport};

/// Composite `(plugin, slug, kind)` key. Typed, so slugs containing the
/// separator of a string key cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey<'a> {
  pub plugin: &'a str,
  pub slug: &'a str,
  pub kind: RefKind,
}

/// A resolved ref target.
#[derive(Debug, Clone, Copy)]
pub enum Indexed<'a> {
  Audit(&'a ScoredAudit),
  Group(&'a ScoredGroup),
}

impl<'a> Indexed<'a> {
  pub fn score(&self) -> f64 {
    match self {
      Self::Audit(a) => a.audit.score,
      Self::Group(g) => g.score,
    }
  }

  pub fn title(&self) -> &'a str {
    match self {
      Self::Audit(a) => &a.audit.title,
      Self::Group(g) => &g.group.title,
    }
  }

  /// Raw measurement; groups have none.
  pub fn value(&self) -> Option<f64> {
    match self {
      Self::Audit(a) => Some(a.audit.value),
      Self::Group(_) => None,
    }
  }
}

#[derive(Debug, Default)]
pub struct AuditIndex<'a> {
  entries: FxHashMap<IndexKey<'a>, Indexed<'a>>,
}

impl<'a> AuditIndex<'a> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Index every audit and group of an already scored report.
  pub fn from_report(report: &'a ScoredReport) -> Self {
    let mut index = Self::new();
    for plugin in &report.plugins {
      for audit in &plugin.audits {
        index.insert_audit(audit);
      }
      for group in &plugin.groups {
        index.insert_group(&plugin.meta.slug, group);
      }
    }
    index
  }

  /// Insert an enriched audit under its own plugin slug.
  pub fn insert_audit(&mut self, audit: &'a ScoredAudit) {
    let key = IndexKey {
      plugin: &audit.plugin,
      slug: &audit.audit.slug,
      kind: RefKind::Audit,
    };
    self.entries.insert(key, Indexed::Audit(audit));
  }

  pub fn insert_group(&mut self, plugin: &'a str, group: &'a ScoredGroup) {
    let key = IndexKey {
      plugin,
      slug: &group.group.slug,
      kind: RefKind::Group,
    };
    self.entries.insert(key, Indexed::Group(group));
  }

  pub fn get(&self, plugin: &str, slug: &str, kind: RefKind) -> Option<Indexed<'a>> {
    // Keys are covariant, so the map can be viewed with the caller's shorter key lifetime.
    let entries: &FxHashMap<IndexKey<'_>, Indexed<'a>> = &self.entries;
    entries.get(&IndexKey { plugin, slug, kind }).copied()
  }

  pub fn audit(&self, plugin: &str, slug: &str) -> Option<&'a ScoredAudit> {
    match self.get(plugin, slug, RefKind::Audit)? {
      Indexed::Audit(a) => Some(a),
      Indexed::Group(_) => None,
    }
  }

  pub fn group(&self, plugin: &str, slug: &str) -> Option<&'a ScoredGroup> {
    match self.get(plugin, slug, RefKind::Group)? {
      Indexed::Group(g) => Some(g),
      Indexed::Audit(_) => None,
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

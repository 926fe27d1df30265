//! Match two scored reports item by item and compute deltas.
//!
//! Each level is compared straight from its own scores, never derived from the
//! diffs of the level below, so rounding never compounds across levels.

use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use score_engine::types::ScoredReport;

use crate::types::*;

/// Compare `before` with `after`.
///
/// Keys: categories by slug, groups and audits by plugin + slug. Items missing
/// on one side are `added`/`removed`, never an error. Changed entries are
/// ordered by impact (largest `|score diff|`, then largest `|value diff|`).
pub fn diff_reports(before: &ScoredReport, after: &ScoredReport) -> ReportsDiff {
  let commits = match (&before.meta.commit, &after.meta.commit) {
    (Some(b), Some(a)) => Some(CommitPair {
      before: b.clone(),
      after: a.clone(),
    }),
    _ => None,
  };

  let categories = diff_level(
    &category_results(before),
    &category_results(after),
    |c| c.slug.clone(),
    |b, a| {
      (b.score != a.score).then(|| CategoryDiff {
        slug: a.slug.clone(),
        title: a.title.clone(),
        scores: NumberDiff::new(b.score, a.score),
      })
    },
  );

  let groups = diff_level(
    &group_results(before),
    &group_results(after),
    |g| (g.plugin.slug.clone(), g.slug.clone()),
    |b, a| {
      (b.score != a.score).then(|| GroupDiff {
        slug: a.slug.clone(),
        title: a.title.clone(),
        plugin: a.plugin.clone(),
        scores: NumberDiff::new(b.score, a.score),
      })
    },
  );

  let audits = diff_level(
    &audit_results(before),
    &audit_results(after),
    |a| (a.plugin.slug.clone(), a.slug.clone()),
    |b, a| {
      (b.score != a.score || b.value != a.value).then(|| AuditDiff {
        slug: a.slug.clone(),
        title: a.title.clone(),
        plugin: a.plugin.clone(),
        scores: NumberDiff::new(b.score, a.score),
        values: NumberDiff::new(b.value, a.value),
        display_values: DisplayValues {
          before: b.display_value.clone(),
          after: a.display_value.clone(),
        },
      })
    },
  );

  debug!(
    "Diffed reports: categories {}/{} changed, groups {}/{} changed, audits {}/{} changed",
    categories.changed.len(),
    categories.changed.len() + categories.unchanged.len(),
    groups.changed.len(),
    groups.changed.len() + groups.unchanged.len(),
    audits.changed.len(),
    audits.changed.len() + audits.unchanged.len()
  );

  ReportsDiff {
    commits,
    categories,
    groups,
    audits,
  }
}

/// Keys are unique within a well-formed report. When a side repeats a key,
/// its first occurrence is compared and later ones are skipped.
fn diff_level<R, D, K, KeyFn, DiffFn>(
  before: &[R],
  after: &[R],
  key: KeyFn,
  diff: DiffFn,
) -> LevelDiff<R, D>
where
  R: Clone,
  D: Change,
  K: Hash + Eq,
  KeyFn: Fn(&R) -> K,
  DiffFn: Fn(&R, &R) -> Option<D>,
{
  let before = unique_by_key(before, &key);
  let after = unique_by_key(after, &key);
  let after_by_key: FxHashMap<K, &R> = after.iter().map(|&item| (key(item), item)).collect();
  let before_keys: FxHashSet<K> = before.iter().map(|&item| key(item)).collect();

  let mut level = LevelDiff::default();
  for &b in &before {
    match after_by_key.get(&key(b)) {
      None => level.removed.push(b.clone()),
      Some(&a) => match diff(b, a) {
        Some(change) => level.changed.push(change),
        None => level.unchanged.push(a.clone()),
      },
    }
  }
  level.added = after
    .iter()
    .filter(|&&a| !before_keys.contains(&key(a)))
    .map(|&a| a.clone())
    .collect();

  level.changed.sort_by(compare_impact);
  level
}

fn unique_by_key<'r, R, K, KeyFn>(items: &'r [R], key: &KeyFn) -> Vec<&'r R>
where
  K: Hash + Eq,
  KeyFn: Fn(&R) -> K,
{
  let mut seen = FxHashSet::default();
  let unique: Vec<&R> = items.iter().filter(|&item| seen.insert(key(item))).collect();
  if unique.len() < items.len() {
    debug!(
      "Skipped {} items with a duplicate key",
      items.len() - unique.len()
    );
  }
  unique
}

/// Most significant change first: larger `|score diff|`, then larger `|value diff|`.
fn compare_impact<D: Change>(a: &D, b: &D) -> Ordering {
  let value_diff = |d: &D| d.values().map_or(0.0, |v| v.diff.abs());
  b.scores()
    .diff
    .abs()
    .total_cmp(&a.scores().diff.abs())
    .then_with(|| value_diff(b).total_cmp(&value_diff(a)))
}

fn category_results(report: &ScoredReport) -> Vec<CategoryResult> {
  report
    .categories
    .iter()
    .map(|c| CategoryResult {
      slug: c.category.slug.clone(),
      title: c.category.title.clone(),
      score: c.score,
    })
    .collect()
}

fn group_results(report: &ScoredReport) -> Vec<GroupResult> {
  report
    .groups()
    .map(|(plugin, g)| GroupResult {
      slug: g.group.slug.clone(),
      title: g.group.title.clone(),
      plugin: PluginRef::from(plugin),
      score: g.score,
    })
    .collect()
}

fn audit_results(report: &ScoredReport) -> Vec<AuditResult> {
  report
    .plugins
    .iter()
    .flat_map(|plugin| {
      plugin.audits.iter().map(move |a| AuditResult {
        slug: a.audit.slug.clone(),
        title: a.audit.title.clone(),
        plugin: PluginRef::from(&plugin.meta),
        score: a.audit.score,
        value: a.audit.value,
        display_value: a.audit.display_value.clone(),
      })
    })
    .collect()
}

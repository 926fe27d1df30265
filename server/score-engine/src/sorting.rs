//! Presentation order for scored reports.
//!
//! Only array order changes here; no score is read for anything but comparison.
//! Every comparator is a total order so that sorting an already sorted report
//! is a no-op.

use std::cmp::{Ordering, Reverse};

use crate::index::{AuditIndex, Indexed};
use crate::types::*;

/// Return a copy of `report` with refs, audits and issues in presentation order.
///
/// - category and group refs: weight desc, score asc, value desc (audits before
///   groups, which have no value), title asc; unresolvable refs last.
/// - plugin audits: score asc, value desc, title asc.
/// - issues: severity desc, then by source file and start line (missing first).
pub fn sort_report(report: &ScoredReport) -> ScoredReport {
  let index = AuditIndex::from_report(report);

  let categories = report
    .categories
    .iter()
    .map(|scored| {
      let mut scored = scored.clone();
      scored.category.refs = sorted_refs(&scored.category.refs, |r| {
        index.get(&r.plugin, &r.slug, r.kind)
      });
      scored
    })
    .collect();

  let plugins = report
    .plugins
    .iter()
    .map(|plugin| {
      let mut audits: Vec<ScoredAudit> = plugin.audits.iter().map(sorted_issues).collect();
      audits.sort_by(|a, b| compare_audits(&a.audit, &b.audit));

      let groups = plugin
        .groups
        .iter()
        .map(|scored| {
          let mut scored = scored.clone();
          scored.group.refs = sorted_refs(&scored.group.refs, |r| {
            index.get(&plugin.meta.slug, &r.slug, RefKind::Audit)
          });
          scored
        })
        .collect();

      ScoredPluginReport {
        meta: plugin.meta.clone(),
        audits,
        groups,
      }
    })
    .collect();

  ScoredReport {
    meta: report.meta.clone(),
    plugins,
    categories,
  }
}

fn sorted_refs<'a, R, F>(refs: &[R], lookup: F) -> Vec<R>
where
  R: WeightedRef + Clone,
  F: Fn(&R) -> Option<Indexed<'a>>,
{
  let mut decorated: Vec<(R, Option<Indexed<'a>>)> = refs
    .iter()
    .map(|r| (r.clone(), lookup(r)))
    .collect();
  decorated.sort_by(|(a, a_item), (b, b_item)| compare_refs(a, *a_item, b, *b_item));
  decorated.into_iter().map(|(r, _)| r).collect()
}

fn compare_refs<R: WeightedRef>(
  a: &R,
  a_item: Option<Indexed<'_>>,
  b: &R,
  b_item: Option<Indexed<'_>>,
) -> Ordering {
  let (a_item, b_item) = match (a_item, b_item) {
    (Some(x), Some(y)) => (x, y),
    (Some(_), None) => return Ordering::Less,
    (None, Some(_)) => return Ordering::Greater,
    (None, None) => return Ordering::Equal,
  };

  b.weight()
    .total_cmp(&a.weight())
    .then_with(|| a_item.score().total_cmp(&b_item.score()))
    .then_with(|| compare_values_desc(a_item.value(), b_item.value()))
    .then_with(|| compare_titles(a_item.title(), b_item.title()))
}

/// Higher values first; items without a value after all items with one.
fn compare_values_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => b.total_cmp(&a),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Case-insensitive, with a byte-wise tie-break so the order stays total.
fn compare_titles(a: &str, b: &str) -> Ordering {
  a.chars()
    .flat_map(char::to_lowercase)
    .cmp(b.chars().flat_map(char::to_lowercase))
    .then_with(|| a.cmp(b))
}

fn compare_audits(a: &AuditReport, b: &AuditReport) -> Ordering {
  a.score
    .total_cmp(&b.score)
    .then_with(|| b.value.total_cmp(&a.value))
    .then_with(|| compare_titles(&a.title, &b.title))
}

fn sorted_issues(audit: &ScoredAudit) -> ScoredAudit {
  let mut audit = audit.clone();
  if let Some(details) = audit.audit.details.as_mut() {
    details.issues.sort_by(|a, b| issue_key(a).cmp(&issue_key(b)));
  }
  audit
}

fn issue_key(issue: &Issue) -> (Reverse<IssueSeverity>, Option<&str>, Option<u32>) {
  let source = issue.source.as_ref();
  (
    Reverse(issue.severity),
    source.map(|s| s.file.as_str()),
    source
      .and_then(|s| s.position.as_ref())
      .map(|p| p.start_line),
  )
}

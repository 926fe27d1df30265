//! Report scorer: enriches audits, scores groups, then categories.
//!
//! Layers are strictly ordered (audits -> groups -> categories). Groups only
//! reference audits of their own plugin; categories may reference audits and
//! groups of any plugin.

use tracing::debug;

use crate::calculate::calculate_score;
use crate::config::Config;
use crate::error::ScoringError;
use crate::index::AuditIndex;
use crate::types::*;

/// A ref paired with the score of the item it resolved to.
struct Resolved<'r, R> {
  r: &'r R,
  score: f64,
}

impl<R: WeightedRef> WeightedRef for Resolved<'_, R> {
  fn slug(&self) -> &str {
    self.r.slug()
  }

  fn weight(&self) -> f64 {
    self.r.weight()
  }
}

/// Stateless report scorer. One instance can score any number of reports,
/// from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
  config: Config,
}

impl Scorer {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Score a raw report.
  ///
  /// Fails on the first broken reference or malformed ref set; no partially
  /// scored report is ever returned.
  pub fn score(&self, report: &Report) -> Result<ScoredReport, ScoringError> {
    self.config.validate()?;

    let audits: Vec<Vec<ScoredAudit>> = report
      .plugins
      .iter()
      .map(|plugin| {
        plugin
          .audits
          .iter()
          .map(|audit| ScoredAudit {
            audit: audit.clone(),
            plugin: plugin.meta.slug.clone(),
          })
          .collect()
      })
      .collect();

    let mut index = AuditIndex::new();
    for audit in audits.iter().flatten() {
      index.insert_audit(audit);
    }

    let groups: Vec<Vec<ScoredGroup>> = report
      .plugins
      .iter()
      .map(|plugin| {
        plugin
          .groups
          .iter()
          .map(|group| self.score_group(&index, &plugin.meta.slug, group))
          .collect::<Result<Vec<_>, _>>()
      })
      .collect::<Result<_, _>>()?;

    for (plugin, plugin_groups) in report.plugins.iter().zip(&groups) {
      for group in plugin_groups {
        index.insert_group(&plugin.meta.slug, group);
      }
      debug!(
        "Scored plugin {}: {} audits, {} groups",
        plugin.meta.slug,
        plugin.audits.len(),
        plugin_groups.len()
      );
    }

    let categories = report
      .categories
      .iter()
      .map(|category| self.score_category(&index, category))
      .collect::<Result<Vec<_>, _>>()?;
    debug!("Scored {} categories", categories.len());

    // Release the borrows on `audits`/`groups` before moving them into the output.
    drop(index);

    let plugins = report
      .plugins
      .iter()
      .zip(audits)
      .zip(groups)
      .map(|((plugin, audits), groups)| ScoredPluginReport {
        meta: plugin.meta.clone(),
        audits,
        groups,
      })
      .collect();

    Ok(ScoredReport {
      meta: report.meta.clone(),
      plugins,
      categories,
    })
  }

  fn score_group(
    &self,
    index: &AuditIndex<'_>,
    plugin: &str,
    group: &Group,
  ) -> Result<ScoredGroup, ScoringError> {
    let resolved = group
      .refs
      .iter()
      .map(|r| match index.audit(plugin, &r.slug) {
        Some(audit) => Ok(Resolved {
          r,
          score: self.config.effective_score(plugin, audit.audit.score),
        }),
        None => Err(ScoringError::GroupRefInvalid {
          plugin: plugin.to_string(),
          group: group.slug.clone(),
          slug: r.slug.clone(),
        }),
      })
      .collect::<Result<Vec<_>, _>>()?;

    let score = calculate_score(&resolved, |r| r.score)
      .map_err(|e| ScoringError::in_group(plugin, &group.slug, e))?;

    Ok(ScoredGroup {
      group: group.clone(),
      score,
    })
  }

  fn score_category(
    &self,
    index: &AuditIndex<'_>,
    category: &CategoryConfig,
  ) -> Result<ScoredCategory, ScoringError> {
    let resolved = category
      .refs
      .iter()
      .map(|r| {
        let item = index
          .get(&r.plugin, &r.slug, r.kind)
          .ok_or_else(|| ScoringError::CategoryRefInvalid {
            category: category.slug.clone(),
            plugin: r.plugin.clone(),
            slug: r.slug.clone(),
            kind: r.kind,
          })?;
        let score = match r.kind {
          RefKind::Audit => self.config.effective_score(&r.plugin, item.score()),
          RefKind::Group => item.score(),
        };
        Ok::<_, ScoringError>(Resolved { r, score })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let score = calculate_score(&resolved, |r| r.score)
      .map_err(|e| ScoringError::in_category(&category.slug, e))?;

    Ok(ScoredCategory {
      category: category.clone(),
      score,
    })
  }
}

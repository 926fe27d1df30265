//! report-compare: diff two raw quality reports for CI gates
//!
//! Usage:
//!   report-compare <before> <after>      # print one line per change
//!   report-compare <before> <after> -q   # quiet: exit code only
//!
//! Exit codes: 0 nothing regressed, 1 regression or mixed result, 2 usage/IO error.
//! Optional `SCORE_ENGINE_CONFIG` holds the scoring config as JSON, as for the
//! score-engine binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use diff_engine::types::Change;
use diff_engine::{diff_reports, DiffOutcome, DiffSummary, ReportsDiff};
use score_engine::{sort_report, Config, Report, ScoredReport, Scorer};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "report-compare", version, about = "Compare two quality reports")]
struct Args {
    /// Report of the baseline (e.g. main branch)
    before: PathBuf,
    /// Report of the candidate (e.g. pull request head)
    after: PathBuf,
    /// Quiet: only exit code (0=no regression, 1=regression)
    #[arg(short, long)]
    quiet: bool,
}

fn load_config() -> Result<Config> {
    match std::env::var("SCORE_ENGINE_CONFIG") {
        Ok(raw) => serde_json::from_str(&raw).context("invalid SCORE_ENGINE_CONFIG"),
        Err(_) => Ok(Config::default()),
    }
}

fn load_report(scorer: &Scorer, path: &Path) -> Result<ScoredReport> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let report: Report = serde_json::from_str(&contents)
        .with_context(|| format!("invalid report JSON in {}", path.display()))?;
    let scored = scorer
        .score(&report)
        .with_context(|| format!("cannot score {}", path.display()))?;
    Ok(sort_report(&scored))
}

fn fmt_score(score: f64) -> String {
    format!("{:.0}", score * 100.0)
}

fn fmt_change(before: f64, after: f64) -> String {
    format!(
        "{} -> {} ({:+.0})",
        fmt_score(before),
        fmt_score(after),
        (after - before) * 100.0
    )
}

/// Human-readable change lines: `+` added, `-` removed, `~` changed.
fn render(diff: &ReportsDiff) -> Vec<String> {
    let mut lines = Vec::new();

    for c in &diff.categories.changed {
        lines.push(format!(
            "~ category {}: {} [{}]",
            c.slug,
            fmt_change(c.scores.before, c.scores.after),
            c.outcome()
        ));
    }
    for c in &diff.categories.added {
        lines.push(format!("+ category {} ({})", c.slug, fmt_score(c.score)));
    }
    for c in &diff.categories.removed {
        lines.push(format!("- category {} ({})", c.slug, fmt_score(c.score)));
    }

    for g in &diff.groups.changed {
        lines.push(format!(
            "~ group {}/{}: {} [{}]",
            g.plugin.slug,
            g.slug,
            fmt_change(g.scores.before, g.scores.after),
            g.outcome()
        ));
    }
    for g in &diff.groups.added {
        lines.push(format!("+ group {}/{} ({})", g.plugin.slug, g.slug, fmt_score(g.score)));
    }
    for g in &diff.groups.removed {
        lines.push(format!("- group {}/{} ({})", g.plugin.slug, g.slug, fmt_score(g.score)));
    }

    for a in &diff.audits.changed {
        let value = match (&a.display_values.before, &a.display_values.after) {
            (Some(b), Some(after)) => format!("{} -> {}", b, after),
            _ => format!("{} -> {}", a.values.before, a.values.after),
        };
        lines.push(format!(
            "~ audit {}/{}: {}, value {} [{}]",
            a.plugin.slug,
            a.slug,
            fmt_change(a.scores.before, a.scores.after),
            value,
            a.outcome()
        ));
    }
    for a in &diff.audits.added {
        lines.push(format!("+ audit {}/{} ({})", a.plugin.slug, a.slug, fmt_score(a.score)));
    }
    for a in &diff.audits.removed {
        lines.push(format!("- audit {}/{} ({})", a.plugin.slug, a.slug, fmt_score(a.score)));
    }

    lines
}

fn exit_code(summary: &DiffSummary) -> i32 {
    match summary.outcome {
        DiffOutcome::Negative | DiffOutcome::Mixed => 1,
        DiffOutcome::Positive | DiffOutcome::Unchanged => 0,
    }
}

fn compare(args: &Args, scorer: &Scorer) -> Result<i32> {
    let before = load_report(scorer, &args.before)?;
    let after = load_report(scorer, &args.after)?;
    let diff = diff_reports(&before, &after);
    let summary = DiffSummary::from_diff(&diff);
    debug!("Compared reports: outcome {}", summary.outcome);

    if !args.quiet {
        if diff.has_changes() {
            for line in render(&diff) {
                println!("{}", line);
            }
        } else {
            println!("No changes.");
        }
        println!(
            "Outcome: {} ({} improved, {} regressed, {} mixed audits)",
            summary.outcome, summary.audits.improved, summary.audits.regressed, summary.audits.mixed
        );
    }
    Ok(exit_code(&summary))
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            process::exit(2);
        }
    };

    match load_config().and_then(|config| compare(&args, &Scorer::new(config))) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("report-compare: {:#}", e);
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn report_file(score: f64, value: f64, extra: bool) -> NamedTempFile {
        let mut audits = vec![serde_json::json!(
            {"slug": "lcp", "title": "LCP", "score": score, "value": value}
        )];
        if extra {
            audits.push(serde_json::json!(
                {"slug": "cls", "title": "CLS", "score": 1, "value": 0}
            ));
        }
        let report = serde_json::json!({
            "version": "1.0.0",
            "date": "2025-01-01T00:00:00Z",
            "duration": 10,
            "plugins": [{"slug": "perf", "title": "Perf", "audits": audits}],
            "categories": [{
                "slug": "performance",
                "title": "Performance",
                "refs": [{"type": "audit", "plugin": "perf", "slug": "lcp", "weight": 1}]
            }]
        });
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", report).unwrap();
        file
    }

    fn args(before: &NamedTempFile, after: &NamedTempFile) -> Args {
        Args {
            before: before.path().to_path_buf(),
            after: after.path().to_path_buf(),
            quiet: true,
        }
    }

    #[test]
    fn identical_reports_exit_zero() {
        let a = report_file(0.5, 100.0, false);
        let b = report_file(0.5, 100.0, false);
        assert_eq!(compare(&args(&a, &b), &Scorer::with_defaults()).unwrap(), 0);
    }

    #[test]
    fn improvement_exits_zero() {
        let a = report_file(0.5, 100.0, false);
        let b = report_file(0.9, 40.0, false);
        assert_eq!(compare(&args(&a, &b), &Scorer::with_defaults()).unwrap(), 0);
    }

    #[test]
    fn regression_exits_one() {
        let a = report_file(0.9, 40.0, false);
        let b = report_file(0.5, 100.0, false);
        assert_eq!(compare(&args(&a, &b), &Scorer::with_defaults()).unwrap(), 1);
    }

    #[test]
    fn value_only_change_exits_one() {
        let a = report_file(0.5, 100.0, false);
        let b = report_file(0.5, 120.0, false);
        assert_eq!(compare(&args(&a, &b), &Scorer::with_defaults()).unwrap(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let a = report_file(0.5, 100.0, false);
        let args = Args {
            before: a.path().to_path_buf(),
            after: PathBuf::from("/nonexistent/report.json"),
            quiet: true,
        };
        let err = compare(&args, &Scorer::with_defaults()).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot read"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let a = report_file(0.5, 100.0, false);
        let mut b = NamedTempFile::new().unwrap();
        write!(b, "{{ not json").unwrap();
        let err = compare(&args(&a, &b), &Scorer::with_defaults()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid report JSON"));
    }

    #[test]
    fn render_marks_each_kind_of_change() {
        let scorer = Scorer::with_defaults();
        let before = load_report(&scorer, report_file(0.5, 100.0, false).path()).unwrap();
        let after = load_report(&scorer, report_file(0.75, 80.0, true).path()).unwrap();
        let lines = render(&diff_reports(&before, &after));

        assert_eq!(
            lines,
            vec![
                "~ category performance: 50 -> 75 (+25) [positive]".to_string(),
                "~ audit perf/lcp: 50 -> 75 (+25), value 100 -> 80 [positive]".to_string(),
                "+ audit perf/cls (100)".to_string(),
            ]
        );

        let removed = render(&diff_reports(&after, &before));
        assert!(removed.contains(&"- audit perf/cls (100)".to_string()));
    }

    #[test]
    fn score_targets_apply_to_both_reports() {
        let file = report_file(0.5, 100.0, false);
        let scorer = Scorer::new(Config {
            score_targets: BTreeMap::from([("perf".to_string(), 0.4)]),
        });
        let targeted = load_report(&scorer, file.path()).unwrap();
        let plain = load_report(&Scorer::with_defaults(), file.path()).unwrap();
        assert_eq!(targeted.categories[0].score, 1.0);
        assert_eq!(plain.categories[0].score, 0.5);

        // 0.5 -> 0.45 still clears the target, so the category holds at 100.
        let before = report_file(0.5, 100.0, false);
        let after = report_file(0.45, 110.0, false);
        let lines = render(&diff_reports(
            &load_report(&scorer, before.path()).unwrap(),
            &load_report(&scorer, after.path()).unwrap(),
        ));
        assert!(lines.iter().all(|l| !l.contains("category")), "{lines:?}");
        assert!(lines.iter().any(|l| l.starts_with("~ audit perf/lcp")));
    }

    #[test]
    fn config_json_parses_score_targets() {
        let config: Config = serde_json::from_str(r#"{"scoreTargets": {"perf": 0.4}}"#).unwrap();
        assert_eq!(config.score_targets.get("perf"), Some(&0.4));
    }
}

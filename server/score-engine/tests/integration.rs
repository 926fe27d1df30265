//! Integration tests for the scoring engine.

use score_engine::types::RefKind;
use score_engine::{score_report, sort_report, Report, ScoringError};

fn fixture_report() -> Report {
  let json = r#"{
    "packageName": "@acme/web",
    "version": "0.42.0",
    "date": "2025-01-15T10:30:00.000Z",
    "duration": 5230,
    "commit": {
      "hash": "abc123def",
      "message": "feat: checkout page",
      "date": "2025-01-15T09:50:00.000Z",
      "author": "Dev"
    },
    "plugins": [
      {
        "slug": "eslint",
        "title": "ESLint",
        "icon": "eslint",
        "date": "2025-01-15T10:30:01.000Z",
        "duration": 3100,
        "audits": [
          {
            "slug": "no-unused-vars",
            "title": "Disallow unused variables",
            "score": 0,
            "value": 12,
            "displayValue": "12 warnings",
            "details": {
              "issues": [
                {"message": "x unused", "severity": "info", "source": {"file": "src/b.ts", "position": {"startLine": 4}}},
                {"message": "y unused", "severity": "error", "source": {"file": "src/a.ts", "position": {"startLine": 9}}}
              ]
            }
          },
          {"slug": "eqeqeq", "title": "Require === and !==", "score": 1, "value": 0}
        ],
        "groups": [
          {
            "slug": "problems",
            "title": "Problems",
            "refs": [
              {"slug": "no-unused-vars", "weight": 3},
              {"slug": "eqeqeq", "weight": 1}
            ]
          }
        ]
      },
      {
        "slug": "lighthouse",
        "title": "Lighthouse",
        "audits": [
          {"slug": "largest-contentful-paint", "title": "LCP", "score": 0.5, "value": 3400, "displayValue": "3.4 s"}
        ],
        "some_unknown_field": {"ignored": true}
      }
    ],
    "categories": [
      {
        "slug": "code-style",
        "title": "Code style",
        "refs": [
          {"type": "group", "plugin": "eslint", "slug": "problems", "weight": 1}
        ]
      },
      {
        "slug": "performance",
        "title": "Performance",
        "refs": [
          {"type": "audit", "plugin": "lighthouse", "slug": "largest-contentful-paint", "weight": 1},
          {"type": "audit", "plugin": "eslint", "slug": "eqeqeq", "weight": 1}
        ]
      }
    ]
  }"#;
  serde_json::from_str(json).unwrap()
}

#[test]
fn fixture_report_scores_every_level() {
  let scored = score_report(&fixture_report()).unwrap();

  let eslint = scored.plugin("eslint").unwrap();
  assert_eq!(eslint.groups[0].score, 0.25);
  assert!(eslint.audits.iter().all(|a| a.plugin == "eslint"));

  let lighthouse = scored.plugin("lighthouse").unwrap();
  assert_eq!(lighthouse.audits[0].plugin, "lighthouse");

  assert_eq!(scored.categories[0].score, 0.25);
  assert_eq!(scored.categories[1].score, 0.75);
}

#[test]
fn scored_json_carries_scores_and_plugins() {
  let scored = score_report(&fixture_report()).unwrap();
  let value = serde_json::to_value(&scored).unwrap();

  assert_eq!(value["packageName"], "@acme/web");
  assert_eq!(value["commit"]["hash"], "abc123def");
  assert_eq!(value["categories"][0]["score"], 0.25);
  assert_eq!(value["categories"][0]["refs"][0]["type"], "group");
  assert_eq!(value["plugins"][0]["groups"][0]["score"], 0.25);
  assert_eq!(value["plugins"][0]["audits"][0]["plugin"], "eslint");
  assert_eq!(value["plugins"][0]["audits"][0]["displayValue"], "12 warnings");
  assert!(value["plugins"][1].get("some_unknown_field").is_none());
  assert!(value["plugins"][1].get("groups").is_some());
}

#[test]
fn scored_report_round_trips_through_json() {
  let scored = score_report(&fixture_report()).unwrap();
  let json = serde_json::to_string(&scored).unwrap();
  let back: score_engine::ScoredReport = serde_json::from_str(&json).unwrap();
  assert_eq!(back, scored);
}

#[test]
fn deterministic_output_across_runs() {
  let report = fixture_report();
  let json1 = serde_json::to_string(&sort_report(&score_report(&report).unwrap())).unwrap();
  let json2 = serde_json::to_string(&sort_report(&score_report(&report).unwrap())).unwrap();
  assert_eq!(json1, json2, "Same inputs must produce identical JSON output");
}

#[test]
fn sorting_reorders_without_rescoring() {
  let scored = score_report(&fixture_report()).unwrap();
  let sorted = sort_report(&scored);

  let perf = &sorted.categories[1];
  assert_eq!(perf.score, scored.categories[1].score);
  assert_eq!(perf.category.refs[0].slug, "largest-contentful-paint");

  let issues = &sorted.plugins[0]
    .audits
    .iter()
    .find(|a| a.audit.slug == "no-unused-vars")
    .unwrap()
    .audit
    .details
    .as_ref()
    .unwrap()
    .issues;
  assert_eq!(issues[0].message, "y unused");

  assert_eq!(sorted.plugins[0].audits[0].audit.slug, "no-unused-vars");
}

#[test]
fn broken_category_ref_gives_clear_error() {
  let mut report = fixture_report();
  report.categories[1].refs[0].slug = "first-contentful-paint".into();

  let err = score_report(&report).unwrap_err();
  assert!(
    matches!(
      &err,
      ScoringError::CategoryRefInvalid { kind: RefKind::Audit, plugin, .. } if plugin == "lighthouse"
    ),
    "unexpected error: {}",
    err
  );
  assert!(err.to_string().contains("first-contentful-paint"));
}

#[test]
fn removed_plugin_breaks_its_category_refs() {
  let mut report = fixture_report();
  report.plugins.retain(|p| p.meta.slug != "eslint");

  let err = score_report(&report).unwrap_err();
  assert!(err.to_string().contains("eslint"), "Error should name the plugin: {}", err);
}

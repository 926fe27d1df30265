//! Qualitative classification of score/value changes.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOutcome {
  Positive,
  Negative,
  Mixed,
  Unchanged,
}

impl fmt::Display for DiffOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Positive => "positive",
      Self::Negative => "negative",
      Self::Mixed => "mixed",
      Self::Unchanged => "unchanged",
    })
  }
}

/// Classify one change.
///
/// A value that moved while the score stayed put is `Mixed`: still worth
/// surfacing, but neither an improvement nor a regression.
pub fn classify(score_diff: f64, value_diff: Option<f64>) -> DiffOutcome {
  if score_diff > 0.0 {
    DiffOutcome::Positive
  } else if score_diff < 0.0 {
    DiffOutcome::Negative
  } else if value_diff.is_some_and(|v| v != 0.0) {
    DiffOutcome::Mixed
  } else {
    DiffOutcome::Unchanged
  }
}

/// Merge many outcomes into the dominant one.
///
/// Decided on which outcomes are present, not on their order or count, so the
/// merge is associative and order-independent. An empty input is `Unchanged`.
pub fn merge<I>(outcomes: I) -> DiffOutcome
where
  I: IntoIterator<Item = DiffOutcome>,
{
  let mut positive = false;
  let mut negative = false;
  let mut mixed = false;
  for outcome in outcomes {
    match outcome {
      DiffOutcome::Positive => positive = true,
      DiffOutcome::Negative => negative = true,
      DiffOutcome::Mixed => mixed = true,
      DiffOutcome::Unchanged => {}
    }
  }

  match (positive, negative, mixed) {
    (_, _, true) | (true, true, _) => DiffOutcome::Mixed,
    (true, false, false) => DiffOutcome::Positive,
    (false, true, false) => DiffOutcome::Negative,
    (false, false, false) => DiffOutcome::Unchanged,
  }
}

/// Number of outcomes of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
  pub positive: usize,
  pub negative: usize,
  pub mixed: usize,
  pub unchanged: usize,
}

pub fn summarize<I>(outcomes: I) -> OutcomeCounts
where
  I: IntoIterator<Item = DiffOutcome>,
{
  outcomes
    .into_iter()
    .fold(OutcomeCounts::default(), |mut counts, outcome| {
      match outcome {
        DiffOutcome::Positive => counts.positive += 1,
        DiffOutcome::Negative => counts.negative += 1,
        DiffOutcome::Mixed => counts.mixed += 1,
        DiffOutcome::Unchanged => counts.unchanged += 1,
      }
      counts
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use DiffOutcome::*;

  const ALL: [DiffOutcome; 4] = [Positive, Negative, Mixed, Unchanged];

  #[test]
  fn classify_by_score_then_value() {
    assert_eq!(classify(0.1, None), Positive);
    assert_eq!(classify(-0.1, None), Negative);
    assert_eq!(classify(0.0, Some(5.0)), Mixed);
    assert_eq!(classify(0.0, Some(0.0)), Unchanged);
    assert_eq!(classify(0.0, None), Unchanged);
  }

  #[test]
  fn score_direction_wins_over_value() {
    assert_eq!(classify(0.2, Some(-40.0)), Positive);
    assert_eq!(classify(-0.2, Some(40.0)), Negative);
  }

  #[test]
  fn merge_cases() {
    assert_eq!(merge([]), Unchanged);
    assert_eq!(merge([Unchanged, Unchanged]), Unchanged);
    assert_eq!(merge([Positive, Unchanged, Positive]), Positive);
    assert_eq!(merge([Unchanged, Negative]), Negative);
    assert_eq!(merge([Positive, Negative]), Mixed);
    assert_eq!(merge([Mixed]), Mixed);
    assert_eq!(merge([Positive, Mixed]), Mixed);
  }

  #[test]
  fn merge_is_associative() {
    for a in ALL {
      for b in ALL {
        for c in ALL {
          let left = merge([merge([a, b]), c]);
          let right = merge([a, merge([b, c])]);
          assert_eq!(left, right, "({a} {b}) {c} vs {a} ({b} {c})");
          assert_eq!(left, merge([a, b, c]));
        }
      }
    }
  }

  #[test]
  fn merge_is_order_independent() {
    for a in ALL {
      for b in ALL {
        for c in ALL {
          let expected = merge([a, b, c]);
          for permutation in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            assert_eq!(merge(permutation), expected);
          }
        }
      }
    }
  }

  #[test]
  fn summarize_counts_each_outcome() {
    let counts = summarize([Positive, Positive, Negative, Mixed, Unchanged, Positive]);
    assert_eq!(
      counts,
      OutcomeCounts {
        positive: 3,
        negative: 1,
        mixed: 1,
        unchanged: 1,
      }
    );
    assert_eq!(summarize([]), OutcomeCounts::default());
  }
}

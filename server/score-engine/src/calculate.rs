//! Weighted-average score over a ref set.

use crate::error::ScoreError;
use crate::types::WeightedRef;

#[derive(Default)]
struct Accumulator {
  numerator: f64,
  denominator: f64,
}

/// Compute `Σ(score(ref) * weight) / Σ(weight)` in a single pass.
///
/// - Empty `refs` -> `EmptyRefs`.
/// - Any weight below zero (or NaN) -> `NegativeWeight`.
/// - An infinite weight -> `NonFiniteWeight`.
/// - Any resolved score outside [0, 1] (or NaN) -> `ScoreRange`.
/// - All weights zero -> `ZeroWeightSum`, listing every ref slug.
/// - Finite weights whose sum overflows -> `WeightOverflow`.
///
/// Zero-weight refs still have their score checked but do not move the result.
pub fn calculate_score<R, F>(refs: &[R], score_fn: F) -> Result<f64, ScoreError>
where
  R: WeightedRef,
  F: Fn(&R) -> f64,
{
  if refs.is_empty() {
    return Err(ScoreError::EmptyRefs);
  }

  let mut acc = Accumulator::default();
  for r in refs {
    let weight = r.weight();
    if weight.is_nan() || weight < 0.0 {
      return Err(ScoreError::NegativeWeight {
        slug: r.slug().to_string(),
        weight,
      });
    }
    if !weight.is_finite() {
      return Err(ScoreError::NonFiniteWeight {
        slug: r.slug().to_string(),
        weight,
      });
    }

    let score = score_fn(r);
    if !(0.0..=1.0).contains(&score) {
      return Err(ScoreError::ScoreRange {
        slug: r.slug().to_string(),
        score,
      });
    }

    acc.numerator += score * weight;
    acc.denominator += weight;
  }

  let slugs = || -> Vec<String> { refs.iter().map(|r| r.slug().to_string()).collect() };
  if acc.denominator == 0.0 {
    return Err(ScoreError::ZeroWeightSum { slugs: slugs() });
  }
  if !acc.denominator.is_finite() || !acc.numerator.is_finite() {
    return Err(ScoreError::WeightOverflow { slugs: slugs() });
  }

  Ok(acc.numerator / acc.denominator)
}

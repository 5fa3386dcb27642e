//! Score module - the WSJF formula
//!
//! `score = round2((business value + time criticality + risk reduction) / job size)`
//!
//! Defined only for complete factor sets with a non-zero job size. Zero is a
//! legitimate value for the three numerator factors.

use crate::{FactorSet, PropertyValue};
use std::fmt;

/// A derived WSJF score, rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Score for `value`, rounded to two decimal places
    pub fn from_value(value: f64) -> Self {
        Self(round2(value))
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Cost of delay over job size, as a score
    pub fn of(cost_of_delay: f64, job_size: f64) -> Option<Self> {
        if job_size == 0.0 {
            return None;
        }
        let raw = cost_of_delay / job_size;
        raw.is_finite().then(|| Self(round2(raw)))
    }

    /// Whether a stored property holds exactly this score
    ///
    /// Numbers must be equal; text must be the score's display form.
    pub fn matches(&self, stored: &PropertyValue) -> bool {
        match stored {
            PropertyValue::Number(n) => *n == self.0,
            PropertyValue::Text(s) => *s == self.to_string(),
            _ => false,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the score for a factor set
///
/// Returns `None` unless all four factors are resolved and job size is
/// non-zero.
///
/// # Examples
///
/// ```
/// use wsjf_domain::{compute_score, FactorSet};
///
/// let score = compute_score(&FactorSet::new(8.0, 5.0, 3.0, 2.0)).unwrap();
/// assert_eq!(score.value(), 8.0);
/// ```
pub fn compute_score(factors: &FactorSet) -> Option<Score> {
    let business_value = factors.business_value?;
    let time_criticality = factors.time_criticality?;
    let risk_reduction = factors.risk_reduction?;
    let job_size = factors.job_size?;

    Score::of(business_value + time_criticality + risk_reduction, job_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_example() {
        let score = compute_score(&FactorSet::new(8.0, 5.0, 3.0, 2.0)).unwrap();
        assert_eq!(score.value(), 8.0);
    }

    #[test]
    fn test_top_of_fibonacci_scale() {
        let score = compute_score(&FactorSet::new(21.0, 21.0, 21.0, 1.0)).unwrap();
        assert_eq!(score.value(), 63.0);
    }

    #[test]
    fn test_rounding_to_two_places() {
        let score = compute_score(&FactorSet::new(1.0, 1.0, 0.0, 3.0)).unwrap();
        assert_eq!(score.value(), 0.67);
        let score = compute_score(&FactorSet::new(8.0, 8.0, 5.0, 13.0)).unwrap();
        assert_eq!(score.value(), 1.62);
    }

    #[test]
    fn test_zero_job_size_is_undefined() {
        assert!(compute_score(&FactorSet::new(8.0, 5.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn test_zero_numerator_factors_are_legitimate() {
        let score = compute_score(&FactorSet::new(0.0, 0.0, 0.0, 5.0)).unwrap();
        assert_eq!(score.value(), 0.0);
    }

    #[test]
    fn test_incomplete_set_is_undefined() {
        let set = FactorSet {
            job_size: None,
            ..FactorSet::new(8.0, 5.0, 3.0, 2.0)
        };
        assert!(compute_score(&set).is_none());
        assert!(compute_score(&FactorSet::default()).is_none());
    }

    #[test]
    fn test_matches_stored_value() {
        let score = Score::from_value(8.0);
        assert!(score.matches(&PropertyValue::Number(8.0)));
        assert!(score.matches(&PropertyValue::Text("8".into())));
        assert!(!score.matches(&PropertyValue::Number(8.004)));
        assert!(!score.matches(&PropertyValue::Number(8.1)));
        assert!(!score.matches(&PropertyValue::Text("8 - stale note".into())));
        assert!(!score.matches(&PropertyValue::Text(" 8".into())));
        assert!(!score.matches(&PropertyValue::Bool(true)));

        let fractional = Score::from_value(1.625);
        assert!(fractional.matches(&PropertyValue::Text("1.63".into())));
    }

    proptest! {
        #[test]
        fn prop_score_is_rounded_ratio(
            bv in 0u32..100,
            tc in 0u32..100,
            rr in 0u32..100,
            js in 1u32..100,
        ) {
            let set = FactorSet::new(bv as f64, tc as f64, rr as f64, js as f64);
            let expected = round2((bv + tc + rr) as f64 / js as f64);
            let first = compute_score(&set).unwrap();
            let second = compute_score(&set).unwrap();
            prop_assert_eq!(first.value(), expected);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_missing_factor_never_scores(
            values in proptest::array::uniform4(0u32..50),
            missing in 0usize..4,
        ) {
            let mut set = FactorSet::new(
                values[0] as f64,
                values[1] as f64,
                values[2] as f64,
                values[3] as f64 + 1.0,
            );
            match missing {
                0 => set.business_value = None,
                1 => set.time_criticality = None,
                2 => set.risk_reduction = None,
                _ => set.job_size = None,
            }
            prop_assert!(compute_score(&set).is_none());
        }
    }
}

//! Tier module - fine-grained visual classification of a score
//!
//! A score is expressed as a percentage of the largest score the configured
//! factor scales can produce, then mapped through a descending step function.
//! Percentages above 100 are clamped, so an over-range score lands in the top
//! tier instead of failing.

use crate::{DomainError, Score};
use serde::{Deserialize, Serialize};

/// Priority tier, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Top of the scale
    Critical,
    /// Well above average
    High,
    /// Above average
    Elevated,
    /// Middle of the scale
    Moderate,
    /// Lower end, but still worth a hint
    Low,
}

impl Tier {
    /// Tier name as stored in the tier marker property
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::High => "high",
            Tier::Elevated => "elevated",
            Tier::Moderate => "moderate",
            Tier::Low => "low",
        }
    }

    /// Display color for the tier
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Critical => "red",
            Tier::High => "orange",
            Tier::Elevated => "yellow",
            Tier::Moderate => "green",
            Tier::Low => "blue",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum percentage of the maximum score for a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    /// Inclusive lower bound, in percent
    pub min_percent: u32,
    /// Tier assigned at or above the bound
    pub tier: Tier,
}

/// Ordered step function from percent to tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierPolicy {
    thresholds: Vec<TierThreshold>,
}

impl Default for TierPolicy {
    /// 90 / 75 / 60 / 40 / 20 percent
    fn default() -> Self {
        Self {
            thresholds: [
                (90, Tier::Critical),
                (75, Tier::High),
                (60, Tier::Elevated),
                (40, Tier::Moderate),
                (20, Tier::Low),
            ]
            .into_iter()
                .map(|(min_percent, tier)| TierThreshold { min_percent, tier })
                .collect(),
        }
    }
}

impl TierPolicy {
    /// Build a policy; thresholds must be strictly descending
    pub fn new(thresholds: Vec<TierThreshold>) -> Result<Self, DomainError> {
        let policy = Self { thresholds };
        policy.validate()?;
        Ok(policy)
    }

    /// Thresholds, highest first
    pub fn thresholds(&self) -> &[TierThreshold] {
        &self.thresholds
    }

    /// Check ordering
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.thresholds.is_empty() {
            return Err(DomainError::InvalidPolicy("tier policy has no thresholds".to_string()));
        }
        let descending = self
            .thresholds
            .windows(2)
            .all(|pair| pair[0].min_percent > pair[1].min_percent);
        if !descending {
            return Err(DomainError::InvalidPolicy(
                "tier thresholds must be strictly descending".to_string(),
            ));
        }
        Ok(())
    }

    /// Score as a rounded, clamped percentage of `max_score`
    pub fn percent(score: Score, max_score: f64) -> Option<u32> {
        if max_score.is_nan() || max_score <= 0.0 {
            return None;
        }
        let percent = (score.value() / max_score * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u32)
    }

    /// Tier for a score, or `None` below the lowest threshold
    ///
    /// # Examples
    ///
    /// ```
    /// use wsjf_domain::{Score, Tier, TierPolicy};
    ///
    /// let policy = TierPolicy::default();
    /// assert_eq!(policy.classify(Score::from_value(8.0), 24.0), Some(Tier::Low));
    /// assert_eq!(policy.classify(Score::from_value(63.0), 24.0), Some(Tier::Critical));
    /// ```
    pub fn classify(&self, score: Score, max_score: f64) -> Option<Tier> {
        let percent = Self::percent(score, max_score)?;
        self.thresholds
            .iter()
            .find(|t| percent >= t.min_percent)
            .map(|t| t.tier)
    }
}

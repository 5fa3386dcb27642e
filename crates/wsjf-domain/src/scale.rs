//! Factor scales - the discrete values offered to the user per factor
//!
//! The tier classification is relative to the largest score these scales can
//! produce, so changing a scale re-derives the tier thresholds.

use crate::{DomainError, Factor};
use serde::{Deserialize, Serialize};

/// One selectable value with its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleOption {
    /// Text shown in the dropdown
    pub label: String,
    /// Value written to the item
    pub value: u32,
}

impl ScaleOption {
    /// Create an option
    pub fn new(value: u32, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Ordered options for one factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorScale {
    options: Vec<ScaleOption>,
}

impl FactorScale {
    /// Build a scale, rejecting empty lists and zero values
    pub fn new(options: Vec<ScaleOption>) -> Result<Self, DomainError> {
        let scale = Self { options };
        scale.validate()?;
        Ok(scale)
    }

    /// Options in display order
    pub fn options(&self) -> &[ScaleOption] {
        &self.options
    }

    /// Largest offered value
    pub fn max_value(&self) -> Option<u32> {
        self.options.iter().map(|o| o.value).max()
    }

    /// Smallest offered value
    pub fn min_value(&self) -> Option<u32> {
        self.options.iter().map(|o| o.value).min()
    }

    /// Whether `value` is one of the offered values
    pub fn contains(&self, value: u32) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Label for an offered value
    pub fn label_for(&self, value: u32) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Check the scale is usable
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.options.is_empty() {
            return Err(DomainError::InvalidScale("scale has no options".to_string()));
        }
        if let Some(zero) = self.options.iter().find(|o| o.value == 0) {
            return Err(DomainError::InvalidScale(format!(
                "option '{}' has value 0",
                zero.label
            )));
        }
        Ok(())
    }

    fn from_pairs(pairs: &[(u32, &str)]) -> Self {
        Self {
            options: pairs
                .iter()
                .map(|(value, label)| ScaleOption::new(*value, *label))
                .collect(),
        }
    }
}

/// Scales for all four factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScales {
    /// Business value options
    pub business_value: FactorScale,
    /// Time criticality options
    pub time_criticality: FactorScale,
    /// Risk reduction options
    pub risk_reduction: FactorScale,
    /// Job size options
    pub job_size: FactorScale,
}

impl Default for FactorScales {
    fn default() -> Self {
        Self::fibonacci()
    }
}

impl FactorScales {
    /// Seven-point Fibonacci-like scale (1, 2, 3, 5, 8, 13, 21) with
    /// descriptive labels for work task prioritisation
    pub fn fibonacci() -> Self {
        Self {
            business_value: FactorScale::from_pairs(&[
                (1, "1 - No user/business value"),
                (2, "2 - Very low impact or confidence"),
                (3, "3 - Low impact & confidence"),
                (5, "5 - Moderate impact, moderate confidence"),
                (8, "8 - High impact & confidence"),
                (13, "13 - Very high impact & confidence"),
                (21, "21 - Highest impact & confidence"),
            ]),
            time_criticality: FactorScale::from_pairs(&[
                (1, "1 - Not critical at all"),
                (2, "2 - Can wait till next review"),
                (3, "3 - Can wait for 4 sprints"),
                (5, "5 - Moderate urgency (3 sprints)"),
                (8, "8 - Quite urgent (2 sprints)"),
                (13, "13 - Needs next sprint"),
                (21, "21 - Must be next up"),
            ]),
            risk_reduction: FactorScale::from_pairs(&[
                (1, "1 - No risk reduction"),
                (2, "2 - Reduces very minor risk"),
                (3, "3 - Reduces low probability/severity risk"),
                (5, "5 - Moderate risk reduction"),
                (8, "8 - High risk reduction"),
                (13, "13 - Removes very high risk"),
                (21, "21 - Prevents disaster or enables huge opportunity"),
            ]),
            job_size: FactorScale::from_pairs(&[
                (1, "1 - Trivial/smallest chunk"),
                (2, "2 - A day or less"),
                (3, "3 - A quarter of a sprint"),
                (5, "5 - Half a sprint"),
                (8, "8 - One sprint"),
                (13, "13 - One to two sprints"),
                (21, "21 - Two sprints or more (should be split)"),
            ]),
        }
    }

    /// Four-point doubling scale (1, 2, 4, 8)
    pub fn coarse() -> Self {
        Self {
            business_value: FactorScale::from_pairs(&[
                (1, "1 - Little value"),
                (2, "2 - Some value"),
                (4, "4 - Significant value"),
                (8, "8 - Critical value"),
            ]),
            time_criticality: FactorScale::from_pairs(&[
                (1, "1 - Can wait"),
                (2, "2 - Within the quarter"),
                (4, "4 - Within the month"),
                (8, "8 - Now"),
            ]),
            risk_reduction: FactorScale::from_pairs(&[
                (1, "1 - No risk reduction"),
                (2, "2 - Minor risk reduction"),
                (4, "4 - Major risk reduction"),
                (8, "8 - Removes a blocking risk"),
            ]),
            job_size: FactorScale::from_pairs(&[
                (1, "1 - Hours"),
                (2, "2 - Days"),
                (4, "4 - A sprint"),
                (8, "8 - Several sprints"),
            ]),
        }
    }

    /// Scale for one factor
    pub fn scale(&self, factor: Factor) -> &FactorScale {
        match factor {
            Factor::BusinessValue => &self.business_value,
            Factor::TimeCriticality => &self.time_criticality,
            Factor::RiskReduction => &self.risk_reduction,
            Factor::JobSize => &self.job_size,
        }
    }

    /// Largest score the offered values can produce
    ///
    /// The three numerator terms at their maximum over the smallest job size.
    pub fn max_score(&self) -> f64 {
        let numerator: u32 = [Factor::BusinessValue, Factor::TimeCriticality, Factor::RiskReduction]
            .into_iter()
            .filter_map(|f| self.scale(f).max_value())
            .sum();
        match self.job_size.min_value() {
            Some(min_js) if min_js > 0 => numerator as f64 / min_js as f64,
            _ => 0.0,
        }
    }

    /// Validate every factor scale
    pub fn validate(&self) -> Result<(), DomainError> {
        for factor in Factor::ALL {
            self.scale(factor)
                .validate()
                .map_err(|e| DomainError::InvalidScale(format!("{factor}: {e}")))?;
        }
        Ok(())
    }
}

//! Factor module - alias table and property resolution
//!
//! Several historical naming conventions are live at once: a hidden
//! dot-prefixed short form (written by the prioritization form), a plain short
//! form, and hyphenated long forms. Each factor consults its aliases in order
//! and the first one that yields a number wins; later aliases are never read.

use crate::{DomainError, Properties};
use std::fmt;
use std::str::FromStr;

/// Aliases for the derived score, canonical key first
pub const SCORE_ALIASES: &[&str] = &["WSJF", "wsjf", "priority"];

/// One of the four WSJF inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    /// User/business value
    BusinessValue,
    /// Time criticality
    TimeCriticality,
    /// Risk reduction / opportunity enablement
    RiskReduction,
    /// Job size (effort); the denominator
    JobSize,
}

impl Factor {
    /// All factors in form order
    pub const ALL: [Factor; 4] = [
        Factor::BusinessValue,
        Factor::TimeCriticality,
        Factor::RiskReduction,
        Factor::JobSize,
    ];

    /// Ordered property aliases for this factor
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Factor::BusinessValue => &[".bv", "bv", ".business-value", "business-value"],
            Factor::TimeCriticality => &[".tc", "tc", ".time-criticality", "time-criticality"],
            Factor::RiskReduction => &[".rr", "rr", ".risk-reduction", "risk-reduction"],
            Factor::JobSize => &[".js", "js", ".job-size", "job-size"],
        }
    }

    /// Hidden primary key; the form writes here
    pub fn primary_key(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Logical factor name
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::BusinessValue => "businessValue",
            Factor::TimeCriticality => "timeCriticality",
            Factor::RiskReduction => "riskReduction",
            Factor::JobSize => "jobSize",
        }
    }

    /// Short code used in form element ids and CLI flags
    pub fn code(&self) -> &'static str {
        match self {
            Factor::BusinessValue => "bv",
            Factor::TimeCriticality => "tc",
            Factor::RiskReduction => "rr",
            Factor::JobSize => "js",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Factor::BusinessValue => "Business Value",
            Factor::TimeCriticality => "Time Criticality",
            Factor::RiskReduction => "Risk Reduction / Opportunity",
            Factor::JobSize => "Work Size",
        }
    }

    /// Resolve this factor from a property mapping
    pub fn resolve(&self, properties: &Properties) -> Option<f64> {
        resolve_aliases(properties, self.aliases())
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = DomainError;

    /// Accepts the logical name, the short code, or any alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::ALL
            .into_iter()
            .find(|f| {
                f.as_str().eq_ignore_ascii_case(s)
                    || f.code().eq_ignore_ascii_case(s)
                    || f.aliases().contains(&s)
            })
            .ok_or_else(|| DomainError::UnknownFactor(s.to_string()))
    }
}

/// First alias present, non-blank and numeric wins
pub fn resolve_aliases(properties: &Properties, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|key| {
        properties
            .get(*key)
            .filter(|value| !value.is_blank())
            .and_then(|value| value.as_number())
    })
}

/// Resolve a stored score through the score aliases
pub fn resolve_score(properties: &Properties) -> Option<f64> {
    resolve_aliases(properties, SCORE_ALIASES)
}

/// The four WSJF inputs resolved from one item
///
/// A set is either complete (all four present) or incomplete; incomplete sets
/// never produce a score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorSet {
    /// User/business value
    pub business_value: Option<f64>,
    /// Time criticality
    pub time_criticality: Option<f64>,
    /// Risk reduction
    pub risk_reduction: Option<f64>,
    /// Job size
    pub job_size: Option<f64>,
}

impl FactorSet {
    /// Fully specified set
    pub fn new(
        business_value: f64,
        time_criticality: f64,
        risk_reduction: f64,
        job_size: f64,
    ) -> Self {
        Self {
            business_value: Some(business_value),
            time_criticality: Some(time_criticality),
            risk_reduction: Some(risk_reduction),
            job_size: Some(job_size),
        }
    }

    /// Resolve every factor from a property mapping
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            business_value: Factor::BusinessValue.resolve(properties),
            time_criticality: Factor::TimeCriticality.resolve(properties),
            risk_reduction: Factor::RiskReduction.resolve(properties),
            job_size: Factor::JobSize.resolve(properties),
        }
    }

    /// Value of a single factor
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::BusinessValue => self.business_value,
            Factor::TimeCriticality => self.time_criticality,
            Factor::RiskReduction => self.risk_reduction,
            Factor::JobSize => self.job_size,
        }
    }

    /// All four factors resolved
    pub fn is_complete(&self) -> bool {
        Factor::ALL.iter().all(|f| self.get(*f).is_some())
    }

    /// At least one factor resolved
    pub fn any_resolved(&self) -> bool {
        Factor::ALL.iter().any(|f| self.get(*f).is_some())
    }

    /// Factors that did not resolve
    pub fn missing(&self) -> Vec<Factor> {
        Factor::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyValue;
    use proptest::prelude::*;

    fn props(pairs: &[(&str, PropertyValue)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_primary_alias_wins() {
        let p = props(&[
            (".bv", PropertyValue::Number(8.0)),
            ("bv", PropertyValue::Number(3.0)),
            ("business-value", PropertyValue::Number(1.0)),
        ]);
        assert_eq!(Factor::BusinessValue.resolve(&p), Some(8.0));
    }

    #[test]
    fn test_falls_through_blank_and_non_numeric() {
        let p = props(&[
            (".tc", PropertyValue::Text(String::new())),
            ("tc", PropertyValue::Text("soon".into())),
            (".time-criticality", PropertyValue::Text("13".into())),
        ]);
        assert_eq!(Factor::TimeCriticality.resolve(&p), Some(13.0));
    }

    #[test]
    fn test_hyphenated_long_form() {
        let p = props(&[("job-size", PropertyValue::Number(5.0))]);
        assert_eq!(Factor::JobSize.resolve(&p), Some(5.0));
    }

    #[test]
    fn test_zero_is_resolved() {
        let p = props(&[("rr", PropertyValue::Number(0.0))]);
        assert_eq!(Factor::RiskReduction.resolve(&p), Some(0.0));
    }

    #[test]
    fn test_absent_when_nothing_parses() {
        let p = props(&[("rr", PropertyValue::Bool(true))]);
        assert_eq!(Factor::RiskReduction.resolve(&p), None);
        assert_eq!(Factor::RiskReduction.resolve(&Properties::new()), None);
    }

    #[test]
    fn test_null_falls_through() {
        let p = props(&[(".js", PropertyValue::Null), ("js", PropertyValue::Number(3.0))]);
        assert_eq!(Factor::JobSize.resolve(&p), Some(3.0));

        let p = props(&[(".js", PropertyValue::Null)]);
        assert_eq!(Factor::JobSize.resolve(&p), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let p = props(&[("BV", PropertyValue::Number(8.0))]);
        assert_eq!(Factor::BusinessValue.resolve(&p), None);
    }

    #[test]
    fn test_score_aliases() {
        let p = props(&[
            ("wsjf", PropertyValue::Number(2.0)),
            ("priority", PropertyValue::Number(9.0)),
        ]);
        assert_eq!(resolve_score(&p), Some(2.0));
    }

    #[test]
    fn test_factor_set_completeness() {
        let p = props(&[
            (".bv", PropertyValue::Number(8.0)),
            ("tc", PropertyValue::Number(5.0)),
            ("risk-reduction", PropertyValue::Text("3".into())),
        ]);
        let set = FactorSet::from_properties(&p);
        assert!(!set.is_complete());
        assert!(set.any_resolved());
        assert_eq!(set.missing(), vec![Factor::JobSize]);
        assert!(!FactorSet::default().any_resolved());
    }

    #[test]
    fn test_factor_from_str() {
        assert_eq!("jobSize".parse::<Factor>().unwrap(), Factor::JobSize);
        assert_eq!("tc".parse::<Factor>().unwrap(), Factor::TimeCriticality);
        assert_eq!(".risk-reduction".parse::<Factor>().unwrap(), Factor::RiskReduction);
        assert!("effort".parse::<Factor>().is_err());
    }

    proptest! {
        #[test]
        fn prop_earliest_numeric_alias_wins(
            factor_index in 0usize..4,
            values in proptest::collection::vec(proptest::option::of(0u32..1000), 4),
        ) {
            let factor = Factor::ALL[factor_index];
            let p: Properties = factor
                .aliases()
                .iter()
                .zip(&values)
                .map(|(key, value)| {
                    let value = match value {
                        Some(n) => PropertyValue::Number(*n as f64),
                        None => PropertyValue::Text("n/a".into()),
                    };
                    (key.to_string(), value)
                })
                .collect();

            let expected = values.iter().flatten().next().map(|n| *n as f64);
            prop_assert_eq!(factor.resolve(&p), expected);
        }
    }
}

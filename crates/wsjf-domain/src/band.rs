//! Coarse three-band background color by absolute score
//!
//! Independent of [`crate::Tier`]: bands use fixed score breakpoints rather
//! than a percentage of the scale maximum. Both hints may sit on one item.

use crate::{DomainError, Score};
use serde::{Deserialize, Serialize};

/// Background color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    /// Do first
    Red,
    /// Worth scheduling soon
    Green,
    /// Modest priority
    Blue,
}

impl ColorBand {
    /// Host color name written to `background-color`
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBand::Red => "red",
            ColorBand::Green => "green",
            ColorBand::Blue => "blue",
        }
    }
}

/// Breakpoints for the three bands; each is an inclusive minimum score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPolicy {
    /// Minimum score for red
    pub red: f64,
    /// Minimum score for green
    pub green: f64,
    /// Minimum score for blue
    pub blue: f64,
}

impl Default for BandPolicy {
    fn default() -> Self {
        Self {
            red: 10.0,
            green: 4.0,
            blue: 1.5,
        }
    }
}

impl BandPolicy {
    /// Band for a score, or `None` below the blue breakpoint
    pub fn classify(&self, score: Score) -> Option<ColorBand> {
        let value = score.value();
        if value >= self.red {
            Some(ColorBand::Red)
        } else if value >= self.green {
            Some(ColorBand::Green)
        } else if value >= self.blue {
            Some(ColorBand::Blue)
        } else {
            None
        }
    }

    /// Breakpoints must descend red > green > blue
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.red > self.green && self.green > self.blue {
            Ok(())
        } else {
            Err(DomainError::InvalidPolicy(format!(
                "band breakpoints must descend (red {} > green {} > blue {})",
                self.red, self.green, self.blue
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let policy = BandPolicy::default();
        let band = |v: f64| policy.classify(Score::from_value(v));
        assert_eq!(band(63.0), Some(ColorBand::Red));
        assert_eq!(band(10.0), Some(ColorBand::Red));
        assert_eq!(band(9.99), Some(ColorBand::Green));
        assert_eq!(band(8.0), Some(ColorBand::Green));
        assert_eq!(band(4.0), Some(ColorBand::Green));
        assert_eq!(band(1.5), Some(ColorBand::Blue));
        assert_eq!(band(1.49), None);
        assert_eq!(band(0.0), None);
    }

    #[test]
    fn test_validation() {
        assert!(BandPolicy::default().validate().is_ok());
        let flat = BandPolicy { red: 4.0, green: 4.0, blue: 1.0 };
        assert!(flat.validate().is_err());
    }
}

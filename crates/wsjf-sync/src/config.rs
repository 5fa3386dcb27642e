//! Configuration for sync operations
//!
//! Factor scales, tier thresholds and color breakpoints are data here so that
//! a change of scale is a configuration change, not a code change.

use crate::SyncError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use wsjf_domain::migration;
use wsjf_domain::{BandPolicy, FactorScales, TierPolicy};

/// Configuration for the sync controller
///
/// # Examples
///
/// ```
/// use wsjf_sync::SyncConfig;
///
/// // Default configuration (Fibonacci scale, 500 ms settle delay)
/// let config = SyncConfig::default();
/// assert_eq!(config.max_score(), 63.0);
///
/// // Four-point scale
/// let config = SyncConfig::coarse();
/// assert_eq!(config.max_score(), 24.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Values offered per factor; also fixes the tier scale maximum
    pub scales: FactorScales,

    /// Percent-of-maximum tier thresholds
    pub tiers: TierPolicy,

    /// Absolute-score breakpoints for the background color bands
    pub bands: BandPolicy,

    /// Pause between writing form inputs and reading them back (milliseconds)
    /// Default: 500; the host needs time to propagate its own writes
    pub settle_delay_ms: u64,

    /// Pause before reconciling an item reported as changed (milliseconds)
    /// Default: 300
    pub change_debounce_ms: u64,

    /// Migration markers allowed per item
    /// Default: 3
    pub max_migrations: usize,

    /// Marker token inserted on migration
    pub migration_marker: String,

    /// Dry-run mode: log intended writes without performing them
    /// Default: false
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            scales: FactorScales::fibonacci(),
            tiers: TierPolicy::default(),
            bands: BandPolicy::default(),
            settle_delay_ms: 500,
            change_debounce_ms: 300,
            max_migrations: migration::MAX_MIGRATIONS,
            migration_marker: migration::MARKER.to_string(),
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Four-point (1, 2, 4, 8) scale with the default thresholds
    pub fn coarse() -> Self {
        Self {
            scales: FactorScales::coarse(),
            ..Self::default()
        }
    }

    /// No settle or debounce delays
    ///
    /// For hosts that apply writes synchronously, such as batch runs over a
    /// snapshot.
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            change_debounce_ms: 0,
            ..Self::default()
        }
    }

    /// Load from a TOML file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SyncError::Config(format!("failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse from TOML text and validate
    pub fn from_toml(contents: &str) -> Result<Self, SyncError> {
        let config: SyncConfig =
            toml::from_str(contents).map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check scales, thresholds and limits
    pub fn validate(&self) -> Result<(), SyncError> {
        self.scales.validate()?;
        self.tiers.validate()?;
        self.bands.validate()?;
        if self.max_migrations == 0 {
            return Err(SyncError::Config("max_migrations must be greater than 0".to_string()));
        }
        if self.migration_marker.trim().is_empty() {
            return Err(SyncError::Config("migration_marker must not be empty".to_string()));
        }
        Ok(())
    }

    /// Largest score the configured scales can produce
    pub fn max_score(&self) -> f64 {
        self.scales.max_score()
    }

    /// Settle delay as Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Change debounce as Duration
    pub fn change_debounce(&self) -> Duration {
        Duration::from_millis(self.change_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.change_debounce_ms, 300);
        assert_eq!(config.max_migrations, 3);
        assert_eq!(config.migration_marker, "➡️");
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(SyncConfig::coarse().max_score(), 24.0);
        assert_eq!(SyncConfig::immediate().settle_delay(), Duration::ZERO);
        assert_eq!(SyncConfig::default().settle_delay(), Duration::from_millis(500));
        assert_eq!(SyncConfig::default().change_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = SyncConfig::from_toml("settle_delay_ms = 0\ndry_run = true\n").unwrap();
        assert_eq!(config.settle_delay_ms, 0);
        assert!(config.dry_run);
        assert_eq!(config.max_migrations, 3);
        assert_eq!(config.max_score(), 63.0);
    }

    #[test]
    fn test_toml_band_override() {
        let config =
            SyncConfig::from_toml("[bands]\nred = 20.0\ngreen = 8.0\nblue = 2.0\n").unwrap();
        assert_eq!(config.bands.red, 20.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SyncConfig::from_toml("max_migrations = 0"),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            SyncConfig::from_toml("[bands]\nred = 1.0\ngreen = 2.0\nblue = 3.0\n"),
            Err(SyncError::Domain(_))
        ));
        assert!(SyncConfig::from_toml("settle_delay_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "change_debounce_ms = 50").unwrap();
        let config = SyncConfig::from_file(file.path()).unwrap();
        assert_eq!(config.change_debounce_ms, 50);

        assert!(SyncConfig::from_file("/nonexistent/wsjf.toml").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SyncConfig::coarse();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = SyncConfig::from_toml(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}

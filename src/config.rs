//! Runtime configuration.
//!
//! Every section has defaults, so an empty file (or no file) is valid.
//!
//! ```toml
//! [scan]
//! frame_interval_ms = 16
//! throttle_ms = 260
//! dedupe_window_ms = 2200
//!
//! [otp]
//! min_digits = 4
//! max_digits = 10
//! max_period = 86400
//!
//! [refresh]
//! tick_ms = 1000
//! ```

use crate::otp::OtpPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scan loop timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// How often a capture attempt is scheduled (one display refresh).
    pub frame_interval_ms: u64,
    /// Minimum gap between decode invocations.
    pub throttle_ms: u64,
    /// How long an accepted value is ignored if seen again.
    pub dedupe_window_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            throttle_ms: 260,
            dedupe_window_ms: 2200,
        }
    }
}

impl ScanConfig {
    /// Returns the capture interval.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Returns the minimum gap between decodes.
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Returns the duplicate suppression window.
    pub fn dedupe_window(&self) -> Duration {
        Duration::from_millis(self.dedupe_window_ms)
    }

    /// Validates scan timing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval("scan.frame_interval_ms"));
        }
        Ok(())
    }
}

/// OTP code refresh timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval between code snapshots.
    pub tick_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { tick_ms: 1000 }
    }
}

impl RefreshConfig {
    /// Returns the refresh interval.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A timing value (named by its key) is zero.
    #[error("{0} must be greater than zero")]
    InvalidInterval(&'static str),
    /// OTP digit bounds are empty or out of range.
    #[error("invalid digit bounds {min}..={max} (must satisfy 1 <= min <= max <= 10)")]
    InvalidDigitBounds {
        /// Configured minimum.
        min: u8,
        /// Configured maximum.
        max: u8,
    },
    /// `otp.max_period` is zero.
    #[error("otp.max_period must be greater than zero")]
    InvalidMaxPeriod,
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[scan]` section.
    #[serde(default)]
    pub scan: ScanConfig,
    /// `[otp]` section.
    #[serde(default)]
    pub otp: OtpPolicy,
    /// `[refresh]` section.
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Largest digit count whose modulus fits the 31-bit truncated value.
const MAX_SUPPORTED_DIGITS: u8 = 10;

impl FileConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()?;

        let (min, max) = (self.otp.min_digits, self.otp.max_digits);
        if min == 0 || min > max || max > MAX_SUPPORTED_DIGITS {
            return Err(ConfigError::InvalidDigitBounds { min, max });
        }
        if self.otp.max_period == 0 {
            return Err(ConfigError::InvalidMaxPeriod);
        }
        if self.refresh.tick_ms == 0 {
            return Err(ConfigError::InvalidInterval("refresh.tick_ms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan.throttle(), Duration::from_millis(260));
        assert_eq!(config.scan.dedupe_window(), Duration::from_millis(2200));
        assert_eq!(config.refresh.tick(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(FileConfig::from_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::from_toml(
            "[scan]\nthrottle_ms = 100\n\n[otp]\nmax_digits = 8\n",
        )
        .unwrap();
        assert_eq!(config.scan.throttle_ms, 100);
        assert_eq!(config.scan.frame_interval_ms, 16);
        assert_eq!(config.otp.max_digits, 8);
        assert_eq!(config.otp.min_digits, 4);
    }

    #[test]
    fn test_zero_frame_interval_invalid() {
        let mut config = FileConfig::default();
        config.scan.frame_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval("scan.frame_interval_ms"))
        ));
    }

    #[test]
    fn test_inverted_digit_bounds_invalid() {
        let result = FileConfig::from_toml("[otp]\nmin_digits = 8\nmax_digits = 6\n");
        assert_eq!(
            result,
            Err(ConfigError::InvalidDigitBounds { min: 8, max: 6 })
        );
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            FileConfig::from_toml("[scan\nthrottle_ms = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileConfig::from_file("/nonexistent/qr-payload.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}

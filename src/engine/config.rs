//! Engine configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiffboxError};
use crate::tuner::DetectorConfig;

/// Samples per block when none is configured
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Pending control messages before senders see `ControlQueueFull`
pub const DEFAULT_CONTROL_CAPACITY: usize = 64;

/// Largest block the engine accepts from configuration
const MAX_BLOCK_SIZE: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate for the effect chain (Hz)
    pub sample_rate: u32,
    /// Samples per processing block
    pub block_size: usize,
    /// Capacity of the control-thread message queue
    pub control_capacity: usize,
    /// Tuner settings; its sample rate follows `sample_rate`
    pub detector: DetectorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            control_capacity: DEFAULT_CONTROL_CAPACITY,
            detector: DetectorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: EngineConfig = serde_json::from_str(text)?;
        config.detector.sample_rate = config.sample_rate;
        config.validate()?;
        Ok(config)
    }

    /// Override the sample rate, keeping the detector in step
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self.detector.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(RiffboxError::InvalidConfig {
                reason: "sample_rate must be positive".to_string(),
            });
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(RiffboxError::InvalidConfig {
                reason: format!(
                    "block_size must be between 1 and {}, got {}",
                    MAX_BLOCK_SIZE, self.block_size
                ),
            });
        }
        if self.control_capacity == 0 {
            return Err(RiffboxError::InvalidConfig {
                reason: "control_capacity must be at least 1".to_string(),
            });
        }
        self.detector.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.block_size, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{"sample_rate": 48000}"#).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.detector.sample_rate, 48000);
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config.detector.min_frequency, 27.0);
    }

    #[test]
    fn test_nested_detector_settings() {
        let config = EngineConfig::from_json_str(
            r#"{"detector": {"min_amplitude": 0.05, "confidence_threshold": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.detector.min_amplitude, 0.05);
        assert_eq!(config.detector.confidence_threshold, 0.5);
        assert_eq!(config.detector.max_frequency, 1200.0);
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_json_str(r#"{"block_size": 0}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(EngineConfig::from_json_str(r#"{"control_capacity": 0}"#).is_err());
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"block_size": 256}}"#).unwrap();
        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.block_size, 256);

        let err = EngineConfig::from_json_file(Path::new("/nonexistent/riffbox.json")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}

//! Aggregate monitor configuration with TOML loading and validation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use vigil_signals::{
    BlinkConfig, CalibrationConfig, DirectionConfig, GazeConfig, PoseEstimatorConfig,
    PoseFilterConfig,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Per-component configuration for one monitoring session.
///
/// Every section is optional in the TOML source; omitted sections take the
/// component defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub pose: PoseEstimatorConfig,
    #[serde(default)]
    pub filter: PoseFilterConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub direction: DirectionConfig,
    #[serde(default)]
    pub blink: BlinkConfig,
    #[serde(default)]
    pub gaze: GazeConfig,
}

impl MonitorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pose.yaw_scale <= 0.0 || self.pose.pitch_scale <= 0.0 {
            return Err(ConfigError::Validation(
                "pose scales must be positive".to_string(),
            ));
        }

        if self.filter.dt <= 0.0 {
            return Err(ConfigError::Validation(
                "filter.dt must be positive".to_string(),
            ));
        }
        if self.filter.process_noise <= 0.0 || self.filter.measurement_noise <= 0.0 {
            return Err(ConfigError::Validation(
                "filter noise variances must be positive".to_string(),
            ));
        }

        if self.calibration.countdown_secs <= 0.0 {
            return Err(ConfigError::Validation(
                "calibration.countdown_secs must be positive".to_string(),
            ));
        }

        if self.direction.yaw_threshold <= 0.0 || self.direction.pitch_threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "direction thresholds must be positive".to_string(),
            ));
        }
        if self.direction.attention_window < 1 {
            return Err(ConfigError::Validation(
                "direction.attention_window must be >= 1".to_string(),
            ));
        }
        if self.direction.attention_threshold <= 0.0 || self.direction.attention_threshold > 1.0 {
            return Err(ConfigError::Validation(
                "direction.attention_threshold must be in (0, 1]".to_string(),
            ));
        }
        if self.direction.micro_movement_min_deg < 0.0
            || self.direction.micro_movement_min_deg >= self.direction.micro_movement_max_deg
        {
            return Err(ConfigError::Validation(
                "direction micro-movement band must satisfy 0 <= min < max".to_string(),
            ));
        }

        if self.blink.ear_threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "blink.ear_threshold must be positive".to_string(),
            ));
        }
        if self.blink.consecutive_frames < 1 {
            return Err(ConfigError::Validation(
                "blink.consecutive_frames must be >= 1".to_string(),
            ));
        }
        if self.blink.rate_window_secs <= 0.0 {
            return Err(ConfigError::Validation(
                "blink.rate_window_secs must be positive".to_string(),
            ));
        }
        if self.blink.duration_window < 1 {
            return Err(ConfigError::Validation(
                "blink.duration_window must be >= 1".to_string(),
            ));
        }

        if self.gaze.fixation_threshold <= 0.0 || self.gaze.saccade_threshold <= 0.0 {
            return Err(ConfigError::Validation(
                "gaze thresholds must be positive".to_string(),
            ));
        }
        if self.gaze.min_fixation_ms < 0.0 {
            return Err(ConfigError::Validation(
                "gaze.min_fixation_ms must be >= 0".to_string(),
            ));
        }
        if self.gaze.ema_alpha <= 0.0 || self.gaze.ema_alpha > 1.0 {
            return Err(ConfigError::Validation(
                "gaze.ema_alpha must be in (0, 1]".to_string(),
            ));
        }
        if self.gaze.history_len < 1 {
            return Err(ConfigError::Validation(
                "gaze.history_len must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

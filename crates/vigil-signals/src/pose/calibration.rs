//! Head pose calibration: collect raw pose samples over a countdown window
//! and subtract the per-axis mean from every subsequent estimate.

use serde::{Deserialize, Serialize};

use super::estimator::PoseAngles;

/// Calibration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Sample-collection window in seconds
    pub countdown_secs: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { countdown_secs: 3.0 }
    }
}

/// Baseline offset, applied by subtraction to raw pose.
///
/// Either absent (all zeros, `sample_count == 0`) or fully computed from at
/// least one sample. Never partially applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOffset {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub sample_count: usize,
}

/// Calibration state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    Uncalibrated,
    Collecting,
    Calibrated,
}

/// Session-scoped pose calibrator.
#[derive(Debug, Clone)]
pub struct PoseCalibrator {
    config: CalibrationConfig,
    phase: CalibrationPhase,
    started_us: i64,
    samples: Vec<PoseAngles>,
    offset: CalibrationOffset,
}

impl PoseCalibrator {
    pub fn new() -> Self {
        Self::with_config(CalibrationConfig::default())
    }

    pub fn with_config(config: CalibrationConfig) -> Self {
        Self {
            config,
            phase: CalibrationPhase::Uncalibrated,
            started_us: 0,
            samples: Vec::new(),
            offset: CalibrationOffset::default(),
        }
    }

    /// Begin (or restart) collection.
    ///
    /// Idempotent: issuing this while collecting or calibrated discards any
    /// prior samples and offset and restarts cleanly.
    pub fn start(&mut self, ts_us: i64) {
        self.phase = CalibrationPhase::Collecting;
        self.started_us = ts_us;
        self.samples.clear();
        self.offset = CalibrationOffset::default();
        log::info!("pose calibration started ({}s window)", self.config.countdown_secs);
    }

    /// Feed one raw pose sample while collecting.
    ///
    /// Returns true exactly once, on the frame where the offset is computed.
    /// If the countdown elapses with no samples collected the calibrator
    /// drops back to `Uncalibrated`; a retry is permitted via [`start`].
    ///
    /// [`start`]: PoseCalibrator::start
    pub fn process(&mut self, raw: PoseAngles, ts_us: i64) -> bool {
        if self.phase != CalibrationPhase::Collecting {
            return false;
        }

        let elapsed = (ts_us - self.started_us) as f32 / 1_000_000.0;
        if elapsed < self.config.countdown_secs {
            self.samples.push(raw);
            return false;
        }

        if self.samples.is_empty() {
            self.phase = CalibrationPhase::Uncalibrated;
            log::warn!("pose calibration window elapsed with no samples; remaining uncalibrated");
            return false;
        }

        let n = self.samples.len() as f32;
        let (mut yaw, mut pitch, mut roll) = (0.0f32, 0.0f32, 0.0f32);
        for s in &self.samples {
            yaw += s.yaw;
            pitch += s.pitch;
            roll += s.roll;
        }
        self.offset = CalibrationOffset {
            yaw: yaw / n,
            pitch: pitch / n,
            roll: roll / n,
            sample_count: self.samples.len(),
        };
        self.samples.clear();
        self.phase = CalibrationPhase::Calibrated;
        log::info!(
            "pose calibration complete: yaw {:.2} pitch {:.2} roll {:.2} ({} samples)",
            self.offset.yaw,
            self.offset.pitch,
            self.offset.roll,
            self.offset.sample_count
        );
        true
    }

    /// Subtract the baseline offset. Zero offset while uncalibrated, so raw
    /// pose passes through unchanged until calibration completes.
    pub fn apply(&self, raw: PoseAngles) -> PoseAngles {
        PoseAngles {
            yaw: raw.yaw - self.offset.yaw,
            pitch: raw.pitch - self.offset.pitch,
            roll: raw.roll - self.offset.roll,
        }
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    pub fn is_calibrated(&self) -> bool {
        self.phase == CalibrationPhase::Calibrated
    }

    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }
}

impl Default for PoseCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

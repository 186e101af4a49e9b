//! Per-frame output record.
//!
//! One [`FrameSnapshot`] is produced for every processed landmark frame and
//! is the complete external contract: loggers, bridges, and persistence
//! layers serialize it verbatim and never reach into component state.

use serde::{Deserialize, Serialize};

use vigil_signals::{BlinkState, GazeMetrics, HeadDirection, PoseAngles};

/// Head pose and direction portion of a snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HeadSnapshot {
    /// Unfiltered estimator output, before calibration
    pub raw: PoseAngles,
    /// Calibration-adjusted, Kalman-filtered angles
    pub filtered: PoseAngles,
    pub direction: HeadDirection,
    pub looking_at_monitor: bool,
    pub head_movement_count: u32,
    pub micro_movement_count: u32,
    pub gaze_shift_count: u32,
}

/// Composite scores derived from the other components.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DerivedScores {
    /// In [0, 100]; higher is more attentive
    pub attention_score: f32,
    /// In [0, 100]; higher is more stressed
    pub stress_score: f32,
}

/// Everything the pipeline knows after processing one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Caller-supplied frame timestamp, microseconds
    pub timestamp_us: i64,
    /// Active trial, if any
    pub trial_id: Option<u32>,
    pub face_detected: bool,
    pub blink: BlinkState,
    pub gaze: GazeMetrics,
    pub head: HeadSnapshot,
    pub derived: DerivedScores,
}

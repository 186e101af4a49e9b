//! # vigil-signals
//!
//! Behavioral signal extraction from facial landmark streams.
//!
//! Each component consumes one [`LandmarkFrame`](landmarks::LandmarkFrame)
//! per video frame and maintains its own session-scoped state. All timing
//! is driven by caller-supplied timestamps in microseconds; nothing in this
//! crate reads a clock.
//!
//! ```text
//! LandmarkFrame (per video frame)
//!     │
//!     ├──► PoseEstimator ──► PoseCalibrator ──► PoseFilter (Kalman)
//!     │                                              │
//!     │                                              └──► DirectionClassifier
//!     │
//!     ├──► BlinkDetector ──┐
//!     │                    │ (blinking flag)
//!     └──► GazeTracker ◄───┘
//!
//! DirectionClassifier + BlinkDetector + GazeTracker ──► attention/stress scores
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vigil_signals::{blink::BlinkDetector, landmarks::LandmarkFrame};
//!
//! let mut detector = BlinkDetector::new();
//! for (frame, ts_us) in landmark_stream {
//!     let state = detector.update(&frame, ts_us);
//!     println!("blinks: {} ({:.1}/min)", state.blink_count, state.rate_per_minute);
//! }
//! ```

pub mod attention;
pub mod blink;
pub mod direction;
pub mod gaze;
pub mod landmarks;
pub mod pose;

#[cfg(test)]
pub mod tests_proptest;

pub use attention::{attention_score, stress_score, ScoreInput};
pub use blink::{BlinkConfig, BlinkDetector, BlinkState};
pub use direction::{DirectionClassifier, DirectionConfig, DirectionUpdate, HeadDirection};
pub use gaze::{GazeConfig, GazeMetrics, GazeSample, GazeTracker};
pub use landmarks::LandmarkFrame;
pub use pose::{
    CalibrationConfig, CalibrationOffset, CalibrationPhase, PoseAngles, PoseCalibrator,
    PoseEstimate, PoseEstimator, PoseEstimatorConfig, PoseFilter, PoseFilterConfig,
};

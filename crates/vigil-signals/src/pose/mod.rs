//! Head pose estimation, smoothing, and calibration.
//!
//! Raw angles come from landmark geometry ([`PoseEstimator`]), get a
//! per-user baseline subtracted ([`PoseCalibrator`]), and are smoothed by a
//! constant-velocity Kalman filter ([`PoseFilter`]).

mod calibration;
mod estimator;
mod kalman;

pub use calibration::{CalibrationConfig, CalibrationOffset, CalibrationPhase, PoseCalibrator};
pub use estimator::{PoseAngles, PoseEstimate, PoseEstimator, PoseEstimatorConfig};
pub use kalman::{PoseFilter, PoseFilterConfig};

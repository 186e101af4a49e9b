//! Geometric head pose estimation from eye, nose, and mouth landmarks.
//!
//! The angles are heuristic, not metric: yaw and pitch are pixel offsets of
//! the nose tip from the face center scaled by fixed constants, roll is the
//! angle of the line between the eye centers. Good enough for direction
//! classification after calibration; not tied to camera intrinsics.

use serde::{Deserialize, Serialize};

use crate::landmarks::{distance, indices, midpoint, LandmarkFrame};

/// Landmarks required for a pose estimate.
pub const REQUIRED_INDICES: [u32; 7] = [
    indices::LEFT_EYE_OUTER,
    indices::LEFT_EYE_INNER,
    indices::RIGHT_EYE_OUTER,
    indices::RIGHT_EYE_INNER,
    indices::NOSE_TIP,
    indices::LEFT_MOUTH_CORNER,
    indices::RIGHT_MOUTH_CORNER,
];

/// Configuration for the geometric pose estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseEstimatorConfig {
    /// Degrees per pixel of horizontal nose offset (positive = looking right)
    pub yaw_scale: f32,
    /// Degrees per pixel of vertical nose offset (positive = looking down)
    pub pitch_scale: f32,
}

impl Default for PoseEstimatorConfig {
    fn default() -> Self {
        Self {
            yaw_scale: 2.0,
            pitch_scale: 2.0,
        }
    }
}

/// Head rotation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseAngles {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// A raw pose estimate plus whether a face was actually measured.
///
/// `detected == false` means the frame carried no face or was missing a
/// required landmark; the angles are then all zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub angles: PoseAngles,
    pub detected: bool,
}

impl PoseEstimate {
    /// Neutral zero estimate for no-detection frames.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Stateless raw pose estimator.
#[derive(Debug, Clone, Default)]
pub struct PoseEstimator {
    config: PoseEstimatorConfig,
}

impl PoseEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PoseEstimatorConfig) -> Self {
        Self { config }
    }

    /// Estimate raw yaw/pitch/roll from one landmark frame.
    ///
    /// Never fails: a frame without a face or without the required
    /// landmarks yields [`PoseEstimate::none`].
    pub fn estimate(&self, frame: &LandmarkFrame) -> PoseEstimate {
        if !frame.face_detected || !frame.has_all(&REQUIRED_INDICES) {
            return PoseEstimate::none();
        }

        let px = |idx| frame.point_px(idx).unwrap_or([0.0, 0.0]);

        let left_eye_center = midpoint(px(indices::LEFT_EYE_OUTER), px(indices::LEFT_EYE_INNER));
        let right_eye_center = midpoint(px(indices::RIGHT_EYE_OUTER), px(indices::RIGHT_EYE_INNER));
        let nose = px(indices::NOSE_TIP);
        let mouth_center = midpoint(
            px(indices::LEFT_MOUTH_CORNER),
            px(indices::RIGHT_MOUTH_CORNER),
        );

        // Roll: angle of the inter-eye line.
        let dx = right_eye_center[0] - left_eye_center[0];
        let dy = right_eye_center[1] - left_eye_center[1];
        let roll = dy.atan2(dx).to_degrees();

        // Pitch: nose tip relative to the eye/mouth vertical center.
        let eye_center_y = (left_eye_center[1] + right_eye_center[1]) / 2.0;
        let face_center_y = (eye_center_y + mouth_center[1]) / 2.0;
        let pitch = (nose[1] - face_center_y) * self.config.pitch_scale;

        // Yaw: nose tip relative to the eye horizontal center.
        let eye_center_x = (left_eye_center[0] + right_eye_center[0]) / 2.0;
        let yaw = (nose[0] - eye_center_x) * self.config.yaw_scale;

        PoseEstimate {
            angles: PoseAngles { yaw, pitch, roll },
            detected: true,
        }
    }

    /// Inter-eye-center distance in pixels, for scale diagnostics.
    pub fn eye_span_px(&self, frame: &LandmarkFrame) -> Option<f32> {
        if !frame.has_all(&[
            indices::LEFT_EYE_OUTER,
            indices::LEFT_EYE_INNER,
            indices::RIGHT_EYE_OUTER,
            indices::RIGHT_EYE_INNER,
        ]) {
            return None;
        }
        let px = |idx| frame.point_px(idx).unwrap_or([0.0, 0.0]);
        let left = midpoint(px(indices::LEFT_EYE_OUTER), px(indices::LEFT_EYE_INNER));
        let right = midpoint(px(indices::RIGHT_EYE_OUTER), px(indices::RIGHT_EYE_INNER));
        Some(distance(left, right))
    }
}

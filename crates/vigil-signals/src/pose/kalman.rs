//! Constant-velocity Kalman filter for head pose smoothing.
//!
//! State is 6-dimensional: the three pose angles plus their velocities.
//! The transition model integrates each angle by its velocity over a fixed
//! timestep; the measurement model observes the three angles directly. The
//! predict/update equations are written out explicitly so the model stays
//! auditable; nalgebra supplies only the matrix arithmetic.

use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};

use super::estimator::PoseAngles;

const STATE_DIM: usize = 6;
const MEAS_DIM: usize = 3;

type StateVector = SVector<f32, STATE_DIM>;
type StateMatrix = SMatrix<f32, STATE_DIM, STATE_DIM>;
type MeasVector = SVector<f32, MEAS_DIM>;
type MeasMatrix = SMatrix<f32, MEAS_DIM, MEAS_DIM>;
type ObsMatrix = SMatrix<f32, MEAS_DIM, STATE_DIM>;
type GainMatrix = SMatrix<f32, STATE_DIM, MEAS_DIM>;

/// Filter configuration. All covariances are fixed constants, not learned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFilterConfig {
    /// Nominal frame interval in seconds
    pub dt: f32,
    /// Process noise variance (diagonal of Q)
    pub process_noise: f32,
    /// Measurement noise variance (diagonal of R)
    pub measurement_noise: f32,
}

impl Default for PoseFilterConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 30.0,
            process_noise: 1e-3,
            measurement_noise: 0.1,
        }
    }
}

/// 6-state constant-velocity pose filter.
#[derive(Debug, Clone)]
pub struct PoseFilter {
    config: PoseFilterConfig,
    /// State [yaw, pitch, roll, yaw', pitch', roll']
    x: StateVector,
    /// Error covariance
    p: StateMatrix,
    /// Transition model
    f: StateMatrix,
    /// Measurement model
    h: ObsMatrix,
    /// Process noise covariance
    q: StateMatrix,
    /// Measurement noise covariance
    r: MeasMatrix,
}

impl PoseFilter {
    pub fn new() -> Self {
        Self::with_config(PoseFilterConfig::default())
    }

    pub fn with_config(config: PoseFilterConfig) -> Self {
        let mut f = StateMatrix::identity();
        f[(0, 3)] = config.dt;
        f[(1, 4)] = config.dt;
        f[(2, 5)] = config.dt;

        let mut h = ObsMatrix::zeros();
        h[(0, 0)] = 1.0;
        h[(1, 1)] = 1.0;
        h[(2, 2)] = 1.0;

        let q = StateMatrix::identity() * config.process_noise;
        let r = MeasMatrix::identity() * config.measurement_noise;

        Self {
            config,
            x: StateVector::zeros(),
            p: StateMatrix::identity(),
            f,
            h,
            q,
            r,
        }
    }

    /// Predict, then correct with the new raw measurement.
    ///
    /// Returns the corrected pose angles. A singular innovation covariance
    /// (impossible with a positive-definite R) skips the correction instead
    /// of faulting.
    pub fn update(&mut self, raw: PoseAngles) -> PoseAngles {
        // Predict
        self.x = self.f * self.x;
        self.p = self.f * self.p * self.f.transpose() + self.q;

        // Correct
        let z = MeasVector::new(raw.yaw, raw.pitch, raw.roll);
        let innovation = z - self.h * self.x;
        let s = self.h * self.p * self.h.transpose() + self.r;
        if let Some(s_inv) = s.try_inverse() {
            let k: GainMatrix = self.p * self.h.transpose() * s_inv;
            self.x += k * innovation;
            self.p = (StateMatrix::identity() - k * self.h) * self.p;
        }

        PoseAngles {
            yaw: self.x[0],
            pitch: self.x[1],
            roll: self.x[2],
        }
    }

    /// Current filtered angles without advancing the filter.
    pub fn current(&self) -> PoseAngles {
        PoseAngles {
            yaw: self.x[0],
            pitch: self.x[1],
            roll: self.x[2],
        }
    }

    /// Clear all filter state. Sessions never share state.
    pub fn reset(&mut self) {
        self.x = StateVector::zeros();
        self.p = StateMatrix::identity();
    }

    pub fn config(&self) -> &PoseFilterConfig {
        &self.config
    }
}

impl Default for PoseFilter {
    fn default() -> Self {
        Self::new()
    }
}

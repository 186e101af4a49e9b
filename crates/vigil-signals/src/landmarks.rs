//! Landmark frame contract and MediaPipe face-mesh indices.
//!
//! A [`LandmarkFrame`] is the only input the pipeline consumes: a sparse,
//! ordered mapping from stable landmark index to a normalized (x, y) point,
//! plus the pixel dimensions of the source frame and a detection flag.
//! Absence of a face (or of individual landmarks) is a valid input, checked
//! explicitly with [`LandmarkFrame::has_all`] rather than guarded indexing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MediaPipe Face Mesh landmark indices used by the pipeline.
pub mod indices {
    // === Eyes ===
    /// Left eye outer corner
    pub const LEFT_EYE_OUTER: u32 = 33;
    /// Left eye inner corner
    pub const LEFT_EYE_INNER: u32 = 133;
    /// Left eye top lid
    pub const LEFT_EYE_TOP: u32 = 159;
    /// Left eye bottom lid
    pub const LEFT_EYE_BOTTOM: u32 = 145;
    /// Right eye outer corner
    pub const RIGHT_EYE_OUTER: u32 = 362;
    /// Right eye inner corner
    pub const RIGHT_EYE_INNER: u32 = 263;
    /// Right eye top lid
    pub const RIGHT_EYE_TOP: u32 = 386;
    /// Right eye bottom lid
    pub const RIGHT_EYE_BOTTOM: u32 = 374;

    // === Iris (refined landmarks, optional) ===
    /// Left iris center
    pub const LEFT_IRIS_CENTER: u32 = 468;
    /// Right iris center
    pub const RIGHT_IRIS_CENTER: u32 = 473;

    // === Nose / mouth ===
    /// Nose tip
    pub const NOSE_TIP: u32 = 4;
    /// Left mouth corner
    pub const LEFT_MOUTH_CORNER: u32 = 61;
    /// Right mouth corner
    pub const RIGHT_MOUTH_CORNER: u32 = 291;
}

/// One frame of detected facial landmarks.
///
/// Points are normalized to [0, 1] in both axes; `width`/`height` give the
/// source frame's pixel dimensions for denormalization. `face_detected` is
/// false when the external detector found no face, in which case `points`
/// is typically (but not necessarily) empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Landmark index → normalized (x, y)
    pub points: BTreeMap<u32, [f32; 2]>,
    /// Source frame width in pixels
    pub width: u32,
    /// Source frame height in pixels
    pub height: u32,
    /// Whether the external detector reported a face this frame
    pub face_detected: bool,
}

impl LandmarkFrame {
    /// Create an empty no-detection frame with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            points: BTreeMap::new(),
            width,
            height,
            face_detected: false,
        }
    }

    /// Normalized point for a landmark index, if present.
    pub fn point(&self, idx: u32) -> Option<[f32; 2]> {
        self.points.get(&idx).copied()
    }

    /// Point in pixel coordinates, if present.
    pub fn point_px(&self, idx: u32) -> Option<[f32; 2]> {
        self.point(idx)
            .map(|[x, y]| [x * self.width as f32, y * self.height as f32])
    }

    /// Capability check: does this frame carry every listed landmark?
    pub fn has_all(&self, idxs: &[u32]) -> bool {
        idxs.iter().all(|i| self.points.contains_key(i))
    }
}

/// Euclidean distance between two points.
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Midpoint of two points.
pub fn midpoint(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

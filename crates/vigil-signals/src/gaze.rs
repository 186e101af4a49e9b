//! Iris-relative gaze tracking with fixation/saccade detection.
//!
//! Per eye, the iris position is normalized against the eye box spanned by
//! the corner and lid landmarks, giving an offset in [-1,1] on each axis.
//! Both eyes share the sign convention (positive x = image right), so the
//! combined gaze is a plain per-axis mean. Iris landmarks are optional; the
//! eye-box center stands in silently when they are absent.
//!
//! Fixations survive blinks: while the blink flag is up, gaze displacement
//! does not break an ongoing fixation and no new fixation starts. The
//! screen-attention ratio is an exponential moving average of an in-bounds
//! test, held at its last value through blinks.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::landmarks::{indices, LandmarkFrame};

const EYE_BOX_INDICES: [u32; 8] = [
    indices::LEFT_EYE_OUTER,
    indices::LEFT_EYE_INNER,
    indices::LEFT_EYE_TOP,
    indices::LEFT_EYE_BOTTOM,
    indices::RIGHT_EYE_OUTER,
    indices::RIGHT_EYE_INNER,
    indices::RIGHT_EYE_TOP,
    indices::RIGHT_EYE_BOTTOM,
];

/// Gaze tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazeConfig {
    /// Displacement below which gaze counts as stationary
    pub fixation_threshold: f32,
    /// Displacement above which a break also records a saccade
    pub saccade_threshold: f32,
    /// Minimum duration for a fixation to be recorded, ms
    pub min_fixation_ms: f32,
    /// EMA smoothing constant for the screen-attention ratio
    pub ema_alpha: f32,
    /// Capacity of the fixation and saccade history rings
    pub history_len: usize,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            fixation_threshold: 0.05,
            saccade_threshold: 0.1,
            min_fixation_ms: 100.0,
            ema_alpha: 0.05,
            history_len: 64,
        }
    }
}

/// Normalized gaze point, each axis in [-1,1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f32,
    pub y: f32,
}

impl GazeSample {
    pub fn distance_to(&self, other: GazeSample) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A sealed fixation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fixation {
    pub point: GazeSample,
    pub start_us: i64,
    pub duration_ms: f32,
}

/// A recorded saccade event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Saccade {
    pub ts_us: i64,
    pub magnitude: f32,
}

/// Per-frame gaze metrics snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GazeMetrics {
    pub gaze: GazeSample,
    /// Smoothed in-bounds fraction, in [0,1]
    pub screen_attention_ratio: f32,
    pub is_fixating: bool,
    /// Duration of the fixation in progress, ms
    pub fixation_duration_ms: f32,
    /// Sealed fixations this session; monotone non-decreasing
    pub fixation_count: u32,
    /// Mean duration over sealed fixations, ms
    pub avg_fixation_ms: f32,
    pub saccade_count: u32,
}

/// Fixation/saccade state machine plus screen-attention EMA.
#[derive(Debug, Clone)]
pub struct GazeTracker {
    config: GazeConfig,
    gaze: GazeSample,
    fixation_point: GazeSample,
    fixation_start_us: Option<i64>,
    current_duration_ms: f32,
    fixation_count: u32,
    total_fixation_ms: f32,
    saccade_count: u32,
    fixations: VecDeque<Fixation>,
    saccades: VecDeque<Saccade>,
    attention_ratio: f32,
    last_in_bounds: bool,
}

impl GazeTracker {
    pub fn new() -> Self {
        Self::with_config(GazeConfig::default())
    }

    pub fn with_config(config: GazeConfig) -> Self {
        Self {
            fixations: VecDeque::with_capacity(config.history_len),
            saccades: VecDeque::with_capacity(config.history_len),
            config,
            gaze: GazeSample::default(),
            fixation_point: GazeSample::default(),
            fixation_start_us: None,
            current_duration_ms: 0.0,
            fixation_count: 0,
            total_fixation_ms: 0.0,
            saccade_count: 0,
            attention_ratio: 0.0,
            last_in_bounds: true,
        }
    }

    /// Process one landmark frame.
    ///
    /// `is_blinking` comes from the blink detector for the same frame;
    /// `head_centered` loosens the in-bounds test while the head direction
    /// is Center. Frames without the eye-box landmarks hold all state.
    pub fn update(
        &mut self,
        frame: &LandmarkFrame,
        ts_us: i64,
        is_blinking: bool,
        head_centered: bool,
    ) -> GazeMetrics {
        if !frame.face_detected || !frame.has_all(&EYE_BOX_INDICES) {
            return self.metrics();
        }

        let left = eye_offset(
            frame,
            indices::LEFT_EYE_OUTER,
            indices::LEFT_EYE_INNER,
            indices::LEFT_EYE_TOP,
            indices::LEFT_EYE_BOTTOM,
            indices::LEFT_IRIS_CENTER,
        );
        let right = eye_offset(
            frame,
            indices::RIGHT_EYE_OUTER,
            indices::RIGHT_EYE_INNER,
            indices::RIGHT_EYE_TOP,
            indices::RIGHT_EYE_BOTTOM,
            indices::RIGHT_IRIS_CENTER,
        );
        let gaze = GazeSample {
            x: (left.x + right.x) / 2.0,
            y: (left.y + right.y) / 2.0,
        };

        self.step_fixation(gaze, ts_us, is_blinking);
        self.step_attention(gaze, is_blinking, head_centered);
        if !is_blinking {
            // Closed eyes measure lid, not iris; keep the last open-eye gaze.
            self.gaze = gaze;
        }

        self.metrics()
    }

    /// Current metrics without advancing any state, for no-detection frames.
    pub fn metrics(&self) -> GazeMetrics {
        GazeMetrics {
            gaze: self.gaze,
            screen_attention_ratio: self.attention_ratio,
            is_fixating: self.fixation_start_us.is_some(),
            fixation_duration_ms: self.current_duration_ms,
            fixation_count: self.fixation_count,
            avg_fixation_ms: if self.fixation_count == 0 {
                0.0
            } else {
                self.total_fixation_ms / self.fixation_count as f32
            },
            saccade_count: self.saccade_count,
        }
    }

    fn step_fixation(&mut self, gaze: GazeSample, ts_us: i64, is_blinking: bool) {
        let displacement = self.gaze.distance_to(gaze);
        let stationary = displacement < self.config.fixation_threshold;

        if stationary || is_blinking {
            match self.fixation_start_us {
                Some(start) => {
                    self.current_duration_ms = (ts_us - start) as f32 / 1000.0;
                }
                // A new fixation never starts mid-blink.
                None if !is_blinking => {
                    self.fixation_start_us = Some(ts_us);
                    self.fixation_point = gaze;
                    self.current_duration_ms = 0.0;
                }
                None => {}
            }
            return;
        }

        // Gaze moved while eyes open: seal, maybe record a saccade, restart.
        if let Some(start) = self.fixation_start_us {
            let duration_ms = (ts_us - start) as f32 / 1000.0;
            if duration_ms >= self.config.min_fixation_ms {
                self.fixation_count += 1;
                self.total_fixation_ms += duration_ms;
                self.fixations.push_back(Fixation {
                    point: self.fixation_point,
                    start_us: start,
                    duration_ms,
                });
                while self.fixations.len() > self.config.history_len {
                    self.fixations.pop_front();
                }
            }
        }
        if displacement > self.config.saccade_threshold {
            self.saccade_count += 1;
            self.saccades.push_back(Saccade {
                ts_us,
                magnitude: displacement,
            });
            while self.saccades.len() > self.config.history_len {
                self.saccades.pop_front();
            }
        }
        self.fixation_start_us = Some(ts_us);
        self.fixation_point = gaze;
        self.current_duration_ms = 0.0;
    }

    fn step_attention(&mut self, gaze: GazeSample, is_blinking: bool, head_centered: bool) {
        let in_bounds = if is_blinking {
            // A blink carries no attention penalty.
            self.last_in_bounds
        } else {
            let bound = if head_centered { 1.2 } else { 1.0 };
            let v = gaze.x.abs() <= bound && gaze.y.abs() <= bound;
            self.last_in_bounds = v;
            v
        };
        let target = if in_bounds { 1.0 } else { 0.0 };
        self.attention_ratio += self.config.ema_alpha * (target - self.attention_ratio);
    }

    pub fn fixations(&self) -> &VecDeque<Fixation> {
        &self.fixations
    }

    pub fn saccades(&self) -> &VecDeque<Saccade> {
        &self.saccades
    }

    pub fn config(&self) -> &GazeConfig {
        &self.config
    }
}

impl Default for GazeTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized iris offset within one eye box, each axis in [-1,1].
///
/// Axes are anchored at the box minima so both eyes read positive toward
/// image right and image bottom. A degenerate extent yields 0 on that axis;
/// a missing iris falls back to the box center (offset 0).
fn eye_offset(
    frame: &LandmarkFrame,
    outer: u32,
    inner: u32,
    top: u32,
    bottom: u32,
    iris: u32,
) -> GazeSample {
    let px = |idx| frame.point(idx).unwrap_or([0.0, 0.0]);
    let (outer, inner, top, bottom) = (px(outer), px(inner), px(top), px(bottom));

    let min_x = outer[0].min(inner[0]);
    let width = outer[0].max(inner[0]) - min_x;
    let min_y = top[1].min(bottom[1]);
    let height = top[1].max(bottom[1]) - min_y;

    let iris = frame
        .point(iris)
        .unwrap_or([min_x + width / 2.0, min_y + height / 2.0]);

    let axis = |value: f32, min: f32, extent: f32| {
        if extent <= 0.0 {
            0.0
        } else {
            2.0 * (value - min) / extent - 1.0
        }
    };
    GazeSample {
        x: axis(iris[0], min_x, width),
        y: axis(iris[1], min_y, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_US: i64 = 1_000_000 / 30;

    /// Eye boxes with irises placed at a given normalized offset.
    fn gaze_frame(x_off: f32, y_off: f32, with_iris: bool) -> LandmarkFrame {
        let mut frame = LandmarkFrame::new(640, 480);
        frame.face_detected = true;
        for (outer, inner, top, bottom, iris, cx) in [
            (
                indices::LEFT_EYE_OUTER,
                indices::LEFT_EYE_INNER,
                indices::LEFT_EYE_TOP,
                indices::LEFT_EYE_BOTTOM,
                indices::LEFT_IRIS_CENTER,
                0.40f32,
            ),
            (
                indices::RIGHT_EYE_OUTER,
                indices::RIGHT_EYE_INNER,
                indices::RIGHT_EYE_TOP,
                indices::RIGHT_EYE_BOTTOM,
                indices::RIGHT_IRIS_CENTER,
                0.60f32,
            ),
        ] {
            let (hw, hh) = (0.05f32, 0.02f32);
            frame.points.insert(outer, [cx - hw, 0.40]);
            frame.points.insert(inner, [cx + hw, 0.40]);
            frame.points.insert(top, [cx, 0.40 - hh]);
            frame.points.insert(bottom, [cx, 0.40 + hh]);
            if with_iris {
                frame
                    .points
                    .insert(iris, [cx + x_off * hw, 0.40 + y_off * hh]);
            }
        }
        frame
    }

    #[test]
    fn test_centered_iris_reads_zero() {
        let mut tracker = GazeTracker::new();
        let m = tracker.update(&gaze_frame(0.0, 0.0, true), 0, false, true);
        assert!(m.gaze.x.abs() < 1e-5);
        assert!(m.gaze.y.abs() < 1e-5);
    }

    #[test]
    fn test_iris_right_reads_positive_x() {
        let mut tracker = GazeTracker::new();
        let m = tracker.update(&gaze_frame(0.5, 0.0, true), 0, false, true);
        assert!((m.gaze.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_missing_iris_falls_back_to_center() {
        let mut tracker = GazeTracker::new();
        let m = tracker.update(&gaze_frame(0.8, 0.8, false), 0, false, true);
        assert_eq!(m.gaze, GazeSample::default());
    }

    #[test]
    fn test_degenerate_eye_box_reads_zero() {
        let mut frame = gaze_frame(0.5, 0.0, true);
        // Collapse the left eye corners.
        frame.points.insert(indices::LEFT_EYE_OUTER, [0.40, 0.40]);
        frame.points.insert(indices::LEFT_EYE_INNER, [0.40, 0.40]);
        let offset = eye_offset(
            &frame,
            indices::LEFT_EYE_OUTER,
            indices::LEFT_EYE_INNER,
            indices::LEFT_EYE_TOP,
            indices::LEFT_EYE_BOTTOM,
            indices::LEFT_IRIS_CENTER,
        );
        assert_eq!(offset.x, 0.0);
        assert!(!offset.x.is_nan());
    }

    #[test]
    fn test_sustained_gaze_seals_fixation_on_break() {
        let mut tracker = GazeTracker::new();
        // 6 stationary frames ≈ 167 ms, then a 0.4 jump.
        for i in 0..6 {
            tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
        }
        let m = tracker.update(&gaze_frame(0.8, 0.0, true), 6 * FRAME_US, false, true);
        assert_eq!(m.fixation_count, 1);
        assert!(m.avg_fixation_ms >= 100.0);
        assert_eq!(m.saccade_count, 1);
    }

    #[test]
    fn test_short_fixation_is_not_recorded() {
        let mut tracker = GazeTracker::new();
        // Two frames ≈ 33 ms is below the 100 ms gate.
        tracker.update(&gaze_frame(0.0, 0.0, true), 0, false, true);
        tracker.update(&gaze_frame(0.0, 0.0, true), FRAME_US, false, true);
        let m = tracker.update(&gaze_frame(0.8, 0.0, true), 2 * FRAME_US, false, true);
        assert_eq!(m.fixation_count, 0);
        // The displacement still counts as a saccade.
        assert_eq!(m.saccade_count, 1);
    }

    #[test]
    fn test_blink_does_not_break_fixation() {
        let mut tracker = GazeTracker::new();
        for i in 0..3 {
            tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
        }
        // Eyes closed: the iris reads garbage but the blink flag is up.
        for i in 3..6 {
            let m = tracker.update(&gaze_frame(0.9, 0.9, true), i * FRAME_US, true, true);
            assert!(m.is_fixating);
        }
        // Eyes reopen on the original point; fixation has run ~200 ms.
        for i in 6..8 {
            tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
        }
        let m = tracker.update(&gaze_frame(0.8, 0.0, true), 8 * FRAME_US, false, true);
        assert_eq!(m.fixation_count, 1);
        assert!(m.avg_fixation_ms > 200.0);
    }

    #[test]
    fn test_attention_ratio_stays_in_unit_interval() {
        let mut tracker = GazeTracker::new();
        // Far off-screen for a long stretch, then back on.
        for i in 0..500 {
            let m = tracker.update(&gaze_frame(1.5, 1.5, true), i * FRAME_US, false, false);
            assert!((0.0..=1.0).contains(&m.screen_attention_ratio));
        }
        let low = tracker.metrics().screen_attention_ratio;
        assert!(low < 0.1);
        for i in 500..1000 {
            let m = tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
            assert!((0.0..=1.0).contains(&m.screen_attention_ratio));
        }
        assert!(tracker.metrics().screen_attention_ratio >= low);
    }

    #[test]
    fn test_center_head_loosens_bounds() {
        // |x| = 1.1 is out of bounds normally, in bounds when centered.
        let mut strict = GazeTracker::new();
        let mut loose = GazeTracker::new();
        for i in 0..200 {
            strict.update(&gaze_frame(1.1, 0.0, true), i * FRAME_US, false, false);
            loose.update(&gaze_frame(1.1, 0.0, true), i * FRAME_US, false, true);
        }
        assert!(strict.metrics().screen_attention_ratio < 0.1);
        assert!(loose.metrics().screen_attention_ratio > 0.9);
    }

    #[test]
    fn test_blink_holds_attention_state() {
        let mut tracker = GazeTracker::new();
        for i in 0..30 {
            tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
        }
        let before = tracker.metrics().screen_attention_ratio;
        // Off-the-charts gaze while blinking must not dent the ratio.
        for i in 30..40 {
            tracker.update(&gaze_frame(2.0, 2.0, true), i * FRAME_US, true, true);
        }
        assert!(tracker.metrics().screen_attention_ratio >= before - 1e-5);
    }

    #[test]
    fn test_history_rings_are_bounded() {
        let mut tracker = GazeTracker::new();
        let cap = tracker.config().history_len;
        let mut ts = 0i64;
        // Alternate long fixations and jumps to flood both rings.
        for cycle in 0..(cap as i64 + 20) {
            let x = if cycle % 2 == 0 { -0.5 } else { 0.5 };
            for _ in 0..4 {
                tracker.update(&gaze_frame(x, 0.0, true), ts, false, true);
                ts += FRAME_US;
            }
        }
        assert!(tracker.fixations().len() <= cap);
        assert!(tracker.saccades().len() <= cap);
        assert!(tracker.metrics().saccade_count > cap as u32);
    }

    #[test]
    fn test_no_face_holds_everything() {
        let mut tracker = GazeTracker::new();
        for i in 0..6 {
            tracker.update(&gaze_frame(0.0, 0.0, true), i * FRAME_US, false, true);
        }
        let before = tracker.metrics();
        let held = tracker.update(&LandmarkFrame::new(640, 480), 6 * FRAME_US, false, true);
        assert_eq!(held.fixation_count, before.fixation_count);
        assert_eq!(held.screen_attention_ratio, before.screen_attention_ratio);
        assert_eq!(held.gaze, before.gaze);
    }
}

//! Blink detection from per-eye aspect ratios.
//!
//! An eye's aspect ratio is its vertical opening over its horizontal width
//! (0, never NaN, when the width is degenerate). A blink requires both eyes
//! below the closed threshold for a configurable number of consecutive
//! frames; the first open frame ends it and emits one event. Durations over
//! the micro-sleep threshold are counted separately. The blink-rate window
//! and the duration ring are both bounded.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::landmarks::{distance, indices, LandmarkFrame};

const EYE_INDICES: [u32; 8] = [
    indices::LEFT_EYE_TOP,
    indices::LEFT_EYE_BOTTOM,
    indices::LEFT_EYE_OUTER,
    indices::LEFT_EYE_INNER,
    indices::RIGHT_EYE_TOP,
    indices::RIGHT_EYE_BOTTOM,
    indices::RIGHT_EYE_OUTER,
    indices::RIGHT_EYE_INNER,
];

/// Blink detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkConfig {
    /// Eye aspect ratio below which an eye counts as closed
    pub ear_threshold: f32,
    /// Consecutive both-closed frames required to confirm a blink
    pub consecutive_frames: u32,
    /// Trailing window for the per-minute rate, seconds
    pub rate_window_secs: f32,
    /// Blink duration above which a blink counts as a micro-sleep, ms
    pub micro_sleep_ms: f32,
    /// Number of recent blink durations retained for averaging
    pub duration_window: usize,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.2,
            consecutive_frames: 3,
            rate_window_secs: 60.0,
            micro_sleep_ms: 400.0,
            duration_window: 20,
        }
    }
}

/// Per-frame blink state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlinkState {
    /// Left eye aspect ratio (0 = closed or unavailable)
    pub left_ratio: f32,
    /// Right eye aspect ratio
    pub right_ratio: f32,
    /// A confirmed blink is currently in progress
    pub is_blinking: bool,
    /// Total blinks this session; monotone non-decreasing
    pub blink_count: u32,
    /// Duration of the most recent completed blink, ms
    pub last_duration_ms: f32,
    /// Mean over the retained duration window, ms
    pub avg_duration_ms: f32,
    /// Blinks in the trailing rate window, per minute
    pub rate_per_minute: f32,
    /// Completed blinks longer than the micro-sleep threshold; monotone
    pub micro_sleep_count: u32,
}

/// Debounced blink state machine.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    config: BlinkConfig,
    frames_below: u32,
    in_blink: bool,
    first_closed_us: i64,
    blink_count: u32,
    last_duration_ms: f32,
    micro_sleep_count: u32,
    /// Completed-blink timestamps inside the rate window
    timestamps: VecDeque<i64>,
    /// Recent completed-blink durations, ms
    durations: VecDeque<f32>,
}

impl BlinkDetector {
    pub fn new() -> Self {
        Self::with_config(BlinkConfig::default())
    }

    pub fn with_config(config: BlinkConfig) -> Self {
        Self {
            durations: VecDeque::with_capacity(config.duration_window),
            config,
            frames_below: 0,
            in_blink: false,
            first_closed_us: 0,
            blink_count: 0,
            last_duration_ms: 0.0,
            micro_sleep_count: 0,
            timestamps: VecDeque::new(),
        }
    }

    /// Process one landmark frame.
    ///
    /// Frames without a face or without the eye landmarks reset the
    /// consecutive-closed counter and abort any unconfirmed blink without
    /// emitting; counters and rates are held over.
    pub fn update(&mut self, frame: &LandmarkFrame, ts_us: i64) -> BlinkState {
        let have_eyes = frame.face_detected && frame.has_all(&EYE_INDICES);

        let (left_ratio, right_ratio) = if have_eyes {
            (
                eye_aspect_ratio(
                    frame,
                    indices::LEFT_EYE_TOP,
                    indices::LEFT_EYE_BOTTOM,
                    indices::LEFT_EYE_OUTER,
                    indices::LEFT_EYE_INNER,
                ),
                eye_aspect_ratio(
                    frame,
                    indices::RIGHT_EYE_TOP,
                    indices::RIGHT_EYE_BOTTOM,
                    indices::RIGHT_EYE_OUTER,
                    indices::RIGHT_EYE_INNER,
                ),
            )
        } else {
            (0.0, 0.0)
        };

        if have_eyes {
            let both_closed = left_ratio < self.config.ear_threshold
                && right_ratio < self.config.ear_threshold;
            self.step(both_closed, ts_us);
        } else {
            // No eye data: nothing to confirm, nothing to emit.
            self.frames_below = 0;
            self.in_blink = false;
        }

        self.evict_old_timestamps(ts_us);

        BlinkState {
            left_ratio,
            right_ratio,
            is_blinking: self.in_blink,
            blink_count: self.blink_count,
            last_duration_ms: self.last_duration_ms,
            avg_duration_ms: self.avg_duration_ms(),
            rate_per_minute: self.rate_per_minute(),
            micro_sleep_count: self.micro_sleep_count,
        }
    }

    fn step(&mut self, both_closed: bool, ts_us: i64) {
        if both_closed {
            if self.frames_below == 0 {
                // Duration is anchored at the first closed frame, not at
                // the frame where the debounce confirms the blink.
                self.first_closed_us = ts_us;
            }
            self.frames_below += 1;
            if !self.in_blink && self.frames_below >= self.config.consecutive_frames {
                self.in_blink = true;
            }
        } else {
            if self.in_blink {
                let duration_ms = (ts_us - self.first_closed_us) as f32 / 1000.0;
                self.blink_count += 1;
                self.last_duration_ms = duration_ms;
                self.timestamps.push_back(ts_us);
                self.durations.push_back(duration_ms);
                while self.durations.len() > self.config.duration_window {
                    self.durations.pop_front();
                }
                if duration_ms > self.config.micro_sleep_ms {
                    self.micro_sleep_count += 1;
                    log::debug!("micro-sleep blink: {duration_ms:.0} ms");
                } else {
                    log::debug!("blink #{}: {duration_ms:.0} ms", self.blink_count);
                }
            }
            self.in_blink = false;
            self.frames_below = 0;
        }
    }

    fn evict_old_timestamps(&mut self, ts_us: i64) {
        let window_us = (self.config.rate_window_secs * 1_000_000.0) as i64;
        while let Some(&front) = self.timestamps.front() {
            if ts_us - front > window_us {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn rate_per_minute(&self) -> f32 {
        self.timestamps.len() as f32 * 60.0 / self.config.rate_window_secs
    }

    fn avg_duration_ms(&self) -> f32 {
        if self.durations.is_empty() {
            0.0
        } else {
            self.durations.iter().sum::<f32>() / self.durations.len() as f32
        }
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }
}

impl Default for BlinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical opening over horizontal width; 0 when the width is degenerate.
pub fn eye_aspect_ratio(frame: &LandmarkFrame, top: u32, bottom: u32, outer: u32, inner: u32) -> f32 {
    let (Some(top), Some(bottom), Some(outer), Some(inner)) = (
        frame.point(top),
        frame.point(bottom),
        frame.point(outer),
        frame.point(inner),
    ) else {
        return 0.0;
    };
    let width = distance(outer, inner);
    if width <= 0.0 {
        return 0.0;
    }
    distance(top, bottom) / width
}

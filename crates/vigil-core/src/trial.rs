//! Trial-scoped aggregation of frame snapshots.
//!
//! A trial is opened and closed by external control signals (typically a
//! task front-end). While open, every frame snapshot is sampled; closing
//! seals the accumulated statistics into a [`TrialSummary`]. Exactly one
//! trial can be active at a time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vigil_signals::HeadDirection;

use crate::snapshot::FrameSnapshot;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TrialError {
    #[error("no active trial to end")]
    NoActiveTrial,
    #[error("trial id mismatch: active {active}, got {got}")]
    IdMismatch { active: u32, got: u32 },
}

/// Sealed per-trial statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub id: u32,
    pub start_us: i64,
    pub end_us: i64,
    pub duration_ms: f32,
    /// Task outcome reported by the driver, if any
    pub correct: Option<bool>,
    /// Task reaction time reported by the driver, if any
    pub reaction_time_ms: Option<f32>,
    /// Frames sampled while the trial was active
    pub samples: u32,
    /// Blinks completed during the trial
    pub blink_count: u32,
    /// Mean duration of those blinks, ms
    pub mean_blink_duration_ms: f32,
    /// Mean screen-attention ratio over the trial, as a percentage
    pub mean_gaze_on_screen_pct: f32,
    /// Most frequent head direction over the trial
    pub dominant_direction: HeadDirection,
    pub mean_attention_score: f32,
    pub mean_stress_score: f32,
}

const DIRECTIONS: [HeadDirection; 5] = [
    HeadDirection::Center,
    HeadDirection::Left,
    HeadDirection::Right,
    HeadDirection::Up,
    HeadDirection::Down,
];

fn direction_slot(direction: HeadDirection) -> usize {
    DIRECTIONS.iter().position(|&d| d == direction).unwrap_or(0)
}

#[derive(Debug, Clone)]
struct ActiveTrial {
    id: u32,
    start_us: i64,
    samples: u32,
    attention_sum: f64,
    stress_sum: f64,
    ratio_sum: f64,
    direction_counts: [u32; 5],
    blink_count_at_start: u32,
    prev_blink_count: u32,
    blink_duration_sum: f32,
}

/// Owns the active trial record, if any.
#[derive(Debug, Clone, Default)]
pub struct TrialAggregator {
    active: Option<ActiveTrial>,
}

impl TrialAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a trial. An already-running trial is discarded, not merged.
    pub fn start(&mut self, id: u32, ts_us: i64, blink_count: u32) {
        if let Some(prev) = &self.active {
            log::warn!("trial {} started while trial {} active; discarding", id, prev.id);
        }
        self.active = Some(ActiveTrial {
            id,
            start_us: ts_us,
            samples: 0,
            attention_sum: 0.0,
            stress_sum: 0.0,
            ratio_sum: 0.0,
            direction_counts: [0; 5],
            blink_count_at_start: blink_count,
            prev_blink_count: blink_count,
            blink_duration_sum: 0.0,
        });
        log::info!("trial {id} started");
    }

    /// Accumulate one frame snapshot into the active trial, if any.
    pub fn sample(&mut self, snapshot: &FrameSnapshot) {
        let Some(trial) = self.active.as_mut() else {
            return;
        };
        trial.samples += 1;
        trial.attention_sum += snapshot.derived.attention_score as f64;
        trial.stress_sum += snapshot.derived.stress_score as f64;
        trial.ratio_sum += snapshot.gaze.screen_attention_ratio as f64;
        trial.direction_counts[direction_slot(snapshot.head.direction)] += 1;

        // A blink-count increment marks a blink completed this frame; its
        // duration is the detector's last_duration.
        if snapshot.blink.blink_count > trial.prev_blink_count {
            let new = snapshot.blink.blink_count - trial.prev_blink_count;
            trial.blink_duration_sum += snapshot.blink.last_duration_ms * new as f32;
            trial.prev_blink_count = snapshot.blink.blink_count;
        }
    }

    /// Close the active trial and seal its summary.
    pub fn end(
        &mut self,
        id: u32,
        correct: Option<bool>,
        reaction_time_ms: Option<f32>,
        ts_us: i64,
    ) -> Result<TrialSummary, TrialError> {
        let active_id = self.active.as_ref().map(|t| t.id).ok_or(TrialError::NoActiveTrial)?;
        if active_id != id {
            return Err(TrialError::IdMismatch {
                active: active_id,
                got: id,
            });
        }
        // Checked above, cannot be None here.
        let trial = self.active.take().ok_or(TrialError::NoActiveTrial)?;

        let blink_count = trial.prev_blink_count - trial.blink_count_at_start;
        let mean = |sum: f64| {
            if trial.samples == 0 {
                0.0
            } else {
                (sum / trial.samples as f64) as f32
            }
        };
        // Ties go to the earlier direction, so an empty trial reads Center.
        let mut dominant = HeadDirection::Center;
        let mut best = trial.direction_counts[0];
        for (slot, &count) in trial.direction_counts.iter().enumerate().skip(1) {
            if count > best {
                best = count;
                dominant = DIRECTIONS[slot];
            }
        }

        let summary = TrialSummary {
            id,
            start_us: trial.start_us,
            end_us: ts_us,
            duration_ms: (ts_us - trial.start_us) as f32 / 1000.0,
            correct,
            reaction_time_ms,
            samples: trial.samples,
            blink_count,
            mean_blink_duration_ms: if blink_count == 0 {
                0.0
            } else {
                trial.blink_duration_sum / blink_count as f32
            },
            mean_gaze_on_screen_pct: mean(trial.ratio_sum) * 100.0,
            dominant_direction: dominant,
            mean_attention_score: mean(trial.attention_sum),
            mean_stress_score: mean(trial.stress_sum),
        };
        log::info!(
            "trial {id} ended: {} samples, {} blinks, attention {:.1}",
            summary.samples,
            summary.blink_count,
            summary.mean_attention_score
        );
        Ok(summary)
    }

    pub fn active_id(&self) -> Option<u32> {
        self.active.as_ref().map(|t| t.id)
    }
}

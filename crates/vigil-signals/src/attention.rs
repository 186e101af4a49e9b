//! Composite attention and stress scoring.
//!
//! Both scores are pure functions of the other components' current outputs.
//! All state lives in those components; calling these twice on the same
//! input gives the same answer.

use serde::{Deserialize, Serialize};

use crate::direction::HeadDirection;

/// Current-frame component outputs consumed by the scorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreInput {
    /// Smoothed gaze-on-screen fraction, in [0,1]
    pub screen_attention_ratio: f32,
    pub head_direction: HeadDirection,
    /// Direction changed this frame
    pub head_movement_event: bool,
    /// Sub-deadzone jitter this frame
    pub micro_movement_event: bool,
    pub blink_rate_per_minute: f32,
    /// Duration of the most recent completed blink, ms
    pub last_blink_duration_ms: f32,
}

impl Default for ScoreInput {
    fn default() -> Self {
        Self {
            screen_attention_ratio: 0.0,
            head_direction: HeadDirection::Center,
            head_movement_event: false,
            micro_movement_event: false,
            blink_rate_per_minute: 0.0,
            last_blink_duration_ms: 0.0,
        }
    }
}

/// Composite attention score in [0,100]; higher is more attentive.
pub fn attention_score(input: &ScoreInput) -> f32 {
    let gaze = 50.0 * input.screen_attention_ratio.clamp(0.0, 1.0);

    let mut head_stillness: f32 = if input.head_direction == HeadDirection::Center {
        30.0
    } else {
        15.0
    };
    if input.head_movement_event || input.micro_movement_event {
        head_stillness = (head_stillness - 10.0).max(0.0);
    }

    (gaze + head_stillness + blink_normalcy(input.blink_rate_per_minute)).min(100.0)
}

/// Composite stress score in [0,100]; higher is more stressed.
pub fn stress_score(input: &ScoreInput) -> f32 {
    let micro_sleep = if input.last_blink_duration_ms > 400.0 {
        30.0
    } else {
        0.0
    };

    let rate = input.blink_rate_per_minute;
    // Extreme band first so it is actually reachable.
    let rate_stress = if !(3.0..=40.0).contains(&rate) {
        30.0
    } else if !(5.0..=30.0).contains(&rate) {
        15.0
    } else {
        0.0
    };

    let mut movement: f32 = 0.0;
    if input.micro_movement_event {
        movement += 20.0;
    }
    if input.head_movement_event {
        movement += 20.0;
    }

    (micro_sleep + rate_stress + movement.min(40.0)).min(100.0)
}

/// Contribution of the blink rate to the attention score.
fn blink_normalcy(rate_per_minute: f32) -> f32 {
    if !(5.0..=40.0).contains(&rate_per_minute) {
        5.0
    } else if !(10.0..=30.0).contains(&rate_per_minute) {
        10.0
    } else {
        20.0
    }
}

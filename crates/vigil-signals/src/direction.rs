//! Head direction classification with deadzone and sliding-window hysteresis.
//!
//! Yaw beyond its threshold wins over pitch; inside both deadzones the head
//! is Center. The raw looking-at-monitor flag is debounced through a
//! fixed-size window so single-frame flicker cannot flip the output.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::pose::PoseAngles;

/// Discrete head direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadDirection {
    #[default]
    Center,
    Left,
    Right,
    Up,
    Down,
}

impl HeadDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadDirection::Center => "CENTER",
            HeadDirection::Left => "LEFT",
            HeadDirection::Right => "RIGHT",
            HeadDirection::Up => "UP",
            HeadDirection::Down => "DOWN",
        }
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Yaw deadzone in degrees
    pub yaw_threshold: f32,
    /// Pitch deadzone in degrees
    pub pitch_threshold: f32,
    /// Sliding window length in frames for the hysteretic looking flag
    pub attention_window: usize,
    /// Fraction of the window that must be raw-looking for the flag to hold
    pub attention_threshold: f32,
    /// Lower bound of the micro-movement jitter band, degrees per frame
    pub micro_movement_min_deg: f32,
    /// Upper bound of the micro-movement jitter band, degrees per frame
    pub micro_movement_max_deg: f32,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            yaw_threshold: 10.0,
            pitch_threshold: 10.0,
            attention_window: 30, // ~1 second at 30 fps
            attention_threshold: 0.7,
            micro_movement_min_deg: 1.0,
            micro_movement_max_deg: 3.0,
        }
    }
}

/// Per-frame classification result with event flags and running counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DirectionUpdate {
    pub direction: HeadDirection,
    /// This-frame deadzone test, before hysteresis
    pub raw_looking: bool,
    /// Debounced looking-at-monitor flag
    pub looking_at_monitor: bool,
    /// The classified direction changed this frame
    pub direction_changed: bool,
    /// Sub-deadzone jitter detected this frame
    pub micro_movement: bool,
    /// The hysteretic looking flag flipped this frame
    pub gaze_shift: bool,
    pub head_movement_count: u32,
    pub micro_movement_count: u32,
    pub gaze_shift_count: u32,
}

/// Hysteretic head direction classifier.
#[derive(Debug, Clone)]
pub struct DirectionClassifier {
    config: DirectionConfig,
    window: VecDeque<bool>,
    direction: HeadDirection,
    looking: bool,
    prev_pose: Option<PoseAngles>,
    head_movement_count: u32,
    micro_movement_count: u32,
    gaze_shift_count: u32,
}

impl DirectionClassifier {
    pub fn new() -> Self {
        Self::with_config(DirectionConfig::default())
    }

    pub fn with_config(config: DirectionConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.attention_window),
            config,
            direction: HeadDirection::Center,
            looking: true,
            prev_pose: None,
            head_movement_count: 0,
            micro_movement_count: 0,
            gaze_shift_count: 0,
        }
    }

    /// Classify the filtered (calibration-adjusted) pose for one frame.
    pub fn classify(&mut self, pose: PoseAngles) -> DirectionUpdate {
        let new_direction = self.direction_for(pose);
        let direction_changed = new_direction != self.direction;
        if direction_changed {
            self.head_movement_count += 1;
        }
        self.direction = new_direction;

        let micro_movement = self.is_micro_movement(pose);
        if micro_movement {
            self.micro_movement_count += 1;
        }
        self.prev_pose = Some(pose);

        let raw_looking = pose.yaw.abs() <= self.config.yaw_threshold
            && pose.pitch.abs() <= self.config.pitch_threshold;
        self.window.push_back(raw_looking);
        while self.window.len() > self.config.attention_window {
            self.window.pop_front();
        }
        let looking_frac =
            self.window.iter().filter(|&&v| v).count() as f32 / self.window.len() as f32;
        let looking = looking_frac >= self.config.attention_threshold;

        let gaze_shift = looking != self.looking;
        if gaze_shift {
            self.gaze_shift_count += 1;
        }
        self.looking = looking;

        DirectionUpdate {
            direction: self.direction,
            raw_looking,
            looking_at_monitor: looking,
            direction_changed,
            micro_movement,
            gaze_shift,
            head_movement_count: self.head_movement_count,
            micro_movement_count: self.micro_movement_count,
            gaze_shift_count: self.gaze_shift_count,
        }
    }

    /// Current state without advancing the window, for no-detection frames.
    pub fn hold(&self) -> DirectionUpdate {
        DirectionUpdate {
            direction: self.direction,
            raw_looking: self.looking,
            looking_at_monitor: self.looking,
            direction_changed: false,
            micro_movement: false,
            gaze_shift: false,
            head_movement_count: self.head_movement_count,
            micro_movement_count: self.micro_movement_count,
            gaze_shift_count: self.gaze_shift_count,
        }
    }

    fn direction_for(&self, pose: PoseAngles) -> HeadDirection {
        // Yaw takes precedence over pitch.
        if pose.yaw < -self.config.yaw_threshold {
            HeadDirection::Left
        } else if pose.yaw > self.config.yaw_threshold {
            HeadDirection::Right
        } else if pose.pitch < -self.config.pitch_threshold {
            HeadDirection::Up
        } else if pose.pitch > self.config.pitch_threshold {
            HeadDirection::Down
        } else {
            HeadDirection::Center
        }
    }

    fn is_micro_movement(&self, pose: PoseAngles) -> bool {
        let Some(prev) = self.prev_pose else {
            return false;
        };
        let yaw_diff = (pose.yaw - prev.yaw).abs();
        let pitch_diff = (pose.pitch - prev.pitch).abs();
        let in_band = |d: f32| {
            d > self.config.micro_movement_min_deg && d < self.config.micro_movement_max_deg
        };
        in_band(yaw_diff) || in_band(pitch_diff)
    }

    pub fn direction(&self) -> HeadDirection {
        self.direction
    }

    pub fn config(&self) -> &DirectionConfig {
        &self.config
    }
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

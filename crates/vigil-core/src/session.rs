//! Per-session monitoring pipeline.
//!
//! A [`MonitorSession`] owns exactly one instance of every stateful
//! component and drives them synchronously, one landmark frame at a time.
//! State never survives the session; start a new session instead of
//! resetting. The session itself is single-owner; cross-thread consumers
//! read published snapshots through [`SnapshotCell`](crate::SnapshotCell).

use vigil_signals::{
    attention_score, stress_score, BlinkDetector, CalibrationOffset, DirectionClassifier,
    GazeTracker, HeadDirection, LandmarkFrame, PoseCalibrator, PoseEstimator, PoseFilter,
    ScoreInput,
};

use crate::config::MonitorConfig;
use crate::snapshot::{DerivedScores, FrameSnapshot, HeadSnapshot};
use crate::trial::{TrialAggregator, TrialError, TrialSummary};

/// One monitoring session's pipeline state.
#[derive(Debug)]
pub struct MonitorSession {
    config: MonitorConfig,
    estimator: PoseEstimator,
    filter: PoseFilter,
    calibrator: PoseCalibrator,
    direction: DirectionClassifier,
    blink: BlinkDetector,
    gaze: GazeTracker,
    trials: TrialAggregator,
    frames_processed: u64,
    last_blink_count: u32,
}

impl MonitorSession {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            estimator: PoseEstimator::with_config(config.pose.clone()),
            filter: PoseFilter::with_config(config.filter.clone()),
            calibrator: PoseCalibrator::with_config(config.calibration.clone()),
            direction: DirectionClassifier::with_config(config.direction.clone()),
            blink: BlinkDetector::with_config(config.blink.clone()),
            gaze: GazeTracker::with_config(config.gaze.clone()),
            trials: TrialAggregator::new(),
            frames_processed: 0,
            last_blink_count: 0,
            config,
        }
    }

    /// Process one landmark frame through the whole pipeline.
    ///
    /// Never fails: each component degrades to neutral or held-over values
    /// when its landmarks are missing, and a failure mode in one signal
    /// (e.g. no iris) does not suppress the others.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, ts_us: i64) -> FrameSnapshot {
        let estimate = self.estimator.estimate(frame);
        let raw = estimate.angles;

        if estimate.detected {
            self.calibrator.process(raw, ts_us);
        }

        // Pose branch: calibrate, filter, classify. No-detection frames
        // hold the filter and classifier instead of feeding them zeros.
        let (filtered, dir) = if estimate.detected {
            let adjusted = self.calibrator.apply(raw);
            let filtered = self.filter.update(adjusted);
            (filtered, self.direction.classify(filtered))
        } else {
            (self.filter.current(), self.direction.hold())
        };

        // Blink branch, then gaze (which consumes the blinking flag and the
        // Center-direction bounds loosening).
        let blink = self.blink.update(frame, ts_us);
        let gaze = self.gaze.update(
            frame,
            ts_us,
            blink.is_blinking,
            dir.direction == HeadDirection::Center,
        );

        let score_input = ScoreInput {
            screen_attention_ratio: gaze.screen_attention_ratio,
            head_direction: dir.direction,
            head_movement_event: dir.direction_changed,
            micro_movement_event: dir.micro_movement,
            blink_rate_per_minute: blink.rate_per_minute,
            last_blink_duration_ms: blink.last_duration_ms,
        };
        let derived = DerivedScores {
            attention_score: attention_score(&score_input),
            stress_score: stress_score(&score_input),
        };

        self.frames_processed += 1;
        self.last_blink_count = blink.blink_count;

        let snapshot = FrameSnapshot {
            timestamp_us: ts_us,
            trial_id: self.trials.active_id(),
            face_detected: estimate.detected,
            blink,
            gaze,
            head: HeadSnapshot {
                raw,
                filtered,
                direction: dir.direction,
                looking_at_monitor: dir.looking_at_monitor,
                head_movement_count: dir.head_movement_count,
                micro_movement_count: dir.micro_movement_count,
                gaze_shift_count: dir.gaze_shift_count,
            },
            derived,
        };
        self.trials.sample(&snapshot);
        snapshot
    }

    /// Begin (or restart) pose calibration.
    pub fn start_calibration(&mut self, ts_us: i64) {
        self.calibrator.start(ts_us);
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    /// The active baseline offset; zero until calibration completes.
    pub fn calibration_offset(&self) -> CalibrationOffset {
        self.calibrator.offset()
    }

    /// Open a trial; snapshots are sampled into it until it is ended.
    pub fn start_trial(&mut self, id: u32, ts_us: i64) {
        self.trials.start(id, ts_us, self.last_blink_count);
    }

    /// Close the active trial and return its summary.
    pub fn end_trial(
        &mut self,
        id: u32,
        correct: Option<bool>,
        reaction_time_ms: Option<f32>,
        ts_us: i64,
    ) -> Result<TrialSummary, TrialError> {
        self.trials.end(id, correct, reaction_time_ms, ts_us)
    }

    pub fn active_trial(&self) -> Option<u32> {
        self.trials.active_id()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl Default for MonitorSession {
    fn default() -> Self {
        Self::new()
    }
}

//! # vigil-core
//!
//! Session engine over the [`vigil_signals`] component pipeline: owns one
//! instance of every stateful signal component, drives them synchronously
//! per landmark frame, and emits a [`FrameSnapshot`] per frame. Also hosts
//! trial aggregation, aggregate configuration, and the single-writer
//! snapshot publishing cell for cross-thread consumers.
//!
//! ```ignore
//! use vigil_core::{MonitorConfig, MonitorSession};
//!
//! let mut session = MonitorSession::with_config(MonitorConfig::default());
//! session.start_calibration(ts_us);
//! for (frame, ts_us) in landmark_stream {
//!     let snapshot = session.process_frame(&frame, ts_us);
//!     cell.publish(snapshot);
//! }
//! ```

pub mod config;
pub mod publish;
pub mod session;
pub mod snapshot;
pub mod trial;

#[cfg(test)]
pub mod tests_proptest;

pub use config::{ConfigError, MonitorConfig};
pub use publish::SnapshotCell;
pub use session::MonitorSession;
pub use snapshot::{DerivedScores, FrameSnapshot, HeadSnapshot};
pub use trial::{TrialAggregator, TrialError, TrialSummary};

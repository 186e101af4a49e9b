//! Single-writer/many-reader snapshot publishing.
//!
//! The pipeline thread publishes each completed [`FrameSnapshot`] by
//! atomically swapping in a new `Arc`; readers on other threads clone the
//! `Arc` and get an immutable, internally consistent view. No reader ever
//! observes a half-written snapshot.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::snapshot::FrameSnapshot;

/// Atomically published latest-snapshot cell.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    inner: RwLock<Arc<FrameSnapshot>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new snapshot, replacing the previous one.
    pub fn publish(&self, snapshot: FrameSnapshot) {
        *self.inner.write() = Arc::new(snapshot);
    }

    /// The most recently published snapshot. Cheap; clones only the `Arc`.
    pub fn latest(&self) -> Arc<FrameSnapshot> {
        self.inner.read().clone()
    }
}

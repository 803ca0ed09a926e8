//! Thread-safe tracking state shared across the pipeline.
//!
//! This is the only shared mutable state in the crate. Access pattern:
//! - Tracking thread: writes the tracked flag on success, writes the
//!   odometry stamp and the cached map→odom transform on odometry samples
//! - Publisher thread: reads the tracked flag and the odometry stamp
//!
//! Every access goes through a guarded method that holds the lock for the
//! duration of the field copy only, never across an engine call. No method
//! hands out the lock guard.

use std::sync::{Arc, Mutex};

use crate::core::types::TransformStamped;

/// Fields behind the lock.
#[derive(Debug, Clone)]
struct TrackingFields {
    /// Stamp of the most recent odometry sample, microseconds since epoch
    last_odom_stamp_us: u64,
    /// Most recently derived map→odom transform
    map_to_odom: TransformStamped,
    /// Whether tracking has ever succeeded
    tracked_ever: bool,
}

/// Shared tracking state behind a single mutex.
///
/// Starts untracked with an identity map→odom transform. Downstream
/// publishers emit nothing until the first successful tracking step flips
/// `tracked_ever`; the flag never goes back to false.
#[derive(Debug)]
pub struct SharedTracking {
    inner: Mutex<TrackingFields>,
}

impl SharedTracking {
    /// Create untracked state with an identity transform between the given
    /// frames.
    pub fn new(global_frame: &str, odom_frame: &str) -> Self {
        Self {
            inner: Mutex::new(TrackingFields {
                last_odom_stamp_us: 0,
                map_to_odom: TransformStamped::identity(global_frame, odom_frame),
                tracked_ever: false,
            }),
        }
    }

    /// Record that a tracking step succeeded.
    pub fn mark_tracked(&self) {
        self.lock().tracked_ever = true;
    }

    /// Whether tracking has ever succeeded.
    pub fn tracked_ever(&self) -> bool {
        self.lock().tracked_ever
    }

    /// Record the stamp of an odometry sample.
    pub fn record_odom_stamp(&self, stamp_us: u64) {
        self.lock().last_odom_stamp_us = stamp_us;
    }

    /// Stamp of the most recent odometry sample.
    pub fn last_odom_stamp_us(&self) -> u64 {
        self.lock().last_odom_stamp_us
    }

    /// Cache a freshly derived map→odom transform.
    pub fn store_transform(&self, transform: TransformStamped) {
        self.lock().map_to_odom = transform;
    }

    /// Copy of the cached map→odom transform.
    pub fn cached_transform(&self) -> TransformStamped {
        self.lock().map_to_odom.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackingFields> {
        // A poisoned lock means a writer panicked mid-update; the state can
        // no longer be trusted.
        self.inner.lock().expect("shared tracking lock poisoned")
    }
}

/// Handle type for shared tracking state.
pub type SharedTrackingHandle = Arc<SharedTracking>;

/// Create a new shared tracking state handle.
pub fn create_shared_tracking(global_frame: &str, odom_frame: &str) -> SharedTrackingHandle {
    Arc::new(SharedTracking::new(global_frame, odom_frame))
}

//! Sensor sample types.
//!
//! Each sample carries a monotonically non-decreasing timestamp within its
//! own stream. No ordering is assumed across streams; the approximate-time
//! synchronizer is the only place cross-stream order matters.
//!
//! Timestamps are in microseconds since epoch.

use serde::{Deserialize, Serialize};

use super::Pose3D;

/// A single image from the color or depth stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Originating camera frame id
    pub frame_id: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Pixel encoding (e.g. "rgb8", "16UC1")
    pub encoding: String,
    /// Raw pixel data
    pub data: Vec<u8>,
}

/// A single inertial measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InertialSample {
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Angular velocity in rad/s (x, y, z)
    pub angular_velocity: [f64; 3],
    /// Linear acceleration in m/s² (x, y, z)
    pub linear_acceleration: [f64; 3],
}

/// A wheel odometry sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdometrySample {
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Frame the pose is expressed in (e.g. "odom")
    pub frame_id: String,
    /// Frame the pose is of (e.g. "base_link")
    pub child_frame_id: String,
    /// Dead-reckoned pose
    pub pose: Pose3D,
}

/// An unordered 3D point cloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud {
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Frame the points are expressed in
    pub frame_id: String,
    /// Points as (x, y, z) in meters
    pub points: Vec<[f32; 3]>,
}

impl PointCloud {
    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the cloud holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A color/depth pair judged close enough in time to track against.
///
/// Produced by the approximate-time synchronizer, consumed exactly once by
/// the tracking orchestrator, then discarded.
#[derive(Debug, Clone)]
pub struct SyncedFramePair {
    /// Color image
    pub color: ImageFrame,
    /// Depth image
    pub depth: ImageFrame,
    /// Midpoint of the two image stamps, microseconds since epoch
    pub timestamp_us: u64,
}

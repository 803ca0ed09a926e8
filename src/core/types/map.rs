//! Map-side message types: snapshots, transforms, and traversability grids.
//!
//! Map content is owned by the tracking engine. This crate requests and
//! forwards these messages; it never mutates snapshot content.

use serde::{Deserialize, Serialize};

use super::Pose3D;

/// A stamped transform between two named frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformStamped {
    /// Parent frame id
    pub parent_frame: String,
    /// Child frame id
    pub child_frame: String,
    /// Rigid transform from parent to child
    pub transform: Pose3D,
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
}

impl TransformStamped {
    /// Identity transform between the given frames, stamped at zero.
    pub fn identity(parent_frame: &str, child_frame: &str) -> Self {
        Self {
            parent_frame: parent_frame.to_string(),
            child_frame: child_frame.to_string(),
            transform: Pose3D::identity(),
            timestamp_us: 0,
        }
    }
}

/// An engine-retained historical frame used as a landmark anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyframeData {
    /// Engine-assigned keyframe id
    pub id: u32,
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Keyframe pose in the map frame
    pub pose: Pose3D,
}

/// Landmarks observed from one keyframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyframeLandmarks {
    /// Anchoring keyframe id
    pub keyframe_id: u32,
    /// Landmark positions as (x, y, z) in the map frame
    pub points: Vec<[f32; 3]>,
}

/// A snapshot of the engine's map state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// Keyframe poses
    pub keyframes: Vec<KeyframeData>,
    /// Per-keyframe landmark sets (empty unless tracked points were
    /// requested)
    pub landmarks: Vec<KeyframeLandmarks>,
}

impl MapSnapshot {
    /// True when the snapshot holds neither keyframes nor landmarks.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty() && self.landmarks.is_empty()
    }
}

/// Occupancy grid message (row-major cells, -1 unknown, 0..100 occupancy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyGrid {
    /// Frame the grid origin is expressed in
    pub frame_id: String,
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Cell edge length in meters
    pub resolution: f32,
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// World X coordinate of cell (0, 0)
    pub origin_x: f64,
    /// World Y coordinate of cell (0, 0)
    pub origin_y: f64,
    /// Row-major occupancy values
    pub cells: Vec<i8>,
}

/// One named layer of a structured grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLayer {
    /// Layer name (e.g. "elevation", "traversability")
    pub name: String,
    /// Row-major layer values
    pub data: Vec<f32>,
}

/// Multi-layer structured grid message for traversability output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredGrid {
    /// Frame the grid is expressed in
    pub frame_id: String,
    /// Timestamp in microseconds since epoch
    pub timestamp_us: u64,
    /// Cell edge length in meters
    pub resolution: f32,
    /// Grid extent along X in meters
    pub length_x: f32,
    /// Grid extent along Y in meters
    pub length_y: f32,
    /// Named data layers
    pub layers: Vec<GridLayer>,
}

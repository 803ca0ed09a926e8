//! Tracking engine boundary.
//!
//! The visual tracking/mapping engine is an external collaborator. This
//! module specifies the operations the fusion layer relies on and provides
//! the backend factory. The engine's internals (feature matching, bundle
//! adjustment, loop closure) live behind this trait and are never reached
//! around it.

pub mod mock;

use std::sync::Arc;

use crate::config::FusionConfig;
use crate::core::types::{
    ImageFrame, InertialSample, MapSnapshot, OccupancyGrid, OdometrySample, PointCloud, Pose3D,
    StructuredGrid, TransformStamped,
};
use crate::error::{FusionError, Result};

pub use mock::MockTrackingEngine;

/// Result of one tracking step.
#[derive(Debug, Clone)]
pub struct TrackingOutcome {
    /// Estimated camera pose (last known pose when tracking failed)
    pub pose: Pose3D,
    /// Whether the engine produced a pose for this frame pair
    pub tracked: bool,
}

/// Operations the fusion layer requires from a tracking/mapping engine.
///
/// Implementations must be internally synchronized: export operations may be
/// called concurrently with each other and with sample ingestion. The one
/// exception is [`track_fused_frame`](TrackingEngine::track_fused_frame),
/// which callers must not invoke concurrently with itself; the tracking
/// thread is the single caller in this crate's wiring.
pub trait TrackingEngine: Send + Sync {
    /// Run one tracking step against a synchronized color/depth pair.
    fn track_fused_frame(&self, color: &ImageFrame, depth: &ImageFrame) -> TrackingOutcome;

    /// Feed one inertial sample into the engine's measurement queue.
    fn ingest_inertial_sample(&self, sample: &InertialSample);

    /// Feed one auxiliary point cloud (traversability capability only).
    fn ingest_point_cloud(&self, cloud: &PointCloud);

    /// Derive the current map→odom transform from an odometry sample.
    fn derive_map_to_odom(&self, odom: &OdometrySample) -> TransformStamped;

    /// Export a map snapshot.
    ///
    /// `all_keyframes` selects every keyframe versus the active window;
    /// `tracked_points` includes per-keyframe landmarks; `keyframe_filter`
    /// restricts which keyframes' landmarks are included.
    fn export_map_snapshot(
        &self,
        all_keyframes: bool,
        tracked_points: bool,
        keyframe_filter: Option<&[u32]>,
    ) -> MapSnapshot;

    /// Export the current map points as a point cloud.
    fn export_point_cloud(&self) -> PointCloud;

    /// Export the traversability grid pair (occupancy + structured).
    fn export_traversability_grid(&self) -> (OccupancyGrid, StructuredGrid);
}

/// Startup parameters handed to an engine backend.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Engine-side viewer flag
    pub use_viewer: bool,
    /// Secondary viewer flag
    pub secondary_viewer: bool,
    /// Global map frame id
    pub global_frame: String,
    /// Odometry frame id
    pub odom_frame: String,
    /// Static robot origin X offset in the global frame
    pub robot_origin_x: f64,
    /// Static robot origin Y offset in the global frame
    pub robot_origin_y: f64,
    /// Vocabulary file path, for backends that need one
    pub vocabulary: Option<String>,
    /// Engine settings file path, for backends that need one
    pub settings_file: Option<String>,
}

impl EngineSettings {
    /// Collect engine-facing settings from the loaded configuration.
    pub fn from_config(config: &FusionConfig) -> Self {
        Self {
            use_viewer: config.visualization.enabled,
            secondary_viewer: config.visualization.secondary,
            global_frame: config.frames.global_frame.clone(),
            odom_frame: config.frames.odom_frame.clone(),
            robot_origin_x: config.robot.origin_x,
            robot_origin_y: config.robot.origin_y,
            vocabulary: config.engine.vocabulary.clone(),
            settings_file: config.engine.settings.clone(),
        }
    }
}

/// Construct the configured engine backend.
///
/// Engine construction is the only fatal startup condition in this crate:
/// an unknown backend aborts startup rather than running degraded.
pub fn create_engine(config: &FusionConfig) -> Result<Arc<dyn TrackingEngine>> {
    let settings = EngineSettings::from_config(config);
    match config.engine.backend.as_str() {
        "mock" => Ok(Arc::new(MockTrackingEngine::new(settings))),
        other => Err(FusionError::Engine(format!(
            "unknown engine backend: {}",
            other
        ))),
    }
}

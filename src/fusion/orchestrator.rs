//! Tracking orchestration: drives the engine from synchronized sensor input
//! and fans results out to the publication channels.

use std::sync::Arc;

use crate::core::types::{InertialSample, OdometrySample, PointCloud, SyncedFramePair};
use crate::engine::TrackingEngine;
use crate::publish::OutputBus;
use crate::state::SharedTrackingHandle;

/// Consumes sensor samples and invokes the engine.
///
/// Handler contracts are independent of how the host delivers invocations
/// (channel, queue, or direct call). `on_frame_pair` must not be invoked
/// concurrently with itself; in this crate's wiring the tracking thread is
/// its single caller.
pub struct TrackingOrchestrator {
    engine: Arc<dyn TrackingEngine>,
    shared: SharedTrackingHandle,
    outputs: OutputBus,
    visualization: bool,
}

impl TrackingOrchestrator {
    pub fn new(
        engine: Arc<dyn TrackingEngine>,
        shared: SharedTrackingHandle,
        outputs: OutputBus,
        visualization: bool,
    ) -> Self {
        Self {
            engine,
            shared,
            outputs,
            visualization,
        }
    }

    /// Process one synchronized color/depth pair.
    ///
    /// On success, records the tracked flag, re-broadcasts the cached
    /// map→odom transform verbatim, and, when visualization is enabled,
    /// publishes the current map points. Tracking failure is an expected
    /// non-event: no state change, no publication.
    pub fn on_frame_pair(&self, pair: &SyncedFramePair) {
        let outcome = self.engine.track_fused_frame(&pair.color, &pair.depth);
        if !outcome.tracked {
            log::debug!("Tracking failed for frame pair at {} us", pair.timestamp_us);
            return;
        }

        self.shared.mark_tracked();
        self.outputs
            .transform_tx
            .send(self.shared.cached_transform())
            .ok();

        if self.visualization {
            let cloud = self.engine.export_point_cloud();
            self.outputs.map_points_tx.send(cloud).ok();
        }
    }

    /// Forward an inertial sample to the engine.
    pub fn on_inertial_sample(&self, sample: &InertialSample) {
        self.engine.ingest_inertial_sample(sample);
    }

    /// Process an odometry sample.
    ///
    /// Records the sample stamp, then derives and caches the current
    /// map→odom transform. Sole writer of the cached transform. The shared
    /// lock is released before the engine call.
    pub fn on_odometry_sample(&self, sample: &OdometrySample) {
        self.shared.record_odom_stamp(sample.timestamp_us);
        let transform = self.engine.derive_map_to_odom(sample);
        self.shared.store_transform(transform);
    }

    /// Forward an auxiliary point cloud to the engine (traversability
    /// capability only).
    pub fn on_point_cloud(&self, cloud: &PointCloud) {
        self.engine.ingest_point_cloud(cloud);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FusionConfig;
    use crate::core::types::{ImageFrame, Pose3D};
    use crate::engine::{EngineSettings, MockTrackingEngine};
    use crate::publish::{OutputReceivers, create_output_bus};
    use crate::state::create_shared_tracking;

    fn frame(timestamp_us: u64) -> ImageFrame {
        ImageFrame {
            timestamp_us,
            frame_id: "camera".to_string(),
            width: 2,
            height: 2,
            encoding: "rgb8".to_string(),
            data: vec![0; 4],
        }
    }

    fn pair(timestamp_us: u64) -> SyncedFramePair {
        SyncedFramePair {
            color: frame(timestamp_us),
            depth: frame(timestamp_us),
            timestamp_us,
        }
    }

    fn odom(timestamp_us: u64, x: f64) -> OdometrySample {
        OdometrySample {
            timestamp_us,
            frame_id: "odom".to_string(),
            child_frame_id: "base_link".to_string(),
            pose: Pose3D::from_xyz(x, 0.0, 0.0),
        }
    }

    fn setup(
        settle_frames: u32,
        visualization: bool,
    ) -> (
        Arc<MockTrackingEngine>,
        TrackingOrchestrator,
        OutputReceivers,
    ) {
        let engine = Arc::new(
            MockTrackingEngine::new(EngineSettings::from_config(&FusionConfig::default()))
                .with_settle_frames(settle_frames),
        );
        let shared = create_shared_tracking("map", "odom");
        let (bus, receivers) = create_output_bus();
        let orchestrator =
            TrackingOrchestrator::new(engine.clone(), shared, bus, visualization);
        (engine, orchestrator, receivers)
    }

    #[test]
    fn test_tracking_failure_publishes_nothing() {
        let (_, orchestrator, receivers) = setup(10, true);

        orchestrator.on_frame_pair(&pair(100));
        orchestrator.on_frame_pair(&pair(200));

        assert!(!orchestrator.shared.tracked_ever());
        assert!(receivers.transform_rx.is_empty());
        assert!(receivers.map_points_rx.is_empty());
    }

    #[test]
    fn test_tracking_success_broadcasts_cached_transform() {
        let (_, orchestrator, receivers) = setup(0, false);

        orchestrator.on_odometry_sample(&odom(10, 0.5));
        orchestrator.on_frame_pair(&pair(100));

        assert!(orchestrator.shared.tracked_ever());
        let tf = receivers.transform_rx.recv().unwrap();
        assert_eq!(tf.timestamp_us, 10);

        // A newer odometry update refreshes the broadcast value.
        orchestrator.on_odometry_sample(&odom(20, 0.75));
        orchestrator.on_frame_pair(&pair(200));
        let tf = receivers.transform_rx.recv().unwrap();
        assert_eq!(tf.timestamp_us, 20);
    }

    #[test]
    fn test_point_cloud_gated_on_visualization() {
        let (_, orchestrator, receivers) = setup(0, false);
        orchestrator.on_frame_pair(&pair(100));
        assert!(receivers.map_points_rx.is_empty());

        let (_, orchestrator, receivers) = setup(0, true);
        orchestrator.on_frame_pair(&pair(100));
        assert_eq!(receivers.map_points_rx.len(), 1);
    }

    #[test]
    fn test_samples_forwarded_in_order() {
        let (engine, orchestrator, _receivers) = setup(0, false);

        for t in [5u64, 10, 15, 20] {
            orchestrator.on_inertial_sample(&InertialSample {
                timestamp_us: t,
                angular_velocity: [0.0, 0.0, 0.1],
                linear_acceleration: [0.0, 0.0, 9.81],
            });
        }

        assert_eq!(engine.inertial_stamps(), vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_point_cloud_forwarded_to_engine() {
        let (engine, orchestrator, _receivers) = setup(0, false);
        orchestrator.on_point_cloud(&PointCloud {
            timestamp_us: 1,
            frame_id: "velodyne".to_string(),
            points: vec![[1.0, 2.0, 3.0]],
        });
        assert_eq!(engine.clouds_ingested(), 1);
    }
}

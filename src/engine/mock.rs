//! Mock tracking engine for hardware-free runs and tests.
//!
//! Simulates the externally observable behavior of a visual tracking engine
//! with fully deterministic output:
//!
//! | Operation | Simulation |
//! |-----------|------------|
//! | Tracking | Fails for the first `settle_frames` pairs, then succeeds |
//! | Pose | Advances 1 cm along +x per successful step |
//! | Keyframes | One every 5th successful step, 3 landmarks each |
//! | map→odom | Last tracked pose composed with the inverse odometry pose |
//! | Grids | Fixed 4x4 occupancy patch plus one elevation layer |
//!
//! The mock also counts ingested samples so tests can assert forwarding
//! behavior.

use std::sync::Mutex;

use crate::core::types::{
    GridLayer, ImageFrame, InertialSample, KeyframeData, KeyframeLandmarks, MapSnapshot,
    OccupancyGrid, OdometrySample, PointCloud, Pose3D, StructuredGrid, TransformStamped,
};

use super::{EngineSettings, TrackingEngine, TrackingOutcome};

/// Successful steps between keyframe creations.
const KEYFRAME_STRIDE: u32 = 5;

/// Keyframes considered "active" when a snapshot excludes the full set.
const ACTIVE_WINDOW: usize = 20;

/// Deterministic in-process tracking engine.
pub struct MockTrackingEngine {
    settings: EngineSettings,
    settle_frames: u32,
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    frames_seen: u32,
    successes: u32,
    last_stamp_us: u64,
    last_pose: Pose3D,
    keyframes: Vec<KeyframeData>,
    landmarks: Vec<KeyframeLandmarks>,
    inertial_stamps: Vec<u64>,
    clouds_ingested: usize,
}

impl MockTrackingEngine {
    /// Create a mock engine that settles after two frame pairs.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            settle_frames: 2,
            inner: Mutex::new(MockState {
                last_pose: Pose3D::identity(),
                ..MockState::default()
            }),
        }
    }

    /// Override how many frame pairs fail before tracking settles.
    pub fn with_settle_frames(mut self, settle_frames: u32) -> Self {
        self.settle_frames = settle_frames;
        self
    }

    /// Total tracking attempts so far.
    pub fn tracking_attempts(&self) -> u32 {
        self.lock().frames_seen
    }

    /// Timestamps of every ingested inertial sample, in arrival order.
    pub fn inertial_stamps(&self) -> Vec<u64> {
        self.lock().inertial_stamps.clone()
    }

    /// Number of ingested auxiliary point clouds.
    pub fn clouds_ingested(&self) -> usize {
        self.lock().clouds_ingested
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.inner.lock().expect("mock engine lock poisoned")
    }
}

impl TrackingEngine for MockTrackingEngine {
    fn track_fused_frame(&self, color: &ImageFrame, _depth: &ImageFrame) -> TrackingOutcome {
        let mut state = self.lock();
        state.frames_seen += 1;
        state.last_stamp_us = color.timestamp_us;

        if state.frames_seen <= self.settle_frames {
            return TrackingOutcome {
                pose: state.last_pose,
                tracked: false,
            };
        }

        state.successes += 1;
        state.last_pose = state.last_pose.compose(&Pose3D::from_xyz(0.01, 0.0, 0.0));

        if (state.successes - 1) % KEYFRAME_STRIDE == 0 {
            let id = state.keyframes.len() as u32;
            let pose = state.last_pose;
            state.keyframes.push(KeyframeData {
                id,
                timestamp_us: color.timestamp_us,
                pose,
            });
            let base = id as f32;
            state.landmarks.push(KeyframeLandmarks {
                keyframe_id: id,
                points: vec![
                    [base, 0.0, 1.0],
                    [base, 0.5, 1.0],
                    [base, 1.0, 1.0],
                ],
            });
        }

        TrackingOutcome {
            pose: state.last_pose,
            tracked: true,
        }
    }

    fn ingest_inertial_sample(&self, sample: &InertialSample) {
        self.lock().inertial_stamps.push(sample.timestamp_us);
    }

    fn ingest_point_cloud(&self, _cloud: &PointCloud) {
        self.lock().clouds_ingested += 1;
    }

    fn derive_map_to_odom(&self, odom: &OdometrySample) -> TransformStamped {
        let state = self.lock();
        TransformStamped {
            parent_frame: self.settings.global_frame.clone(),
            child_frame: self.settings.odom_frame.clone(),
            transform: state.last_pose.compose(&odom.pose.inverse()),
            timestamp_us: odom.timestamp_us,
        }
    }

    fn export_map_snapshot(
        &self,
        all_keyframes: bool,
        tracked_points: bool,
        keyframe_filter: Option<&[u32]>,
    ) -> MapSnapshot {
        let state = self.lock();

        let keyframes: Vec<KeyframeData> = if all_keyframes {
            state.keyframes.clone()
        } else {
            let skip = state.keyframes.len().saturating_sub(ACTIVE_WINDOW);
            state.keyframes[skip..].to_vec()
        };

        let landmarks = if tracked_points {
            state
                .landmarks
                .iter()
                .filter(|lm| match keyframe_filter {
                    Some(ids) if !ids.is_empty() => ids.contains(&lm.keyframe_id),
                    _ => keyframes.iter().any(|kf| kf.id == lm.keyframe_id),
                })
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        MapSnapshot {
            keyframes,
            landmarks,
        }
    }

    fn export_point_cloud(&self) -> PointCloud {
        let state = self.lock();
        PointCloud {
            timestamp_us: state.last_stamp_us,
            frame_id: self.settings.global_frame.clone(),
            points: state
                .landmarks
                .iter()
                .flat_map(|lm| lm.points.iter().copied())
                .collect(),
        }
    }

    fn export_traversability_grid(&self) -> (OccupancyGrid, StructuredGrid) {
        let mut cells = vec![0i8; 16];
        cells[5] = 100;
        let grid = OccupancyGrid {
            frame_id: self.settings.global_frame.clone(),
            timestamp_us: 0,
            resolution: 0.05,
            width: 4,
            height: 4,
            origin_x: -0.1,
            origin_y: -0.1,
            cells,
        };
        let structured = StructuredGrid {
            frame_id: self.settings.global_frame.clone(),
            timestamp_us: 0,
            resolution: 0.05,
            length_x: 0.2,
            length_y: 0.2,
            layers: vec![GridLayer {
                name: "elevation".to_string(),
                data: vec![0.0; 16],
            }],
        };
        (grid, structured)
    }
}

//! Drishti-Fusion - sensor fusion front-end for RGBD visual SLAM
//!
//! Real-time orchestration layer between asynchronously arriving sensor
//! streams (color, depth, inertial, wheel odometry, optional point cloud)
//! and an external visual tracking/mapping engine. It pairs the camera
//! streams by approximate timestamp, drives the engine's tracking step,
//! maintains the derived map→odom transform, and exposes the engine's map
//! state on event-driven, timer-driven, and on-demand cadences.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    threads/                         │  ← Scheduling
//! │      (tracking, map publisher, query server)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              fusion/  sync/  publish/               │  ← Orchestration
//! │   (orchestrator, frame pairing, output channels)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 engine/  state/                     │  ← Boundaries
//! │        (engine trait + mock, shared state)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │            (samples, poses, map messages)           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The tracking/mapping algorithm itself lives behind the
//! [`TrackingEngine`] trait; the host transport feeds the sensor channels
//! and drains the output channels.

// Layer 1: Core foundation (no internal deps)
pub mod core;

// Layer 2: Boundaries (engine contract, shared state)
pub mod engine;
pub mod state;

// Layer 3: Orchestration (pairing, handlers, publication)
pub mod fusion;
pub mod publish;
pub mod sync;

// Layer 4: Scheduling and process concerns
pub mod config;
pub mod error;
pub mod sim;
pub mod threads;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::{FusionConfig, SyncConfig, TimerConfig};
pub use crate::core::types::{
    GridLayer, ImageFrame, InertialSample, KeyframeData, KeyframeLandmarks, MapSnapshot,
    OccupancyGrid, OdometrySample, PointCloud, Pose3D, StructuredGrid, SyncedFramePair,
    TransformStamped,
};
pub use engine::{
    EngineSettings, MockTrackingEngine, TrackingEngine, TrackingOutcome, create_engine,
};
pub use error::{FusionError, Result};
pub use fusion::TrackingOrchestrator;
pub use publish::{
    MapDataPublisher, MapQueryRequest, MapQueryServer, OutputBus, OutputReceivers, QueryReceiver,
    QuerySender, QueryWithResponse, TraversabilityPublisher, create_output_bus,
    create_query_channel, query_map_sync,
};
pub use sim::SimDriver;
pub use state::{SharedTracking, SharedTrackingHandle, create_shared_tracking};
pub use sync::ApproxTimeSync;
pub use threads::{
    MapPublisherThread, MapQueryThread, SensorReceivers, SensorSenders, TrackingThread,
    create_sensor_channels,
};

//! Tracking Pipeline Integration Tests
//!
//! Exercises the threaded pipeline end-to-end against the mock engine:
//! - Publication gating on the first successful tracking step
//! - Transform broadcasts reflecting the latest odometry-derived value
//! - Synchronous queries answering independently of the periodic publisher
//!
//! Run with: `cargo test --test pipeline`

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use drishti_fusion::{
    EngineSettings, FusionConfig, ImageFrame, MapDataPublisher, MapPublisherThread,
    MapQueryRequest, MapQueryServer, MapQueryThread, MockTrackingEngine, OdometrySample,
    Pose3D, SyncConfig, TimerConfig, TrackingEngine, TrackingOrchestrator, TrackingThread,
    create_output_bus, create_query_channel, create_sensor_channels, create_shared_tracking,
    query_map_sync,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn mock_engine(settle_frames: u32) -> Arc<MockTrackingEngine> {
    let settings = EngineSettings::from_config(&FusionConfig::default());
    Arc::new(MockTrackingEngine::new(settings).with_settle_frames(settle_frames))
}

fn frame(timestamp_us: u64) -> ImageFrame {
    ImageFrame {
        timestamp_us,
        frame_id: "camera".to_string(),
        width: 4,
        height: 4,
        encoding: "rgb8".to_string(),
        data: vec![0; 48],
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

/// Let the tracking thread drain its channels.
fn settle() {
    thread::sleep(Duration::from_millis(50));
}

// ============================================================================
// Test: Tracking Thread End-to-End
// ============================================================================

#[test]
fn test_transform_broadcast_follows_latest_odometry() {
    let engine = mock_engine(0);
    let shared = create_shared_tracking("map", "odom");
    let (bus, outputs) = create_output_bus();
    let (sensor_tx, sensor_rx) = create_sensor_channels(false);
    let running = Arc::new(AtomicBool::new(true));

    let orchestrator = TrackingOrchestrator::new(engine.clone(), shared.clone(), bus, false);
    let tracking = TrackingThread::spawn(
        SyncConfig::default(),
        orchestrator,
        sensor_rx,
        running.clone(),
    );

    // First odometry update, then a matching frame pair.
    sensor_tx.odometry_tx.send(odom(10, 0.5)).unwrap();
    settle();
    sensor_tx.color_tx.send(frame(100_000)).unwrap();
    sensor_tx.depth_tx.send(frame(101_000)).unwrap();

    let tf = outputs
        .transform_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("first transform broadcast");
    assert_eq!(tf.timestamp_us, 10);
    assert_eq!(tf.parent_frame, "map");
    assert_eq!(tf.child_frame, "odom");

    // Newer odometry, then another pair: the broadcast must follow.
    sensor_tx.odometry_tx.send(odom(20, 0.75)).unwrap();
    settle();
    sensor_tx.color_tx.send(frame(200_000)).unwrap();
    sensor_tx.depth_tx.send(frame(201_000)).unwrap();

    let tf = outputs
        .transform_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("second transform broadcast");
    assert_eq!(tf.timestamp_us, 20);

    running.store(false, Ordering::Relaxed);
    tracking.join().unwrap();
}

#[test]
fn test_no_broadcast_while_tracking_fails() {
    let engine = mock_engine(u32::MAX);
    let shared = create_shared_tracking("map", "odom");
    let (bus, outputs) = create_output_bus();
    let (sensor_tx, sensor_rx) = create_sensor_channels(false);
    let running = Arc::new(AtomicBool::new(true));

    let orchestrator = TrackingOrchestrator::new(engine.clone(), shared.clone(), bus, true);
    let tracking = TrackingThread::spawn(
        SyncConfig::default(),
        orchestrator,
        sensor_rx,
        running.clone(),
    );

    for i in 0..5u64 {
        sensor_tx.color_tx.send(frame(i * 50_000)).unwrap();
        sensor_tx.depth_tx.send(frame(i * 50_000 + 1_000)).unwrap();
    }
    settle();

    // The engine saw every pair but never produced a pose.
    assert_eq!(engine.tracking_attempts(), 5);
    assert!(!shared.tracked_ever());
    assert!(outputs.transform_rx.is_empty());
    assert!(outputs.map_points_rx.is_empty());

    running.store(false, Ordering::Relaxed);
    tracking.join().unwrap();
}

// ============================================================================
// Test: Periodic Publisher Gating
// ============================================================================

#[test]
fn test_map_data_gated_until_first_success() {
    let engine = mock_engine(0);
    let shared = create_shared_tracking("map", "odom");
    let (bus, outputs) = create_output_bus();
    let running = Arc::new(AtomicBool::new(true));

    let timers = TimerConfig {
        map_data_interval_ms: 10,
        traversability_interval_ms: 10,
    };
    let publisher = MapPublisherThread::spawn(
        timers,
        MapDataPublisher::new(engine.clone(), shared.clone(), bus.map_data_tx.clone()),
        None,
        running.clone(),
    );

    // Several tick intervals pass without a successful tracking step.
    thread::sleep(Duration::from_millis(100));
    assert!(outputs.map_data_rx.is_empty());

    // After the first success the next tick publishes.
    engine.track_fused_frame(&frame(1_000), &frame(2_000));
    shared.mark_tracked();

    let snapshot = outputs
        .map_data_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("map data after first success");
    assert!(!snapshot.keyframes.is_empty());
    // Periodic snapshots exclude tracked-point detail.
    assert!(snapshot.landmarks.is_empty());

    running.store(false, Ordering::Relaxed);
    publisher.join().unwrap();
}

// ============================================================================
// Test: Synchronous Query Service
// ============================================================================

#[test]
fn test_query_before_tracking_returns_initial_state() {
    let engine = mock_engine(u32::MAX);
    let (query_tx, query_rx) = create_query_channel();
    let running = Arc::new(AtomicBool::new(true));

    let query_thread =
        MapQueryThread::spawn(MapQueryServer::new(engine), query_rx, running.clone());

    let snapshot = query_map_sync(&query_tx, MapQueryRequest::default(), 1_000)
        .expect("query must answer before first tracking success");
    assert!(snapshot.is_empty());

    running.store(false, Ordering::Relaxed);
    query_thread.join().unwrap();
}

#[test]
fn test_query_filter_independent_of_periodic_publisher() {
    let engine = mock_engine(0);
    let shared = create_shared_tracking("map", "odom");
    let (bus, outputs) = create_output_bus();
    let (query_tx, query_rx) = create_query_channel();
    let running = Arc::new(AtomicBool::new(true));

    // Build up some map state: 11 successes -> 3 keyframes with landmarks.
    for i in 0..11u64 {
        engine.track_fused_frame(&frame(i * 10), &frame(i * 10));
    }
    shared.mark_tracked();

    // Periodic publisher runs hot, requesting full snapshots concurrently.
    let timers = TimerConfig {
        map_data_interval_ms: 1,
        traversability_interval_ms: 1,
    };
    let publisher = MapPublisherThread::spawn(
        timers,
        MapDataPublisher::new(engine.clone(), shared.clone(), bus.map_data_tx.clone()),
        None,
        running.clone(),
    );
    let query_thread = MapQueryThread::spawn(
        MapQueryServer::new(engine.clone()),
        query_rx,
        running.clone(),
    );

    // Every response must reflect its own request parameters.
    for _ in 0..20 {
        let plain = query_map_sync(
            &query_tx,
            MapQueryRequest {
                tracked_points: false,
                keyframe_filter: None,
            },
            1_000,
        )
        .unwrap();
        assert!(plain.landmarks.is_empty());

        let filtered = query_map_sync(
            &query_tx,
            MapQueryRequest {
                tracked_points: true,
                keyframe_filter: Some(vec![1]),
            },
            1_000,
        )
        .unwrap();
        assert_eq!(filtered.landmarks.len(), 1);
        assert_eq!(filtered.landmarks[0].keyframe_id, 1);
    }

    assert!(!outputs.map_data_rx.is_empty());

    running.store(false, Ordering::Relaxed);
    publisher.join().unwrap();
    query_thread.join().unwrap();
}

// ============================================================================
// Test: Tracked Flag Semantics
// ============================================================================

#[test]
fn test_tracked_ever_never_reverts() {
    let engine = mock_engine(1);
    let shared = create_shared_tracking("map", "odom");
    let (bus, _outputs) = create_output_bus();
    let orchestrator =
        TrackingOrchestrator::new(engine.clone(), shared.clone(), bus, false);

    let pair = |t: u64| drishti_fusion::SyncedFramePair {
        color: frame(t),
        depth: frame(t),
        timestamp_us: t,
    };

    // Failure first: flag stays false.
    orchestrator.on_frame_pair(&pair(100));
    assert!(!shared.tracked_ever());

    // Success flips it, and it stays set.
    orchestrator.on_frame_pair(&pair(200));
    assert!(shared.tracked_ever());

    orchestrator.on_frame_pair(&pair(300));
    assert!(shared.tracked_ever());
}

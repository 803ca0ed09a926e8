//! Synchronous map query service.
//!
//! On-demand snapshot access that does not wait for the next periodic tick
//! and is not gated on tracking state. Queries can be answered directly via
//! [`MapQueryServer::handle`] or served over a channel; each channel request
//! carries its own response sender, mirroring the command-with-response
//! pattern used for inter-thread control elsewhere in the stack.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};

use crate::core::types::MapSnapshot;
use crate::engine::TrackingEngine;
use crate::error::{FusionError, Result};

/// Parameters of one map query.
#[derive(Debug, Clone, Default)]
pub struct MapQueryRequest {
    /// Include dense tracked points (per-keyframe landmarks)
    pub tracked_points: bool,
    /// Restrict landmark output to these keyframe ids; `None` means no
    /// restriction
    pub keyframe_filter: Option<Vec<u32>>,
}

/// Answers map queries straight from the engine.
pub struct MapQueryServer {
    engine: Arc<dyn TrackingEngine>,
}

impl MapQueryServer {
    pub fn new(engine: Arc<dyn TrackingEngine>) -> Self {
        Self { engine }
    }

    /// Build a snapshot to the request's exact parameters.
    ///
    /// Before the first successful tracking step this simply reflects the
    /// engine's empty initial map; that is not a fault.
    pub fn handle(&self, request: &MapQueryRequest) -> MapSnapshot {
        log::info!(
            "Map query: tracked_points={}, keyframe_filter={:?}",
            request.tracked_points,
            request.keyframe_filter
        );
        self.engine.export_map_snapshot(
            false,
            request.tracked_points,
            request.keyframe_filter.as_deref(),
        )
    }
}

/// Query with response channel for one caller.
pub struct QueryWithResponse {
    /// The query to answer.
    pub request: MapQueryRequest,
    /// Channel to send the snapshot back.
    pub response_tx: Sender<MapSnapshot>,
}

/// Sender end of the query channel (held by callers).
pub type QuerySender = Sender<QueryWithResponse>;

/// Receiver end of the query channel (held by the query thread).
pub type QueryReceiver = Receiver<QueryWithResponse>;

/// Create a new query channel pair.
pub fn create_query_channel() -> (QuerySender, QueryReceiver) {
    unbounded()
}

/// Send a query and wait for the snapshot.
pub fn query_map_sync(
    sender: &QuerySender,
    request: MapQueryRequest,
    timeout_ms: u64,
) -> Result<MapSnapshot> {
    let (response_tx, response_rx) = bounded(1);

    sender
        .send(QueryWithResponse {
            request,
            response_tx,
        })
        .map_err(|_| FusionError::Query("query thread not running (channel closed)".to_string()))?;

    response_rx
        .recv_timeout(Duration::from_millis(timeout_ms))
        .map_err(|e| match e {
            RecvTimeoutError::Timeout => FusionError::Query("map query timeout".to_string()),
            RecvTimeoutError::Disconnected => {
                FusionError::Query("query thread disconnected".to_string())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FusionConfig;
    use crate::core::types::ImageFrame;
    use crate::engine::{EngineSettings, MockTrackingEngine};

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

    #[test]
    fn test_query_before_tracking_returns_empty_snapshot() {
        let engine = Arc::new(MockTrackingEngine::new(EngineSettings::from_config(
            &FusionConfig::default(),
        )));
        let server = MapQueryServer::new(engine);

        let snapshot = server.handle(&MapQueryRequest::default());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_query_honors_tracked_points_flag() {
        let engine = Arc::new(
            MockTrackingEngine::new(EngineSettings::from_config(&FusionConfig::default()))
                .with_settle_frames(0),
        );
        for i in 0..6 {
            engine.track_fused_frame(&frame(i), &frame(i));
        }
        let server = MapQueryServer::new(engine);

        let without = server.handle(&MapQueryRequest {
            tracked_points: false,
            keyframe_filter: None,
        });
        assert!(without.landmarks.is_empty());
        assert!(!without.keyframes.is_empty());

        let with = server.handle(&MapQueryRequest {
            tracked_points: true,
            keyframe_filter: None,
        });
        assert!(!with.landmarks.is_empty());
    }

    #[test]
    fn test_query_sync_times_out_without_server() {
        let (tx, rx) = create_query_channel();

        // Nobody services the channel; the call must time out, not hang.
        let result = query_map_sync(&tx, MapQueryRequest::default(), 20);
        assert!(result.is_err());
        drop(rx);

        // With the receiver gone the send itself fails.
        let result = query_map_sync(&tx, MapQueryRequest::default(), 20);
        assert!(result.is_err());
    }
}

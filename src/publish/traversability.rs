//! Periodic traversability grid publication.
//!
//! Optional capability: instantiated only when traversability is enabled in
//! the configuration, together with the auxiliary point-cloud subscription.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::core::types::{OccupancyGrid, StructuredGrid};
use crate::engine::TrackingEngine;
use crate::state::SharedTrackingHandle;

/// Timer-driven traversability publisher.
///
/// Each tick exports the grid pair from the engine, offsets the occupancy
/// grid origin by the static robot origin offset, stamps it with the global
/// frame and the latest odometry stamp, and emits both messages. The offset
/// is fixed configuration, not the live tracked pose.
pub struct TraversabilityPublisher {
    engine: Arc<dyn TrackingEngine>,
    shared: SharedTrackingHandle,
    occupancy_tx: Sender<OccupancyGrid>,
    structured_tx: Sender<StructuredGrid>,
    global_frame: String,
    origin_offset_x: f64,
    origin_offset_y: f64,
}

impl TraversabilityPublisher {
    pub fn new(
        engine: Arc<dyn TrackingEngine>,
        shared: SharedTrackingHandle,
        occupancy_tx: Sender<OccupancyGrid>,
        structured_tx: Sender<StructuredGrid>,
        global_frame: &str,
        origin_offset_x: f64,
        origin_offset_y: f64,
    ) -> Self {
        Self {
            engine,
            shared,
            occupancy_tx,
            structured_tx,
            global_frame: global_frame.to_string(),
            origin_offset_x,
            origin_offset_y,
        }
    }

    /// One timer tick.
    pub fn tick(&self) {
        let stamp_us = self.shared.last_odom_stamp_us();
        let (mut grid, structured) = self.engine.export_traversability_grid();

        grid.origin_x += self.origin_offset_x;
        grid.origin_y += self.origin_offset_y;
        grid.frame_id = self.global_frame.clone();
        grid.timestamp_us = stamp_us;

        self.occupancy_tx.send(grid).ok();
        self.structured_tx.send(structured).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FusionConfig;
    use crate::engine::{EngineSettings, MockTrackingEngine};
    use crate::state::create_shared_tracking;
    use approx::assert_relative_eq;

    #[test]
    fn test_tick_offsets_and_stamps_grid() {
        let engine = Arc::new(MockTrackingEngine::new(EngineSettings::from_config(
            &FusionConfig::default(),
        )));
        let shared = create_shared_tracking("map", "odom");
        shared.record_odom_stamp(7_000);

        let (occ_tx, occ_rx) = crossbeam_channel::unbounded();
        let (str_tx, str_rx) = crossbeam_channel::unbounded();
        let publisher = TraversabilityPublisher::new(
            engine.clone(),
            shared,
            occ_tx,
            str_tx,
            "world",
            1.0,
            2.0,
        );

        publisher.tick();

        let (raw_grid, _) = engine.export_traversability_grid();
        let grid = occ_rx.recv().unwrap();
        assert_relative_eq!(grid.origin_x, raw_grid.origin_x + 1.0);
        assert_relative_eq!(grid.origin_y, raw_grid.origin_y + 2.0);
        assert_eq!(grid.frame_id, "world");
        assert_eq!(grid.timestamp_us, 7_000);

        // The structured grid goes out untouched.
        let structured = str_rx.recv().unwrap();
        assert_eq!(structured.layers.len(), 1);
    }

    #[test]
    fn test_tick_not_gated_on_tracking() {
        let engine = Arc::new(MockTrackingEngine::new(EngineSettings::from_config(
            &FusionConfig::default(),
        )));
        let shared = create_shared_tracking("map", "odom");
        let (occ_tx, occ_rx) = crossbeam_channel::unbounded();
        let (str_tx, _str_rx) = crossbeam_channel::unbounded();

        let publisher =
            TraversabilityPublisher::new(engine, shared, occ_tx, str_tx, "map", 1.0, 1.0);
        publisher.tick();

        assert_eq!(occ_rx.len(), 1);
    }
}

//! Periodic map data publication.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::core::types::MapSnapshot;
use crate::engine::TrackingEngine;
use crate::state::SharedTrackingHandle;

/// Timer-driven map snapshot publisher.
///
/// Each tick requests the active keyframe set (without tracked-point detail)
/// from the engine and emits it, but only once tracking has succeeded at
/// least once. Ticks before that are silent no-ops; they are not queued or
/// replayed.
pub struct MapDataPublisher {
    engine: Arc<dyn TrackingEngine>,
    shared: SharedTrackingHandle,
    map_data_tx: Sender<MapSnapshot>,
}

impl MapDataPublisher {
    pub fn new(
        engine: Arc<dyn TrackingEngine>,
        shared: SharedTrackingHandle,
        map_data_tx: Sender<MapSnapshot>,
    ) -> Self {
        Self {
            engine,
            shared,
            map_data_tx,
        }
    }

    /// One timer tick.
    pub fn tick(&self) {
        if !self.shared.tracked_ever() {
            return;
        }

        log::info!("Publishing map data");
        let snapshot = self.engine.export_map_snapshot(true, false, None);
        self.map_data_tx.send(snapshot).ok();
    }
}

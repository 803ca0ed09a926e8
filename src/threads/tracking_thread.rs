//! Tracking thread: event-driven sensor consumption.
//!
//! Waits on all sensor channels with `select!` and processes each sample
//! immediately on arrival (no fixed rate loop). Color and depth go through
//! the approximate-time synchronizer; inertial, odometry, and point-cloud
//! samples are forwarded straight to their handlers. Within a channel,
//! samples are processed in arrival order; no ordering holds across
//! channels.
//!
//! This thread is the single caller of the engine's tracking step, which
//! serializes tracking-step invocations by construction.

use crossbeam_channel::{never, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::SyncConfig;
use crate::fusion::TrackingOrchestrator;
use crate::sync::ApproxTimeSync;

use super::SensorReceivers;

/// Tracking thread handle.
pub struct TrackingThread {
    handle: JoinHandle<()>,
}

impl TrackingThread {
    /// Spawn the tracking thread.
    pub fn spawn(
        sync_config: SyncConfig,
        orchestrator: TrackingOrchestrator,
        sensors: SensorReceivers,
        running: Arc<AtomicBool>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("tracking".into())
            .spawn(move || run_tracking_loop(sync_config, orchestrator, sensors, running))
            .expect("Failed to spawn tracking thread");

        Self { handle }
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_tracking_loop(
    sync_config: SyncConfig,
    orchestrator: TrackingOrchestrator,
    sensors: SensorReceivers,
    running: Arc<AtomicBool>,
) {
    log::info!(
        "Tracking thread starting (sync window {} samples, tolerance {} us)",
        sync_config.queue_size,
        sync_config.max_interval_us
    );

    let mut sync = ApproxTimeSync::new(sync_config.queue_size, sync_config.max_interval_us);

    // A disabled cloud subscription becomes a channel that never fires.
    let cloud_rx = sensors.cloud_rx.unwrap_or_else(never);

    while running.load(Ordering::Relaxed) {
        select! {
            recv(sensors.color_rx) -> result => {
                if let Ok(frame) = result
                    && let Some(pair) = sync.push_color(frame)
                {
                    orchestrator.on_frame_pair(&pair);
                }
            }
            recv(sensors.depth_rx) -> result => {
                if let Ok(frame) = result
                    && let Some(pair) = sync.push_depth(frame)
                {
                    orchestrator.on_frame_pair(&pair);
                }
            }
            recv(sensors.inertial_rx) -> result => {
                if let Ok(sample) = result {
                    orchestrator.on_inertial_sample(&sample);
                }
            }
            recv(sensors.odometry_rx) -> result => {
                if let Ok(sample) = result {
                    orchestrator.on_odometry_sample(&sample);
                }
            }
            recv(cloud_rx) -> result => {
                if let Ok(cloud) = result {
                    orchestrator.on_point_cloud(&cloud);
                }
            }
            // Timeout to allow checking the running flag
            default(Duration::from_millis(10)) => {}
        }
    }

    log::info!("Tracking thread shutting down");
}

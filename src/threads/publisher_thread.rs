//! Publisher thread: timer-driven map data and traversability output.
//!
//! Runs two independent interval timers in one loop. Ticks are
//! fire-and-forget: a tick that finds nothing to publish is simply skipped,
//! never queued or replayed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::TimerConfig;
use crate::publish::{MapDataPublisher, TraversabilityPublisher};

/// Publisher thread handle.
pub struct MapPublisherThread {
    handle: JoinHandle<()>,
}

impl MapPublisherThread {
    /// Spawn the publisher thread.
    ///
    /// `traversability` is `None` when the capability is disabled; the
    /// corresponding timer then never fires.
    pub fn spawn(
        timers: TimerConfig,
        map_publisher: MapDataPublisher,
        traversability: Option<TraversabilityPublisher>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("map-publisher".into())
            .spawn(move || run_publisher_loop(timers, map_publisher, traversability, running))
            .expect("Failed to spawn publisher thread");

        Self { handle }
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_publisher_loop(
    timers: TimerConfig,
    map_publisher: MapDataPublisher,
    traversability: Option<TraversabilityPublisher>,
    running: Arc<AtomicBool>,
) {
    log::info!(
        "Publisher thread starting (map data every {} ms{})",
        timers.map_data_interval_ms,
        if traversability.is_some() {
            format!(
                ", traversability every {} ms",
                timers.traversability_interval_ms
            )
        } else {
            String::new()
        }
    );

    let map_interval = Duration::from_millis(timers.map_data_interval_ms);
    let traversability_interval = Duration::from_millis(timers.traversability_interval_ms);

    let mut last_map = Instant::now();
    let mut last_traversability = Instant::now();

    while running.load(Ordering::Relaxed) {
        let now = Instant::now();

        if now.duration_since(last_map) >= map_interval {
            map_publisher.tick();
            last_map = now;
        }

        if let Some(ref publisher) = traversability
            && now.duration_since(last_traversability) >= traversability_interval
        {
            publisher.tick();
            last_traversability = now;
        }

        // Small sleep to prevent busy-waiting
        thread::sleep(Duration::from_millis(5));
    }

    log::info!("Publisher thread shutting down");
}

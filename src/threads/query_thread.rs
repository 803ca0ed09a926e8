//! Query thread: serves synchronous map queries over a channel.
//!
//! Each request carries its own response sender, so the caller blocks only
//! on its own query, never on the periodic publishers.

use crossbeam_channel::RecvTimeoutError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::publish::{MapQueryServer, QueryReceiver};

/// Query thread handle.
pub struct MapQueryThread {
    handle: JoinHandle<()>,
}

impl MapQueryThread {
    /// Spawn the query thread.
    pub fn spawn(
        server: MapQueryServer,
        query_rx: QueryReceiver,
        running: Arc<AtomicBool>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("map-query".into())
            .spawn(move || run_query_loop(server, query_rx, running))
            .expect("Failed to spawn query thread");

        Self { handle }
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_query_loop(server: MapQueryServer, query_rx: QueryReceiver, running: Arc<AtomicBool>) {
    log::info!("Query thread starting");

    while running.load(Ordering::Relaxed) {
        match query_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(query) => {
                let snapshot = server.handle(&query.request);
                // Ignore send errors - the caller may have timed out.
                query.response_tx.send(snapshot).ok();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Query channel closed");
                break;
            }
        }
    }

    log::info!("Query thread shutting down");
}

//! Publication surface toward the host transport.
//!
//! Outputs leave the crate on typed crossbeam channels; the host transport
//! drains them however it likes. Sends are fire-and-forget: a dropped
//! receiver silently discards the message, matching a publisher with no
//! subscribers.

mod map_publisher;
mod query;
mod traversability;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::core::types::{
    MapSnapshot, OccupancyGrid, PointCloud, StructuredGrid, TransformStamped,
};

pub use map_publisher::MapDataPublisher;
pub use query::{
    MapQueryRequest, MapQueryServer, QueryReceiver, QuerySender, QueryWithResponse,
    create_query_channel, query_map_sync,
};
pub use traversability::TraversabilityPublisher;

/// Sender side of every output channel.
#[derive(Clone)]
pub struct OutputBus {
    /// map→odom broadcast after each successful tracking step
    pub transform_tx: Sender<TransformStamped>,
    /// Current map points after each successful tracking step
    /// (visualization only)
    pub map_points_tx: Sender<PointCloud>,
    /// Periodic map snapshot
    pub map_data_tx: Sender<MapSnapshot>,
    /// Traversability occupancy grid
    pub occupancy_tx: Sender<OccupancyGrid>,
    /// Traversability structured grid
    pub structured_tx: Sender<StructuredGrid>,
}

/// Receiver side of every output channel, handed to the host transport.
pub struct OutputReceivers {
    pub transform_rx: Receiver<TransformStamped>,
    pub map_points_rx: Receiver<PointCloud>,
    pub map_data_rx: Receiver<MapSnapshot>,
    pub occupancy_rx: Receiver<OccupancyGrid>,
    pub structured_rx: Receiver<StructuredGrid>,
}

/// Create the output channel set.
pub fn create_output_bus() -> (OutputBus, OutputReceivers) {
    let (transform_tx, transform_rx) = unbounded();
    let (map_points_tx, map_points_rx) = unbounded();
    let (map_data_tx, map_data_rx) = unbounded();
    let (occupancy_tx, occupancy_rx) = unbounded();
    let (structured_tx, structured_rx) = unbounded();

    (
        OutputBus {
            transform_tx,
            map_points_tx,
            map_data_tx,
            occupancy_tx,
            structured_tx,
        },
        OutputReceivers {
            transform_rx,
            map_points_rx,
            map_data_rx,
            occupancy_rx,
            structured_rx,
        },
    )
}

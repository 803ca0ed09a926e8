//! Thread management for the fusion daemon.
//!
//! Three fixed threads:
//! - `TrackingThread`: consumes sensor channels, pairs color/depth, drives
//!   the engine (single caller of the tracking step)
//! - `MapPublisherThread`: timer-driven map data and traversability
//!   publication
//! - `MapQueryThread`: serves synchronous map queries

mod publisher_thread;
mod query_thread;
mod tracking_thread;

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::core::types::{ImageFrame, InertialSample, OdometrySample, PointCloud};

pub use publisher_thread::MapPublisherThread;
pub use query_thread::MapQueryThread;
pub use tracking_thread::TrackingThread;

/// Image channel capacity (color and depth).
const IMAGE_CHANNEL_CAPACITY: usize = 100;

/// Inertial/odometry channel capacity.
const SAMPLE_CHANNEL_CAPACITY: usize = 1000;

/// Auxiliary point-cloud channel capacity.
const CLOUD_CHANNEL_CAPACITY: usize = 100;

/// Sender side of the sensor channels, handed to the host transport.
#[derive(Clone)]
pub struct SensorSenders {
    pub color_tx: Sender<ImageFrame>,
    pub depth_tx: Sender<ImageFrame>,
    pub inertial_tx: Sender<InertialSample>,
    pub odometry_tx: Sender<OdometrySample>,
    /// Present only when the traversability capability is enabled.
    pub cloud_tx: Option<Sender<PointCloud>>,
}

/// Receiver side of the sensor channels, consumed by the tracking thread.
pub struct SensorReceivers {
    pub color_rx: Receiver<ImageFrame>,
    pub depth_rx: Receiver<ImageFrame>,
    pub inertial_rx: Receiver<InertialSample>,
    pub odometry_rx: Receiver<OdometrySample>,
    /// Present only when the traversability capability is enabled.
    pub cloud_rx: Option<Receiver<PointCloud>>,
}

/// Create the sensor channel set.
///
/// The point-cloud channel exists only when `with_cloud` is set; without the
/// traversability capability that subscription is simply not instantiated.
pub fn create_sensor_channels(with_cloud: bool) -> (SensorSenders, SensorReceivers) {
    let (color_tx, color_rx) = bounded(IMAGE_CHANNEL_CAPACITY);
    let (depth_tx, depth_rx) = bounded(IMAGE_CHANNEL_CAPACITY);
    let (inertial_tx, inertial_rx) = bounded(SAMPLE_CHANNEL_CAPACITY);
    let (odometry_tx, odometry_rx) = bounded(SAMPLE_CHANNEL_CAPACITY);
    let (cloud_tx, cloud_rx) = if with_cloud {
        let (tx, rx) = bounded(CLOUD_CHANNEL_CAPACITY);
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    (
        SensorSenders {
            color_tx,
            depth_tx,
            inertial_tx,
            odometry_tx,
            cloud_tx,
        },
        SensorReceivers {
            color_rx,
            depth_rx,
            inertial_rx,
            odometry_rx,
            cloud_rx,
        },
    )
}

//! Core data types shared across the fusion pipeline.

mod map;
mod pose;
mod samples;

pub use map::{
    GridLayer, KeyframeData, KeyframeLandmarks, MapSnapshot, OccupancyGrid, StructuredGrid,
    TransformStamped,
};
pub use pose::Pose3D;
pub use samples::{ImageFrame, InertialSample, OdometrySample, PointCloud, SyncedFramePair};

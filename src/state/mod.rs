//! Shared mutable state for the fusion pipeline.

mod shared;

pub use shared::{SharedTracking, SharedTrackingHandle, create_shared_tracking};

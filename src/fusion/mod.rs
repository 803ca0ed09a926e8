//! Tracking orchestration.

mod orchestrator;

pub use orchestrator::TrackingOrchestrator;

//! Configuration loading for drishti-fusion
//!
//! All options are read once at startup and treated as immutable for the
//! process lifetime.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FusionConfig {
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub timers: TimerConfig,
    #[serde(default)]
    pub traversability: TraversabilityConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Coordinate frame identifiers stamped onto outputs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Robot body frame (default: "base_link")
    pub robot_base_frame: String,
    /// Global map frame (default: "map")
    pub global_frame: String,
    /// Odometry frame (default: "odom")
    pub odom_frame: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            robot_base_frame: "base_link".to_string(),
            global_frame: "map".to_string(),
            odom_frame: "odom".to_string(),
        }
    }
}

/// Static robot placement in the global frame.
///
/// Applied as a fixed offset to the traversability grid origin; never derived
/// from the live tracked pose.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Robot origin X offset in meters (default: 1.0)
    pub origin_x: f64,
    /// Robot origin Y offset in meters (default: 1.0)
    pub origin_y: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            origin_x: 1.0,
            origin_y: 1.0,
        }
    }
}

/// Visualization toggles.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    /// Publish the current map point cloud after each successful tracking
    /// step (default: true)
    pub enabled: bool,
    /// Secondary engine-side viewer flag, forwarded to the engine factory
    /// (default: false)
    pub secondary: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secondary: false,
        }
    }
}

/// Approximate-time synchronizer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Unmatched samples retained per stream before FIFO eviction
    /// (default: 10)
    pub queue_size: usize,
    /// Maximum color/depth timestamp difference for a pair, in microseconds
    /// (default: 50_000)
    pub max_interval_us: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            queue_size: 10,
            max_interval_us: 50_000,
        }
    }
}

/// Periodic publication intervals.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Map data publication interval in milliseconds (default: 1000)
    pub map_data_interval_ms: u64,
    /// Traversability grid publication interval in milliseconds
    /// (default: 800)
    pub traversability_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            map_data_interval_ms: 1000,
            traversability_interval_ms: 800,
        }
    }
}

/// Optional traversability capability.
///
/// When disabled, the point-cloud subscription and the grid publishers are
/// not instantiated at all.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TraversabilityConfig {
    /// Enable the traversability pipeline (default: false)
    pub enabled: bool,
}

/// Tracking engine selection.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine backend name. The only in-tree backend is "mock"; real engines
    /// plug in through the `TrackingEngine` trait. (default: "mock")
    pub backend: String,
    /// Optional vocabulary file path, forwarded to backends that need one.
    pub vocabulary: Option<String>,
    /// Optional engine settings file path, forwarded to backends that need
    /// one.
    pub settings: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: "mock".to_string(),
            vocabulary: None,
            settings: None,
        }
    }
}

/// Synthetic sensor driver settings for engine-free runs.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Feed synthetic sensor streams into the pipeline (default: false)
    pub enabled: bool,
    /// Color/depth frame rate in Hz (default: 30.0)
    pub frame_rate_hz: f32,
    /// Inertial sample rate in Hz (default: 100.0)
    pub inertial_rate_hz: f32,
    /// Odometry sample rate in Hz (default: 20.0)
    pub odometry_rate_hz: f32,
    /// Run duration in seconds; 0 runs until shutdown (default: 0.0)
    pub duration_s: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frame_rate_hz: 30.0,
            inertial_rate_hz: 100.0,
            odometry_rate_hz: 20.0,
            duration_s: 0.0,
        }
    }
}

impl FusionConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FusionConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = FusionConfig::default();
        assert_eq!(config.frames.robot_base_frame, "base_link");
        assert_eq!(config.frames.global_frame, "map");
        assert_eq!(config.frames.odom_frame, "odom");
        assert_eq!(config.robot.origin_x, 1.0);
        assert_eq!(config.robot.origin_y, 1.0);
        assert!(config.visualization.enabled);
        assert!(!config.visualization.secondary);
        assert_eq!(config.sync.queue_size, 10);
        assert_eq!(config.sync.max_interval_us, 50_000);
        assert_eq!(config.timers.map_data_interval_ms, 1000);
        assert_eq!(config.timers.traversability_interval_ms, 800);
        assert!(!config.traversability.enabled);
        assert_eq!(config.engine.backend, "mock");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [frames]
            global_frame = "world"

            [traversability]
            enabled = true
        "#;
        let config: FusionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.frames.global_frame, "world");
        assert_eq!(config.frames.odom_frame, "odom");
        assert!(config.traversability.enabled);
        assert_eq!(config.sync.queue_size, 10);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result: std::result::Result<FusionConfig, _> = toml::from_str("frames = 3");
        assert!(result.is_err());
    }
}

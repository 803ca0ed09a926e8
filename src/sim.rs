//! Synthetic sensor driver for engine-free runs.
//!
//! Feeds deterministic color/depth/inertial/odometry streams into the
//! sensor channels at wall-clock pace, so the daemon can be exercised
//! end-to-end without cameras or a robot. Depth frames trail color frames
//! by 2 ms, well inside the default pairing tolerance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::SimulationConfig;
use crate::core::types::{ImageFrame, InertialSample, OdometrySample, Pose3D};
use crate::threads::SensorSenders;

/// Depth stamp lag behind the color stamp.
const DEPTH_LAG_US: u64 = 2_000;

/// Simulated forward velocity in m/s.
const FORWARD_VELOCITY: f64 = 0.05;

/// Synthetic sensor driver handle.
pub struct SimDriver {
    handle: JoinHandle<()>,
}

impl SimDriver {
    /// Spawn the driver thread.
    ///
    /// When `duration_s` is non-zero the driver clears the running flag
    /// after that much simulated time, shutting the daemon down.
    pub fn spawn(
        config: SimulationConfig,
        senders: SensorSenders,
        running: Arc<AtomicBool>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("sim-driver".into())
            .spawn(move || run_sim_loop(config, senders, running))
            .expect("Failed to spawn sim driver thread");

        Self { handle }
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_sim_loop(config: SimulationConfig, senders: SensorSenders, running: Arc<AtomicBool>) {
    log::info!(
        "Sim driver starting ({} Hz frames, {} Hz inertial, {} Hz odometry)",
        config.frame_rate_hz,
        config.inertial_rate_hz,
        config.odometry_rate_hz
    );

    let step_us = (1e6 / config.inertial_rate_hz).round() as u64;
    let frame_period_us = (1e6 / config.frame_rate_hz).round() as u64;
    let odometry_period_us = (1e6 / config.odometry_rate_hz).round() as u64;
    let duration_us = (config.duration_s as f64 * 1e6) as u64;

    let mut sim_time_us: u64 = 0;
    let mut next_frame_us: u64 = 0;
    let mut next_odometry_us: u64 = 0;

    while running.load(Ordering::Relaxed) {
        if duration_us > 0 && sim_time_us >= duration_us {
            log::info!("Sim driver finished after {} s", config.duration_s);
            running.store(false, Ordering::Relaxed);
            break;
        }

        // Sends are lossy on backpressure, like a sensor bus.
        senders
            .inertial_tx
            .try_send(InertialSample {
                timestamp_us: sim_time_us,
                angular_velocity: [0.0, 0.0, 0.01],
                linear_acceleration: [0.0, 0.0, 9.81],
            })
            .ok();

        if sim_time_us >= next_frame_us {
            senders.color_tx.try_send(color_frame(sim_time_us)).ok();
            senders
                .depth_tx
                .try_send(depth_frame(sim_time_us + DEPTH_LAG_US))
                .ok();
            next_frame_us += frame_period_us;
        }

        if sim_time_us >= next_odometry_us {
            let x = FORWARD_VELOCITY * sim_time_us as f64 / 1e6;
            senders
                .odometry_tx
                .try_send(OdometrySample {
                    timestamp_us: sim_time_us,
                    frame_id: "odom".to_string(),
                    child_frame_id: "base_link".to_string(),
                    pose: Pose3D::from_xyz(x, 0.0, 0.0),
                })
                .ok();
            next_odometry_us += odometry_period_us;
        }

        thread::sleep(Duration::from_micros(step_us));
        sim_time_us += step_us;
    }

    log::info!("Sim driver shutting down");
}

fn color_frame(timestamp_us: u64) -> ImageFrame {
    ImageFrame {
        timestamp_us,
        frame_id: "camera_color".to_string(),
        width: 8,
        height: 8,
        encoding: "rgb8".to_string(),
        data: vec![0; 8 * 8 * 3],
    }
}

fn depth_frame(timestamp_us: u64) -> ImageFrame {
    ImageFrame {
        timestamp_us,
        frame_id: "camera_depth".to_string(),
        width: 8,
        height: 8,
        encoding: "16UC1".to_string(),
        data: vec![0; 8 * 8 * 2],
    }
}

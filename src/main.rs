//! drishti-fusion daemon entry point.
//!
//! Loads configuration, constructs the engine backend, and runs the three
//! pipeline threads until shutdown. With `[simulation] enabled` (or
//! `--simulate`) a synthetic sensor driver feeds the channels so the daemon
//! can run without hardware; output channels are drained to the log.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use drishti_fusion::{
    FusionConfig, MapDataPublisher, MapPublisherThread, MapQueryServer, MapQueryThread,
    OutputReceivers, Result, SimDriver, TrackingOrchestrator, TrackingThread,
    TraversabilityPublisher, create_engine, create_output_bus, create_query_channel,
    create_sensor_channels, create_shared_tracking,
};

#[derive(Parser)]
#[command(
    name = "drishti-fusion",
    about = "Sensor fusion front-end for RGBD visual SLAM"
)]
struct Args {
    /// Configuration file (default: drishti-fusion.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force the synthetic sensor driver on
    #[arg(long)]
    simulate: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let mut config = load_config(&args)?;
    if args.simulate {
        config.simulation.enabled = true;
    }

    log::info!("drishti-fusion starting");
    log::info!("  Engine backend: {}", config.engine.backend);
    log::info!(
        "  Frames: {} -> {} -> {}",
        config.frames.global_frame,
        config.frames.odom_frame,
        config.frames.robot_base_frame
    );
    log::info!(
        "  Visualization: {}",
        if config.visualization.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    log::info!(
        "  Traversability: {}",
        if config.traversability.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    run_daemon(&config)?;

    log::info!("drishti-fusion shutdown complete");
    Ok(())
}

fn load_config(args: &Args) -> Result<FusionConfig> {
    match &args.config {
        Some(path) => {
            let config = FusionConfig::load(path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => {
            // Try default paths
            for path in &["drishti-fusion.toml", "/etc/drishti-fusion.toml"] {
                if std::path::Path::new(path).exists() {
                    let config = FusionConfig::load(std::path::Path::new(path))?;
                    log::info!("Loaded config from {}", path);
                    return Ok(config);
                }
            }
            Ok(FusionConfig::default())
        }
    }
}

fn run_daemon(config: &FusionConfig) -> Result<()> {
    // Engine construction is the only fatal startup condition: nothing has
    // defined behavior without a live engine.
    let engine = create_engine(config)?;
    log::info!("Engine initialized");

    let shared = create_shared_tracking(&config.frames.global_frame, &config.frames.odom_frame);
    let (bus, outputs) = create_output_bus();
    let (sensor_tx, sensor_rx) = create_sensor_channels(config.traversability.enabled);
    let (query_tx, query_rx) = create_query_channel();

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");

    log::info!("Spawning threads...");

    let orchestrator = TrackingOrchestrator::new(
        engine.clone(),
        shared.clone(),
        bus.clone(),
        config.visualization.enabled,
    );
    let tracking_thread = TrackingThread::spawn(
        config.sync.clone(),
        orchestrator,
        sensor_rx,
        running.clone(),
    );
    log::info!("  Tracking thread started");

    let map_publisher =
        MapDataPublisher::new(engine.clone(), shared.clone(), bus.map_data_tx.clone());
    let traversability = config.traversability.enabled.then(|| {
        TraversabilityPublisher::new(
            engine.clone(),
            shared.clone(),
            bus.occupancy_tx.clone(),
            bus.structured_tx.clone(),
            &config.frames.global_frame,
            config.robot.origin_x,
            config.robot.origin_y,
        )
    });
    let publisher_thread = MapPublisherThread::spawn(
        config.timers.clone(),
        map_publisher,
        traversability,
        running.clone(),
    );
    log::info!("  Publisher thread started");

    let query_thread = MapQueryThread::spawn(
        MapQueryServer::new(engine.clone()),
        query_rx,
        running.clone(),
    );
    log::info!("  Query thread started");

    let sim_driver = config
        .simulation
        .enabled
        .then(|| SimDriver::spawn(config.simulation.clone(), sensor_tx.clone(), running.clone()));
    if sim_driver.is_some() {
        log::info!("  Sim driver started");
    }

    // The sensor senders and the query sender are the host-facing surface;
    // keep them alive for the process lifetime.
    let _sensor_tx = sensor_tx;
    let _query_tx = query_tx;

    log::info!("Daemon running");

    // Main thread drains outputs until shutdown.
    while running.load(Ordering::Relaxed) {
        drain_outputs(&outputs);
        std::thread::sleep(Duration::from_millis(100));
    }

    log::info!("Shutdown signal received, waiting for threads...");

    if let Err(e) = tracking_thread.join() {
        log::error!("Tracking thread panicked: {:?}", e);
    }
    if let Err(e) = publisher_thread.join() {
        log::error!("Publisher thread panicked: {:?}", e);
    }
    if let Err(e) = query_thread.join() {
        log::error!("Query thread panicked: {:?}", e);
    }
    if let Some(driver) = sim_driver
        && let Err(e) = driver.join()
    {
        log::error!("Sim driver panicked: {:?}", e);
    }

    drain_outputs(&outputs);
    log::info!("All threads stopped");
    Ok(())
}

/// Drain output channels to the log, standing in for the host transport.
fn drain_outputs(outputs: &OutputReceivers) {
    while let Ok(tf) = outputs.transform_rx.try_recv() {
        log::debug!(
            "Transform {} -> {} at {} us",
            tf.parent_frame,
            tf.child_frame,
            tf.timestamp_us
        );
    }
    while let Ok(cloud) = outputs.map_points_rx.try_recv() {
        log::debug!("Map points: {} points", cloud.len());
    }
    while let Ok(snapshot) = outputs.map_data_rx.try_recv() {
        log::debug!("Map data: {} keyframes", snapshot.keyframes.len());
    }
    while let Ok(grid) = outputs.occupancy_rx.try_recv() {
        log::debug!("Occupancy grid: {}x{}", grid.width, grid.height);
    }
    while let Ok(grid) = outputs.structured_rx.try_recv() {
        log::debug!("Structured grid: {} layers", grid.layers.len());
    }
}

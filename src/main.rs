// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! DriveLock - headless tracking session
//!
//! Runs the DriveLock engine against simulated location, motion and engine
//! audio providers and logs every alert until Ctrl+C or the requested
//! duration elapses.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use drivelock::core::{EventPayload, Engine, EventBus};
use drivelock::sensors::{RandomAudio, SimulatedLocation, SimulatedMotion, TrackingManager};
use drivelock::{Command, Config, NAME, VERSION};

/// DriveLock - distracted-driving app lock
#[derive(Parser, Debug)]
#[command(name = "drivelock")]
#[command(version = VERSION)]
#[command(about = "Blocks distracting apps while driving conditions are detected")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Seed for the simulated providers
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<u64>,

    /// Start with DriveLock armed
    #[arg(long)]
    arm: bool,

    /// Start with the seatbelt fastened
    #[arg(long)]
    seatbelt: bool,

    /// Refuse the location permission request
    #[arg(long)]
    deny_location: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{} v{}", NAME, VERSION);

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    if args.deny_location {
        config.simulation.deny_location = true;
    }

    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_session(config, args))
}

async fn run_session(config: Config, args: Args) -> Result<()> {
    let config = Arc::new(config);
    let event_bus = Arc::new(EventBus::new(config.tracking.event_capacity));

    let location = SimulatedLocation::new("sim-gps", &config.simulation);
    let motion = SimulatedMotion::new("sim-motion", &config.simulation);
    let mut tracker = TrackingManager::new(
        config.tracking.clone(),
        Box::new(location),
        Box::new(motion),
        Arc::clone(&event_bus),
    );

    let notices = {
        let mut events = event_bus.subscribe_events();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if let EventPayload::Notice { title, message } = event.payload {
                    warn!("{}: {}", title, message);
                }
            }
        })
    };

    if !tracker.start().await {
        warn!("Location tracking disabled");
    }

    let mut engine = Engine::new(
        Arc::clone(&config),
        Arc::clone(&event_bus),
        tracker.readings(),
        Box::new(RandomAudio::new(config.simulation.seed)),
    );

    let (shutdown_tx, _) = broadcast::channel(1);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    if args.arm {
        cmd_tx.send(Command::ToggleDriveLock).await?;
    }
    if args.seatbelt {
        cmd_tx.send(Command::ToggleSeatbelt).await?;
    }

    let tracker_shutdown = shutdown_tx.subscribe();
    let tracker_task = tokio::spawn(async move {
        tracker.run(tracker_shutdown).await;
    });

    let engine_shutdown = shutdown_tx.subscribe();
    let engine_task = tokio::spawn(async move {
        let result = engine.run(cmd_rx, engine_shutdown).await;
        result.map(|_| engine)
    });

    info!("{} session running", NAME);
    info!("   Press Ctrl+C to stop");

    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    info!("Stopping session...");
    let _ = shutdown_tx.send(());
    drop(cmd_tx);

    tracker_task.await?;
    let engine = engine_task.await??;
    notices.abort();

    for alert in engine.alerts().iter() {
        info!("{} [{:?}] {}", alert.timestamp.format("%H:%M:%S"), alert.kind, alert.message);
    }
    println!("{}", serde_json::to_string_pretty(&engine.state())?);

    info!("{} session complete", NAME);
    Ok(())
}

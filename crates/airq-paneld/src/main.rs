//! Air Quality Panel Daemon
//!
//! Samples humidity, temperature, pressure and particulate sensors and keeps
//! a gauge panel up to date.

mod config;
mod panel;
mod sensors;

use airq_panel_core::{
    Channel, RefreshCoordinator, SampleStore, SamplerHandle, SensorRegistry, SensorSampler,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use panel::{ActivityMonitor, PanelDisplay};

#[derive(Parser)]
#[command(name = "airq-paneld")]
#[command(author, version, about = "Air quality gauge panel daemon")]
struct Args {
    /// Configuration file
    #[arg(default_value = "config/default.toml")]
    config: PathBuf,

    /// Run a single refresh, print the panel as JSON and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the built-in configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

type Coordinator = RefreshCoordinator<PanelDisplay, ActivityMonitor>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging; stdout is reserved for --once output
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &args.write_default_config {
        Config::default()
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote default configuration to: {}", path.display());
        return Ok(());
    }

    let config = load_config(&args.config)?;
    config.validate().context("Invalid configuration")?;
    let specs = config.channel_specs()?;

    // Discover sensors
    let store = Arc::new(SampleStore::new());
    let registry = sensors::registry(&config.sensors);
    let (inline, background) = discover_samplers(&config, registry.as_ref(), &store, args.once);

    let cadence = Duration::from_millis(config.sampler.cadence);
    let mut handles = Vec::new();
    for sampler in background {
        let channel = sampler.channel();
        if let Some(handle) = sampler
            .spawn(store.clone(), cadence)
            .with_context(|| format!("Failed to spawn {} sampler", channel))?
        {
            handles.push(handle);
        }
    }

    let present: Vec<Channel> = Channel::ALL
        .into_iter()
        .filter(|&channel| store.sensor_present(channel))
        .collect();
    if present.is_empty() {
        warn!("No sensors found, the panel will only show titles");
    }

    let display = PanelDisplay::new(&specs, present);
    let activity = ActivityMonitor::new();
    let coordinator = RefreshCoordinator::new(
        store,
        specs,
        inline,
        display,
        activity.clone(),
        Duration::from_millis(config.refresh),
    );

    if args.once {
        let snapshot = coordinator.display().snapshot();
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize panel")?;
        println!("{}", json);
        stop_samplers(handles);
        return Ok(());
    }

    // Start refresh loop
    tokio::spawn(async move {
        refresh_loop(coordinator).await;
    });

    // Start inactivity watchdog
    let inactivity = Duration::from_millis(config.inactivity);
    tokio::spawn(async move {
        inactivity_loop(activity, inactivity).await;
    });

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
    }

    stop_samplers(handles);
    Ok(())
}

/// Loads the configuration, falling back to defaults if the file is missing.
fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let config = Config::load(path).context("Failed to load configuration")?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Discovers every channel's sensor and splits the samplers into those read
/// during the refresh tick and those that get their own thread.
///
/// With `once` there is only one tick, so every sampler is read inline.
fn discover_samplers(
    config: &Config,
    registry: &dyn SensorRegistry,
    store: &SampleStore,
    once: bool,
) -> (Vec<SensorSampler>, Vec<SensorSampler>) {
    let mut inline = Vec::new();
    let mut background = Vec::new();
    for channel in Channel::ALL {
        let mut sampler = SensorSampler::new(channel);
        sampler.discover(registry, store);
        if config.is_background(channel) && !once {
            background.push(sampler);
        } else {
            inline.push(sampler);
        }
    }
    (inline, background)
}

fn stop_samplers(handles: Vec<SamplerHandle>) {
    for handle in handles {
        debug!("Stopping {} sampler", handle.channel());
        handle.stop();
    }
}

async fn refresh_loop(mut coordinator: Coordinator) {
    let mut interval = tokio::time::interval(coordinator.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately and the coordinator already ran it.
    interval.tick().await;

    loop {
        interval.tick().await;
        coordinator.tick();
    }
}

async fn inactivity_loop(activity: ActivityMonitor, timeout: Duration) {
    let mut consecutive_stalls: u32 = 0;
    let mut last_warn = Instant::now();

    loop {
        tokio::time::sleep(timeout).await;
        let idle = activity.idle_for();
        if idle > timeout {
            consecutive_stalls = consecutive_stalls.saturating_add(1);
            // Only warn once per minute or on the first stall
            let elapsed = last_warn.elapsed();
            if consecutive_stalls == 1 {
                warn!("Panel idle for {:?}", idle);
                last_warn = Instant::now();
            } else if elapsed >= Duration::from_secs(60) {
                warn!(
                    "Panel idle for {:?} (stalled {} checks in a row)",
                    idle, consecutive_stalls
                );
                last_warn = Instant::now();
            }
        } else {
            consecutive_stalls = 0;
        }
    }
}

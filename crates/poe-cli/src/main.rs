//! PoE switch power controller front end.
//!
//! Brings up the shift register, then serves the attribute protocol on
//! stdin/stdout until `quit`, end of input or Ctrl-C. Logs go to stderr.

mod config;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use poe_core::constants::DEVICE_NAME;
use poe_hardware::mock::MockGpio;
use poe_hardware::{GpioPlatform, HardwareConfig, PoeSwitch};
use poe_surface::ControlSurface;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Control the power stage of an 8-port PoE switch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file (line numbers, settling delay, sysfs root)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Drive a simulated register instead of real GPIO lines
    #[arg(long)]
    mock: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load(args.config.as_deref())?;
    init_logging(args.debug)?;

    if args.mock {
        let (gpio, _handle) = MockGpio::new();
        run(gpio, &config).await
    } else {
        run_sysfs(&config).await
    }
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::from_default_env()
            .add_directive("poectl=debug".parse()?)
            .add_directive("poe_hardware=debug".parse()?)
            .add_directive("poe_surface=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(unix)]
async fn run_sysfs(config: &HardwareConfig) -> Result<()> {
    let gpio = poe_hardware::SysfsGpio::new(config.sysfs_root.clone());
    run(gpio, config).await
}

#[cfg(not(unix))]
async fn run_sysfs(_config: &HardwareConfig) -> Result<()> {
    anyhow::bail!("sysfs GPIO is only available on Unix, use --mock")
}

async fn run<P: GpioPlatform>(platform: P, config: &HardwareConfig) -> Result<()> {
    let switch = PoeSwitch::initialize(platform, config)
        .context("Failed to initialize the shift register")?;
    info!(device = DEVICE_NAME, "Ready");

    let surface = ControlSurface::new(switch.clone());
    let requests = repl::spawn_reader(BufReader::new(std::io::stdin()))
        .context("Failed to start the stdin reader")?;
    let mut stdout = tokio::io::stdout();

    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C");
    };
    let result = repl::serve_until(&surface, requests, &mut stdout, ctrl_c).await;

    switch.teardown().await;
    info!("Exiting.");
    result
}

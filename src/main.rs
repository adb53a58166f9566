use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bt2usb::config::RelayConfig;
use bt2usb::hid::{GadgetPaths, GadgetSinks};
use bt2usb::input;
use bt2usb::relay::RelaySupervisor;

/// bt2usb command line arguments
#[derive(Parser, Debug)]
#[command(name = "bt2usb")]
#[command(version, about = "Bluetooth to USB HID relay", long_about = None)]
struct CliArgs {
    /// Comma-separated list of input device paths to relay
    #[arg(
        short = 'i',
        long,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..
    )]
    device_paths: Vec<PathBuf>,

    /// Increase log verbosity (-d for debug, -dd for trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count)]
    debug: u8,

    /// Also write logs to a file
    #[arg(short = 'f', long)]
    log_to_file: bool,

    /// Log file path (used with --log-to-file)
    #[arg(
        long,
        value_name = "FILE",
        default_value = "/var/log/bt2usb/bt2usb.log"
    )]
    log_path: PathBuf,

    /// List available input devices and exit
    #[arg(short = 'l', long)]
    list_devices: bool,

    /// Keyboard gadget device path
    #[arg(long, value_name = "FILE", default_value = "/dev/hidg0")]
    keyboard_gadget: PathBuf,

    /// Mouse gadget device path
    #[arg(long, value_name = "FILE", default_value = "/dev/hidg1")]
    mouse_gadget: PathBuf,

    /// Consumer-control gadget device path
    #[arg(long, value_name = "FILE", default_value = "/dev/hidg2")]
    consumer_gadget: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let log_file = args.log_to_file.then(|| args.log_path.clone());
    init_logging(args.debug, log_file)?;

    if args.list_devices {
        list_devices();
        return Ok(());
    }

    tracing::info!("Starting bt2usb v{}", env!("CARGO_PKG_VERSION"));

    if args.device_paths.is_empty() {
        anyhow::bail!("no input devices given; use --device-paths (see --list-devices)");
    }

    let mut config = RelayConfig::new(args.device_paths);
    config.gadgets = GadgetPaths {
        keyboard: args.keyboard_gadget,
        mouse: args.mouse_gadget,
        consumer: args.consumer_gadget,
    };

    for path in &config.device_paths {
        tracing::info!("Configured input device: {}", path.display());
    }

    // Missing gadget devices are fatal: without the USB function there is
    // nowhere to relay to.
    let sinks = Arc::new(GadgetSinks::open(&config.gadgets)?);

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let supervisor =
        RelaySupervisor::with_devices(&config.device_paths, sinks, config.reconnect, cancel)?;
    supervisor.run().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Print available evdev devices with their metadata
fn list_devices() {
    let devices = input::list_devices();
    if devices.is_empty() {
        println!("No input devices found (check permissions on /dev/input)");
        return;
    }
    println!("{:<24} {:<40} {}", "PATH", "NAME", "PHYS");
    for (path, info) in devices {
        println!("{:<24} {:<40} {}", path.display(), info.name, info.phys);
    }
}

/// Cancel the relay token on SIGINT or SIGTERM
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        let term = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(e) => {
                    tracing::warn!("failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term => {}
        }

        tracing::info!("Shutdown signal received");
        cancel.cancel();
    });
}

/// Initialize logging with tracing
fn init_logging(debug: u8, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let filter = match debug {
        0 => "bt2usb=info",
        1 => "bt2usb=debug",
        _ => "bt2usb=trace",
    };

    // Environment variable takes highest priority
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    Ok(())
}

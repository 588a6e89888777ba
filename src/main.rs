//! Polls a ZE07 on a serial port and prints timestamped CO readings.

use std::error::Error;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{info, warn};
use tracing_subscriber::EnvFilter;
use ze07::{LogDiagnostics, OperatingMode, SensorSession, SerialTransport, SessionConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Sensor pushes a frame every second
    Push,
    /// Sensor answers one request per poll
    Query,
}

impl From<Mode> for OperatingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Push => OperatingMode::Push,
            Mode::Query => OperatingMode::Query,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ze07-monitor", about = "Read CO concentration from a Winsen ZE07 sensor")]
struct Args {
    /// Serial device the sensor is attached to
    #[arg(short, long, default_value = "/dev/ttyACM0")]
    port: String,

    /// Reporting mode to put the sensor in
    #[arg(short, long, value_enum, default_value_t = Mode::Query)]
    mode: Mode,

    /// Seconds between requests in query mode
    #[arg(short, long, default_value_t = 3)]
    interval_secs: u64,

    /// Per-read timeout in milliseconds
    #[arg(short, long, default_value_t = ze07::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u32,

    /// Stop after this many readings
    #[arg(short, long)]
    count: Option<u64>,

    /// Log the sensor's reply to the mode switch
    #[arg(long)]
    read_mode_reply: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let transport = SerialTransport::new(&args.port).map_err(|e| {
        log::error!("Serial error on {}: {}", args.port, e);
        e
    })?;
    info!("Connected to {} at {} baud", args.port, ze07::BAUD_RATE);

    let config = SessionConfig::new(args.mode.into())
        .timeout_ms(args.timeout_ms)
        .read_mode_reply(args.read_mode_reply);
    let mut sensor = SensorSession::with_config(transport, config, LogDiagnostics::default());
    sensor.init()?;

    let interval = Duration::from_secs(args.interval_secs);
    let mut readings = 0u64;

    while args.count.is_none_or(|count| readings < count) {
        match sensor.next_measurement() {
            Ok(reading) => {
                readings += 1;
                println!(
                    "{}: CO concentration: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    reading
                );
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => warn!("No reading this cycle: {}", e),
        }

        if sensor.mode() == OperatingMode::Query {
            std::thread::sleep(interval);
        }
    }

    Ok(())
}

//! Winsen ZE07 carbon monoxide sensor driver with support for multiple transport backends.
//!
//! The sensor speaks a fixed nine-byte, checksummed frame over a 9600 baud
//! UART. It either pushes a reading every second (push mode) or answers
//! explicit requests (query mode).
//!
//! # Features
//!
//! - `uart-esp32` - UART transport for ESP32 using esp-idf-svc
//! - `serial` - Serial port transport for desktop using serialport crate
//! - `cli` - the `ze07-monitor` polling binary
//!
//! # Example
//!
//! ```ignore
//! use ze07::{OperatingMode, SensorSession, SerialTransport};
//!
//! let transport = SerialTransport::new("/dev/ttyACM0")?;
//! let mut sensor = SensorSession::new(transport);
//! sensor.set_mode(OperatingMode::Query)?;
//!
//! match sensor.request_reading() {
//!     Ok(reading) => println!("CO: {}", reading),
//!     Err(e) if e.is_fatal() => return Err(e.into()),
//!     Err(e) => eprintln!("no reading this cycle: {}", e),
//! }
//! ```

pub mod codec;
mod config;
mod diagnostics;
mod session;
mod transport;
mod types;

#[cfg(feature = "uart-esp32")]
mod uart;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use codec::Command;
pub use config::{SessionConfig, DEFAULT_SETTLE_MS, DEFAULT_TIMEOUT_MS};
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use session::{SensorSession, SyncState};
pub use transport::SensorTransport;
pub use types::{FrameError, Measurement, OperatingMode, SessionError};

#[cfg(feature = "uart-esp32")]
pub use uart::UartTransport;

#[cfg(feature = "serial")]
pub use serial::{SerialTransport, BAUD_RATE};

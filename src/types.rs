//! Types for ZE07 operations

use std::fmt;

use thiserror::Error;

/// A validated CO concentration reading.
///
/// Holds the raw 16-bit count from the frame; one count is 0.1 ppm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Measurement {
    raw: u16,
}

impl Measurement {
    /// Build a measurement from the high and low concentration bytes of a frame.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Self {
            raw: u16::from_be_bytes([high, low]),
        }
    }

    /// Raw concentration count in tenths of a ppm.
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Concentration in parts per million.
    pub fn ppm(&self) -> f64 {
        f64::from(self.raw) / 10.0
    }
}

impl From<u16> for Measurement {
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ppm", self.raw / 10, self.raw % 10)
    }
}

/// Reporting mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatingMode {
    /// The sensor pushes a frame on its own every second (factory default).
    #[default]
    Push,
    /// The sensor only answers explicit reading requests.
    Query,
}

/// Errors found while validating a single frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The checksum byte does not match the frame contents.
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum computed over bytes 1..=7.
        expected: u8,
        /// Checksum byte carried in the frame.
        actual: u8,
    },

    /// A query response does not start with `FF 86`.
    #[error("unexpected response header: {start:02X} {kind:02X}")]
    UnexpectedHeader {
        /// Byte found at the start marker position.
        start: u8,
        /// Byte found at the response kind position.
        kind: u8,
    },
}

/// Errors that can occur while talking to the sensor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Nothing usable arrived before the read timeout.
    #[error("timed out waiting for sensor data")]
    Timeout,

    /// A frame was cut short by a read timeout.
    #[error("incomplete packet: expected {expected} bytes, got {received}")]
    IncompletePacket {
        /// Bytes the frame needed.
        expected: usize,
        /// Bytes that actually arrived.
        received: usize,
    },

    /// A complete frame arrived but failed checksum validation.
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// A query response carried the wrong header bytes.
    #[error("unexpected response header: {start:02X} {kind:02X}")]
    UnexpectedHeader { start: u8, kind: u8 },

    /// Transport layer error (UART, serial, etc.). The session cannot recover.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl SessionError {
    /// True when the underlying channel is gone and retrying is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::ChannelClosed(_))
    }
}

impl From<FrameError> for SessionError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::ChecksumMismatch { expected, actual } => {
                SessionError::ChecksumMismatch { expected, actual }
            }
            FrameError::UnexpectedHeader { start, kind } => {
                SessionError::UnexpectedHeader { start, kind }
            }
        }
    }
}

/// Convert bytes to uppercase hex string
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

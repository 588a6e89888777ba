use std::time::{Duration, Instant};

use crate::codec::{self, Command, FRAME_LEN, START_BYTE};
use crate::config::SessionConfig;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::transport::SensorTransport;
use crate::types::{bytes_to_hex, Measurement, OperatingMode, SessionError};

/// Where the push-mode reader is within the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Discarding bytes until a start marker shows up.
    SeekingStart,
    /// Start marker seen, collecting the remaining eight bytes.
    ReadingBody,
}

/// A ZE07 sensor attached to a byte channel.
///
/// Each public read operation either returns one validated measurement or a
/// [`SessionError`]; nothing is retried internally. The push-mode reader
/// always ends an operation back in [`SyncState::SeekingStart`], so a failed
/// attempt never leaks partial bytes into the next one.
pub struct SensorSession<T: SensorTransport, D: Diagnostics = LogDiagnostics> {
    transport: T,
    diagnostics: D,
    config: SessionConfig,
    mode: OperatingMode,
    state: SyncState,
}

impl<T: SensorTransport> SensorSession<T> {
    /// Create a session with the default configuration, logging through `log`.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default(), LogDiagnostics::default())
    }
}

impl<T: SensorTransport, D: Diagnostics> SensorSession<T, D> {
    const BODY_LEN: usize = FRAME_LEN - 1;

    pub fn with_config(transport: T, config: SessionConfig, diagnostics: D) -> Self {
        Self {
            transport,
            diagnostics,
            mode: config.mode,
            config,
            state: SyncState::SeekingStart,
        }
    }

    /// Put the sensor into the mode named by the session configuration.
    pub fn init(&mut self) -> Result<(), SessionError> {
        self.set_mode(self.config.mode)?;
        self.diagnostics
            .info(format_args!("ZE07 session ready in {:?} mode", self.mode));
        Ok(())
    }

    /// Switch the sensor's reporting mode.
    ///
    /// The switch is fire-and-forget. With `read_mode_reply` enabled, whatever
    /// the sensor sends back is logged and otherwise ignored.
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), SessionError> {
        let command = match mode {
            OperatingMode::Push => Command::SetPushMode,
            OperatingMode::Query => Command::SetQueryMode,
        };
        self.send(command)?;
        self.mode = mode;
        self.state = SyncState::SeekingStart;

        if self.config.read_mode_reply {
            let mut reply = [0u8; FRAME_LEN];
            let received = self.fill(&mut reply)?;
            if received == 0 {
                self.diagnostics
                    .debug(format_args!("No reply to {:?}", command));
            } else {
                self.diagnostics.debug(format_args!(
                    "Reply to {:?}: {}",
                    command,
                    bytes_to_hex(&reply[..received])
                ));
            }
        }
        Ok(())
    }

    /// Read the next measurement according to the current mode.
    pub fn next_measurement(&mut self) -> Result<Measurement, SessionError> {
        match self.mode {
            OperatingMode::Push => self.next_push_measurement(),
            OperatingMode::Query => self.request_reading(),
        }
    }

    /// Wait for the next frame pushed by the sensor and decode it.
    ///
    /// Bytes ahead of a start marker are discarded. Gives up with
    /// [`SessionError::Timeout`] when a read times out while seeking, or when
    /// seeking has consumed the whole read timeout without finding a marker.
    pub fn next_push_measurement(&mut self) -> Result<Measurement, SessionError> {
        let result = self.sync_push_frame();
        self.state = SyncState::SeekingStart;
        result
    }

    /// Ask the sensor for a reading and decode its answer.
    pub fn request_reading(&mut self) -> Result<Measurement, SessionError> {
        self.transport
            .clear_input()
            .map_err(|e| self.channel_closed("clear", e))?;
        self.send(Command::RequestReading)?;

        let mut response = [0u8; FRAME_LEN];
        match self.fill(&mut response)? {
            0 => {
                self.diagnostics
                    .warn(format_args!("No response to reading request"));
                return Err(SessionError::Timeout);
            }
            received if received < FRAME_LEN => {
                self.diagnostics.warn(format_args!(
                    "Invalid response length: {}",
                    bytes_to_hex(&response[..received])
                ));
                return Err(SessionError::IncompletePacket {
                    expected: FRAME_LEN,
                    received,
                });
            }
            _ => {}
        }

        self.diagnostics
            .debug(format_args!("Received response {}", bytes_to_hex(&response)));
        codec::decode_query_response(&response).map_err(|e| {
            self.diagnostics.warn(format_args!(
                "Dropping response {}: {}",
                bytes_to_hex(&response),
                e
            ));
            e.into()
        })
    }

    /// Mode most recently sent to the sensor.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Give back the transport, e.g. to close it.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn sync_push_frame(&mut self) -> Result<Measurement, SessionError> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(self.config.timeout_ms));
        let mut frame = [0u8; FRAME_LEN];
        let mut discarded = 0usize;

        loop {
            match self.state {
                SyncState::SeekingStart => {
                    let mut byte = [0u8; 1];
                    if self.read_some(&mut byte)? == 0 {
                        return Err(SessionError::Timeout);
                    }
                    if byte[0] == START_BYTE {
                        if discarded > 0 {
                            self.diagnostics.debug(format_args!(
                                "Skipped {} bytes before start marker",
                                discarded
                            ));
                        }
                        frame[0] = START_BYTE;
                        self.state = SyncState::ReadingBody;
                    } else {
                        discarded += 1;
                        if Instant::now() >= deadline {
                            self.diagnostics.warn(format_args!(
                                "No start marker after {} bytes",
                                discarded
                            ));
                            return Err(SessionError::Timeout);
                        }
                    }
                }
                SyncState::ReadingBody => {
                    let received = self.fill(&mut frame[1..])?;
                    if received < Self::BODY_LEN {
                        self.diagnostics.warn(format_args!(
                            "Incomplete packet: {}",
                            bytes_to_hex(&frame[..=received])
                        ));
                        return Err(SessionError::IncompletePacket {
                            expected: Self::BODY_LEN,
                            received,
                        });
                    }

                    self.diagnostics
                        .debug(format_args!("Received frame {}", bytes_to_hex(&frame)));
                    return codec::decode_push_frame(&frame).map_err(|e| {
                        self.diagnostics.warn(format_args!(
                            "Dropping frame {}: {}",
                            bytes_to_hex(&frame),
                            e
                        ));
                        e.into()
                    });
                }
            }
        }
    }

    // Writes a command frame and waits for the sensor to act on it.
    fn send(&mut self, command: Command) -> Result<(), SessionError> {
        let frame = command.encode();
        self.diagnostics
            .debug(format_args!("Sending {:?}: {}", command, bytes_to_hex(&frame)));

        let written = self
            .transport
            .write(&frame)
            .map_err(|e| self.channel_closed("write", e))?;
        if written != frame.len() {
            self.diagnostics.error(format_args!(
                "Short write: {} of {} bytes",
                written,
                frame.len()
            ));
            return Err(SessionError::ChannelClosed(format!(
                "short write: {} of {} bytes",
                written,
                frame.len()
            )));
        }

        if self.config.settle_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        }
        Ok(())
    }

    // Reads until `buf` is full or a read times out; returns the bytes received.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        let mut received = 0;
        while received < buf.len() {
            let n = self.read_some(&mut buf[received..])?;
            if n == 0 {
                break;
            }
            received += n;
        }
        Ok(received)
    }

    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        self.transport
            .read(buf, self.config.timeout_ms)
            .map_err(|e| self.channel_closed("read", e))
    }

    fn channel_closed(&self, operation: &str, err: T::Error) -> SessionError {
        self.diagnostics
            .error(format_args!("Transport {} failed: {:?}", operation, err));
        SessionError::ChannelClosed(format!("{:?}", err))
    }
}

use crate::types::OperatingMode;

/// Default per-read timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Default pause after writing a command, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 100;

/// Configuration settings for a sensor session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on how long a single read may block, in milliseconds.
    pub timeout_ms: u32,
    /// Pause after writing a command before reading, in milliseconds.
    pub settle_ms: u64,
    /// Mode the sensor is put into by `SensorSession::init`.
    pub mode: OperatingMode,
    /// Read and log whatever the sensor sends back after a mode switch.
    pub read_mode_reply: bool,
}

impl SessionConfig {
    pub fn new(mode: OperatingMode) -> SessionConfig {
        SessionConfig {
            mode,
            ..SessionConfig::default()
        }
    }

    pub fn timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub fn mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn read_mode_reply(mut self, read_mode_reply: bool) -> Self {
        self.read_mode_reply = read_mode_reply;
        self
    }
}

/// One second timeout, 100 ms settle delay, push mode, mode replies ignored.
impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            mode: OperatingMode::Push,
            read_mode_reply: false,
        }
    }
}

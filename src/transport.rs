/// Byte channel the sensor session talks through.
/// Implement this trait for different transports (UART, serial port, etc.)
pub trait SensorTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write data to the transport
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read data from the transport with a timeout in milliseconds.
    ///
    /// Returns `Ok(0)` when nothing arrived before the timeout. An `Err` means
    /// the channel itself has failed.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Clear the input buffer
    fn clear_input(&mut self) -> Result<(), Self::Error>;
}

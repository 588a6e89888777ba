//! UART transport for ESP32 using esp-idf-svc

use crate::transport::SensorTransport;
use esp_idf_svc::hal::delay::TickType;
use esp_idf_svc::hal::gpio::{self, InputPin, OutputPin};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use std::time::Duration;

const BAUD_RATE: u32 = 9600;

pub struct UartTransport<'a> {
    uart: UartDriver<'a>,
}

impl<'a> UartTransport<'a> {
    /// Configure `uart` for the ZE07 (9600 baud, 8N1) on the given pins.
    pub fn new(
        uart: impl Peripheral<P = impl uart::Uart> + 'a,
        tx: impl Peripheral<P = impl OutputPin> + 'a,
        rx: impl Peripheral<P = impl InputPin> + 'a,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let config = uart::config::Config::default()
            .baudrate(BAUD_RATE.into())
            .data_bits(uart::config::DataBits::DataBits8)
            .parity_none()
            .stop_bits(uart::config::StopBits::STOP1);
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<gpio::Gpio0>::None,
            Option::<gpio::Gpio0>::None,
            &config,
        )?;

        std::thread::sleep(Duration::from_millis(500));
        uart.clear_rx()?;

        Ok(Self { uart })
    }
}

impl SensorTransport for UartTransport<'_> {
    type Error = esp_idf_svc::sys::EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.uart.write(data)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        let ticks = TickType::new_millis(timeout_ms as u64).ticks();
        self.uart.read(buf, ticks)
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.uart.clear_rx()
    }
}

//! Blocking drivers for the external chips, written against the
//! `embedded-hal` 1.0 traits so they run unchanged on the host in tests.
//!
//! - **eeprom**: 24LC04 settings storage over I²C
//! - **nrf24**: nRF24L01+ transmitter over SPI

pub mod eeprom;
pub mod nrf24;

pub use eeprom::Eeprom24x;
pub use nrf24::Nrf24;

//! Unified error type for the transmitter.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type returned by the hardware collaborators.
///
/// The control core never propagates these: a failed send or write is
/// logged and the cycle carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// EEPROM read/write failed on the I2C bus.
    Storage,

    /// Access falls outside the EEPROM capacity.
    StorageRange,

    // Radio
    /// SPI transfer to the nRF24L01+ failed.
    Radio,

    /// The transceiver did not answer with the expected register value.
    RadioNotFound,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

//! nRF24L01+ in fire-and-forget transmit mode.
//!
//! Configuration: fixed RF channel, 250 kbps, maximum PA level, 16-bit
//! CRC, auto-acknowledge and retransmit disabled so every send costs the
//! same time. A send loads the payload and pulses CE; nothing waits for
//! the air time.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::channels::{ControlPacket, PACKET_SIZE};
use crate::config::{RADIO_PIPE_ADDRESS, RADIO_RF_CHANNEL};
use crate::error::Error;
use crate::io::RadioLink;
use crate::log::{info, warn};

// Commands
const R_REGISTER: u8 = 0x00;
const W_REGISTER: u8 = 0x20;
const W_TX_PAYLOAD: u8 = 0xA0;
const FLUSH_TX: u8 = 0xE1;
const NOP: u8 = 0xFF;

// Registers
const REG_CONFIG: u8 = 0x00;
const REG_EN_AA: u8 = 0x01;
const REG_SETUP_AW: u8 = 0x03;
const REG_SETUP_RETR: u8 = 0x04;
const REG_RF_CH: u8 = 0x05;
const REG_RF_SETUP: u8 = 0x06;
const REG_STATUS: u8 = 0x07;
const REG_RX_ADDR_P0: u8 = 0x0A;
const REG_TX_ADDR: u8 = 0x10;

/// EN_CRC | CRCO (2 bytes) | PWR_UP, PRIM_RX = 0.
const CONFIG_TX_POWERED: u8 = 0b0000_1110;
/// RF_DR_LOW (250 kbps) | RF_PWR = 0 dBm.
const RF_SETUP_250K_MAX: u8 = 0b0010_0110;
/// 5-byte addresses.
const SETUP_AW_5: u8 = 0b11;
/// RX_DR | TX_DS | MAX_RT, write 1 to clear.
const STATUS_IRQ_MASK: u8 = 0b0111_0000;
const STATUS_TX_FULL: u8 = 0b0000_0001;

/// Minimum CE high time to start a transmission is 10 µs.
const CE_PULSE_US: u32 = 15;
/// Power-on reset plus Tpd2stby with margin.
const POWER_UP_MS: u32 = 5;

pub struct Nrf24<SPI, CE, D> {
    spi: SPI,
    ce: CE,
    delay: D,
}

impl<SPI, CE, D> Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    /// Configure the transceiver as a transmitter.
    ///
    /// Fails with [`Error::RadioNotFound`] if a register does not read back.
    pub fn new(spi: SPI, ce: CE, delay: D) -> Result<Self, Error> {
        let mut radio = Self { spi, ce, delay };
        radio.ce.set_low().map_err(|_| Error::Radio)?;
        radio.delay.delay_ms(POWER_UP_MS);

        radio.write_register(REG_SETUP_RETR, &[0])?;
        if radio.read_register(REG_SETUP_RETR)? != 0 {
            warn!("nrf24: no answer on SPI");
            return Err(Error::RadioNotFound);
        }

        radio.write_register(REG_EN_AA, &[0])?;
        radio.write_register(REG_SETUP_AW, &[SETUP_AW_5])?;
        radio.write_register(REG_RF_CH, &[RADIO_RF_CHANNEL])?;
        radio.write_register(REG_RF_SETUP, &[RF_SETUP_250K_MAX])?;
        radio.write_register(REG_TX_ADDR, &RADIO_PIPE_ADDRESS)?;
        radio.write_register(REG_RX_ADDR_P0, &RADIO_PIPE_ADDRESS)?;
        radio.write_register(REG_STATUS, &[STATUS_IRQ_MASK])?;
        radio.command(FLUSH_TX)?;
        radio.write_register(REG_CONFIG, &[CONFIG_TX_POWERED])?;
        radio.delay.delay_ms(POWER_UP_MS);

        info!("nrf24: ready on channel {}", RADIO_RF_CHANNEL);
        Ok(radio)
    }

    /// Single-byte command; returns STATUS.
    fn command(&mut self, cmd: u8) -> Result<u8, Error> {
        let mut frame = [cmd];
        self.spi
            .transfer_in_place(&mut frame)
            .map_err(|_| Error::Radio)?;
        Ok(frame[0])
    }

    fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Error> {
        let mut frame = [0u8; 6];
        let frame = frame
            .get_mut(..=data.len())
            .ok_or(Error::BufferOverflow)?;
        frame[0] = W_REGISTER | reg;
        frame[1..].copy_from_slice(data);
        self.spi.write(frame).map_err(|_| Error::Radio)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Error> {
        let mut frame = [R_REGISTER | reg, NOP];
        self.spi
            .transfer_in_place(&mut frame)
            .map_err(|_| Error::Radio)?;
        Ok(frame[1])
    }
}

impl<SPI, CE, D> RadioLink for Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    fn send(&mut self, packet: &ControlPacket) -> Result<(), Error> {
        // Payloads written to a full FIFO are dropped by the chip.
        if self.command(NOP)? & STATUS_TX_FULL != 0 {
            self.command(FLUSH_TX)?;
        }

        let mut frame = [0u8; 1 + PACKET_SIZE];
        frame[0] = W_TX_PAYLOAD;
        packet.serialize(&mut frame[1..]);
        self.spi.write(&frame).map_err(|_| Error::Radio)?;

        self.ce.set_high().map_err(|_| Error::Radio)?;
        self.delay.delay_us(CE_PULSE_US);
        self.ce.set_low().map_err(|_| Error::Radio)?;

        self.write_register(REG_STATUS, &[STATUS_IRQ_MASK])
    }
}

//! 24LC04 I²C EEPROM.
//!
//! 512 bytes in two 256-byte blocks. The block is selected by the low bit
//! of the device address, the byte inside it by a one-byte word address.
//! Writes must not cross a 16-byte page or they wrap inside the page, so
//! they are split at page boundaries and each page waits out the internal
//! write cycle.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::{EEPROM_CAPACITY, EEPROM_I2C_ADDRESS, EEPROM_PAGE_SIZE, EEPROM_WRITE_CYCLE_MS};
use crate::error::Error;
use crate::io::ByteStore;
use crate::log::warn;

const BLOCK_SIZE: u16 = 256;

/// Bytes per sequential read transaction.
const READ_CHUNK: u16 = 16;

pub struct Eeprom24x<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C, D> Eeprom24x<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Device address and word address for a linear offset.
    fn address(offset: u16) -> (u8, u8) {
        let block = (offset / BLOCK_SIZE) as u8;
        (EEPROM_I2C_ADDRESS | block, (offset % BLOCK_SIZE) as u8)
    }

    fn check_range(offset: u16, len: usize) -> Result<(), Error> {
        if offset as usize + len > EEPROM_CAPACITY as usize {
            warn!("eeprom: {}+{} out of range", offset, len);
            return Err(Error::StorageRange);
        }
        Ok(())
    }
}

impl<I2C, D> ByteStore for Eeprom24x<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn load_block(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error> {
        Self::check_range(offset, buf.len())?;

        let mut addr = offset;
        let mut rest = buf;
        while !rest.is_empty() {
            // Sequential reads wrap inside a block.
            let room = (BLOCK_SIZE - addr % BLOCK_SIZE).min(READ_CHUNK) as usize;
            let take = room.min(rest.len());
            let (chunk, next) = core::mem::take(&mut rest).split_at_mut(take);

            let (dev, word) = Self::address(addr);
            self.i2c
                .write_read(dev, &[word], chunk)
                .map_err(|_| Error::Storage)?;

            addr += chunk.len() as u16;
            rest = next;
        }
        Ok(())
    }

    fn save_block(&mut self, offset: u16, data: &[u8]) -> Result<(), Error> {
        Self::check_range(offset, data.len())?;

        let mut frame = [0u8; 1 + EEPROM_PAGE_SIZE as usize];
        let mut addr = offset;
        let mut rest = data;

        while !rest.is_empty() {
            let room = (EEPROM_PAGE_SIZE - addr % EEPROM_PAGE_SIZE) as usize;
            let (page, next) = rest.split_at(room.min(rest.len()));

            let (dev, word) = Self::address(addr);
            frame[0] = word;
            frame[1..=page.len()].copy_from_slice(page);
            self.i2c
                .write(dev, &frame[..=page.len()])
                .map_err(|_| Error::Storage)?;
            self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);

            addr += page.len() as u16;
            rest = next;
        }
        Ok(())
    }
}

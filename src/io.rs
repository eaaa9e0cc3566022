//! Collaborator interfaces consumed by the control core.
//!
//! The firmware binary implements these on top of the nRF52840
//! peripherals; tests implement them with plain structs.

use crate::channels::ControlPacket;
use crate::error::Error;
use crate::ui::Frame;

/// Analog inputs sampled once per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    Throttle = 0,
    Pitch = 1,
    Roll = 2,
    Yaw = 3,
    Aux1 = 4,
    Aux2 = 5,
    Battery = 6,
}

impl AnalogChannel {
    pub const COUNT: usize = 7;
}

/// Digital inputs (all wired active-low with pull-ups).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitalPin {
    Up = 0,
    Down = 1,
    Enter = 2,
    Trim1Up = 3,
    Trim1Down = 4,
    Trim2Up = 5,
    Trim2Down = 6,
    Trim3Up = 7,
    Trim3Down = 8,
    SwitchA = 9,
    SwitchB = 10,
}

impl DigitalPin {
    pub const COUNT: usize = 11;
}

/// Raw pin sampling. Must be side-effect free.
pub trait RawInputs {
    /// 12-bit reading in `0..=4095`.
    fn read_analog(&self, channel: AnalogChannel) -> u16;
    /// Electrical level; `true` = high (released for buttons).
    fn read_digital(&self, pin: DigitalPin) -> bool;
}

/// One cycle's worth of samples, taken up front so every component of the
/// cycle sees the same values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSnapshot {
    pub analog: [u16; AnalogChannel::COUNT],
    pub digital: [bool; DigitalPin::COUNT],
}

impl InputSnapshot {
    /// Sticks centered, battery sense floating, every button released.
    pub const fn idle() -> Self {
        Self {
            analog: [2047, 2048, 2048, 2048, 2048, 2048, 0],
            digital: [true; DigitalPin::COUNT],
        }
    }

    pub fn set_analog(&mut self, channel: AnalogChannel, value: u16) {
        self.analog[channel as usize] = value.min(crate::config::ADC_MAX);
    }

    pub fn set_digital(&mut self, pin: DigitalPin, high: bool) {
        self.digital[pin as usize] = high;
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

impl RawInputs for InputSnapshot {
    fn read_analog(&self, channel: AnalogChannel) -> u16 {
        self.analog[channel as usize]
    }

    fn read_digital(&self, pin: DigitalPin) -> bool {
        self.digital[pin as usize]
    }
}

/// Non-volatile byte storage (EEPROM).
pub trait ByteStore {
    fn load_block(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error>;
    fn save_block(&mut self, offset: u16, data: &[u8]) -> Result<(), Error>;
}

/// One-way control link. No acknowledgement is modelled.
pub trait RadioLink {
    fn send(&mut self, packet: &ControlPacket) -> Result<(), Error>;
}

/// Renders a frame. Pure function of its input.
pub trait Presenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), Error>;
}

/// The piezo buzzer, driven every cycle.
pub trait BuzzerOutput {
    fn set(&mut self, on: bool);
}

// A collaborator that failed to come up is passed as `None` and swallows
// its calls, so the rest of the transmitter keeps running.

impl<T: RadioLink> RadioLink for Option<T> {
    fn send(&mut self, packet: &ControlPacket) -> Result<(), Error> {
        match self {
            Some(link) => link.send(packet),
            None => Ok(()),
        }
    }
}

impl<T: Presenter> Presenter for Option<T> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), Error> {
        match self {
            Some(presenter) => presenter.present(frame),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl RadioLink for Broken {
        fn send(&mut self, _packet: &ControlPacket) -> Result<(), Error> {
            Err(Error::Radio)
        }
    }

    #[test]
    fn absent_radio_accepts_everything() {
        let mut link: Option<Broken> = None;
        assert_eq!(link.send(&ControlPacket::default()), Ok(()));
        let mut link = Some(Broken);
        assert_eq!(link.send(&ControlPacket::default()), Err(Error::Radio));
    }

    #[test]
    fn snapshot_clamps_analog_and_reads_back() {
        let mut raw = InputSnapshot::idle();
        raw.set_analog(AnalogChannel::Yaw, 9000);
        raw.set_digital(DigitalPin::Enter, false);
        assert_eq!(raw.read_analog(AnalogChannel::Yaw), 4095);
        assert!(!raw.read_digital(DigitalPin::Enter));
        assert!(raw.read_digital(DigitalPin::Up));
    }
}

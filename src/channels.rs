//! Stick/pot readings to the 8-byte control packet.

use crate::config::{ADC_MAX, ADC_MIDPOINT, ADC_MIN, AUX_CENTER, WIRED_REVERSED};
use crate::io::{AnalogChannel, DigitalPin, RawInputs};
use crate::settings::{RadioSettings, ThrottleMode, TrimAxis};

/// Encoded packet size in bytes.
pub const PACKET_SIZE: usize = 8;

/// Output value at the stick center.
pub const CENTER_OUTPUT: u8 = 128;

/// Integer rescale, truncating toward zero. A zero-width input range
/// yields `out_min`.
fn rescale(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Two-segment map around `center`: `[lower, center] -> [0, 128]` and
/// `[center, upper] -> [128, 255]`, then `255 - v` when `invert` is set.
pub fn map_channel(raw: u16, lower: u16, center: u16, upper: u16, invert: bool) -> u8 {
    let raw = raw.clamp(lower, upper) as i32;
    let (lower, center, upper) = (lower as i32, center as i32, upper as i32);

    let value = if raw < center {
        rescale(raw, lower, center, 0, CENTER_OUTPUT as i32)
    } else {
        rescale(raw, center, upper, CENTER_OUTPUT as i32, 255)
    };
    let value = value.clamp(0, 255) as u8;

    if invert {
        255 - value
    } else {
        value
    }
}

/// Throttle curve. `Normal` is the two-segment map around the fixed
/// midpoint; `Airplane` cuts the lower half to zero and spreads the upper
/// half over the full output.
pub fn map_throttle(raw: u16, mode: ThrottleMode, invert: bool) -> u8 {
    match mode {
        ThrottleMode::Normal => map_channel(raw, ADC_MIN, ADC_MIDPOINT, ADC_MAX, invert),
        ThrottleMode::Airplane => {
            let raw = raw.min(ADC_MAX);
            let value = if raw < ADC_MIDPOINT {
                0
            } else {
                rescale(raw as i32, ADC_MIDPOINT as i32, ADC_MAX as i32, 0, 255).clamp(0, 255)
                    as u8
            };
            if invert {
                255 - value
            } else {
                value
            }
        }
    }
}

/// Outgoing control frame, one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlPacket {
    pub throttle: u8,
    pub pitch: u8,
    pub roll: u8,
    pub yaw: u8,
    pub aux1: u8,
    pub aux2: u8,
    pub aux3: bool,
    pub aux4: bool,
}

impl Default for ControlPacket {
    /// Throttle closed, everything else centered, switches off.
    fn default() -> Self {
        Self {
            throttle: 0,
            pitch: CENTER_OUTPUT,
            roll: CENTER_OUTPUT,
            yaw: CENTER_OUTPUT,
            aux1: CENTER_OUTPUT,
            aux2: CENTER_OUTPUT,
            aux3: false,
            aux4: false,
        }
    }
}

impl ControlPacket {
    /// Wire order: throttle, pitch, roll, yaw, aux1, aux2, aux3, aux4.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < PACKET_SIZE {
            return 0;
        }
        buf[..PACKET_SIZE].copy_from_slice(&[
            self.throttle,
            self.pitch,
            self.roll,
            self.yaw,
            self.aux1,
            self.aux2,
            self.aux3 as u8,
            self.aux4 as u8,
        ]);
        PACKET_SIZE
    }

    /// Channel value by display index (CH1..CH8 = 0..7).
    pub fn channel(&self, index: usize) -> u8 {
        match index {
            0 => self.throttle,
            1 => self.pitch,
            2 => self.roll,
            3 => self.yaw,
            4 => self.aux1,
            5 => self.aux2,
            6 => self.aux3 as u8,
            7 => self.aux4 as u8,
            _ => 0,
        }
    }
}

/// Effective inversion: board wiring XOR user choice.
fn reversed(settings: &RadioSettings, channel: usize) -> bool {
    WIRED_REVERSED[channel] ^ settings.inverted[channel]
}

/// Map one cycle's samples through the current calibration.
pub fn build_packet(raw: &impl RawInputs, settings: &RadioSettings) -> ControlPacket {
    let stick = |channel: AnalogChannel, center: u16, index: usize| {
        map_channel(
            raw.read_analog(channel),
            ADC_MIN,
            center,
            ADC_MAX,
            reversed(settings, index),
        )
    };

    ControlPacket {
        throttle: map_throttle(
            raw.read_analog(AnalogChannel::Throttle),
            settings.throttle_mode,
            settings.inverted[0],
        ),
        pitch: stick(AnalogChannel::Pitch, settings.trim(TrimAxis::Pitch), 1),
        roll: stick(AnalogChannel::Roll, settings.trim(TrimAxis::Roll), 2),
        yaw: stick(AnalogChannel::Yaw, settings.trim(TrimAxis::Yaw), 3),
        aux1: stick(AnalogChannel::Aux1, AUX_CENTER, 4),
        aux2: stick(AnalogChannel::Aux2, AUX_CENTER, 5),
        aux3: raw.read_digital(DigitalPin::SwitchA) ^ reversed(settings, 6),
        aux4: raw.read_digital(DigitalPin::SwitchB) ^ reversed(settings, 7),
    }
}

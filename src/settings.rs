//! Persisted user settings and their on-EEPROM record format.
//!
//! Layout (12 bytes, little-endian):
//! ```text
//! Byte 0     : format version
//! Byte 1..3  : trim 1 (roll)
//! Byte 3..5  : trim 2 (pitch)
//! Byte 5..7  : trim 3 (yaw)
//! Byte 7     : buzzer enabled (0/1)
//! Byte 8     : light mode (0/1)
//! Byte 9     : channel inversion bitmask, bit n = CH(n+1)
//! Byte 10    : timer preset index
//! Byte 11    : throttle mode (0 = normal, 1 = airplane)
//! ```
//!
//! Changing the layout requires bumping `SETTINGS_FORMAT_VERSION`; older
//! records are then rejected and replaced by defaults.

use crate::config::{
    SETTINGS_FORMAT_VERSION, TIMER_PRESETS_MIN, TRIM_CENTER, TRIM_MAX, TRIM_MIN,
};

/// Encoded record size in bytes.
pub const SETTINGS_RECORD_SIZE: usize = 12;

/// Number of channels that can be inverted (CH1..CH8).
pub const CHANNEL_COUNT: usize = 8;

/// Number of trimmed sticks.
pub const TRIM_COUNT: usize = 3;

/// Throttle curve selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThrottleMode {
    /// Two-segment map around the stick midpoint (quad / normal).
    #[default]
    Normal,
    /// Lower half of the stick is a hard zero, upper half spans the range.
    Airplane,
}

impl ThrottleMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThrottleMode::Normal => ThrottleMode::Airplane,
            ThrottleMode::Airplane => ThrottleMode::Normal,
        }
    }
}

/// Which stick a trim belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrimAxis {
    Roll = 0,
    Pitch = 1,
    Yaw = 2,
}

/// Why a stored record was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Record written by another layout version (or blank EEPROM).
    Version(u8),
    /// A trim lies outside 0..=4095.
    TrimOutOfRange(u16),
}

/// User configuration kept in EEPROM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioSettings {
    /// Stick centers for roll, pitch, yaw.
    pub trims: [u16; TRIM_COUNT],
    /// `false` mutes UI feedback (forced tones still sound).
    pub buzzer_enabled: bool,
    /// Light background on the OLED.
    pub light_mode: bool,
    /// User inversion per channel, CH1..CH8.
    pub inverted: [bool; CHANNEL_COUNT],
    /// Index into `TIMER_PRESETS_MIN`.
    pub timer_preset: u8,
    pub throttle_mode: ThrottleMode,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            trims: [TRIM_CENTER; TRIM_COUNT],
            buzzer_enabled: true,
            light_mode: false,
            inverted: [false; CHANNEL_COUNT],
            timer_preset: 0,
            throttle_mode: ThrottleMode::Normal,
        }
    }
}

impl RadioSettings {
    pub fn trim(&self, axis: TrimAxis) -> u16 {
        self.trims[axis as usize]
    }

    /// Move a trim by `delta`, saturating at the trim limits.
    /// Returns `true` if the value changed.
    pub fn nudge_trim(&mut self, axis: TrimAxis, delta: i32) -> bool {
        let current = self.trims[axis as usize];
        let next = (current as i32 + delta).clamp(TRIM_MIN as i32, TRIM_MAX as i32) as u16;
        self.trims[axis as usize] = next;
        next != current
    }

    pub fn reset_trims(&mut self) {
        self.trims = [TRIM_CENTER; TRIM_COUNT];
    }

    pub fn toggle_inverted(&mut self, channel: usize) {
        if let Some(flag) = self.inverted.get_mut(channel) {
            *flag = !*flag;
        }
    }

    /// Selected countdown length in minutes (0 = disabled).
    pub fn timer_minutes(&self) -> u8 {
        TIMER_PRESETS_MIN
            .get(self.timer_preset as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Serialise into a byte slice for EEPROM storage.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn encode(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_RECORD_SIZE {
            return 0;
        }
        buf[0] = SETTINGS_FORMAT_VERSION;
        for (i, trim) in self.trims.iter().enumerate() {
            buf[1 + i * 2..3 + i * 2].copy_from_slice(&trim.to_le_bytes());
        }
        buf[7] = self.buzzer_enabled as u8;
        buf[8] = self.light_mode as u8;
        buf[9] = self
            .inverted
            .iter()
            .enumerate()
            .fold(0u8, |mask, (i, &inv)| mask | ((inv as u8) << i));
        buf[10] = self.timer_preset;
        buf[11] = match self.throttle_mode {
            ThrottleMode::Normal => 0,
            ThrottleMode::Airplane => 1,
        };
        SETTINGS_RECORD_SIZE
    }

    /// Parse a stored record.
    ///
    /// Only the version byte and the trims are validated; the other fields
    /// are coerced into range (unknown timer index → disabled, any nonzero
    /// flag → set).
    pub fn decode(data: &[u8; SETTINGS_RECORD_SIZE]) -> Result<Self, RecordError> {
        if data[0] != SETTINGS_FORMAT_VERSION {
            return Err(RecordError::Version(data[0]));
        }

        let mut trims = [0u16; TRIM_COUNT];
        for (i, trim) in trims.iter_mut().enumerate() {
            let value = u16::from_le_bytes([data[1 + i * 2], data[2 + i * 2]]);
            if !(TRIM_MIN..=TRIM_MAX).contains(&value) {
                return Err(RecordError::TrimOutOfRange(value));
            }
            *trim = value;
        }

        let mut inverted = [false; CHANNEL_COUNT];
        for (i, inv) in inverted.iter_mut().enumerate() {
            *inv = data[9] & (1 << i) != 0;
        }

        let timer_preset = if (data[10] as usize) < TIMER_PRESETS_MIN.len() {
            data[10]
        } else {
            0
        };

        Ok(Self {
            trims,
            buzzer_enabled: data[7] != 0,
            light_mode: data[8] != 0,
            inverted,
            timer_preset,
            throttle_mode: if data[11] == 1 {
                ThrottleMode::Airplane
            } else {
                ThrottleMode::Normal
            },
        })
    }
}

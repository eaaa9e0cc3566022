//! Low-battery beep pattern.
//!
//! While the pack sits between the plausibility floor and the warning
//! threshold the buzzer repeats: beep 150 ms, pause 50 ms, beep 150 ms,
//! pause 1000 ms. The pattern ignores the mute setting.

use crate::config::{BATTERY_PLAUSIBLE_FLOOR_V, BATTERY_WARNING_V};
use crate::log::warn;
use crate::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPhase {
    Idle,
    FirstBeep,
    ShortPause,
    SecondBeep,
    LongPause,
}

impl AlarmPhase {
    fn duration_ms(self) -> Millis {
        match self {
            AlarmPhase::Idle => 0,
            AlarmPhase::FirstBeep | AlarmPhase::SecondBeep => 150,
            AlarmPhase::ShortPause => 50,
            AlarmPhase::LongPause => 1000,
        }
    }

    fn next(self) -> Self {
        match self {
            AlarmPhase::Idle | AlarmPhase::LongPause => AlarmPhase::FirstBeep,
            AlarmPhase::FirstBeep => AlarmPhase::ShortPause,
            AlarmPhase::ShortPause => AlarmPhase::SecondBeep,
            AlarmPhase::SecondBeep => AlarmPhase::LongPause,
        }
    }

    fn sounding(self) -> bool {
        matches!(self, AlarmPhase::FirstBeep | AlarmPhase::SecondBeep)
    }
}

/// `true` if `voltage` is low but still a real reading.
pub fn is_low_battery(voltage: f32) -> bool {
    voltage > BATTERY_PLAUSIBLE_FLOOR_V && voltage < BATTERY_WARNING_V
}

pub struct LowBatteryAlarm {
    phase: AlarmPhase,
    phase_since: Millis,
}

impl LowBatteryAlarm {
    pub const fn new() -> Self {
        Self {
            phase: AlarmPhase::Idle,
            phase_since: 0,
        }
    }

    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != AlarmPhase::Idle
    }

    /// Advance the pattern. Returns the buzzer level the alarm asks for.
    pub fn step(&mut self, voltage: f32, now: Millis) -> bool {
        if !is_low_battery(voltage) {
            self.phase = AlarmPhase::Idle;
            return false;
        }

        if self.phase == AlarmPhase::Idle {
            warn!("battery low: {} V", voltage);
            self.phase = AlarmPhase::FirstBeep;
            self.phase_since = now;
        }

        while now.saturating_sub(self.phase_since) >= self.phase.duration_ms() {
            self.phase_since += self.phase.duration_ms();
            self.phase = self.phase.next();
        }

        self.phase.sounding()
    }
}

impl Default for LowBatteryAlarm {
    fn default() -> Self {
        Self::new()
    }
}

//! Flight countdown timer.
//!
//! ```text
//!   Idle --arm(n>0)--> Armed --start trigger--> Running --remaining<=0--> Idle
//!     ^                  |                         |
//!     +-----disarm-------+----------disarm---------+
//! ```
//!
//! While running a forced tick tone sounds once per second; expiry plays a
//! forced double beep.

use crate::beeper::Beeper;
use crate::config::{TIMER_THROTTLE_START_LEVEL, TONE_TICK_MS};
use crate::log::info;
use crate::Millis;

const TICK_PERIOD_MS: Millis = 1000;

/// What moves an armed timer into the running state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerStart {
    /// Start counting on the first step after arming.
    Immediate,
    /// Wait until the throttle output rises above the start level.
    ThrottleUp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerPhase {
    #[default]
    Idle,
    Armed,
    Running,
}

/// Read-only view handed to the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerView {
    pub phase: TimerPhase,
    pub minutes: u8,
    pub remaining_ms: i64,
}

impl TimerView {
    /// `(minutes, seconds)` of the remaining time, rounded down.
    pub fn remaining_mm_ss(&self) -> (u32, u32) {
        let secs = (self.remaining_ms.max(0) / 1000) as u32;
        (secs / 60, secs % 60)
    }
}

pub struct CountdownTimer {
    start_mode: TimerStart,
    phase: TimerPhase,
    minutes: u8,
    started_at: Millis,
    last_tick: Millis,
    remaining_ms: i64,
}

impl CountdownTimer {
    pub const fn new(start_mode: TimerStart) -> Self {
        Self {
            start_mode,
            phase: TimerPhase::Idle,
            minutes: 0,
            started_at: 0,
            last_tick: 0,
            remaining_ms: 0,
        }
    }

    fn duration_ms(&self) -> i64 {
        self.minutes as i64 * 60_000
    }

    /// Arm for `minutes`. A zero duration disarms instead.
    pub fn arm(&mut self, minutes: u8) {
        if minutes == 0 {
            self.disarm();
            return;
        }
        self.minutes = minutes;
        self.phase = TimerPhase::Armed;
        self.remaining_ms = self.duration_ms();
        info!("timer: armed for {} min", minutes);
    }

    pub fn disarm(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_ms = 0;
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            phase: self.phase,
            minutes: self.minutes,
            remaining_ms: self.remaining_ms,
        }
    }

    /// Advance by one poll cycle. `throttle` is this cycle's mapped output.
    pub fn step(&mut self, now: Millis, throttle: u8, beeper: &mut Beeper) {
        if self.phase == TimerPhase::Armed {
            let go = match self.start_mode {
                TimerStart::Immediate => true,
                TimerStart::ThrottleUp => throttle > TIMER_THROTTLE_START_LEVEL,
            };
            if go {
                self.phase = TimerPhase::Running;
                self.started_at = now;
                self.last_tick = now;
            }
        }

        if self.phase != TimerPhase::Running {
            return;
        }

        let elapsed = now.saturating_sub(self.started_at) as i64;
        self.remaining_ms = self.duration_ms() - elapsed;

        if self.remaining_ms <= 0 {
            self.remaining_ms = 0;
            self.phase = TimerPhase::Idle;
            beeper.completion();
            info!("timer: finished");
            return;
        }

        if now.saturating_sub(self.last_tick) >= TICK_PERIOD_MS {
            self.last_tick = now;
            beeper.beep(TONE_TICK_MS, true, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(minutes: u8, at: Millis) -> (CountdownTimer, Beeper) {
        let mut timer = CountdownTimer::new(TimerStart::Immediate);
        let mut beeper = Beeper::new();
        timer.arm(minutes);
        timer.step(at, 0, &mut beeper);
        (timer, beeper)
    }

    #[test]
    fn arming_zero_stays_idle() {
        let mut timer = CountdownTimer::new(TimerStart::Immediate);
        timer.arm(0);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn two_minute_boundary() {
        let (mut timer, mut beeper) = running(2, 5_000);
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.remaining_ms(), 120_000);

        timer.step(5_000 + 119_999, 0, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.remaining_ms(), 1);

        timer.step(5_000 + 120_000, 0, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn late_poll_clamps_to_zero() {
        let (mut timer, mut beeper) = running(2, 0);
        timer.step(200_000, 0, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn completion_plays_double_beep() {
        let (mut timer, _) = running(2, 0);
        let mut beeper = Beeper::new();
        timer.step(120_000, 0, &mut beeper);
        assert!(beeper.step(120_000));
        assert!(!beeper.step(120_500));
        assert!(beeper.step(120_650));
        assert!(!beeper.step(121_150));
    }

    #[test]
    fn ticks_once_per_second_even_when_muted() {
        let (mut timer, mut beeper) = running(5, 0);
        timer.step(999, 0, &mut beeper);
        assert!(!beeper.is_busy());
        timer.step(1000, 0, &mut beeper);
        assert!(beeper.step(1000));
        assert!(!beeper.step(1050));
        timer.step(1500, 0, &mut beeper);
        assert!(!beeper.is_busy());
    }

    #[test]
    fn throttle_start_waits_for_throttle() {
        let mut timer = CountdownTimer::new(TimerStart::ThrottleUp);
        let mut beeper = Beeper::new();
        timer.arm(5);
        timer.step(100, 0, &mut beeper);
        timer.step(200, TIMER_THROTTLE_START_LEVEL, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Armed);
        timer.step(300, 200, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Running);
        timer.step(60_300, 0, &mut beeper);
        assert_eq!(timer.remaining_ms(), 240_000);
    }

    #[test]
    fn disarm_stops_running_timer() {
        let (mut timer, mut beeper) = running(10, 0);
        timer.disarm();
        timer.step(700_000, 0, &mut beeper);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert!(!beeper.is_busy());
    }

    #[test]
    fn view_formats_remaining() {
        let view = TimerView {
            phase: TimerPhase::Running,
            minutes: 5,
            remaining_ms: 125_999,
        };
        assert_eq!(view.remaining_mm_ss(), (2, 5));
    }
}

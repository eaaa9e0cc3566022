//! Polled button input with time-based debouncing.
//!
//! Nine physical buttons (active-low with internal pull-up):
//!   - UP / DOWN / ENTER - menu navigation
//!   - TRIM 1..3 +/-     - stick trims
//!
//! Every button is sampled once per poll cycle. A level change only counts
//! after it has stayed put for the button's debounce window, and the click
//! event fires on *release* so a bounce during press-down can never
//! register as a click.

use crate::config::{NAV_DEBOUNCE_MS, TRIM_DEBOUNCE_MS};
use crate::io::{DigitalPin, RawInputs};
use crate::Millis;

/// Edge-filtered state of one active-low input.
#[derive(Clone, Debug)]
pub struct DebouncedInput {
    pin: DigitalPin,
    window_ms: u64,
    last_raw: bool,
    last_change: Millis,
    held: bool,
    just_released: bool,
}

impl DebouncedInput {
    /// Create a released input; the line is assumed pulled high.
    pub const fn new(pin: DigitalPin, window_ms: u64) -> Self {
        Self {
            pin,
            window_ms,
            last_raw: true,
            last_change: 0,
            held: false,
            just_released: false,
        }
    }

    pub fn pin(&self) -> DigitalPin {
        self.pin
    }

    /// Feed one raw sample (`true` = electrically high = released).
    pub fn update(&mut self, raw: bool, now: Millis) {
        // Any flicker restarts the stability window.
        if raw != self.last_raw {
            self.last_change = now;
            self.last_raw = raw;
        }

        if now.saturating_sub(self.last_change) > self.window_ms {
            if !raw && !self.held {
                self.held = true;
            } else if raw && self.held {
                self.held = false;
                self.just_released = true;
            }
        }
    }

    /// Returns `true` once per press/release cycle.
    pub fn consume_just_released(&mut self) -> bool {
        core::mem::take(&mut self.just_released)
    }

    /// Stable pressed state, no side effects.
    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Logical buttons handled by the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Enter,
    Trim1Up,
    Trim1Down,
    Trim2Up,
    Trim2Down,
    Trim3Up,
    Trim3Down,
}

impl Button {
    pub const ALL: [Button; 9] = [
        Button::Up,
        Button::Down,
        Button::Enter,
        Button::Trim1Up,
        Button::Trim1Down,
        Button::Trim2Up,
        Button::Trim2Down,
        Button::Trim3Up,
        Button::Trim3Down,
    ];

    pub fn pin(self) -> DigitalPin {
        match self {
            Button::Up => DigitalPin::Up,
            Button::Down => DigitalPin::Down,
            Button::Enter => DigitalPin::Enter,
            Button::Trim1Up => DigitalPin::Trim1Up,
            Button::Trim1Down => DigitalPin::Trim1Down,
            Button::Trim2Up => DigitalPin::Trim2Up,
            Button::Trim2Down => DigitalPin::Trim2Down,
            Button::Trim3Up => DigitalPin::Trim3Up,
            Button::Trim3Down => DigitalPin::Trim3Down,
        }
    }

    /// Navigation buttons get a longer window than trims.
    pub fn debounce_ms(self) -> u64 {
        match self {
            Button::Up | Button::Down | Button::Enter => NAV_DEBOUNCE_MS,
            _ => TRIM_DEBOUNCE_MS,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Debouncers for every button, updated together once per cycle.
pub struct ButtonBank {
    inputs: [DebouncedInput; 9],
}

impl ButtonBank {
    pub fn new() -> Self {
        Self {
            inputs: Button::ALL.map(|b| DebouncedInput::new(b.pin(), b.debounce_ms())),
        }
    }

    pub fn update(&mut self, raw: &impl RawInputs, now: Millis) {
        for input in self.inputs.iter_mut() {
            let level = raw.read_digital(input.pin());
            input.update(level, now);
        }
    }

    pub fn consume_just_released(&mut self, button: Button) -> bool {
        self.inputs[button.index()].consume_just_released()
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.inputs[button.index()].is_held()
    }
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::new()
    }
}

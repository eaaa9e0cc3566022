//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::settings::ThrottleMode;
use crate::timer::TimerStart;

// Poll loop

/// Pause between two poll cycles (ms). The cycle itself never blocks.
pub const POLL_INTERVAL_MS: u64 = 1;

/// Minimum time between two radio packets (ms). 10 ms = ~100 Hz.
pub const SEND_INTERVAL_MS: u64 = 10;

/// Display refresh period on interactive pages (ms).
///
/// A full SSD1306 flush at 400 kHz holds the loop for about 25 ms, during
/// which no packet goes out. At 100 ms that costs at most one or two send
/// slots per redraw.
pub const DISPLAY_REFRESH_FAST_MS: u64 = 100;

/// Display refresh period on the dashboard (ms).
pub const DISPLAY_REFRESH_SLOW_MS: u64 = 250;

/// How long the "Saving..." notice stays on screen (ms).
pub const SAVE_NOTICE_MS: u64 = 300;

// Buttons

/// Debounce window for the Up / Down / Enter buttons (ms).
pub const NAV_DEBOUNCE_MS: u64 = 100;

/// Debounce window for the six trim buttons (ms).
pub const TRIM_DEBOUNCE_MS: u64 = 50;

// Analog channels

/// Lowest raw ADC value (12-bit).
pub const ADC_MIN: u16 = 0;

/// Highest raw ADC value (12-bit).
pub const ADC_MAX: u16 = 4095;

/// Midpoint used by channels without a trim (throttle, aux pots).
pub const ADC_MIDPOINT: u16 = 2047;

/// Fixed center for the aux potentiometers.
pub const AUX_CENTER: u16 = 2048;

/// Channels whose gimbal/pot is mounted reversed on the reference board,
/// indexed CH1..CH8 (throttle, pitch, roll, yaw, aux1, aux2, aux3, aux4).
pub const WIRED_REVERSED: [bool; 8] = [false, true, true, true, true, true, false, false];

// Trims

/// Trim value restored by defaults and "Reset Trims".
pub const TRIM_CENTER: u16 = 2048;

/// Lowest accepted trim value.
pub const TRIM_MIN: u16 = 0;

/// Highest accepted trim value.
pub const TRIM_MAX: u16 = 4095;

/// Trim change per adjustment step.
pub const TRIM_STEP: u16 = 5;

/// Minimum time between two trim steps, shared by all trims (ms).
pub const TRIM_REPEAT_MS: u64 = 25;

// Timer

/// Countdown presets in minutes. Index 0 means "timer disabled".
pub const TIMER_PRESETS_MIN: [u8; 4] = [0, 2, 5, 10];

/// When an armed countdown actually starts counting.
pub const TIMER_START: TimerStart = TimerStart::Immediate;

/// Throttle output above which `TimerStart::ThrottleUp` starts the countdown.
pub const TIMER_THROTTLE_START_LEVEL: u8 = 20;

// Battery (2S LiPo through a 22k / 6.8k divider)

/// Divider top resistor (kOhm).
pub const BATTERY_R1_KOHM: f32 = 22.0;

/// Divider bottom resistor (kOhm).
pub const BATTERY_R2_KOHM: f32 = 6.8;

/// ADC full-scale voltage.
pub const ADC_REFERENCE_V: f32 = 3.3;

/// Per-board correction measured against a multimeter.
pub const BATTERY_CORRECTION: f32 = 1.01;

/// Raw readings at or below this are treated as "sense line not connected"
/// and do not update the voltage.
pub const BATTERY_ADC_MIN_VALID: u16 = 100;

/// Alarm starts below this voltage (~3.2 V per cell).
pub const BATTERY_WARNING_V: f32 = 6.4;

/// Alarm is suppressed at or below this voltage. It guards against a
/// floating or disconnected sense line, so it must be checked against the
/// real sensor, not derived from the divider constants above.
pub const BATTERY_PLAUSIBLE_FLOOR_V: f32 = 4.0;

/// Dashboard gauge empty point.
pub const BATTERY_GAUGE_MIN_V: f32 = 6.0;

/// Dashboard gauge full point.
pub const BATTERY_GAUGE_MAX_V: f32 = 8.4;

// Feedback tones (ms)

pub const TONE_NAV_MS: u32 = 40;
pub const TONE_ENTER_MS: u32 = 50;
pub const TONE_TRIM_MS: u32 = 20;
pub const TONE_MODE_MS: u32 = 100;
pub const TONE_CONFIRM_MS: u32 = 100;
pub const TONE_TICK_MS: u32 = 50;
pub const TONE_DONE_MS: u32 = 500;
pub const TONE_DONE_GAP_MS: u32 = 150;

// Persisted settings

/// EEPROM offset of the settings record.
pub const SETTINGS_BASE_OFFSET: u16 = 0;

/// Bumped whenever the record layout changes.
pub const SETTINGS_FORMAT_VERSION: u8 = 1;

/// Forces a throttle mode after every load, discarding the stored choice.
/// `None` keeps whatever the user saved.
pub const THROTTLE_MODE_OVERRIDE: Option<ThrottleMode> = None;

// Radio (nRF24L01+)

/// RF channel 100 = 2.500 GHz, above most Wi-Fi traffic.
pub const RADIO_RF_CHANNEL: u8 = 100;

/// Pipe address; must match the receiver firmware.
pub const RADIO_PIPE_ADDRESS: [u8; 5] = [0xE1, 0xF0, 0xF0, 0xE8, 0xE8];

// EEPROM (24LC04)

/// 7-bit I2C address of block 0.
pub const EEPROM_I2C_ADDRESS: u8 = 0x50;

/// Device capacity in bytes.
pub const EEPROM_CAPACITY: u16 = 512;

/// Page write buffer size.
pub const EEPROM_PAGE_SIZE: u16 = 16;

/// Worst-case internal write cycle (ms).
pub const EEPROM_WRITE_CYCLE_MS: u32 = 5;

// GPIO pin assignments (nRF52840)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Throttle pot   → P0.02 (AIN0)
//   Pitch pot      → P0.03 (AIN1)
//   Roll pot       → P0.04 (AIN2)
//   Yaw pot        → P0.05 (AIN3)
//   Aux1 pot       → P0.28 (AIN4)
//   Aux2 pot       → P0.29 (AIN5)
//   Battery sense  → P0.30 (AIN6)
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button ENTER   → P0.24
//   Trim 1 +/-     → P1.01 / P1.02
//   Trim 2 +/-     → P1.03 / P1.04
//   Trim 3 +/-     → P1.05 / P1.06
//   Switch A / B   → P1.07 / P1.08
//   Buzzer         → P1.10
//   OLED SDA/SCL   → P0.26 / P0.27
//   EEPROM SDA/SCL → P1.11 / P1.12
//   nRF24 SCK/MOSI/MISO → P0.19 / P0.20 / P0.21
//   nRF24 CSN / CE → P0.22 / P0.23

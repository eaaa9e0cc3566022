//! Pack voltage from the divider on the battery sense pin.

use crate::config::{
    ADC_MAX, ADC_REFERENCE_V, BATTERY_ADC_MIN_VALID, BATTERY_CORRECTION, BATTERY_GAUGE_MAX_V,
    BATTERY_GAUGE_MIN_V, BATTERY_R1_KOHM, BATTERY_R2_KOHM,
};

/// Volts per ADC count at the pack side of the divider.
const VOLTS_PER_COUNT: f32 = (ADC_REFERENCE_V / ADC_MAX as f32)
    * ((BATTERY_R1_KOHM + BATTERY_R2_KOHM) / BATTERY_R2_KOHM)
    * BATTERY_CORRECTION;

/// Convert a raw reading to pack volts.
pub fn adc_to_volts(adc: u16) -> f32 {
    adc as f32 * VOLTS_PER_COUNT
}

/// Last plausible battery voltage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatteryMonitor {
    voltage: f32,
}

impl BatteryMonitor {
    pub const fn new() -> Self {
        Self { voltage: 0.0 }
    }

    /// Readings at or below the validity floor keep the previous value.
    pub fn update(&mut self, adc: u16) {
        if adc > BATTERY_ADC_MIN_VALID {
            self.voltage = adc_to_volts(adc);
        }
    }

    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    /// Gauge fill, 0..=100.
    pub fn percent(&self) -> u8 {
        let span = BATTERY_GAUGE_MAX_V - BATTERY_GAUGE_MIN_V;
        let ratio = (self.voltage - BATTERY_GAUGE_MIN_V) / span;
        (ratio * 100.0).clamp(0.0, 100.0) as u8
    }
}

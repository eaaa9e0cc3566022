//! Hold-to-repeat trim buttons.

use crate::beeper::Beeper;
use crate::config::{TONE_TRIM_MS, TRIM_REPEAT_MS, TRIM_STEP};
use crate::settings::TrimAxis;
use crate::storage::ConfigStore;
use crate::ui::buttons::{Button, ButtonBank};
use crate::Millis;

/// Trim buttons with the axis and direction they move.
const BINDINGS: [(Button, TrimAxis, i32); 6] = [
    (Button::Trim1Up, TrimAxis::Roll, TRIM_STEP as i32),
    (Button::Trim1Down, TrimAxis::Roll, -(TRIM_STEP as i32)),
    (Button::Trim2Up, TrimAxis::Pitch, TRIM_STEP as i32),
    (Button::Trim2Down, TrimAxis::Pitch, -(TRIM_STEP as i32)),
    (Button::Trim3Up, TrimAxis::Yaw, TRIM_STEP as i32),
    (Button::Trim3Down, TrimAxis::Yaw, -(TRIM_STEP as i32)),
];

/// Shared repeat gate for all six trim buttons.
#[derive(Default)]
pub struct TrimAdjuster {
    last_step: Option<Millis>,
}

impl TrimAdjuster {
    pub const fn new() -> Self {
        Self { last_step: None }
    }

    /// Apply held trim buttons and click tones for this cycle.
    ///
    /// Changes only mark the settings dirty; nothing is written here.
    pub fn step(
        &mut self,
        buttons: &mut ButtonBank,
        config: &mut ConfigStore,
        beeper: &mut Beeper,
        now: Millis,
    ) {
        let muted = !config.settings().buzzer_enabled;
        for (button, _, _) in BINDINGS {
            if buttons.consume_just_released(button) {
                beeper.beep(TONE_TRIM_MS, false, muted);
            }
        }

        let due = self
            .last_step
            .map_or(true, |t| now.saturating_sub(t) >= TRIM_REPEAT_MS);
        if !due {
            return;
        }

        let mut stepped = false;
        for (button, axis, delta) in BINDINGS {
            if buttons.is_held(button) {
                config.update(|s| s.nudge_trim(axis, delta));
                stepped = true;
            }
        }
        if stepped {
            self.last_step = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{DigitalPin, InputSnapshot};

    #[derive(Default)]
    struct WriteCounter {
        writes: usize,
    }

    impl crate::io::ByteStore for WriteCounter {
        fn load_block(&mut self, _offset: u16, _buf: &mut [u8]) -> Result<(), crate::error::Error> {
            Ok(())
        }

        fn save_block(&mut self, _offset: u16, _data: &[u8]) -> Result<(), crate::error::Error> {
            self.writes += 1;
            Ok(())
        }
    }

    fn press(bank: &mut ButtonBank, raw: &mut InputSnapshot, pin: DigitalPin, at: Millis) -> Millis {
        raw.set_digital(pin, false);
        bank.update(raw, at);
        bank.update(raw, at + 51);
        at + 51
    }

    #[test]
    fn held_button_steps_at_repeat_rate() {
        let mut bank = ButtonBank::new();
        let mut raw = InputSnapshot::idle();
        let mut cfg = ConfigStore::new();
        let mut beeper = Beeper::new();
        let mut trims = TrimAdjuster::new();

        let t = press(&mut bank, &mut raw, DigitalPin::Trim1Up, 1000);
        trims.step(&mut bank, &mut cfg, &mut beeper, t);
        assert_eq!(cfg.settings().trim(TrimAxis::Roll), 2053);
        assert!(cfg.is_dirty());

        trims.step(&mut bank, &mut cfg, &mut beeper, t + 24);
        assert_eq!(cfg.settings().trim(TrimAxis::Roll), 2053);
        trims.step(&mut bank, &mut cfg, &mut beeper, t + 25);
        assert_eq!(cfg.settings().trim(TrimAxis::Roll), 2058);
        assert!(!beeper.is_busy());
    }

    #[test]
    fn each_button_moves_its_own_axis() {
        let mut bank = ButtonBank::new();
        let mut raw = InputSnapshot::idle();
        let mut cfg = ConfigStore::new();
        let mut beeper = Beeper::new();
        let mut trims = TrimAdjuster::new();

        let t = press(&mut bank, &mut raw, DigitalPin::Trim3Down, 1000);
        trims.step(&mut bank, &mut cfg, &mut beeper, t);
        assert_eq!(cfg.settings().trims, [2048, 2048, 2043]);

        raw.set_digital(DigitalPin::Trim3Down, true);
        let t = press(&mut bank, &mut raw, DigitalPin::Trim2Up, t + 100);
        trims.step(&mut bank, &mut cfg, &mut beeper, t);
        assert_eq!(cfg.settings().trims, [2048, 2053, 2043]);
    }

    #[test]
    fn release_clicks_unless_muted() {
        let mut bank = ButtonBank::new();
        let mut raw = InputSnapshot::idle();
        let mut cfg = ConfigStore::new();
        let mut beeper = Beeper::new();
        let mut trims = TrimAdjuster::new();

        let t = press(&mut bank, &mut raw, DigitalPin::Trim1Down, 1000);
        raw.set_digital(DigitalPin::Trim1Down, true);
        bank.update(&raw, t + 10);
        bank.update(&raw, t + 61);
        trims.step(&mut bank, &mut cfg, &mut beeper, t + 61);
        assert!(beeper.step(t + 61));

        cfg.settings_mut().buzzer_enabled = false;
        let mut beeper = Beeper::new();
        let t = press(&mut bank, &mut raw, DigitalPin::Trim1Down, t + 200);
        raw.set_digital(DigitalPin::Trim1Down, true);
        bank.update(&raw, t + 10);
        bank.update(&raw, t + 61);
        trims.step(&mut bank, &mut cfg, &mut beeper, t + 61);
        assert!(!beeper.is_busy());
    }

    #[test]
    fn trim_saturates_at_limit() {
        let mut bank = ButtonBank::new();
        let mut raw = InputSnapshot::idle();
        let mut cfg = ConfigStore::new();
        cfg.settings_mut().trims[0] = 4093;
        let mut beeper = Beeper::new();
        let mut trims = TrimAdjuster::new();

        let t = press(&mut bank, &mut raw, DigitalPin::Trim1Up, 1000);
        trims.step(&mut bank, &mut cfg, &mut beeper, t);
        trims.step(&mut bank, &mut cfg, &mut beeper, t + 30);
        assert_eq!(cfg.settings().trim(TrimAxis::Roll), 4095);
    }

    #[test]
    fn held_at_limit_leaves_cache_clean() {
        let mut bank = ButtonBank::new();
        let mut raw = InputSnapshot::idle();
        let mut cfg = ConfigStore::new();
        cfg.settings_mut().trims[0] = 4095;
        let mut store = WriteCounter::default();
        assert!(cfg.force_save(&mut store));
        store.writes = 0;
        let mut beeper = Beeper::new();
        let mut trims = TrimAdjuster::new();

        let t = press(&mut bank, &mut raw, DigitalPin::Trim1Up, 1000);
        trims.step(&mut bank, &mut cfg, &mut beeper, t);
        trims.step(&mut bank, &mut cfg, &mut beeper, t + 30);
        assert_eq!(cfg.settings().trim(TrimAxis::Roll), 4095);
        assert!(!cfg.is_dirty());
        assert!(!cfg.save(&mut store));
        assert_eq!(store.writes, 0);
    }
}

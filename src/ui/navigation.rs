//! Menu page/cursor state machine.
//!
//! Reacts only to "just released" events of Up, Down and Enter. Each page
//! keeps its own cursor; every Enter is dispatched to the current page's
//! handler, which may switch pages, mutate the settings or persist them.

use super::buttons::{Button, ButtonBank};
use super::input_logic::{select_next, select_prev};
use super::{Page, SaveNotice, SettingsItem};
use crate::beeper::Beeper;
use crate::config::{TIMER_PRESETS_MIN, TONE_CONFIRM_MS, TONE_ENTER_MS, TONE_MODE_MS, TONE_NAV_MS};
use crate::io::ByteStore;
use crate::log::{debug, info};
use crate::settings::CHANNEL_COUNT;
use crate::storage::ConfigStore;
use crate::timer::CountdownTimer;
use crate::Millis;

/// Mutable state the navigator acts on besides its own.
pub struct NavContext<'a, S: ByteStore> {
    pub config: &'a mut ConfigStore,
    pub timer: &'a mut CountdownTimer,
    pub beeper: &'a mut Beeper,
    pub store: &'a mut S,
}

impl<S: ByteStore> NavContext<'_, S> {
    fn muted(&self) -> bool {
        !self.config.settings().buzzer_enabled
    }

    fn tone(&mut self, duration_ms: u32) {
        let muted = self.muted();
        self.beeper.beep(duration_ms, false, muted);
    }
}

pub struct Navigator {
    page: Page,
    cursors: [u8; Page::COUNT],
    /// Preset index being edited on the dashboard.
    timer_edit: Option<u8>,
    notice: SaveNotice,
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            page: Page::Dashboard,
            cursors: [0; Page::COUNT],
            timer_edit: None,
            notice: SaveNotice::new(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn cursor(&self) -> u8 {
        self.cursors[self.page.index()]
    }

    /// Minutes of the preset under edit, if editing.
    pub fn timer_edit_minutes(&self) -> Option<u8> {
        self.timer_edit
            .map(|i| TIMER_PRESETS_MIN.get(i as usize).copied().unwrap_or(0))
    }

    pub fn is_saving(&self, now: Millis) -> bool {
        self.notice.is_visible(now)
    }

    fn set_cursor(&mut self, cursor: u8) {
        self.cursors[self.page.index()] = cursor.min(self.page.cursor_max());
    }

    fn go(&mut self, page: Page, cursor: u8) {
        debug!("nav: {} -> {}", self.page, page);
        self.page = page;
        self.set_cursor(cursor);
    }

    /// Handle this cycle's navigation events. Returns `true` if anything
    /// happened, so the caller can redraw at once.
    pub fn step<S: ByteStore>(
        &mut self,
        buttons: &mut ButtonBank,
        ctx: &mut NavContext<'_, S>,
        now: Millis,
    ) -> bool {
        let mut handled = false;

        if buttons.consume_just_released(Button::Up) {
            ctx.tone(TONE_NAV_MS);
            self.on_up();
            handled = true;
        }
        if buttons.consume_just_released(Button::Down) {
            ctx.tone(TONE_NAV_MS);
            self.on_down();
            handled = true;
        }
        if buttons.consume_just_released(Button::Enter) {
            ctx.tone(TONE_ENTER_MS);
            self.on_enter(ctx, now);
            handled = true;
        }

        handled
    }

    fn on_up(&mut self) {
        let presets = TIMER_PRESETS_MIN.len() as u8 - 1;
        match self.timer_edit {
            Some(i) => self.timer_edit = Some(select_next(i, presets)),
            None => {
                let max = self.page.cursor_max();
                self.set_cursor(select_prev(self.cursor(), max));
            }
        }
    }

    fn on_down(&mut self) {
        let presets = TIMER_PRESETS_MIN.len() as u8 - 1;
        match self.timer_edit {
            Some(i) => self.timer_edit = Some(select_prev(i, presets)),
            None => {
                let max = self.page.cursor_max();
                self.set_cursor(select_next(self.cursor(), max));
            }
        }
    }

    fn on_enter<S: ByteStore>(&mut self, ctx: &mut NavContext<'_, S>, now: Millis) {
        let cursor = self.cursor();
        match self.page {
            Page::Dashboard => self.enter_dashboard(cursor, ctx, now),
            Page::ChannelsA => match cursor {
                0 => self.go(Page::ChannelsB, 0),
                _ => self.go(Page::Dashboard, 0),
            },
            Page::ChannelsB => match cursor {
                0 => self.go(Page::Trims, 0),
                _ => self.go(Page::ChannelsA, 0),
            },
            Page::Trims => match cursor {
                0 => self.persist(ctx, now, true),
                1 => self.go(Page::Settings, 0),
                _ => self.go(Page::ChannelsB, 0),
            },
            Page::Settings => self.enter_settings(cursor, ctx, now),
            Page::ChannelInvert => {
                if (cursor as usize) < CHANNEL_COUNT {
                    ctx.config.settings_mut().toggle_inverted(cursor as usize);
                } else {
                    self.persist(ctx, now, false);
                    self.go(Page::Settings, SettingsItem::ChannelInvert.cursor());
                }
            }
            Page::Info => self.go(Page::Settings, SettingsItem::Info.cursor()),
            Page::Calibration => self.go(Page::Settings, SettingsItem::Calibration.cursor()),
        }
    }

    fn enter_dashboard<S: ByteStore>(
        &mut self,
        cursor: u8,
        ctx: &mut NavContext<'_, S>,
        now: Millis,
    ) {
        if cursor == 0 {
            self.go(Page::ChannelsA, 0);
            return;
        }

        match self.timer_edit.take() {
            Some(index) => {
                let changed = ctx.config.settings().timer_preset != index;
                if changed {
                    ctx.config.settings_mut().timer_preset = index;
                }
                let minutes = ctx.config.settings().timer_minutes();
                ctx.timer.arm(minutes);
                if minutes == 0 {
                    info!("timer: disabled");
                }
                if changed {
                    self.persist(ctx, now, false);
                }
            }
            None => {
                ctx.timer.disarm();
                self.timer_edit = Some(ctx.config.settings().timer_preset);
            }
        }
        ctx.tone(TONE_MODE_MS);
    }

    fn enter_settings<S: ByteStore>(
        &mut self,
        cursor: u8,
        ctx: &mut NavContext<'_, S>,
        now: Millis,
    ) {
        let Some(item) = SettingsItem::from_cursor(cursor) else {
            return;
        };
        match item {
            SettingsItem::LightMode => {
                let s = ctx.config.settings_mut();
                s.light_mode = !s.light_mode;
                self.persist(ctx, now, true);
            }
            SettingsItem::Buzzer => {
                let s = ctx.config.settings_mut();
                s.buzzer_enabled = !s.buzzer_enabled;
                self.persist(ctx, now, true);
            }
            SettingsItem::ChannelInvert => self.go(Page::ChannelInvert, 0),
            SettingsItem::ResetTrims => {
                ctx.config.settings_mut().reset_trims();
                self.persist(ctx, now, true);
            }
            SettingsItem::ThrottleMode => {
                let s = ctx.config.settings_mut();
                s.throttle_mode = s.throttle_mode.toggled();
                info!("throttle mode: {}", s.throttle_mode);
                self.persist(ctx, now, true);
            }
            SettingsItem::Calibration => self.go(Page::Calibration, 0),
            SettingsItem::Info => self.go(Page::Info, 0),
            SettingsItem::Back => {
                ctx.tone(TONE_MODE_MS);
                self.go(Page::Trims, 0);
            }
        }
    }

    /// Write the settings and confirm. `always` writes even a clean cache.
    fn persist<S: ByteStore>(&mut self, ctx: &mut NavContext<'_, S>, now: Millis, always: bool) {
        let written = if always {
            ctx.config.force_save(&mut *ctx.store)
        } else {
            ctx.config.save(&mut *ctx.store)
        };
        if written || always {
            ctx.beeper.beep(TONE_CONFIRM_MS, true, false);
            self.notice.show(now);
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::{DigitalPin, InputSnapshot};
    use crate::settings::ThrottleMode;
    use crate::timer::{TimerPhase, TimerStart};

    #[derive(Default)]
    struct CountingStore {
        writes: usize,
        last: [u8; 12],
    }

    impl ByteStore for CountingStore {
        fn load_block(&mut self, _offset: u16, buf: &mut [u8]) -> Result<(), Error> {
            buf.fill(0xFF);
            Ok(())
        }

        fn save_block(&mut self, _offset: u16, data: &[u8]) -> Result<(), Error> {
            self.last.copy_from_slice(data);
            self.writes += 1;
            Ok(())
        }
    }

    struct Rig {
        nav: Navigator,
        bank: ButtonBank,
        raw: InputSnapshot,
        config: ConfigStore,
        timer: CountdownTimer,
        beeper: Beeper,
        store: CountingStore,
        now: Millis,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                nav: Navigator::new(),
                bank: ButtonBank::new(),
                raw: InputSnapshot::idle(),
                config: ConfigStore::new(),
                timer: CountdownTimer::new(TimerStart::Immediate),
                beeper: Beeper::new(),
                store: CountingStore::default(),
                now: 10_000,
            }
        }

        fn click(&mut self, pin: DigitalPin) {
            self.raw.set_digital(pin, false);
            self.bank.update(&self.raw, self.now);
            self.bank.update(&self.raw, self.now + 101);
            self.raw.set_digital(pin, true);
            self.bank.update(&self.raw, self.now + 150);
            self.now += 251;
            self.bank.update(&self.raw, self.now);

            let mut ctx = NavContext {
                config: &mut self.config,
                timer: &mut self.timer,
                beeper: &mut self.beeper,
                store: &mut self.store,
            };
            assert!(self.nav.step(&mut self.bank, &mut ctx, self.now));
        }

        fn up(&mut self) {
            self.click(DigitalPin::Up);
        }

        fn down(&mut self) {
            self.click(DigitalPin::Down);
        }

        fn enter(&mut self) {
            self.click(DigitalPin::Enter);
        }

        /// Move the cursor to `n` from 0 with Down presses, then Enter.
        fn pick(&mut self, n: u8) {
            for _ in 0..n {
                self.down();
            }
            assert_eq!(self.nav.cursor(), n);
            self.enter();
        }

        fn to_settings(&mut self) {
            self.pick(0); // Dashboard -> ChannelsA
            self.pick(0); // -> ChannelsB
            self.pick(0); // -> Trims
            self.pick(1); // -> Settings
            assert_eq!(self.nav.page(), Page::Settings);
        }
    }

    #[test]
    fn starts_on_dashboard() {
        let nav = Navigator::new();
        assert_eq!(nav.page(), Page::Dashboard);
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.timer_edit_minutes(), None);
    }

    #[test]
    fn no_events_no_change() {
        let mut rig = Rig::new();
        let mut ctx = NavContext {
            config: &mut rig.config,
            timer: &mut rig.timer,
            beeper: &mut rig.beeper,
            store: &mut rig.store,
        };
        assert!(!rig.nav.step(&mut rig.bank, &mut ctx, 20_000));
        assert_eq!(rig.nav.page(), Page::Dashboard);
    }

    #[test]
    fn cursor_wraps_on_every_page() {
        let pages = [
            Page::ChannelsA,
            Page::ChannelsB,
            Page::Dashboard,
            Page::Trims,
            Page::Settings,
            Page::ChannelInvert,
            Page::Info,
            Page::Calibration,
        ];
        for page in pages {
            let mut nav = Navigator::new();
            nav.page = page;
            let max = page.cursor_max();

            let mut seen = Vec::new();
            for _ in 0..=max {
                nav.on_down();
                seen.push(nav.cursor());
            }
            let mut expected: Vec<u8> = (1..=max).collect();
            expected.push(0);
            assert_eq!(seen, expected, "{page:?} down cycle");

            let mut seen = Vec::new();
            for _ in 0..=max {
                nav.on_up();
                seen.push(nav.cursor());
            }
            let mut expected: Vec<u8> = (0..max).rev().collect();
            expected.insert(0, max);
            assert_eq!(seen, expected, "{page:?} up cycle");
        }
    }

    #[test]
    fn forward_chain_through_the_pages() {
        let mut rig = Rig::new();
        rig.pick(0);
        assert_eq!(rig.nav.page(), Page::ChannelsA);
        rig.pick(1);
        assert_eq!(rig.nav.page(), Page::Dashboard);
        assert_eq!(rig.nav.cursor(), 0);
        rig.pick(0);
        rig.pick(0);
        assert_eq!(rig.nav.page(), Page::ChannelsB);
        rig.pick(1);
        assert_eq!(rig.nav.page(), Page::ChannelsA);
        rig.pick(0);
        rig.pick(0);
        assert_eq!(rig.nav.page(), Page::Trims);
        rig.pick(2);
        assert_eq!(rig.nav.page(), Page::ChannelsB);
    }

    #[test]
    fn save_trims_persists_and_confirms() {
        let mut rig = Rig::new();
        rig.pick(0);
        rig.pick(0);
        rig.pick(0);
        assert_eq!(rig.nav.page(), Page::Trims);
        rig.config.settings_mut().trims = [100, 200, 300];
        rig.pick(0);
        assert_eq!(rig.store.writes, 1);
        assert_eq!(&rig.store.last[1..3], &100u16.to_le_bytes());
        assert!(rig.nav.is_saving(rig.now));
        assert!(!rig.nav.is_saving(rig.now + 300));
        assert!(!rig.config.is_dirty());
    }

    #[test]
    fn confirmation_tone_ignores_mute() {
        let mut rig = Rig::new();
        rig.config.settings_mut().buzzer_enabled = false;
        rig.to_settings();
        // Drain any queued tones.
        while rig.beeper.is_busy() {
            rig.beeper.step(rig.now);
            rig.now += 10;
        }
        rig.pick(3); // Reset trims
        assert!(rig.beeper.step(rig.now));
    }

    #[test]
    fn settings_toggles_persist() {
        let mut rig = Rig::new();
        rig.to_settings();
        rig.pick(0);
        assert!(rig.config.settings().light_mode);
        rig.down();
        rig.enter();
        assert!(!rig.config.settings().buzzer_enabled);
        assert_eq!(rig.store.writes, 2);

        rig.down();
        rig.down();
        rig.down();
        assert_eq!(rig.nav.cursor(), 4);
        rig.enter();
        assert_eq!(rig.config.settings().throttle_mode, ThrottleMode::Airplane);
        assert_eq!(rig.store.writes, 3);
        assert_eq!(rig.nav.page(), Page::Settings);
    }

    #[test]
    fn reset_trims_centers_all_three() {
        let mut rig = Rig::new();
        rig.config.settings_mut().trims = [5, 6, 7];
        rig.to_settings();
        rig.pick(3);
        assert_eq!(rig.config.settings().trims, [2048; 3]);
        assert_eq!(rig.store.writes, 1);
    }

    #[test]
    fn settings_leaf_pages_return() {
        let mut rig = Rig::new();
        rig.to_settings();
        rig.pick(6);
        assert_eq!(rig.nav.page(), Page::Info);
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Settings);
        assert_eq!(rig.nav.cursor(), 6);

        rig.up();
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Calibration);
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Settings);
        assert_eq!(rig.nav.cursor(), 5);

        rig.down();
        rig.down();
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Trims);
        assert_eq!(rig.nav.cursor(), 0);
    }

    #[test]
    fn channel_invert_back_saves_and_returns_to_entry() {
        let mut rig = Rig::new();
        rig.to_settings();
        rig.pick(2);
        assert_eq!(rig.nav.page(), Page::ChannelInvert);

        rig.enter(); // CH1
        rig.down();
        rig.down();
        rig.enter(); // CH3
        assert_eq!(
            rig.config.settings().inverted,
            [true, false, true, false, false, false, false, false]
        );
        assert_eq!(rig.store.writes, 0);

        rig.up();
        rig.up();
        rig.up();
        assert_eq!(rig.nav.cursor(), 8);
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Settings);
        assert_eq!(rig.nav.cursor(), 2);
        assert_eq!(rig.store.writes, 1);
        assert_eq!(rig.store.last[9], 0b0000_0101);
    }

    #[test]
    fn channel_invert_back_without_changes_skips_write() {
        let mut rig = Rig::new();
        rig.to_settings();
        rig.pick(2);
        rig.up();
        rig.enter();
        assert_eq!(rig.nav.page(), Page::Settings);
        assert_eq!(rig.store.writes, 0);
    }

    #[test]
    fn timer_edit_cycles_presets_and_arms() {
        let mut rig = Rig::new();
        rig.pick(1);
        assert_eq!(rig.nav.timer_edit_minutes(), Some(0));
        assert_eq!(rig.timer.phase(), TimerPhase::Idle);

        rig.up();
        assert_eq!(rig.nav.timer_edit_minutes(), Some(2));
        rig.up();
        rig.up();
        assert_eq!(rig.nav.timer_edit_minutes(), Some(10));
        rig.up();
        assert_eq!(rig.nav.timer_edit_minutes(), Some(0));
        rig.down();
        assert_eq!(rig.nav.timer_edit_minutes(), Some(10));
        rig.down();
        assert_eq!(rig.nav.timer_edit_minutes(), Some(5));
        assert_eq!(rig.nav.cursor(), 1, "cursor frozen while editing");

        rig.enter();
        assert_eq!(rig.nav.timer_edit_minutes(), None);
        assert_eq!(rig.timer.phase(), TimerPhase::Armed);
        assert_eq!(rig.config.settings().timer_preset, 2);
        // A new selection is written right away.
        assert!(!rig.config.is_dirty());
        assert_eq!(rig.store.writes, 1);
        assert_eq!(rig.store.last[10], 2);
        assert!(rig.nav.is_saving(rig.now));
    }

    #[test]
    fn entering_edit_disarms_and_zero_stays_off() {
        let mut rig = Rig::new();
        rig.timer.arm(5);
        rig.pick(1);
        assert_eq!(rig.timer.phase(), TimerPhase::Idle);
        rig.enter();
        assert_eq!(rig.timer.phase(), TimerPhase::Idle);
        assert_eq!(rig.config.settings().timer_preset, 0);
        // Same preset committed again: nothing to write.
        assert_eq!(rig.store.writes, 0);
        assert!(!rig.config.is_dirty());
    }

    #[test]
    fn muted_navigation_is_silent() {
        let mut rig = Rig::new();
        rig.config.settings_mut().buzzer_enabled = false;
        rig.down();
        rig.up();
        rig.pick(0);
        assert!(!rig.beeper.is_busy());
    }
}

//! The poll cycle.
//!
//! [`Controller`] owns every piece of core state. The firmware calls
//! [`Controller::poll`] in a tight loop; one call samples nothing itself,
//! it consumes a snapshot, steps every component in a fixed order and
//! drives the collaborators.

use crate::alarm::LowBatteryAlarm;
use crate::battery::BatteryMonitor;
use crate::beeper::Beeper;
use crate::channels::{build_packet, ControlPacket};
use crate::config::{SEND_INTERVAL_MS, THROTTLE_MODE_OVERRIDE, TIMER_START};
use crate::io::{AnalogChannel, BuzzerOutput, ByteStore, Presenter, RadioLink, RawInputs};
use crate::log::{info, warn};
use crate::settings::RadioSettings;
use crate::storage::ConfigStore;
use crate::timer::{CountdownTimer, TimerView};
use crate::trims::TrimAdjuster;
use crate::ui::buttons::ButtonBank;
use crate::ui::navigation::{NavContext, Navigator};
use crate::ui::{DisplayPacer, Frame, Page};
use crate::Millis;

/// The hardware the core talks to, owned in one place.
pub struct Collaborators<S, L, P, B> {
    pub store: S,
    pub radio: L,
    pub presenter: P,
    pub buzzer: B,
}

pub struct Controller {
    buttons: ButtonBank,
    config: ConfigStore,
    battery: BatteryMonitor,
    alarm: LowBatteryAlarm,
    trims: TrimAdjuster,
    nav: Navigator,
    timer: CountdownTimer,
    beeper: Beeper,
    packet: ControlPacket,
    last_send: Option<Millis>,
    pacer: DisplayPacer,
}

impl Controller {
    /// Load the settings and start on the dashboard with a safe packet.
    pub fn start(store: &mut impl ByteStore) -> Self {
        let config = ConfigStore::load(store, THROTTLE_MODE_OVERRIDE);
        info!("controller: started");
        Self {
            buttons: ButtonBank::new(),
            config,
            battery: BatteryMonitor::new(),
            alarm: LowBatteryAlarm::new(),
            trims: TrimAdjuster::new(),
            nav: Navigator::new(),
            timer: CountdownTimer::new(TIMER_START),
            beeper: Beeper::new(),
            packet: ControlPacket::default(),
            last_send: None,
            pacer: DisplayPacer::new(),
        }
    }

    /// Run one cycle. Returns the buzzer level that was driven.
    pub fn poll<S, L, P, B>(
        &mut self,
        raw: &impl RawInputs,
        now: Millis,
        hw: &mut Collaborators<S, L, P, B>,
    ) -> bool
    where
        S: ByteStore,
        L: RadioLink,
        P: Presenter,
        B: BuzzerOutput,
    {
        self.buttons.update(raw, now);

        self.battery.update(raw.read_analog(AnalogChannel::Battery));
        let alarm_on = self.alarm.step(self.battery.voltage(), now);

        self.trims
            .step(&mut self.buttons, &mut self.config, &mut self.beeper, now);

        let mut ctx = NavContext {
            config: &mut self.config,
            timer: &mut self.timer,
            beeper: &mut self.beeper,
            store: &mut hw.store,
        };
        if self.nav.step(&mut self.buttons, &mut ctx, now) {
            self.pacer.invalidate();
        }

        // Throttle from the previous cycle; one poll of lag is irrelevant
        // for the start trigger.
        self.timer.step(now, self.packet.throttle, &mut self.beeper);

        self.packet = build_packet(raw, self.config.settings());

        let send_due = self
            .last_send
            .map_or(true, |t| now.saturating_sub(t) >= SEND_INTERVAL_MS);
        if send_due {
            self.last_send = Some(now);
            if let Err(e) = hw.radio.send(&self.packet) {
                warn!("radio send failed: {}", e);
            }
        }

        if self.pacer.due(self.nav.page(), now) {
            let frame = self.frame(now);
            if let Err(e) = hw.presenter.present(&frame) {
                warn!("display refresh failed: {}", e);
            }
        }

        let level = self.beeper.step(now) || alarm_on;
        hw.buzzer.set(level);
        level
    }

    /// Snapshot of everything a page may draw.
    pub fn frame(&self, now: Millis) -> Frame<'_> {
        Frame {
            page: self.nav.page(),
            cursor: self.nav.cursor(),
            settings: self.config.settings(),
            packet: &self.packet,
            battery_volts: self.battery.voltage(),
            battery_percent: self.battery.percent(),
            low_battery: self.alarm.is_active(),
            timer: self.timer.view(),
            timer_edit: self.nav.timer_edit_minutes(),
            saving: self.nav.is_saving(now),
            now,
        }
    }

    pub fn page(&self) -> Page {
        self.nav.page()
    }

    pub fn cursor(&self) -> u8 {
        self.nav.cursor()
    }

    pub fn settings(&self) -> &RadioSettings {
        self.config.settings()
    }

    pub fn packet(&self) -> &ControlPacket {
        &self.packet
    }

    pub fn timer(&self) -> TimerView {
        self.timer.view()
    }

    pub fn battery_voltage(&self) -> f32 {
        self.battery.voltage()
    }
}

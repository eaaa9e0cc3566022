//! User interface subsystem - OLED pages + physical buttons.
//!
//! The navigator maintains a page/cursor state machine that reacts to
//! debounced button releases. Once per refresh period the controller
//! snapshots everything a page needs into a [`Frame`] and hands it to the
//! presenter.
//!
//! ## Components
//!
//! - **Buttons**: 3 navigation + 6 trim switches with debouncing
//! - **Navigation**: page/cursor state and the Enter action table
//! - **Display**: SSD1306 128×64 OLED via I²C (firmware only)

pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;
pub mod input_logic;
pub mod navigation;

use crate::channels::ControlPacket;
use crate::config::{DISPLAY_REFRESH_FAST_MS, DISPLAY_REFRESH_SLOW_MS, SAVE_NOTICE_MS};
use crate::settings::RadioSettings;
use crate::timer::TimerView;
use crate::Millis;

/// Screens the UI can be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// CH1-CH4 bars.
    ChannelsA = 0,
    /// CH5-CH8 bars.
    ChannelsB = 1,
    /// Battery, timer and throttle mode. Shown after boot.
    Dashboard = 2,
    Trims = 3,
    Settings = 4,
    ChannelInvert = 5,
    Info = 6,
    /// Placeholder, no calibration flow yet.
    Calibration = 7,
}

impl Page {
    pub const COUNT: usize = 8;

    /// Highest valid cursor position on this page.
    pub fn cursor_max(self) -> u8 {
        match self {
            Page::Dashboard | Page::ChannelsA | Page::ChannelsB => 1,
            Page::Trims => 2,
            Page::Settings => SettingsItem::ALL.len() as u8 - 1,
            // CH1..CH8 plus Back.
            Page::ChannelInvert => 8,
            Page::Info | Page::Calibration => 0,
        }
    }

    /// Redraw period. Static pages refresh slower.
    pub fn refresh_ms(self) -> Millis {
        match self {
            Page::Dashboard => DISPLAY_REFRESH_SLOW_MS,
            _ => DISPLAY_REFRESH_FAST_MS,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Entries of the settings menu, in cursor order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsItem {
    LightMode,
    Buzzer,
    ChannelInvert,
    ResetTrims,
    ThrottleMode,
    Calibration,
    Info,
    Back,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 8] = [
        SettingsItem::LightMode,
        SettingsItem::Buzzer,
        SettingsItem::ChannelInvert,
        SettingsItem::ResetTrims,
        SettingsItem::ThrottleMode,
        SettingsItem::Calibration,
        SettingsItem::Info,
        SettingsItem::Back,
    ];

    pub fn from_cursor(cursor: u8) -> Option<Self> {
        Self::ALL.get(cursor as usize).copied()
    }

    pub fn cursor(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsItem::LightMode => "Light Mode",
            SettingsItem::Buzzer => "Buzzer",
            SettingsItem::ChannelInvert => "Ch Invert",
            SettingsItem::ResetTrims => "Reset Trims",
            SettingsItem::ThrottleMode => "Thr Mode",
            SettingsItem::Calibration => "Calibration",
            SettingsItem::Info => "Info",
            SettingsItem::Back => "Back",
        }
    }
}

/// Everything a page needs to draw itself, captured once per refresh.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub page: Page,
    pub cursor: u8,
    pub settings: &'a RadioSettings,
    pub packet: &'a ControlPacket,
    pub battery_volts: f32,
    pub battery_percent: u8,
    pub low_battery: bool,
    pub timer: TimerView,
    /// Preset minutes under edit, `None` outside timer edit mode.
    pub timer_edit: Option<u8>,
    /// "Saving..." overlay visible.
    pub saving: bool,
    /// Frame timestamp, used for blinking elements.
    pub now: Millis,
}

impl Frame<'_> {
    /// 500 ms on / 500 ms off.
    pub fn blink_on(&self) -> bool {
        (self.now / 500) % 2 == 0
    }
}

/// Decides when the next frame is due.
#[derive(Default)]
pub struct DisplayPacer {
    last: Option<Millis>,
}

impl DisplayPacer {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Force a redraw on the next check.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// `true` if `page` should be redrawn at `now`; records the draw.
    pub fn due(&mut self, page: Page, now: Millis) -> bool {
        let due = self
            .last
            .map_or(true, |t| now.saturating_sub(t) >= page.refresh_ms());
        if due {
            self.last = Some(now);
        }
        due
    }
}

/// Timed "Saving..." confirmation overlay.
#[derive(Default)]
pub struct SaveNotice {
    until: Option<Millis>,
}

impl SaveNotice {
    pub const fn new() -> Self {
        Self { until: None }
    }

    pub fn show(&mut self, now: Millis) {
        self.until = Some(now + SAVE_NOTICE_MS);
    }

    pub fn is_visible(&self, now: Millis) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_cursor_matches_items() {
        assert_eq!(Page::Settings.cursor_max(), 7);
        for (i, item) in SettingsItem::ALL.iter().enumerate() {
            assert_eq!(item.cursor() as usize, i);
            assert_eq!(SettingsItem::from_cursor(i as u8), Some(*item));
        }
        assert_eq!(SettingsItem::from_cursor(8), None);
    }

    #[test]
    fn pacer_uses_page_interval() {
        let mut pacer = DisplayPacer::new();
        let fast = DISPLAY_REFRESH_FAST_MS;
        let slow = DISPLAY_REFRESH_SLOW_MS;
        assert!(pacer.due(Page::Trims, 1000));
        assert!(!pacer.due(Page::Trims, 999 + fast));
        assert!(pacer.due(Page::Trims, 1000 + fast));

        let last = 1000 + fast;
        assert!(!pacer.due(Page::Dashboard, last + slow - 1));
        assert!(pacer.due(Page::Dashboard, last + slow));

        pacer.invalidate();
        assert!(pacer.due(Page::Dashboard, last + slow + 1));
    }

    #[test]
    fn notice_expires() {
        let mut notice = SaveNotice::new();
        assert!(!notice.is_visible(0));
        notice.show(1000);
        assert!(notice.is_visible(1299));
        assert!(!notice.is_visible(1300));
    }
}

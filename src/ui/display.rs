//! SSD1306 OLED page renderer.
//!
//! Stateless apart from the last applied invert setting: every call draws
//! the whole page from the [`Frame`] and flushes it.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use super::{Frame, Page, SettingsItem};
use crate::error::Error;
use crate::io::Presenter;
use crate::settings::ThrottleMode;
use crate::timer::TimerPhase;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const ROW_HEIGHT: i32 = 10;
const BAR_X: i32 = 40;
const BAR_WIDTH: u32 = 60;
/// Rows visible below the title on scrolling lists.
const LIST_ROWS: usize = 5;

const CHANNEL_NAMES: [&str; 8] = ["Thr", "Pit", "Rol", "Yaw", "Ax1", "Ax2", "Ax3", "Ax4"];

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Baseline of text row `row` (0 = title).
fn row_y(row: usize) -> i32 {
    8 + row as i32 * ROW_HEIGHT
}

fn text<D>(target: &mut D, s: &str, x: i32, row: usize)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let _ = Text::new(s, Point::new(x, row_y(row)), text_style()).draw(target);
}

/// Selectable line with a `>` marker when under the cursor.
fn item<D>(target: &mut D, label: &str, selected: bool, row: usize)
where
    D: DrawTarget<Color = BinaryColor>,
{
    text(target, if selected { ">" } else { " " }, 0, row);
    text(target, label, 8, row);
}

/// Horizontal gauge, `value` out of `full`.
fn bar<D>(target: &mut D, row: usize, value: u32, full: u32)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let top = row_y(row) - 7;
    let outline = Rectangle::new(Point::new(BAR_X, top), Size::new(BAR_WIDTH, 7));
    let _ = outline
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target);
    let filled = (value.min(full) * BAR_WIDTH) / full.max(1);
    let _ = Rectangle::new(Point::new(BAR_X, top), Size::new(filled, 7))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target);
}

/// First visible index of a list so the cursor stays on screen.
fn scroll_start(cursor: u8, len: usize) -> usize {
    let cursor = cursor as usize;
    if cursor < LIST_ROWS {
        0
    } else {
        (cursor + 1 - LIST_ROWS).min(len.saturating_sub(LIST_ROWS))
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

fn draw_title<D>(target: &mut D, title: &str, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    text(target, title, 0, 0);
    let mut level: String<8> = String::new();
    if frame.low_battery && !frame.blink_on() {
        let _ = level.push_str("LOW");
    } else {
        let _ = write!(level, "{}%", frame.battery_percent);
    }
    let x = 128 - 6 * level.len() as i32;
    text(target, &level, x, 0);
}

fn draw_channels<D>(target: &mut D, frame: &Frame<'_>, first: usize, title: &str, next: &str)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, title, frame);
    for (row, ch) in (first..first + 4).enumerate() {
        let value = frame.packet.channel(ch);
        text(target, CHANNEL_NAMES[ch], 0, row + 1);
        bar(target, row + 1, value as u32, 255);
        let mut num: String<4> = String::new();
        let _ = write!(num, "{:>3}", value);
        text(target, &num, 104, row + 1);
    }
    item(target, next, frame.cursor == 0, 5);
    text(target, if frame.cursor == 1 { ">" } else { " " }, 64, 5);
    text(target, "Back", 72, 5);
}

fn draw_dashboard<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Dashboard", frame);

    let mut line: String<24> = String::new();
    let _ = write!(line, "Batt {:.2}V", frame.battery_volts);
    text(target, &line, 0, 1);
    bar(target, 2, frame.battery_percent as u32, 100);

    let mode = match frame.settings.throttle_mode {
        ThrottleMode::Normal => "Normal",
        ThrottleMode::Airplane => "Airplane",
    };
    let mut line: String<24> = String::new();
    let _ = write!(line, "Thr {}", mode);
    text(target, &line, 0, 3);

    let mut timer: String<24> = String::new();
    match frame.timer_edit {
        Some(minutes) if frame.blink_on() => {
            let _ = write!(timer, "Timer <{:>2} min>", minutes);
        }
        Some(_) => {
            let _ = timer.push_str("Timer <      >");
        }
        None => match frame.timer.phase {
            TimerPhase::Idle if frame.timer.minutes == 0 => {
                let _ = timer.push_str("Timer Off");
            }
            TimerPhase::Idle => {
                let _ = timer.push_str("Timer 00:00");
            }
            TimerPhase::Armed | TimerPhase::Running => {
                let (mm, ss) = frame.timer.remaining_mm_ss();
                let _ = write!(timer, "Timer {:02}:{:02}", mm, ss);
            }
        },
    }

    item(target, &timer, frame.cursor == 1, 4);
    item(target, "Channels", frame.cursor == 0, 5);
}

fn draw_trims<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Trims", frame);
    for (row, (name, trim)) in ["Roll", "Pitch", "Yaw"]
        .iter()
        .zip(frame.settings.trims.iter())
        .enumerate()
    {
        text(target, name, 0, row + 1);
        bar(target, row + 1, *trim as u32, 4095);
        let mut pct: String<5> = String::new();
        let _ = write!(pct, "{:>3}%", *trim as u32 * 100 / 4095);
        text(target, &pct, 104, row + 1);
    }
    let labels = ["Save", "Settings", "Back"];
    let x = [8, 40, 96];
    for (i, label) in labels.iter().enumerate() {
        let marker = if frame.cursor as usize == i { ">" } else { " " };
        text(target, marker, x[i] - 8, 5);
        text(target, label, x[i], 5);
    }
}

fn draw_settings<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Settings", frame);
    let s = frame.settings;
    let start = scroll_start(frame.cursor, SettingsItem::ALL.len());
    for (row, entry) in SettingsItem::ALL.iter().skip(start).take(LIST_ROWS).enumerate() {
        item(target, entry.label(), frame.cursor == entry.cursor(), row + 1);
        let value = match entry {
            SettingsItem::LightMode => on_off(s.light_mode),
            SettingsItem::Buzzer => on_off(s.buzzer_enabled),
            SettingsItem::ThrottleMode => match s.throttle_mode {
                ThrottleMode::Normal => "Norm",
                ThrottleMode::Airplane => "Air",
            },
            _ => "",
        };
        text(target, value, 98, row + 1);
    }
}

fn draw_channel_invert<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Ch Invert", frame);
    let start = scroll_start(frame.cursor, CHANNEL_NAMES.len() + 1);
    for (row, index) in (start..CHANNEL_NAMES.len() + 1).take(LIST_ROWS).enumerate() {
        let selected = frame.cursor as usize == index;
        if let Some(name) = CHANNEL_NAMES.get(index) {
            let mut label: String<12> = String::new();
            let _ = write!(label, "CH{} {}", index + 1, name);
            item(target, &label, selected, row + 1);
            let mark = if frame.settings.inverted[index] { "[x]" } else { "[ ]" };
            text(target, mark, 104, row + 1);
        } else {
            item(target, "Back", selected, row + 1);
        }
    }
}

fn draw_info<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Info", frame);
    text(target, env!("CARGO_PKG_NAME"), 0, 1);
    let mut line: String<24> = String::new();
    let _ = write!(line, "v{}", env!("CARGO_PKG_VERSION"));
    text(target, &line, 0, 2);
    text(target, "nRF24 ch 100 250k", 0, 3);
    item(target, "Back", true, 5);
}

fn draw_calibration<D>(target: &mut D, frame: &Frame<'_>)
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_title(target, "Calibration", frame);
    text(target, "Not available", 0, 2);
    item(target, "Back", true, 5);
}

fn draw_saving<D>(target: &mut D)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let _ = Rectangle::new(Point::new(24, 20), Size::new(80, 22))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target);
    let _ = Rectangle::new(Point::new(24, 20), Size::new(80, 22))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target);
    let _ = Text::new("Saving...", Point::new(37, 34), text_style()).draw(target);
}

/// Presenter backed by the 128×64 OLED.
pub struct OledPresenter<I2C> {
    display: Display<I2C>,
    inverted: Option<bool>,
}

impl<I2C> OledPresenter<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 display and clear the screen.
    pub fn new(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| Error::Display)?;
        display.clear_buffer();
        display.flush().map_err(|_| Error::Display)?;
        Ok(Self {
            display,
            inverted: None,
        })
    }
}

impl<I2C> Presenter for OledPresenter<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), Error> {
        let light = frame.settings.light_mode;
        if self.inverted != Some(light) {
            self.display.set_invert(light).map_err(|_| Error::Display)?;
            self.inverted = Some(light);
        }

        let d = &mut self.display;
        d.clear_buffer();
        match frame.page {
            Page::ChannelsA => draw_channels(d, frame, 0, "CH1-4", "Next"),
            Page::ChannelsB => draw_channels(d, frame, 4, "CH5-8", "Trims"),
            Page::Dashboard => draw_dashboard(d, frame),
            Page::Trims => draw_trims(d, frame),
            Page::Settings => draw_settings(d, frame),
            Page::ChannelInvert => draw_channel_invert(d, frame),
            Page::Info => draw_info(d, frame),
            Page::Calibration => draw_calibration(d, frame),
        }
        if frame.saving {
            draw_saving(d);
        }
        d.flush().map_err(|_| Error::Display)
    }
}

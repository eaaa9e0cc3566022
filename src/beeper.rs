//! Non-blocking feedback tones.
//!
//! Callers enqueue tone and gap segments; the poll loop calls [`Beeper::step`]
//! once per cycle and drives the buzzer pin from the result. Nothing here
//! ever waits.

use crate::config::{TONE_DONE_GAP_MS, TONE_DONE_MS};
use crate::log::debug;
use crate::Millis;
use heapless::Deque;

/// Pending segments beyond this are dropped.
pub const TONE_QUEUE_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Segment {
    Tone(u32),
    Gap(u32),
}

impl Segment {
    fn duration_ms(self) -> u32 {
        match self {
            Segment::Tone(ms) | Segment::Gap(ms) => ms,
        }
    }
}

/// Scheduled tone/gap player.
pub struct Beeper {
    queue: Deque<Segment, TONE_QUEUE_DEPTH>,
    /// Segment currently playing and when it ends.
    current: Option<(Segment, Millis)>,
}

impl Beeper {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            current: None,
        }
    }

    /// Queue a feedback tone. Dropped when `muted` and not `force`d.
    pub fn beep(&mut self, duration_ms: u32, force: bool, muted: bool) {
        if muted && !force {
            return;
        }
        self.push(Segment::Tone(duration_ms));
    }

    /// Queue a silent pause between two tones.
    pub fn pause(&mut self, duration_ms: u32) {
        self.push(Segment::Gap(duration_ms));
    }

    /// Forced double beep signalling the end of the countdown.
    pub fn completion(&mut self) {
        self.beep(TONE_DONE_MS, true, false);
        self.pause(TONE_DONE_GAP_MS);
        self.beep(TONE_DONE_MS, true, false);
    }

    fn push(&mut self, segment: Segment) {
        if self.queue.push_back(segment).is_err() {
            debug!("beeper: queue full, dropping {}", segment);
        }
    }

    /// Advance the schedule. Returns `true` while a tone should sound.
    pub fn step(&mut self, now: Millis) -> bool {
        loop {
            match self.current {
                Some((segment, until)) if now < until => {
                    return matches!(segment, Segment::Tone(_));
                }
                Some((_, until)) => {
                    // Chain from the scheduled end so back-to-back segments
                    // keep their lengths even if a poll arrives late.
                    self.current = self
                        .queue
                        .pop_front()
                        .map(|next| (next, until + next.duration_ms() as Millis));
                }
                None => match self.queue.pop_front() {
                    Some(next) => {
                        self.current = Some((next, now + next.duration_ms() as Millis));
                    }
                    None => return false,
                },
            }
        }
    }

    /// `true` while anything is playing or queued.
    pub fn is_busy(&self) -> bool {
        self.current.is_some() || !self.queue.is_empty()
    }
}

impl Default for Beeper {
    fn default() -> Self {
        Self::new()
    }
}

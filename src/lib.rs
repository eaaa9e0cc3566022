//! Control core of a handheld RC transmitter.
//!
//! Everything that decides something lives in this library and runs on the
//! host: debouncing, channel mapping, the settings record, menu navigation,
//! trims, the countdown timer, the low-battery alarm and the poll cycle
//! that ties them together. Hardware is reached only through the traits
//! in [`io`].
//!
//! Usage: `cargo test` (host) or
//! `cargo run --release --features embedded --target thumbv7em-none-eabihf`.
//!
//! Note: The embedded binary (`main.rs`) is a thin wiring layer over this
//! crate; it owns the peripherals and calls [`controller::Controller::poll`].

#![cfg_attr(not(test), no_std)]

/// Monotonic milliseconds since boot.
pub type Millis = u64;

mod log;

// ═══════════════════════════════════════════════════════════════════════════
// Configuration & shared types
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;
pub mod io;
pub mod settings;

// ═══════════════════════════════════════════════════════════════════════════
// Core components
// ═══════════════════════════════════════════════════════════════════════════

pub mod alarm;
pub mod battery;
pub mod beeper;
pub mod channels;
pub mod storage;
pub mod timer;
pub mod trims;
pub mod ui;

pub mod controller;

// ═══════════════════════════════════════════════════════════════════════════
// Chip drivers
// ═══════════════════════════════════════════════════════════════════════════

pub mod drivers;

pub use channels::ControlPacket;
pub use controller::{Collaborators, Controller};
pub use error::Error;
pub use settings::RadioSettings;

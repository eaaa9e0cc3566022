//! Persistent user settings.
//!
//! The settings live in RAM while the transmitter runs and are written to
//! the external EEPROM only on explicit user actions (Save Trims, settings
//! toggles, leaving the inversion page). Trim presses only mark the cache
//! dirty.
//!
//! Storage layout: a single `SETTINGS_RECORD_SIZE` record at
//! `SETTINGS_BASE_OFFSET`, see [`RadioSettings::encode`].

use crate::config::SETTINGS_BASE_OFFSET;
use crate::io::ByteStore;
use crate::log::{debug, info, warn};
use crate::settings::{RadioSettings, ThrottleMode, SETTINGS_RECORD_SIZE};

/// In-memory copy of the settings, synced with the EEPROM.
pub struct ConfigStore {
    settings: RadioSettings,
    /// Dirty flag - true if the cache differs from the EEPROM.
    dirty: bool,
}

impl ConfigStore {
    /// Defaults, not yet loaded.
    pub fn new() -> Self {
        Self {
            settings: RadioSettings::default(),
            dirty: false,
        }
    }

    /// Load from the EEPROM.
    ///
    /// A read failure, a blank device or a corrupt record all fall back to
    /// defaults, which are written back immediately. `throttle_override`
    /// then replaces the stored throttle mode, if set.
    pub fn load(store: &mut impl ByteStore, throttle_override: Option<ThrottleMode>) -> Self {
        let mut buf = [0u8; SETTINGS_RECORD_SIZE];
        let mut this = Self::new();

        match store.load_block(SETTINGS_BASE_OFFSET, &mut buf) {
            Ok(()) => match RadioSettings::decode(&buf) {
                Ok(settings) => {
                    info!("settings loaded");
                    this.settings = settings;
                }
                Err(e) => {
                    warn!("settings corrupt ({}), restoring defaults", e);
                    this.force_save(store);
                }
            },
            Err(e) => {
                warn!("settings read failed ({}), restoring defaults", e);
                this.force_save(store);
            }
        }

        if let Some(mode) = throttle_override {
            this.settings.throttle_mode = mode;
        }
        this
    }

    pub fn settings(&self) -> &RadioSettings {
        &self.settings
    }

    /// Mutable access; marks the cache dirty.
    pub fn settings_mut(&mut self) -> &mut RadioSettings {
        self.dirty = true;
        &mut self.settings
    }

    /// Apply `edit`; the cache is marked dirty only if it reports a change.
    pub fn update(&mut self, edit: impl FnOnce(&mut RadioSettings) -> bool) -> bool {
        let changed = edit(&mut self.settings);
        self.dirty |= changed;
        changed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist pending changes. Returns `true` if a write happened and
    /// succeeded.
    pub fn save(&mut self, store: &mut impl ByteStore) -> bool {
        if !self.dirty {
            debug!("ConfigStore: no changes to save");
            return false;
        }
        self.force_save(store)
    }

    /// Write the record regardless of the dirty flag.
    pub fn force_save(&mut self, store: &mut impl ByteStore) -> bool {
        let mut buf = [0u8; SETTINGS_RECORD_SIZE];
        let len = self.settings.encode(&mut buf);

        match store.save_block(SETTINGS_BASE_OFFSET, &buf[..len]) {
            Ok(()) => {
                info!("settings saved");
                self.dirty = false;
                true
            }
            Err(e) => {
                warn!("settings write failed: {}", e);
                false
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::settings::TrimAxis;

    struct MemStore {
        bytes: [u8; 64],
        writes: usize,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MemStore {
        fn blank() -> Self {
            Self {
                bytes: [0xFF; 64],
                writes: 0,
                fail_reads: false,
                fail_writes: false,
            }
        }
    }

    impl ByteStore for MemStore {
        fn load_block(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error> {
            if self.fail_reads {
                return Err(Error::Storage);
            }
            let start = offset as usize;
            buf.copy_from_slice(&self.bytes[start..start + buf.len()]);
            Ok(())
        }

        fn save_block(&mut self, offset: u16, data: &[u8]) -> Result<(), Error> {
            if self.fail_writes {
                return Err(Error::Storage);
            }
            let start = offset as usize;
            self.bytes[start..start + data.len()].copy_from_slice(data);
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn blank_eeprom_gets_defaults_written() {
        let mut mem = MemStore::blank();
        let cfg = ConfigStore::load(&mut mem, None);
        assert_eq!(*cfg.settings(), RadioSettings::default());
        assert_eq!(mem.writes, 1);
        assert!(!cfg.is_dirty());

        let again = ConfigStore::load(&mut mem, None);
        assert_eq!(*again.settings(), RadioSettings::default());
        assert_eq!(mem.writes, 1);
    }

    #[test]
    fn corrupt_trim_resets_everything() {
        let mut mem = MemStore::blank();
        let mut custom = RadioSettings::default();
        custom.light_mode = true;
        custom.buzzer_enabled = false;
        custom.encode(&mut mem.bytes);
        mem.bytes[1] = 0xFF;
        mem.bytes[2] = 0xFF;

        let cfg = ConfigStore::load(&mut mem, None);
        assert_eq!(*cfg.settings(), RadioSettings::default());
        assert_eq!(mem.writes, 1);
    }

    #[test]
    fn saved_changes_survive_reload() {
        let mut mem = MemStore::blank();
        let mut cfg = ConfigStore::load(&mut mem, None);
        cfg.settings_mut().nudge_trim(TrimAxis::Yaw, -50);
        cfg.settings_mut().toggle_inverted(5);
        assert!(cfg.save(&mut mem));

        let reloaded = ConfigStore::load(&mut mem, None);
        assert_eq!(reloaded.settings(), cfg.settings());
    }

    #[test]
    fn update_marks_dirty_only_on_change() {
        let mut cfg = ConfigStore::new();
        assert!(!cfg.update(|s| s.nudge_trim(TrimAxis::Yaw, 0)));
        assert!(!cfg.is_dirty());
        assert!(cfg.update(|s| s.nudge_trim(TrimAxis::Yaw, 5)));
        assert!(cfg.is_dirty());
        assert_eq!(cfg.settings().trim(TrimAxis::Yaw), 2053);
    }

    #[test]
    fn clean_cache_skips_write() {
        let mut mem = MemStore::blank();
        let mut cfg = ConfigStore::load(&mut mem, None);
        let writes = mem.writes;
        assert!(!cfg.save(&mut mem));
        assert_eq!(mem.writes, writes);
    }

    #[test]
    fn failed_write_stays_dirty() {
        let mut mem = MemStore::blank();
        let mut cfg = ConfigStore::load(&mut mem, None);
        mem.fail_writes = true;
        cfg.settings_mut().light_mode = true;
        assert!(!cfg.save(&mut mem));
        assert!(cfg.is_dirty());
    }

    #[test]
    fn read_failure_falls_back_to_defaults() {
        let mut mem = MemStore::blank();
        mem.fail_reads = true;
        let cfg = ConfigStore::load(&mut mem, None);
        assert_eq!(*cfg.settings(), RadioSettings::default());
        assert_eq!(mem.writes, 1);
    }

    #[test]
    fn throttle_override_wins_over_stored_mode() {
        let mut mem = MemStore::blank();
        let mut stored = RadioSettings::default();
        stored.throttle_mode = ThrottleMode::Airplane;
        stored.encode(&mut mem.bytes);

        let cfg = ConfigStore::load(&mut mem, None);
        assert_eq!(cfg.settings().throttle_mode, ThrottleMode::Airplane);

        let cfg = ConfigStore::load(&mut mem, Some(ThrottleMode::Normal));
        assert_eq!(cfg.settings().throttle_mode, ThrottleMode::Normal);
    }
}

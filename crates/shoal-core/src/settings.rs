//! Shared transaction settings: slippage tolerance and command ttl.
//!
//! A [`SettingsHandle`] is the single source of truth for these two
//! parameters. Clones of a handle all observe the same state, and every
//! mutation goes through one setter path that also notifies registered
//! observers. The holder performs no validation — callers reject
//! out-of-range input (slippage outside [0, 1], negative minutes)
//! before updating. Persistence is explicit: nothing is written to
//! disk unless [`SwapSettings::save_to_file`] is called.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::DEFAULT_TTL_SECS;

/// Preset slippage fractions offered by front ends: 0.1%, 0.5%, 1%.
pub const SLIPPAGE_PRESETS: [Decimal; 3] = [dec!(0.001), dec!(0.005), dec!(0.01)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapSettings {
    /// Slippage tolerance as a fraction in [0, 1].
    pub slippage: Decimal,
    /// Command time-to-live in seconds (user-facing input is minutes).
    pub ttl_secs: u64,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            slippage: SLIPPAGE_PRESETS[1],
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl SwapSettings {
    /// Load settings from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let settings: SwapSettings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Persist settings to a TOML file. Callers invoke this explicitly
    /// after validated input; updates themselves never touch disk.
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

type Observer = Box<dyn Fn(SwapSettings) + Send + Sync>;

/// Cloneable handle to the shared settings. All clones see the same
/// values; mutations notify every subscribed observer with a snapshot.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<SwapSettings>>,
    observers: Arc<RwLock<Vec<Observer>>>,
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(SwapSettings::default())
    }
}

impl SettingsHandle {
    pub fn new(settings: SwapSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Copy of the current settings. Builders take one snapshot per
    /// attempt so concurrent edits never affect an in-flight request.
    pub fn snapshot(&self) -> SwapSettings {
        *self
            .inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn slippage(&self) -> Decimal {
        self.snapshot().slippage
    }

    pub fn ttl_secs(&self) -> u64 {
        self.snapshot().ttl_secs
    }

    /// Update the slippage fraction. The caller has already validated
    /// the value is within [0, 1].
    pub fn set_slippage(&self, fraction: Decimal) {
        let snapshot = {
            let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
            guard.slippage = fraction;
            *guard
        };
        self.notify(snapshot);
    }

    /// Update the ttl in seconds (minutes input is converted by the
    /// caller as `minutes * 60`).
    pub fn set_ttl_secs(&self, secs: u64) {
        let snapshot = {
            let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
            guard.ttl_secs = secs;
            *guard
        };
        self.notify(snapshot);
    }

    /// Register an observer invoked after every successful update.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(SwapSettings) + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(observer));
    }

    fn notify(&self, snapshot: SwapSettings) {
        let observers = self.observers.read().unwrap_or_else(|e| e.into_inner());
        for observer in observers.iter() {
            observer(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_defaults() {
        let settings = SwapSettings::default();
        assert_eq!(settings.slippage, dec!(0.005));
        assert_eq!(settings.ttl_secs, 600);
    }

    #[test]
    fn test_updates_visible_through_clones() {
        let handle = SettingsHandle::default();
        let session_view = handle.clone();

        handle.set_slippage(dec!(0.005));
        assert_eq!(session_view.slippage(), dec!(0.005));

        // a 10-minute user input arrives as 600 seconds
        handle.set_ttl_secs(10 * 60);
        assert_eq!(session_view.ttl_secs(), 600);
    }

    #[test]
    fn test_observers_see_every_update() {
        let handle = SettingsHandle::default();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        handle.subscribe(move |s| {
            seen_clone.store(s.ttl_secs, Ordering::SeqCst);
        });

        handle.set_ttl_secs(120);
        assert_eq!(seen.load(Ordering::SeqCst), 120);
        handle.set_ttl_secs(900);
        assert_eq!(seen.load(Ordering::SeqCst), 900);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let handle = SettingsHandle::default();
        let snapshot = handle.snapshot();
        handle.set_slippage(dec!(0.01));
        assert_eq!(snapshot.slippage, dec!(0.005));
        assert_eq!(handle.slippage(), dec!(0.01));
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = SwapSettings {
            slippage: dec!(0.01),
            ttl_secs: 900,
        };
        settings.save_to_file(&path).unwrap();
        let loaded = SwapSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}

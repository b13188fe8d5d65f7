//! User settings for floating windows
//!
//! Values come from a [`SettingsSource`] and can be reloaded per key when the
//! host reports a change.

use std::collections::BTreeSet;

use floatwin_hal::SettingsSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keep an app muted when it moves from pinned back to mini
pub const KEY_KEEP_MUTE_IN_MINI: &str = "pop_up_keep_mute_in_mini";
/// Action for a single tap on the dim backdrop
pub const KEY_SINGLE_TAP_ACTION: &str = "pop_up_single_tap_action";
/// Action for a double tap on the dim backdrop
pub const KEY_DOUBLE_TAP_ACTION: &str = "pop_up_double_tap_action";
/// `;`-separated packages that never open in mini from a notification
pub const KEY_NOTIFICATION_DENYLIST: &str = "pop_up_notification_blacklist";

/// Packages that never open in mini from a notification
pub const SYSTEM_NOTIFICATION_DENYLIST: &[&str] = &[
    "android",
    "com.android.chrome",
    "com.android.packageinstaller",
    "com.google.android.gms",
    "com.google.android.packageinstaller",
];

/// What a tap on the dim backdrop does
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapAction {
    /// Dock the mini window as pinned
    PinWindow = 0,
    /// Exit the mini window
    Exit = 1,
    Nothing = 2,
}

impl TapAction {
    /// Decode a stored setting value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TapAction::PinWindow),
            1 => Some(TapAction::Exit),
            2 => Some(TapAction::Nothing),
            _ => None,
        }
    }
}

/// Live user settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatingSettings {
    pub keep_mute_in_mini: bool,
    pub single_tap: TapAction,
    pub double_tap: TapAction,
    /// User-configured denylist, on top of the system one
    pub notification_denylist: BTreeSet<String>,
}

impl Default for FloatingSettings {
    fn default() -> Self {
        Self {
            keep_mute_in_mini: true,
            single_tap: TapAction::PinWindow,
            double_tap: TapAction::Exit,
            notification_denylist: BTreeSet::new(),
        }
    }
}

impl FloatingSettings {
    /// Load every setting from a source
    pub fn load<S: SettingsSource + ?Sized>(source: &S) -> Self {
        let mut settings = Self::default();
        for key in [
            KEY_KEEP_MUTE_IN_MINI,
            KEY_SINGLE_TAP_ACTION,
            KEY_DOUBLE_TAP_ACTION,
            KEY_NOTIFICATION_DENYLIST,
        ] {
            settings.reload_key(source, key);
        }
        settings
    }

    /// Reload one setting after the host reported a change
    ///
    /// # Returns
    /// Whether `key` is a floating window setting
    pub fn reload_key<S: SettingsSource + ?Sized>(&mut self, source: &S, key: &str) -> bool {
        match key {
            KEY_KEEP_MUTE_IN_MINI => {
                self.keep_mute_in_mini = source.get_int(key).map(|v| v != 0).unwrap_or(true);
            }
            KEY_SINGLE_TAP_ACTION => {
                self.single_tap = source
                    .get_int(key)
                    .and_then(TapAction::from_i32)
                    .unwrap_or(TapAction::PinWindow);
            }
            KEY_DOUBLE_TAP_ACTION => {
                self.double_tap = source
                    .get_int(key)
                    .and_then(TapAction::from_i32)
                    .unwrap_or(TapAction::Exit);
            }
            KEY_NOTIFICATION_DENYLIST => {
                self.notification_denylist = source
                    .get_string(key)
                    .map(|raw| parse_denylist(&raw))
                    .unwrap_or_default();
            }
            _ => return false,
        }
        debug!(key, "floating setting reloaded");
        true
    }

    /// Single taps act immediately when there is no distinct double-tap action
    #[inline]
    pub fn single_tap_only(&self) -> bool {
        self.double_tap == TapAction::Nothing || self.single_tap == self.double_tap
    }

    /// Check if a package must not open in mini from a notification
    pub fn in_notification_denylist(&self, package: &str) -> bool {
        SYSTEM_NOTIFICATION_DENYLIST.contains(&package)
            || self.notification_denylist.contains(package)
    }
}

/// Split a `;`-separated package list, dropping blanks
pub fn parse_denylist(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatwin_hal_mock::MockSettings;

    #[test]
    fn test_defaults() {
        let settings = FloatingSettings::load(&MockSettings::new());
        assert!(settings.keep_mute_in_mini);
        assert_eq!(settings.single_tap, TapAction::PinWindow);
        assert_eq!(settings.double_tap, TapAction::Exit);
        assert!(!settings.single_tap_only());
    }

    #[test]
    fn test_load_values() {
        let source = MockSettings::new();
        source.set(KEY_KEEP_MUTE_IN_MINI, "0");
        source.set(KEY_SINGLE_TAP_ACTION, "1");
        source.set(KEY_DOUBLE_TAP_ACTION, "2");
        source.set(KEY_NOTIFICATION_DENYLIST, "com.a; com.b;;");
        let settings = FloatingSettings::load(&source);
        assert!(!settings.keep_mute_in_mini);
        assert_eq!(settings.single_tap, TapAction::Exit);
        assert!(settings.single_tap_only());
        assert!(settings.in_notification_denylist("com.b"));
        assert!(!settings.in_notification_denylist("com.c"));
    }

    #[test]
    fn test_invalid_action_falls_back() {
        let source = MockSettings::new();
        source.set(KEY_SINGLE_TAP_ACTION, "7");
        assert_eq!(FloatingSettings::load(&source).single_tap, TapAction::PinWindow);
    }

    #[test]
    fn test_reload_single_key() {
        let source = MockSettings::new();
        let mut settings = FloatingSettings::load(&source);
        source.set(KEY_DOUBLE_TAP_ACTION, "0");
        assert!(settings.reload_key(&source, KEY_DOUBLE_TAP_ACTION));
        assert_eq!(settings.double_tap, TapAction::PinWindow);
        assert!(settings.single_tap_only());
        assert!(!settings.reload_key(&source, "unrelated"));
    }

    #[test]
    fn test_system_denylist() {
        let settings = FloatingSettings::default();
        assert!(settings.in_notification_denylist("com.android.chrome"));
        assert!(settings.in_notification_denylist("android"));
    }
}

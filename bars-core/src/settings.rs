//! Persisted per-surface settings
//!
//! The host stores plain strings keyed by name alongside the surface's
//! display profile. Three keys are used: the target aerodrome and the two
//! badge anchor offsets.

use log::warn;

use crate::error::SettingsError;
use crate::host::Host;

/// A persisted key with the description the host shows next to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingKey {
    pub key: &'static str,
    pub description: &'static str,
}

pub const SETTING_AERODROME: SettingKey = SettingKey {
    key: "aerodrome",
    description: "Active aerodrome",
};

pub const SETTING_MENU_X: SettingKey = SettingKey {
    key: "menuX",
    description: "Menu X position",
};

pub const SETTING_MENU_Y: SettingKey = SettingKey {
    key: "menuY",
    description: "Menu Y position",
};

/// Badge anchor, as offsets from the bottom-right corner of the radar area.
///
/// Zero means "use the default offset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuAnchor {
    pub x: i32,
    pub y: i32,
}

/// Surface settings as read from the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenSettings {
    pub aerodrome: Option<String>,
    pub menu_x: Option<i32>,
    pub menu_y: Option<i32>,
}

fn parse_number(setting: SettingKey, value: &str) -> Result<i32, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidNumber {
            key: setting.key,
            value: value.to_string(),
        })
}

impl ScreenSettings {
    /// Read all settings. Missing or unparsable values come back as `None`.
    pub fn load<H: Host + ?Sized>(host: &H) -> Self {
        let number = |setting: SettingKey| {
            let value = host.load_setting(setting.key)?;
            parse_number(setting, &value)
                .inspect_err(|e| warn!("{}", e))
                .ok()
        };

        ScreenSettings {
            aerodrome: host
                .load_setting(SETTING_AERODROME.key)
                .filter(|s| !s.is_empty()),
            menu_x: number(SETTING_MENU_X),
            menu_y: number(SETTING_MENU_Y),
        }
    }

    /// Overlay the loaded anchor values onto `anchor`
    pub fn apply_anchor(&self, anchor: &mut MenuAnchor) {
        if let Some(x) = self.menu_x {
            anchor.x = x;
        }
        if let Some(y) = self.menu_y {
            anchor.y = y;
        }
    }
}

pub fn save_aerodrome<H: Host + ?Sized>(host: &mut H, icao: &str) {
    host.save_setting(SETTING_AERODROME.key, SETTING_AERODROME.description, icao);
}

pub fn save_anchor<H: Host + ?Sized>(host: &mut H, anchor: MenuAnchor) {
    host.save_setting(
        SETTING_MENU_X.key,
        SETTING_MENU_X.description,
        &anchor.x.to_string(),
    );
    host.save_setting(
        SETTING_MENU_Y.key,
        SETTING_MENU_Y.description,
        &anchor.y.to_string(),
    );
}

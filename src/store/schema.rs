//! Preference record types.
//!
//! These types represent what the user last asked for per zone and per
//! device, independent of whether the hardware currently reflects it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::color::{Adjustment, Rgb};
use crate::effects::Effect;

/// Stored preferences for one zone, keyed by `(device_index, zone_index)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonePreference {
    pub device_index: u32,
    pub zone_index: u32,
    /// User-chosen display name overriding the gateway's zone name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Base color before brightness/saturation scaling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    pub brightness: u8,
    pub saturation: u8,
    pub effect: Effect,
    /// Local exclusion flag; does not touch the hardware.
    pub enabled: bool,
    /// Size the gateway reported after the last resize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_count: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl ZonePreference {
    /// Defaults for a zone that has no stored row yet.
    pub fn new(device_index: u32, zone_index: u32) -> Self {
        Self {
            device_index,
            zone_index,
            friendly_name: None,
            color: None,
            brightness: 100,
            saturation: 100,
            effect: Effect::Static,
            enabled: true,
            led_count: None,
            updated_at: Utc::now(),
        }
    }

    pub const fn adjustment(&self) -> Adjustment {
        Adjustment {
            brightness: self.brightness,
            saturation: self.saturation,
        }
    }

    /// Color actually sent to the hardware, if a base color is stored.
    pub fn scaled_color(&self) -> Option<Rgb> {
        self.color.map(|c| self.adjustment().apply(c))
    }

    /// Apply a patch, returning true if anything changed.
    pub fn merge(&mut self, patch: &ZonePatch) -> bool {
        let before = self.clone();
        if let Some(name) = &patch.friendly_name {
            self.friendly_name = name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(ToString::to_string);
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(b) = patch.brightness {
            self.brightness = b.min(100);
        }
        if let Some(s) = patch.saturation {
            self.saturation = s.min(100);
        }
        if let Some(effect) = &patch.effect {
            self.effect = effect.clone();
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(count) = patch.led_count {
            self.led_count = Some(count);
        }
        *self != before
    }
}

/// Partial update for a zone row. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonePatch {
    /// `Some(None)` or a blank name clears the override.
    pub friendly_name: Option<Option<String>>,
    pub color: Option<Rgb>,
    pub brightness: Option<u8>,
    pub saturation: Option<u8>,
    pub effect: Option<Effect>,
    pub enabled: Option<bool>,
    pub led_count: Option<u32>,
}

impl ZonePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn friendly_name(mut self, name: Option<String>) -> Self {
        self.friendly_name = Some(name);
        self
    }

    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub const fn adjustment(mut self, adjustment: Adjustment) -> Self {
        self.brightness = Some(adjustment.brightness);
        self.saturation = Some(adjustment.saturation);
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub const fn led_count(mut self, count: u32) -> Self {
        self.led_count = Some(count);
        self
    }
}

/// One entry of the recent-colors history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentColor {
    #[serde(flatten)]
    pub color: Rgb,
    pub hex: String,
    pub used_at: DateTime<Utc>,
}

//! Devices joined with their stored preferences, for listings.

use std::collections::HashMap;

use serde::Serialize;

use super::Controller;
use crate::color::Rgb;
use crate::effects::Effect;
use crate::error::Result;
use crate::gateway::{DeviceKind, ZoneKind};
use crate::snapshot::DeviceSnapshot;
use crate::store::ZonePreference;

#[derive(Debug, Clone, Serialize)]
pub struct DeviceOverview {
    pub index: u32,
    pub name: String,
    pub kind: DeviceKind,
    pub vendor: String,
    pub led_count: u32,
    pub enabled: bool,
    pub active_mode: Option<String>,
    pub zones: Vec<ZoneOverview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneOverview {
    pub index: u32,
    pub name: String,
    /// Friendly name when set, otherwise the gateway name.
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    pub kind: ZoneKind,
    pub led_count: u32,
    pub led_min: u32,
    pub led_max: u32,
    pub resizable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    pub brightness: u8,
    pub saturation: u8,
    pub effect: Effect,
    pub enabled: bool,
}

impl Controller {
    /// Every device in the snapshot with exclusion state and zone preferences.
    pub fn overview(&self, snapshot: &DeviceSnapshot) -> Result<Vec<DeviceOverview>> {
        let mut prefs: HashMap<(u32, u32), ZonePreference> = self
            .store
            .list_all()?
            .into_iter()
            .map(|p| ((p.device_index, p.zone_index), p))
            .collect();

        snapshot
            .devices()
            .iter()
            .map(|device| {
                let zones = device
                    .zones
                    .iter()
                    .map(|zone| {
                        let pref = prefs
                            .remove(&(device.index, zone.index))
                            .unwrap_or_else(|| ZonePreference::new(device.index, zone.index));
                        ZoneOverview {
                            index: zone.index,
                            name: zone.name.clone(),
                            display_name: pref
                                .friendly_name
                                .clone()
                                .unwrap_or_else(|| zone.name.clone()),
                            friendly_name: pref.friendly_name,
                            kind: zone.kind,
                            led_count: zone.led_count,
                            led_min: zone.led_min,
                            led_max: zone.led_max,
                            resizable: zone.resizable(),
                            color: pref.color,
                            brightness: pref.brightness,
                            saturation: pref.saturation,
                            effect: pref.effect,
                            enabled: pref.enabled,
                        }
                    })
                    .collect();
                Ok(DeviceOverview {
                    index: device.index,
                    name: device.name.clone(),
                    kind: device.kind,
                    vendor: device.vendor.clone(),
                    led_count: device.led_count(),
                    enabled: self.store.device_enabled(&device.name)?,
                    active_mode: usize::try_from(device.active_mode)
                        .ok()
                        .and_then(|i| device.modes.get(i))
                        .map(|m| m.name.clone()),
                    zones,
                })
            })
            .collect()
    }
}

//! Point-in-time view of the gateway's devices.
//!
//! A snapshot is taken on demand and passed explicitly to every operation
//! that needs device or zone metadata; nothing caches it globally.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Result, RgbError};
use crate::gateway::{DeviceInfo, ZoneInfo};

/// Devices as enumerated at `taken_at`.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSnapshot {
    devices: Vec<DeviceInfo>,
    taken_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self {
            devices,
            taken_at: Utc::now(),
        }
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Look up a device; stale or unknown indices are `NotFound`.
    pub fn device(&self, index: u32) -> Result<&DeviceInfo> {
        self.devices.get(index as usize).ok_or_else(|| {
            RgbError::NotFound(format!(
                "device {index} (gateway reports {} device(s))",
                self.devices.len()
            ))
        })
    }

    /// Look up a zone together with its device.
    pub fn zone(&self, device: u32, zone: u32) -> Result<(&DeviceInfo, &ZoneInfo)> {
        let info = self.device(device)?;
        let zone_info = info.zone(zone).ok_or_else(|| {
            RgbError::NotFound(format!(
                "zone {zone} on device {device} '{}' ({} zone(s))",
                info.name,
                info.zones.len()
            ))
        })?;
        Ok((info, zone_info))
    }
}

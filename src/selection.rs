//! Operation targets and their expansion into concrete zones.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, RgbError};
use crate::snapshot::DeviceSnapshot;

/// One physical zone, addressed by gateway indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ZoneKey {
    pub device: u32,
    pub zone: u32,
}

impl ZoneKey {
    pub const fn new(device: u32, zone: u32) -> Self {
        Self { device, zone }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.zone)
    }
}

/// An explicitly selected target. Selecting a device means all of its zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    WholeDevice(u32),
    SingleZone(u32, u32),
}

/// What a user action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    All,
    Device(u32),
    Zone(u32, u32),
}

impl Scope {
    /// Build a scope from optional `--device`/`--zone` style inputs.
    pub fn from_options(device: Option<u32>, zone: Option<u32>) -> Result<Self> {
        match (device, zone) {
            (None, None) => Ok(Self::All),
            (Some(d), None) => Ok(Self::Device(d)),
            (Some(d), Some(z)) => Ok(Self::Zone(d, z)),
            (None, Some(_)) => Err(RgbError::Validation(
                "a zone index requires a device index".to_string(),
            )),
        }
    }

    /// Selections this scope stands for in the given snapshot.
    pub fn selections(self, snapshot: &DeviceSnapshot) -> Vec<Selection> {
        match self {
            Self::All => snapshot
                .devices()
                .iter()
                .map(|d| Selection::WholeDevice(d.index))
                .collect(),
            Self::Device(d) => vec![Selection::WholeDevice(d)],
            Self::Zone(d, z) => vec![Selection::SingleZone(d, z)],
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all devices"),
            Self::Device(d) => write!(f, "device {d}"),
            Self::Zone(d, z) => write!(f, "zone {z} of device {d}"),
        }
    }
}

/// Expand selections into the distinct zones they cover, in index order.
///
/// Unknown devices or zones are `NotFound`. A device without zones expands
/// to nothing.
pub fn resolve(selections: &[Selection], snapshot: &DeviceSnapshot) -> Result<Vec<ZoneKey>> {
    let mut keys = BTreeSet::new();
    for selection in selections {
        match *selection {
            Selection::WholeDevice(d) => {
                let device = snapshot.device(d)?;
                keys.extend(device.zones.iter().map(|z| ZoneKey::new(d, z.index)));
            }
            Selection::SingleZone(d, z) => {
                snapshot.zone(d, z)?;
                keys.insert(ZoneKey::new(d, z));
            }
        }
    }
    Ok(keys.into_iter().collect())
}

//! Device information types mirrored from the OpenRGB server.

use std::time::Duration;

use serde::Serialize;

use crate::color::Rgb;

/// Information about one RGB controller reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    /// Controller index on the server
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device category
    pub kind: DeviceKind,
    pub vendor: String,
    pub description: String,
    pub version: String,
    pub serial: String,
    pub location: String,
    /// Available hardware modes
    pub modes: Vec<ModeInfo>,
    /// Index into `modes` of the active mode
    pub active_mode: i32,
    /// Addressable zones, in server order
    pub zones: Vec<ZoneInfo>,
    /// Current color of every LED on the device
    pub colors: Vec<Rgb>,
}

impl DeviceInfo {
    /// Total LED count across zones (or the color buffer for zoneless devices).
    pub fn led_count(&self) -> u32 {
        if self.zones.is_empty() {
            self.colors.len() as u32
        } else {
            self.zones.iter().map(|z| z.led_count).sum()
        }
    }

    pub fn zone(&self, index: u32) -> Option<&ZoneInfo> {
        self.zones.get(index as usize)
    }

    /// Index of the mode named "Direct", if the device has one.
    pub fn direct_mode(&self) -> Option<usize> {
        self.modes
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case("direct"))
    }

    /// Current LED colors of one zone.
    pub fn zone_colors(&self, zone: &ZoneInfo) -> Vec<Rgb> {
        let start = zone.start_led as usize;
        let end = start + zone.led_count as usize;
        self.colors.get(start..end).map(<[Rgb]>::to_vec).unwrap_or_default()
    }

    /// Recompute `start_led` offsets after a zone changed size.
    pub fn reindex_zones(&mut self) {
        let mut start = 0;
        for (i, zone) in self.zones.iter_mut().enumerate() {
            zone.index = i as u32;
            zone.start_led = start;
            start += zone.led_count;
        }
    }
}

/// A zone within a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneInfo {
    pub index: u32,
    pub name: String,
    pub kind: ZoneKind,
    pub led_count: u32,
    pub led_min: u32,
    pub led_max: u32,
    /// Offset of this zone's first LED in the device color buffer
    pub start_led: u32,
}

impl ZoneInfo {
    /// Whether the gateway reports distinct size bounds. Advisory only: some
    /// non-addressable zones report bounds they cannot honour.
    pub const fn resizable(&self) -> bool {
        self.led_min != self.led_max
    }

    /// Size bounds used for validation. Zones that report no bounds at all
    /// accept anything in `1..=500`.
    pub const fn size_bounds(&self) -> (u32, u32) {
        if self.led_min == 0 && self.led_max == 0 {
            (1, 500)
        } else {
            (self.led_min, self.led_max)
        }
    }
}

/// Zone layout as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Single,
    Linear,
    Matrix,
}

impl ZoneKind {
    /// Map the client library's zone type name (`Single`, `Linear`, `Matrix`).
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "single" => Self::Single,
            "matrix" => Self::Matrix,
            _ => Self::Linear,
        }
    }
}

/// Device category as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Motherboard,
    Dram,
    Gpu,
    Cooler,
    LedStrip,
    Keyboard,
    Mouse,
    Mousemat,
    Headset,
    HeadsetStand,
    Gamepad,
    Light,
    Speaker,
    Virtual,
    Storage,
    Case,
    Microphone,
    Accessory,
    Keypad,
    Unknown,
}

impl DeviceKind {
    const ALL: [Self; 19] = [
        Self::Motherboard,
        Self::Dram,
        Self::Gpu,
        Self::Cooler,
        Self::LedStrip,
        Self::Keyboard,
        Self::Mouse,
        Self::Mousemat,
        Self::Headset,
        Self::HeadsetStand,
        Self::Gamepad,
        Self::Light,
        Self::Speaker,
        Self::Virtual,
        Self::Storage,
        Self::Case,
        Self::Microphone,
        Self::Accessory,
        Self::Keypad,
    ];

    /// Map a device type name as the client library spells it (`LEDStrip`,
    /// `DRAM`, `MouseMat`...). Case and separators are ignored.
    pub fn from_name(name: &str) -> Self {
        let wanted = normalize(name);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.display_name()) == wanted)
            .unwrap_or(Self::Unknown)
    }

    /// Returns a human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Motherboard => "Motherboard",
            Self::Dram => "DRAM",
            Self::Gpu => "GPU",
            Self::Cooler => "Cooler",
            Self::LedStrip => "LED Strip",
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Mousemat => "Mousemat",
            Self::Headset => "Headset",
            Self::HeadsetStand => "Headset Stand",
            Self::Gamepad => "Gamepad",
            Self::Light => "Light",
            Self::Speaker => "Speaker",
            Self::Virtual => "Virtual",
            Self::Storage => "Storage",
            Self::Case => "Case",
            Self::Microphone => "Microphone",
            Self::Accessory => "Accessory",
            Self::Keypad => "Keypad",
            Self::Unknown => "Unknown",
        }
    }
}

/// A hardware mode, identified by its position in `DeviceInfo::modes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    pub name: String,
    /// Device-specific mode value
    pub value: i32,
}

impl ModeInfo {
    pub fn named(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Options for connecting to the OpenRGB SDK server.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub host: String,
    /// SDK server port (default: 6742).
    pub port: u16,
    /// Name this client registers with the server.
    pub client_name: String,
    /// Connect and per-request timeout (default: 2000ms).
    pub timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6742,
            client_name: "kvg-rgb".to_string(),
            timeout: Duration::from_millis(2000),
        }
    }
}

impl ConnectionOptions {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

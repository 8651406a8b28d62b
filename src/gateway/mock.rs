//! Mock gateway implementation for testing.
//!
//! This module provides an in-memory gateway that records every operation
//! and supports error injection and assertions.
//!
//! # Example
//!
//! ```rust,ignore
//! use kvg_rgb::color::Rgb;
//! use kvg_rgb::gateway::mock::{GatewayOp, MockGateway};
//! use kvg_rgb::gateway::{ColorTarget, Gateway};
//!
//! let mock = MockGateway::sample();
//! mock.set_color(ColorTarget::Zone(1, 3), Rgb::RED).unwrap();
//! mock.assert_contains(&GatewayOp::SetColor {
//!     target: ColorTarget::Zone(1, 3),
//!     color: Rgb::RED,
//! });
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use super::info::{DeviceInfo, DeviceKind, ModeInfo, ZoneInfo, ZoneKind};
use super::{ColorTarget, Connector, Gateway};
use crate::color::Rgb;
use crate::error::{Result, RgbError};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOp {
    ListDevices,
    SetColor { target: ColorTarget, color: Rgb },
    SetZoneLeds { device: u32, zone: u32, colors: Vec<Rgb> },
    ResizeZone { device: u32, zone: u32, size: u32 },
    SetDirectMode { device: u32 },
}

impl GatewayOp {
    /// True for operations that change hardware state.
    pub const fn is_write(&self) -> bool {
        !matches!(self, Self::ListDevices)
    }

    /// Zone written by this operation, if it is a zone-level write.
    pub const fn zone(&self) -> Option<(u32, u32)> {
        match self {
            Self::SetColor {
                target: ColorTarget::Zone(d, z),
                ..
            }
            | Self::SetZoneLeds {
                device: d, zone: z, ..
            }
            | Self::ResizeZone {
                device: d, zone: z, ..
            } => Some((*d, *z)),
            _ => None,
        }
    }
}

/// In-memory gateway for testing without an OpenRGB server.
pub struct MockGateway {
    devices: Mutex<Vec<DeviceInfo>>,
    operation_log: Mutex<Vec<GatewayOp>>,
    error_injection: Mutex<Option<RgbError>>,
    /// Zones that silently ignore resize requests.
    frozen_zones: Mutex<HashSet<(u32, u32)>>,
    connected: AtomicBool,
}

impl MockGateway {
    /// Create a mock exposing the given devices.
    pub fn new(mut devices: Vec<DeviceInfo>) -> Self {
        for (i, device) in devices.iter_mut().enumerate() {
            device.index = i as u32;
            device.reindex_zones();
        }
        debug!(count = devices.len(), "Creating mock gateway");
        Self {
            devices: Mutex::new(devices),
            operation_log: Mutex::new(Vec::new()),
            error_injection: Mutex::new(None),
            frozen_zones: Mutex::new(HashSet::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// A motherboard with two zones, an ARGB controller with four and a
    /// zoneless mouse.
    pub fn sample() -> Self {
        MockGatewayBuilder::new()
            .device(
                "ASUS Aura Motherboard",
                DeviceKind::Motherboard,
                &[("Aura Mainboard", 3, 3, 3), ("Aura Addressable 1", 30, 0, 120)],
            )
            .device(
                "ARGB Controller",
                DeviceKind::LedStrip,
                &[
                    ("Header 1", 20, 1, 60),
                    ("Header 2", 20, 1, 60),
                    ("Header 3", 20, 1, 60),
                    ("Strip", 40, 10, 100),
                ],
            )
            .zoneless("Gaming Mouse", DeviceKind::Mouse, 2)
            .build()
    }

    // === Configuration ===

    /// Inject an error for the next operation.
    pub fn inject_error(&self, error: RgbError) {
        *self.error_injection.lock().unwrap() = Some(error);
    }

    /// Clear injected error.
    pub fn clear_error(&self) {
        *self.error_injection.lock().unwrap() = None;
    }

    /// Simulate the server going away.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Make a zone accept resize requests without changing size.
    pub fn freeze_zone(&self, device: u32, zone: u32) {
        self.frozen_zones.lock().unwrap().insert((device, zone));
    }

    // === Assertions ===

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<GatewayOp> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Recorded operations that change hardware state.
    pub fn writes(&self) -> Vec<GatewayOp> {
        self.operations()
            .into_iter()
            .filter(GatewayOp::is_write)
            .collect()
    }

    /// Assert specific operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[GatewayOp]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &GatewayOp) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    /// Current LED colors of a zone.
    pub fn zone_colors(&self, device: u32, zone: u32) -> Vec<Rgb> {
        let devices = self.devices.lock().unwrap();
        devices
            .get(device as usize)
            .and_then(|d| d.zone(zone).map(|z| d.zone_colors(z)))
            .unwrap_or_default()
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
    }

    // === Internal Helpers ===

    fn record_op(&self, op: GatewayOp) {
        trace!(?op, "Recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_error(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().unwrap().take() {
            return Err(error);
        }
        if !self.is_connected() {
            return Err(RgbError::GatewayUnavailable {
                addr: self.endpoint(),
                reason: "mock gateway disconnected".to_string(),
            });
        }
        Ok(())
    }

    fn with_device<T>(
        &self,
        index: u32,
        f: impl FnOnce(&mut DeviceInfo) -> Result<T>,
    ) -> Result<T> {
        let mut devices = self.devices.lock().unwrap();
        let device = devices
            .get_mut(index as usize)
            .ok_or_else(|| RgbError::NotFound(format!("device {index}")))?;
        f(device)
    }

    fn paint_zone(device: &mut DeviceInfo, zone: u32, colors: &[Rgb]) -> Result<()> {
        let info = device
            .zone(zone)
            .cloned()
            .ok_or_else(|| RgbError::NotFound(format!("zone {zone} on device {}", device.index)))?;
        let start = info.start_led as usize;
        for (i, slot) in device
            .colors
            .iter_mut()
            .skip(start)
            .take(info.led_count as usize)
            .enumerate()
        {
            if let Some(c) = colors.get(i).or_else(|| colors.last()) {
                *slot = *c;
            }
        }
        Ok(())
    }
}

impl Gateway for MockGateway {
    fn endpoint(&self) -> String {
        "mock:6742".to_string()
    }

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.check_error()?;
        self.record_op(GatewayOp::ListDevices);
        Ok(self.devices.lock().unwrap().clone())
    }

    fn set_color(&self, target: ColorTarget, color: Rgb) -> Result<()> {
        self.check_error()?;
        match target {
            ColorTarget::All => {
                for device in self.devices.lock().unwrap().iter_mut() {
                    device.colors.fill(color);
                }
            }
            ColorTarget::Device(d) => self.with_device(d, |device| {
                device.colors.fill(color);
                Ok(())
            })?,
            ColorTarget::Zone(d, z) => {
                self.with_device(d, |device| Self::paint_zone(device, z, &[color]))?;
            }
        }
        self.record_op(GatewayOp::SetColor { target, color });
        Ok(())
    }

    fn set_zone_leds(&self, device: u32, zone: u32, colors: &[Rgb]) -> Result<()> {
        self.check_error()?;
        self.with_device(device, |d| Self::paint_zone(d, zone, colors))?;
        self.record_op(GatewayOp::SetZoneLeds {
            device,
            zone,
            colors: colors.to_vec(),
        });
        Ok(())
    }

    fn resize_zone(&self, device: u32, zone: u32, size: u32) -> Result<u32> {
        self.check_error()?;
        self.record_op(GatewayOp::ResizeZone { device, zone, size });
        let frozen = self.frozen_zones.lock().unwrap().contains(&(device, zone));
        self.with_device(device, |d| {
            let info = d
                .zones
                .get_mut(zone as usize)
                .ok_or_else(|| RgbError::NotFound(format!("zone {zone} on device {device}")))?;
            if !frozen {
                let (min, max) = info.size_bounds();
                info.led_count = size.clamp(min, max);
            }
            let actual = info.led_count;
            let total: u32 = d.zones.iter().map(|z| z.led_count).sum();
            d.colors.resize(total as usize, Rgb::BLACK);
            d.reindex_zones();
            Ok(actual)
        })
    }

    fn set_direct_mode(&self, device: u32) -> Result<()> {
        self.check_error()?;
        self.with_device(device, |d| {
            if let Some(i) = d.direct_mode() {
                d.active_mode = i as i32;
            }
            Ok(())
        })?;
        self.record_op(GatewayOp::SetDirectMode { device });
        Ok(())
    }
}

/// Connector that hands out one shared [`MockGateway`].
pub struct MockConnector {
    gateway: Arc<MockGateway>,
    connects: AtomicUsize,
    refuse: AtomicBool,
}

impl MockConnector {
    pub fn new(gateway: Arc<MockGateway>) -> Self {
        Self {
            gateway,
            connects: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
        }
    }

    pub fn gateway(&self) -> &Arc<MockGateway> {
        &self.gateway
    }

    /// Number of sessions opened so far.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Make subsequent connects fail as if the server were down.
    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

impl Connector for MockConnector {
    fn endpoint(&self) -> String {
        self.gateway.endpoint()
    }

    fn connect(&self) -> Result<Arc<dyn Gateway>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(RgbError::GatewayUnavailable {
                addr: self.endpoint(),
                reason: "connection refused".to_string(),
            });
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.gateway) as Arc<dyn Gateway>)
    }
}

/// Builder for creating `MockGateway` with custom device layouts.
#[derive(Default)]
pub struct MockGatewayBuilder {
    devices: Vec<DeviceInfo>,
}

impl MockGatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device with `(name, led_count, led_min, led_max)` zones.
    pub fn device(mut self, name: &str, kind: DeviceKind, zones: &[(&str, u32, u32, u32)]) -> Self {
        let zones: Vec<ZoneInfo> = zones
            .iter()
            .map(|(zone_name, count, min, max)| ZoneInfo {
                index: 0,
                name: (*zone_name).to_string(),
                kind: if min == max && *count == 1 {
                    ZoneKind::Single
                } else {
                    ZoneKind::Linear
                },
                led_count: *count,
                led_min: *min,
                led_max: *max,
                start_led: 0,
            })
            .collect();
        let total: u32 = zones.iter().map(|z| z.led_count).sum();
        self.devices.push(Self::base(name, kind, zones, total));
        self
    }

    /// Add a device that reports LEDs but no zones.
    pub fn zoneless(mut self, name: &str, kind: DeviceKind, leds: u32) -> Self {
        self.devices.push(Self::base(name, kind, Vec::new(), leds));
        self
    }

    /// Drop the "Direct" mode from the most recently added device.
    pub fn without_direct_mode(mut self) -> Self {
        if let Some(last) = self.devices.last_mut() {
            last.modes.retain(|m| !m.name.eq_ignore_ascii_case("direct"));
        }
        self
    }

    pub fn build(self) -> MockGateway {
        MockGateway::new(self.devices)
    }

    fn base(name: &str, kind: DeviceKind, zones: Vec<ZoneInfo>, leds: u32) -> DeviceInfo {
        DeviceInfo {
            index: 0,
            name: name.to_string(),
            kind,
            vendor: "Mock".to_string(),
            description: format!("Mock {}", kind.display_name()),
            version: "1.0.0-mock".to_string(),
            serial: format!("MOCK-{}", name.replace(' ', "-").to_uppercase()),
            location: "mock".to_string(),
            modes: vec![ModeInfo::named("Direct", 0), ModeInfo::named("Rainbow Wave", 1)],
            active_mode: 1,
            zones,
            colors: vec![Rgb::new(10, 10, 10); leds as usize],
        }
    }
}

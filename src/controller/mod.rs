//! Controller facade: turns user intent into preference writes and gateway calls.
//!
//! Every operation persists what the user asked for first and then pushes
//! the (brightness/saturation scaled) result to the hardware. A gateway
//! failure after a successful store write is reported but the preference
//! stays, since it records intent rather than hardware state.

mod flash;
mod overview;

pub use flash::DEFAULT_FLASH_CYCLES;
pub use overview::{DeviceOverview, ZoneOverview};

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};

use crate::color::{Adjustment, Rgb};
use crate::effects::Effect;
use crate::error::{Result, RgbError};
use crate::gateway::{ColorTarget, Gateway, SharedConnector, SharedGateway};
use crate::selection::{Scope, Selection, ZoneKey, resolve};
use crate::snapshot::DeviceSnapshot;
use crate::store::{PreferenceStore, ZonePatch, ZonePreference};

/// Concrete hardware targets of a scope after exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub zones: Vec<ZoneKey>,
    /// Devices that report no zones and are written as a whole.
    pub zoneless_devices: Vec<u32>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.zoneless_devices.is_empty()
    }

    fn devices(&self) -> BTreeSet<u32> {
        self.zones
            .iter()
            .map(|k| k.device)
            .chain(self.zoneless_devices.iter().copied())
            .collect()
    }
}

/// A zone and the color actually dispatched to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedZone {
    pub device: u32,
    pub zone: u32,
    pub dispatched: Rgb,
}

/// Outcome of [`Controller::set_color`].
#[derive(Debug, Clone, Serialize)]
pub struct ColorReport {
    pub scope: Scope,
    pub color: Rgb,
    pub zones: Vec<AppliedZone>,
    pub zoneless_devices: Vec<u32>,
}

/// Outcome of [`Controller::resize_zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeReport {
    pub device: u32,
    pub zone: u32,
    pub requested: u32,
    pub actual: u32,
    pub previous: u32,
}

/// Facade over the preference store and the device gateway.
pub struct Controller {
    connector: SharedConnector,
    session: Mutex<Option<SharedGateway>>,
    store: Arc<PreferenceStore>,
    flash_interval: Duration,
}

impl Controller {
    pub fn new(connector: SharedConnector, store: Arc<PreferenceStore>) -> Self {
        Self {
            connector,
            session: Mutex::new(None),
            store,
            flash_interval: flash::DEFAULT_FLASH_INTERVAL,
        }
    }

    /// Delay between flash on/off steps.
    pub const fn with_flash_interval(mut self, interval: Duration) -> Self {
        self.flash_interval = interval;
        self
    }

    pub const fn store(&self) -> &Arc<PreferenceStore> {
        &self.store
    }

    pub const fn connector(&self) -> &SharedConnector {
        &self.connector
    }

    pub fn endpoint(&self) -> String {
        self.connector.endpoint()
    }

    fn session_slot(&self) -> MutexGuard<'_, Option<SharedGateway>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The primary session, connecting on first use.
    fn session(&self) -> Result<SharedGateway> {
        let mut slot = self.session_slot();
        if let Some(gateway) = slot.as_ref() {
            return Ok(Arc::clone(gateway));
        }
        let gateway = self.connector.connect()?;
        *slot = Some(Arc::clone(&gateway));
        Ok(gateway)
    }

    /// Run `f` on the primary session. A lost connection drops the session
    /// so the next call reconnects; nothing is retried here.
    fn with_gateway<T>(&self, f: impl FnOnce(&dyn Gateway) -> Result<T>) -> Result<T> {
        let gateway = self.session()?;
        let result = f(gateway.as_ref());
        if let Err(e) = &result {
            if e.is_connection_lost() {
                warn!(error = %e, "Gateway session lost");
                *self.session_slot() = None;
            }
        }
        result
    }

    /// Enumerate devices now.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<DeviceSnapshot> {
        let devices = self.with_gateway(|gw| gw.list_devices())?;
        debug!(count = devices.len(), "Device snapshot taken");
        Ok(DeviceSnapshot::new(devices))
    }

    fn device_enabled(&self, snapshot: &DeviceSnapshot, device: u32) -> Result<bool> {
        let info = snapshot.device(device)?;
        self.store.device_enabled(&info.name)
    }

    fn zone_enabled(&self, key: ZoneKey) -> Result<bool> {
        Ok(self.store.get(key.device, key.zone)?.is_none_or(|p| p.enabled))
    }

    /// Resolve a scope to hardware targets, honouring exclusions.
    ///
    /// `All` and `Device` silently skip excluded zones (and `All` excluded
    /// devices); naming an excluded device or zone explicitly is rejected.
    pub fn targets(&self, snapshot: &DeviceSnapshot, scope: Scope) -> Result<Targets> {
        match scope {
            Scope::Device(d) | Scope::Zone(d, _) if !self.device_enabled(snapshot, d)? => {
                return Err(RgbError::Validation(format!(
                    "device {d} '{}' is excluded; include it first",
                    snapshot.device(d)?.name
                )));
            }
            Scope::Zone(d, z) => {
                let key = ZoneKey::new(d, z);
                resolve(&[Selection::SingleZone(d, z)], snapshot)?;
                if !self.zone_enabled(key)? {
                    return Err(RgbError::Validation(format!("zone {key} is disabled")));
                }
                return Ok(Targets {
                    zones: vec![key],
                    zoneless_devices: Vec::new(),
                });
            }
            Scope::All | Scope::Device(_) => {}
        }

        let mut targets = Targets::default();
        for selection in scope.selections(snapshot) {
            let Selection::WholeDevice(d) = selection else {
                continue;
            };
            if !self.device_enabled(snapshot, d)? {
                trace!(device = d, "Skipping excluded device");
                continue;
            }
            let zones = resolve(&[selection], snapshot)?;
            if zones.is_empty() {
                targets.zoneless_devices.push(d);
            }
            for key in zones {
                if self.zone_enabled(key)? {
                    targets.zones.push(key);
                } else {
                    trace!(%key, "Skipping disabled zone");
                }
            }
        }
        Ok(targets)
    }

    /// Persist a base color for the scope and dispatch it scaled per zone.
    ///
    /// Setting a color also returns the zones to a static effect.
    #[instrument(skip(self, snapshot))]
    pub fn set_color(
        &self,
        snapshot: &DeviceSnapshot,
        scope: Scope,
        color: Rgb,
    ) -> Result<ColorReport> {
        let targets = self.targets(snapshot, scope)?;

        let patch = ZonePatch::new().color(color).effect(Effect::Static);
        let mut applied = Vec::with_capacity(targets.zones.len());
        for key in &targets.zones {
            let pref = self.store.upsert(key.device, key.zone, &patch)?;
            applied.push(AppliedZone {
                device: key.device,
                zone: key.zone,
                dispatched: pref.adjustment().apply(color),
            });
        }
        if !targets.is_empty() {
            self.store.push_recent_color(color)?;
        }

        self.with_gateway(|gw| {
            for device in targets.devices() {
                gw.set_direct_mode(device)?;
            }
            for zone in &applied {
                gw.set_color(ColorTarget::Zone(zone.device, zone.zone), zone.dispatched)?;
            }
            for device in &targets.zoneless_devices {
                gw.set_color(ColorTarget::Device(*device), color)?;
            }
            Ok(())
        })?;

        info!(%scope, %color, zones = applied.len(), "Color applied");
        Ok(ColorReport {
            scope,
            color,
            zones: applied,
            zoneless_devices: targets.zoneless_devices,
        })
    }

    /// Resize a zone within its reported bounds and persist the size the device applied.
    #[instrument(skip(self, snapshot))]
    pub fn resize_zone(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        zone: u32,
        size: u32,
    ) -> Result<ResizeReport> {
        let (_, info) = snapshot.zone(device, zone)?;
        let (min, max) = info.size_bounds();
        if !(min..=max).contains(&size) {
            return Err(RgbError::Validation(format!(
                "size {size} is outside {min}..={max} for zone '{}'",
                info.name
            )));
        }
        if !info.resizable() {
            debug!(device, zone, "Zone reports fixed size; asking the gateway anyway");
        }

        let previous = info.led_count;
        let actual = self.with_gateway(|gw| gw.resize_zone(device, zone, size))?;
        if actual != size && actual == previous {
            warn!(device, zone, requested = size, actual, "Gateway ignored resize");
            return Err(RgbError::ResizeRejected {
                requested: size,
                actual,
            });
        }

        let pref = self
            .store
            .upsert(device, zone, &ZonePatch::new().led_count(actual))?;
        let shows_static = pref.effect.is_static() && pref.enabled;
        if let (Some(color), true) = (pref.scaled_color(), shows_static) {
            self.with_gateway(|gw| gw.set_color(ColorTarget::Zone(device, zone), color))?;
        }

        info!(device, zone, previous, actual, "Zone resized");
        Ok(ResizeReport {
            device,
            zone,
            requested: size,
            actual,
            previous,
        })
    }

    /// Set or clear (blank name) a zone's friendly name.
    #[instrument(skip(self))]
    pub fn rename_zone(&self, device: u32, zone: u32, name: &str) -> Result<ZonePreference> {
        let name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
        self.store
            .upsert(device, zone, &ZonePatch::new().friendly_name(name))
    }

    /// Persist clamped brightness/saturation and re-apply the stored color.
    ///
    /// `None` keeps the stored value.
    #[instrument(skip(self, snapshot))]
    pub fn set_brightness_saturation(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        zone: u32,
        brightness: Option<i64>,
        saturation: Option<i64>,
    ) -> Result<ZonePreference> {
        snapshot.zone(device, zone)?;
        let current = self.store.get_or_default(device, zone)?;
        let adjustment = Adjustment::clamped(
            brightness.unwrap_or_else(|| i64::from(current.brightness)),
            saturation.unwrap_or_else(|| i64::from(current.saturation)),
        );
        let pref = self
            .store
            .upsert(device, zone, &ZonePatch::new().adjustment(adjustment))?;

        let active = pref.enabled && self.device_enabled(snapshot, device)?;
        if let (Some(color), true) = (pref.scaled_color(), active && pref.effect.is_static()) {
            self.with_gateway(|gw| {
                gw.set_direct_mode(device)?;
                gw.set_color(ColorTarget::Zone(device, zone), color)
            })?;
        }
        Ok(pref)
    }

    /// Flip a device's exclusion flag; returns whether it is now enabled.
    pub fn toggle_device(&self, snapshot: &DeviceSnapshot, device: u32) -> Result<bool> {
        let name = &snapshot.device(device)?.name;
        let enabled = self.store.toggle_device(name)?;
        info!(device, name = %name, enabled, "Device toggled");
        Ok(enabled)
    }

    /// Explicitly include or exclude a device.
    pub fn set_device_enabled(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        enabled: bool,
    ) -> Result<()> {
        let name = &snapshot.device(device)?.name;
        self.store.set_device_enabled(name, enabled)
    }

    /// Flip a zone's enabled flag; returns whether it is now enabled.
    pub fn toggle_zone(&self, snapshot: &DeviceSnapshot, device: u32, zone: u32) -> Result<bool> {
        snapshot.zone(device, zone)?;
        let current = self.store.get_or_default(device, zone)?;
        let pref = self
            .store
            .upsert(device, zone, &ZonePatch::new().enabled(!current.enabled))?;
        info!(device, zone, enabled = pref.enabled, "Zone toggled");
        Ok(pref.enabled)
    }

    /// Persist a zone's effect assignment without starting or stopping anything.
    pub fn assign_effect(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        zone: u32,
        effect: Effect,
    ) -> Result<ZonePreference> {
        snapshot.zone(device, zone)?;
        self.store
            .upsert(device, zone, &ZonePatch::new().effect(effect))
    }

    /// Re-apply the stored color of one zone if it has one.
    pub fn reapply_zone(&self, device: u32, zone: u32) -> Result<Option<Rgb>> {
        let Some(color) = self
            .store
            .get(device, zone)?
            .and_then(|p| p.scaled_color())
        else {
            return Ok(None);
        };
        self.with_gateway(|gw| {
            gw.set_direct_mode(device)?;
            gw.set_color(ColorTarget::Zone(device, zone), color)
        })?;
        Ok(Some(color))
    }

    /// Push every stored static color back to enabled zones. Returns the
    /// number of zones restored; stale rows are skipped.
    #[instrument(skip(self, snapshot))]
    pub fn restore_static_colors(&self, snapshot: &DeviceSnapshot) -> Result<usize> {
        let mut restore = Vec::new();
        for pref in self.store.list_all()? {
            let Some(color) = pref.scaled_color() else {
                continue;
            };
            if !pref.enabled || !pref.effect.is_static() {
                continue;
            }
            if snapshot.zone(pref.device_index, pref.zone_index).is_err() {
                debug!(
                    device = pref.device_index,
                    zone = pref.zone_index,
                    "Skipping preference for zone not present"
                );
                continue;
            }
            if !self.device_enabled(snapshot, pref.device_index)? {
                continue;
            }
            restore.push((ZoneKey::new(pref.device_index, pref.zone_index), color));
        }

        let devices: BTreeSet<u32> = restore.iter().map(|(k, _)| k.device).collect();
        self.with_gateway(|gw| {
            for device in &devices {
                gw.set_direct_mode(*device)?;
            }
            for (key, color) in &restore {
                gw.set_color(ColorTarget::Zone(key.device, key.zone), *color)?;
            }
            Ok(())
        })?;

        info!(zones = restore.len(), "Static colors restored");
        Ok(restore.len())
    }

    /// Force direct mode on every enabled device, then restore stored colors.
    /// Returns the number of devices reset.
    #[instrument(skip(self, snapshot))]
    pub fn reset_modes(&self, snapshot: &DeviceSnapshot) -> Result<usize> {
        let mut devices = Vec::new();
        for device in snapshot.devices() {
            if self.store.device_enabled(&device.name)? {
                devices.push(device.index);
            }
        }
        self.with_gateway(|gw| devices.iter().try_for_each(|d| gw.set_direct_mode(*d)))?;
        self.restore_static_colors(snapshot)?;
        info!(devices = devices.len(), "Device modes reset");
        Ok(devices.len())
    }

    /// Push one effect frame, scaled, without persisting anything.
    pub(crate) fn dispatch_frame(
        gateway: &dyn Gateway,
        key: ZoneKey,
        frame: &[Rgb],
        adjustment: Adjustment,
    ) -> Result<()> {
        if frame.is_empty() {
            return Ok(());
        }
        let scaled: Vec<Rgb> = frame.iter().map(|c| adjustment.apply(*c)).collect();
        if scaled.iter().all(|c| *c == scaled[0]) {
            gateway.set_color(ColorTarget::Zone(key.device, key.zone), scaled[0])
        } else {
            gateway.set_zone_leds(key.device, key.zone, &scaled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{GatewayOp, MockConnector, MockGateway};

    fn setup() -> (Controller, Arc<MockGateway>) {
        let mock = Arc::new(MockGateway::sample());
        let connector = Arc::new(MockConnector::new(Arc::clone(&mock)));
        let store = Arc::new(PreferenceStore::in_memory().unwrap());
        let controller =
            Controller::new(connector, store).with_flash_interval(Duration::from_millis(1));
        (controller, mock)
    }

    #[test]
    fn test_set_color_scales_but_stores_base() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        controller
            .set_brightness_saturation(&snap, 1, 3, Some(50), Some(100))
            .unwrap();
        mock.clear_operations();

        let report = controller
            .set_color(&snap, Scope::Zone(1, 3), Rgb::new(0, 150, 255))
            .unwrap();
        assert_eq!(report.zones[0].dispatched, Rgb::new(0, 75, 128));
        mock.assert_contains(&GatewayOp::SetColor {
            target: ColorTarget::Zone(1, 3),
            color: Rgb::new(0, 75, 128),
        });
        let stored = controller.store().get(1, 3).unwrap().unwrap();
        assert_eq!(stored.color, Some(Rgb::new(0, 150, 255)));
    }

    #[test]
    fn test_set_color_all_covers_zoneless_devices() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        let report = controller.set_color(&snap, Scope::All, Rgb::RED).unwrap();
        assert_eq!(report.zones.len(), 6);
        assert_eq!(report.zoneless_devices, vec![2]);
        mock.assert_contains(&GatewayOp::SetColor {
            target: ColorTarget::Device(2),
            color: Rgb::RED,
        });
        assert_eq!(controller.store().list_recent_colors().unwrap().len(), 1);
    }

    #[test]
    fn test_excluded_device_skipped_for_all_rejected_when_named() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        assert!(!controller.toggle_device(&snap, 0).unwrap());
        mock.clear_operations();

        let report = controller.set_color(&snap, Scope::All, Rgb::BLUE).unwrap();
        assert!(report.zones.iter().all(|z| z.device != 0));
        assert!(mock.writes().iter().all(|op| op.zone().is_none_or(|(d, _)| d != 0)));

        let err = controller
            .set_color(&snap, Scope::Device(0), Rgb::BLUE)
            .unwrap_err();
        assert!(matches!(err, RgbError::Validation(_)));
    }

    #[test]
    fn test_disabled_zone_skipped_within_device() {
        let (controller, _mock) = setup();
        let snap = controller.snapshot().unwrap();
        assert!(!controller.toggle_zone(&snap, 1, 0).unwrap());
        let report = controller.set_color(&snap, Scope::Device(1), Rgb::GREEN).unwrap();
        assert_eq!(report.zones.len(), 3);
        assert!(
            controller
                .set_color(&snap, Scope::Zone(1, 0), Rgb::GREEN)
                .is_err()
        );
    }

    #[test]
    fn test_resize_out_of_range_never_calls_gateway() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        mock.clear_operations();
        let err = controller.resize_zone(&snap, 1, 3, 101).unwrap_err();
        assert!(matches!(err, RgbError::Validation(_)));
        let err = controller.resize_zone(&snap, 1, 3, 9).unwrap_err();
        assert!(matches!(err, RgbError::Validation(_)));
        mock.assert_no_operations();
    }

    #[test]
    fn test_resize_persists_actual_size() {
        let (controller, _mock) = setup();
        let snap = controller.snapshot().unwrap();
        let report = controller.resize_zone(&snap, 1, 3, 64).unwrap();
        assert_eq!(report.actual, 64);
        assert_eq!(report.previous, 40);
        assert_eq!(controller.store().get(1, 3).unwrap().unwrap().led_count, Some(64));
    }

    #[test]
    fn test_ignored_resize_is_rejected() {
        let (controller, mock) = setup();
        mock.freeze_zone(0, 1);
        let snap = controller.snapshot().unwrap();
        let err = controller.resize_zone(&snap, 0, 1, 50).unwrap_err();
        assert!(matches!(
            err,
            RgbError::ResizeRejected {
                requested: 50,
                actual: 30
            }
        ));
        assert!(controller.store().get(0, 1).unwrap().is_none());
    }

    #[test]
    fn test_unknown_zone_is_not_found() {
        let (controller, _mock) = setup();
        let snap = controller.snapshot().unwrap();
        assert!(matches!(
            controller.resize_zone(&snap, 5, 0, 10),
            Err(RgbError::NotFound(_))
        ));
        assert!(matches!(
            controller.set_color(&snap, Scope::Zone(1, 7), Rgb::RED),
            Err(RgbError::NotFound(_))
        ));
    }

    #[test]
    fn test_rename_blank_clears() {
        let (controller, _mock) = setup();
        controller.rename_zone(1, 3, "Desk strip").unwrap();
        assert_eq!(
            controller.rename_zone(1, 3, "").unwrap().friendly_name,
            None
        );
    }

    #[test]
    fn test_brightness_clamps_and_reapplies() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        controller.set_color(&snap, Scope::Zone(0, 1), Rgb::WHITE).unwrap();
        mock.clear_operations();

        let pref = controller
            .set_brightness_saturation(&snap, 0, 1, Some(250), Some(-10))
            .unwrap();
        assert_eq!((pref.brightness, pref.saturation), (100, 0));
        mock.assert_contains(&GatewayOp::SetColor {
            target: ColorTarget::Zone(0, 1),
            color: Rgb::WHITE,
        });
    }

    #[test]
    fn test_gateway_failure_keeps_preference() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        mock.disconnect();
        let err = controller
            .set_color(&snap, Scope::Zone(1, 2), Rgb::RED)
            .unwrap_err();
        assert!(matches!(err, RgbError::GatewayUnavailable { .. }));
        assert_eq!(
            controller.store().get(1, 2).unwrap().unwrap().color,
            Some(Rgb::RED)
        );
    }

    #[test]
    fn test_lost_session_reconnects_on_next_call() {
        let mock = Arc::new(MockGateway::sample());
        let connector = Arc::new(MockConnector::new(Arc::clone(&mock)));
        let store = Arc::new(PreferenceStore::in_memory().unwrap());
        let controller = Controller::new(Arc::clone(&connector) as SharedConnector, store);

        controller.snapshot().unwrap();
        controller.snapshot().unwrap();
        assert_eq!(connector.connect_count(), 1);

        mock.disconnect();
        assert!(controller.snapshot().is_err());
        mock.reconnect();
        controller.snapshot().unwrap();
        assert_eq!(connector.connect_count(), 2);
    }

    #[test]
    fn test_restore_skips_stale_disabled_and_effect_rows() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        let store = controller.store();
        store.upsert(0, 1, &ZonePatch::new().color(Rgb::RED)).unwrap();
        store.upsert(1, 0, &ZonePatch::new().color(Rgb::GREEN).enabled(false)).unwrap();
        store
            .upsert(
                1,
                1,
                &ZonePatch::new()
                    .color(Rgb::BLUE)
                    .effect(Effect::Rainbow { speed: crate::effects::Speed::NORMAL }),
            )
            .unwrap();
        store.upsert(7, 0, &ZonePatch::new().color(Rgb::WHITE)).unwrap();
        mock.clear_operations();

        assert_eq!(controller.restore_static_colors(&snap).unwrap(), 1);
        mock.assert_operations(&[
            GatewayOp::SetDirectMode { device: 0 },
            GatewayOp::SetColor {
                target: ColorTarget::Zone(0, 1),
                color: Rgb::RED,
            },
        ]);
    }

    #[test]
    fn test_reset_modes_skips_excluded_devices() {
        let (controller, mock) = setup();
        let snap = controller.snapshot().unwrap();
        controller.set_device_enabled(&snap, 1, false).unwrap();
        mock.clear_operations();
        assert_eq!(controller.reset_modes(&snap).unwrap(), 2);
        mock.assert_contains(&GatewayOp::SetDirectMode { device: 2 });
        assert!(!mock.operations().contains(&GatewayOp::SetDirectMode { device: 1 }));
    }

    #[test]
    fn test_dispatch_frame_collapses_uniform_frames() {
        let mock = MockGateway::sample();
        let key = ZoneKey::new(0, 0);
        let dimmed = Adjustment::clamped(0, 100);
        Controller::dispatch_frame(&mock, key, &[Rgb::RED; 3], dimmed).unwrap();
        let mixed = [Rgb::RED, Rgb::BLUE, Rgb::RED];
        Controller::dispatch_frame(&mock, key, &mixed, Adjustment::IDENTITY).unwrap();
        mock.assert_operations(&[
            GatewayOp::SetColor {
                target: ColorTarget::Zone(0, 0),
                color: Rgb::BLACK,
            },
            GatewayOp::SetZoneLeds {
                device: 0,
                zone: 0,
                colors: vec![Rgb::RED, Rgb::BLUE, Rgb::RED],
            },
        ]);
    }
}

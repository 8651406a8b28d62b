//! OpenRGB SDK sessions on top of the `openrgb` client crate.
//!
//! The client is async. Every call here blocks on one shared background
//! runtime, so callers keep the blocking [`Gateway`] contract whether they run
//! on an effect thread, the CLI main thread or tokio's blocking pool.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use openrgb::OpenRGB;
use openrgb::data::{Color, Controller, Mode};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument, trace};

use super::info::{ConnectionOptions, DeviceInfo, DeviceKind, ModeInfo, ZoneInfo, ZoneKind};
use super::{ColorTarget, Connector, Gateway};
use crate::color::Rgb;
use crate::error::{Result, RgbError};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Runtime owning every session socket. Lives for the whole process.
fn runtime() -> Result<&'static Runtime> {
    if let Some(rt) = RUNTIME.get() {
        return Ok(rt);
    }
    let rt = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("kvg-openrgb")
        .enable_all()
        .build()?;
    Ok(RUNTIME.get_or_init(|| rt))
}

/// Convert between our `u32` indices and the client's integer fields.
fn fit<T, U>(value: U) -> Result<T>
where
    T: TryFrom<U>,
    U: Copy + Display,
{
    T::try_from(value).map_err(|_| {
        RgbError::GatewayProtocol(format!("value {value} does not fit the OpenRGB field"))
    })
}

fn wire_colors(colors: &[Rgb]) -> Vec<Color> {
    colors.iter().map(|c| Color::new(c.r, c.g, c.b)).collect()
}

/// Mirror a controller description into our device type.
fn device_info(index: u32, controller: &Controller) -> Result<DeviceInfo> {
    let zones = controller
        .zones
        .iter()
        .map(|z| {
            Ok(ZoneInfo {
                index: 0,
                name: z.name.clone(),
                kind: ZoneKind::from_name(&format!("{:?}", z.r#type)),
                led_count: fit(z.leds_count)?,
                led_min: fit(z.leds_min)?,
                led_max: fit(z.leds_max)?,
                start_led: 0,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let modes = controller
        .modes
        .iter()
        .map(|m| Ok(ModeInfo::named(&m.name, fit(m.value)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut device = DeviceInfo {
        index,
        name: controller.name.clone(),
        kind: DeviceKind::from_name(&format!("{:?}", controller.r#type)),
        vendor: controller.vendor.clone(),
        description: controller.description.clone(),
        version: controller.version.clone(),
        serial: controller.serial.clone(),
        location: controller.location.clone(),
        modes,
        active_mode: fit(controller.active_mode)?,
        zones,
        colors: controller.colors.iter().map(|c| Rgb::new(c.r, c.g, c.b)).collect(),
    };
    device.reindex_zones();
    Ok(device)
}

/// One session with the OpenRGB server.
pub struct OpenRgbClient {
    addr: String,
    timeout: Duration,
    client: OpenRGB<TcpStream>,
    /// Modes as the server sent them, by device; `UPDATEMODE` wants them back whole.
    modes: Mutex<HashMap<u32, Vec<Mode>>>,
    devices: Mutex<Option<Vec<DeviceInfo>>>,
}

impl OpenRgbClient {
    /// Connect, negotiate the protocol version and register the client name.
    ///
    /// A server that does not finish the handshake within the timeout is
    /// reported as unavailable.
    #[instrument(skip(opts), fields(addr = %opts.addr()))]
    pub fn connect(opts: &ConnectionOptions) -> Result<Self> {
        let addr = opts.addr();
        let unavailable = |reason: String| RgbError::GatewayUnavailable {
            addr: addr.clone(),
            reason,
        };
        let host = opts.host.as_str();

        debug!("Connecting to OpenRGB server");
        let client = runtime()?.block_on(async {
            let client = tokio::time::timeout(opts.timeout, OpenRGB::connect_to((host, opts.port)))
                .await
                .map_err(|_| unavailable("timed out waiting for the server".to_string()))?
                .map_err(|e| unavailable(e.to_string()))?;
            tokio::time::timeout(opts.timeout, client.set_name(opts.client_name.clone()))
                .await
                .map_err(|_| unavailable("timed out registering the client name".to_string()))?
                .map_err(|e| unavailable(e.to_string()))?;
            Ok::<_, RgbError>(client)
        })?;

        info!("Connected to OpenRGB server");
        Ok(Self {
            addr,
            timeout: opts.timeout,
            client,
            modes: Mutex::new(HashMap::new()),
            devices: Mutex::new(None),
        })
    }

    fn cache(&self) -> MutexGuard<'_, Option<Vec<DeviceInfo>>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raw_modes(&self) -> MutexGuard<'_, HashMap<u32, Vec<Mode>>> {
        self.modes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drive one client request to completion within the session timeout.
    fn run<T, E, F>(&self, what: &str, request: F) -> Result<T>
    where
        E: Display,
        F: Future<Output = std::result::Result<T, E>>,
    {
        trace!(what, "OpenRGB request");
        let timeout = self.timeout;
        let outcome = runtime()?.block_on(async { tokio::time::timeout(timeout, request).await });
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.lost(format!("{what}: {e}"))),
            Err(_) => Err(self.lost(format!("{what}: timed out"))),
        }
    }

    fn lost(&self, reason: String) -> RgbError {
        RgbError::GatewayUnavailable {
            addr: self.addr.clone(),
            reason,
        }
    }

    fn fetch_device(&self, index: u32) -> Result<DeviceInfo> {
        let controller = self.run("controller data", self.client.get_controller(fit(index)?))?;
        let device = device_info(index, &controller)?;
        self.raw_modes().insert(index, controller.modes);
        Ok(device)
    }

    fn fetch_devices(&self) -> Result<Vec<DeviceInfo>> {
        let count = self.run("controller count", self.client.get_controller_count())?;
        let count: u32 = fit(count)?;
        debug!(count, "Controller count");
        let devices = (0..count)
            .map(|i| self.fetch_device(i))
            .collect::<Result<Vec<_>>>()?;
        *self.cache() = Some(devices.clone());
        Ok(devices)
    }

    fn cached_device(&self, index: u32) -> Result<DeviceInfo> {
        let cached = self
            .cache()
            .as_ref()
            .map(|devices| devices.get(index as usize).cloned());
        let device = match cached {
            Some(device) => device,
            None => self.fetch_devices()?.get(index as usize).cloned(),
        };
        device.ok_or_else(|| RgbError::NotFound(format!("device {index}")))
    }

    fn update_cached(&self, device: DeviceInfo) {
        if let Some(devices) = self.cache().as_mut() {
            if let Some(slot) = devices.get_mut(device.index as usize) {
                *slot = device;
            }
        }
    }

    fn raw_mode(&self, device: u32, mode: usize) -> Result<Mode> {
        if !self.raw_modes().contains_key(&device) {
            self.fetch_device(device)?;
        }
        self.raw_modes()
            .get(&device)
            .and_then(|modes| modes.get(mode))
            .cloned()
            .ok_or_else(|| RgbError::NotFound(format!("mode {mode} on device {device}")))
    }

    fn fill_device(&self, device: &DeviceInfo, color: Rgb) -> Result<()> {
        let colors = vec![color; device.led_count() as usize];
        self.run(
            "update LEDs",
            self.client.update_leds(fit(device.index)?, wire_colors(&colors)),
        )
    }
}

impl Gateway for OpenRgbClient {
    fn endpoint(&self) -> String {
        self.addr.clone()
    }

    #[instrument(skip(self))]
    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.fetch_devices()
    }

    #[instrument(skip(self))]
    fn set_color(&self, target: ColorTarget, color: Rgb) -> Result<()> {
        match target {
            ColorTarget::All => {
                let devices = match self.cache().clone() {
                    Some(devices) => devices,
                    None => self.fetch_devices()?,
                };
                devices.iter().try_for_each(|device| self.fill_device(device, color))
            }
            ColorTarget::Device(index) => self.fill_device(&self.cached_device(index)?, color),
            ColorTarget::Zone(index, zone) => {
                let device = self.cached_device(index)?;
                let info = device
                    .zone(zone)
                    .ok_or_else(|| RgbError::NotFound(format!("zone {zone} on device {index}")))?;
                self.set_zone_leds(index, zone, &vec![color; info.led_count as usize])
            }
        }
    }

    fn set_zone_leds(&self, device: u32, zone: u32, colors: &[Rgb]) -> Result<()> {
        trace!(device, zone, leds = colors.len(), "Updating zone LEDs");
        self.run(
            "update zone LEDs",
            self.client
                .update_zone_leds(fit(device)?, fit(zone)?, wire_colors(colors)),
        )
    }

    #[instrument(skip(self))]
    fn resize_zone(&self, device: u32, zone: u32, size: u32) -> Result<u32> {
        self.run(
            "resize zone",
            self.client.resize_zone(fit(device)?, fit(zone)?, fit(size)?),
        )?;
        let refreshed = self.fetch_device(device)?;
        let actual = match refreshed.zone(zone) {
            Some(z) => z.led_count,
            None => {
                return Err(RgbError::GatewayProtocol(format!(
                    "device {device} reported {} zones after resizing zone {zone}",
                    refreshed.zones.len()
                )));
            }
        };
        debug!(requested = size, actual, "Zone resized");
        self.update_cached(refreshed);
        Ok(actual)
    }

    #[instrument(skip(self))]
    fn set_direct_mode(&self, device: u32) -> Result<()> {
        let mut info = self.cached_device(device)?;
        if let Some(mode_index) = info.direct_mode() {
            let mode = self.raw_mode(device, mode_index)?;
            self.run(
                "update mode",
                self.client.update_mode(fit(device)?, fit(mode_index)?, mode),
            )?;
            info.active_mode = fit(mode_index)?;
            self.update_cached(info);
            Ok(())
        } else {
            debug!(device, "No Direct mode, requesting custom mode");
            self.run("custom mode", self.client.set_custom_mode(fit(device)?))
        }
    }
}

/// Opens fresh [`OpenRgbClient`] sessions.
#[derive(Debug, Clone, Default)]
pub struct OpenRgbConnector {
    opts: ConnectionOptions,
}

impl OpenRgbConnector {
    pub const fn new(opts: ConnectionOptions) -> Self {
        Self { opts }
    }
}

impl Connector for OpenRgbConnector {
    fn endpoint(&self) -> String {
        self.opts.addr()
    }

    fn connect(&self) -> Result<Arc<dyn Gateway>> {
        Ok(Arc::new(OpenRgbClient::connect(&self.opts)?))
    }
}

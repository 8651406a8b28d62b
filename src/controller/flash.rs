//! Identify a zone by blinking it.

use std::thread;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::Controller;
use crate::color::Rgb;
use crate::error::{Result, RgbError};
use crate::gateway::ColorTarget;
use crate::snapshot::DeviceSnapshot;

pub const DEFAULT_FLASH_CYCLES: u32 = 3;
pub(super) const DEFAULT_FLASH_INTERVAL: Duration = Duration::from_millis(200);
const MAX_FLASH_CYCLES: u32 = 20;

impl Controller {
    /// Reject cycle counts outside `1..=20`.
    pub fn check_flash_cycles(cycles: u32) -> Result<()> {
        if (1..=MAX_FLASH_CYCLES).contains(&cycles) {
            Ok(())
        } else {
            Err(RgbError::Validation(format!(
                "flash cycles must be between 1 and {MAX_FLASH_CYCLES}"
            )))
        }
    }

    /// Blink a zone white/black `cycles` times, then put its colors back.
    ///
    /// Uses a dedicated gateway session. The zone is restored to its stored
    /// (scaled) color when there is one, otherwise to the colors captured
    /// before flashing. Restoration runs even when a flash write fails.
    #[instrument(skip(self, snapshot))]
    pub fn flash(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        zone: u32,
        cycles: u32,
    ) -> Result<()> {
        Self::check_flash_cycles(cycles)?;
        let (info, zone_info) = snapshot.zone(device, zone)?;
        let captured = info.zone_colors(zone_info);
        let stored = self
            .store
            .get(device, zone)?
            .and_then(|p| p.scaled_color());

        let gateway = self.connector.connect()?;
        gateway.set_direct_mode(device)?;

        let target = ColorTarget::Zone(device, zone);
        let blink = (0..cycles).try_for_each(|_| {
            gateway.set_color(target, Rgb::WHITE)?;
            thread::sleep(self.flash_interval);
            gateway.set_color(target, Rgb::BLACK)?;
            thread::sleep(self.flash_interval);
            Ok(())
        });
        if let Err(e) = &blink {
            warn!(device, zone, error = %e, "Flash interrupted; restoring zone");
        }

        let restore = match stored {
            Some(color) => gateway.set_color(target, color),
            None if !captured.is_empty() => gateway.set_zone_leds(device, zone, &captured),
            None => Ok(()),
        };

        blink.and(restore)?;
        info!(device, zone, cycles, "Zone flashed");
        Ok(())
    }
}

//! Device gateway abstraction over the OpenRGB SDK server.
//!
//! This module provides a trait-based abstraction over the real network
//! client and a recording mock, so controller logic can be tested without
//! an OpenRGB server.

mod client;
mod info;
pub mod mock;

pub use client::{OpenRgbClient, OpenRgbConnector};
pub use info::{ConnectionOptions, DeviceInfo, DeviceKind, ModeInfo, ZoneInfo, ZoneKind};

use std::sync::Arc;

use crate::color::Rgb;
use crate::error::Result;

/// What a solid-color write applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    All,
    Device(u32),
    Zone(u32, u32),
}

/// One session with the device gateway.
///
/// Calls block the calling thread until the gateway has accepted the request.
///
/// # Implementation Notes
///
/// - Device and zone indices are the gateway's current enumeration order
/// - Write operations are fire-and-forget on the wire; only reads report
///   what the hardware actually did
pub trait Gateway: Send + Sync {
    /// Address of the gateway, for error messages.
    fn endpoint(&self) -> String;

    /// Enumerate every device with its zones, modes and current colors.
    ///
    /// # Errors
    ///
    /// Returns `GatewayUnavailable` if the session is lost.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Set every LED of the target to one color.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown indices, or a connection error.
    fn set_color(&self, target: ColorTarget, color: Rgb) -> Result<()>;

    /// Set the LEDs of one zone individually.
    fn set_zone_leds(&self, device: u32, zone: u32, colors: &[Rgb]) -> Result<()>;

    /// Ask the device to resize a zone and return the size it actually applied.
    ///
    /// Devices may clamp or ignore the request, so callers must compare the
    /// returned size with what they asked for.
    fn resize_zone(&self, device: u32, zone: u32, size: u32) -> Result<u32>;

    /// Switch the device into the mode that accepts pushed colors.
    fn set_direct_mode(&self, device: u32) -> Result<()>;
}

/// Opens gateway sessions.
///
/// Flashes and running effects each use their own session so their writes
/// never interleave with a request/response exchange on the primary one.
pub trait Connector: Send + Sync {
    fn endpoint(&self) -> String;

    /// Open a new session.
    ///
    /// # Errors
    ///
    /// Returns `GatewayUnavailable` if the server cannot be reached.
    fn connect(&self) -> Result<Arc<dyn Gateway>>;
}

/// Type alias for shared trait objects.
pub type SharedGateway = Arc<dyn Gateway>;
pub type SharedConnector = Arc<dyn Connector>;

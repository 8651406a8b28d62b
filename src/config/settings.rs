//! Runtime settings.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! # Example TOML
//!
//! ```toml
//! [gateway]
//! host = "192.168.1.20"
//! port = 6742
//!
//! [web]
//! bind = "0.0.0.0"
//! port = 8080
//!
//! [effects]
//! tick_ms = 33
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, RgbError};
use crate::gateway::ConnectionOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub web: WebSettings,
    pub store: StoreSettings,
    pub effects: EffectSettings,
}

/// Where the OpenRGB SDK server listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub host: String,
    pub port: u16,
    /// Name shown in OpenRGB's client list.
    pub client_name: String,
    pub connect_timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6742,
            client_name: "kvg-rgb".to_string(),
            connect_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebSettings {
    pub bind: String,
    pub port: u16,
    /// Directory served at `/` next to the API, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database file; the user data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub recent_colors_limit: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: None,
            recent_colors_limit: crate::store::DEFAULT_RECENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EffectSettings {
    pub tick_ms: u64,
    pub flash_interval_ms: u64,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            flash_interval_ms: 200,
        }
    }
}

impl EffectSettings {
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub const fn flash_interval(&self) -> Duration {
        Duration::from_millis(self.flash_interval_ms)
    }
}

impl Settings {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        trace!("Validating settings");
        if self.gateway.host.trim().is_empty() {
            return Err(RgbError::ConfigParse("gateway.host must not be empty".to_string()));
        }
        if self.gateway.port == 0 {
            return Err(RgbError::ConfigParse("gateway.port must not be 0".to_string()));
        }
        if self.gateway.connect_timeout_ms == 0 {
            return Err(RgbError::ConfigParse(
                "gateway.connect_timeout_ms must be positive".to_string(),
            ));
        }
        if !(1..=1000).contains(&self.effects.tick_ms) {
            return Err(RgbError::ConfigParse(format!(
                "effects.tick_ms must be between 1 and 1000, got {}",
                self.effects.tick_ms
            )));
        }
        if self.store.recent_colors_limit == 0 {
            return Err(RgbError::ConfigParse(
                "store.recent_colors_limit must be at least 1".to_string(),
            ));
        }
        self.web.bind.parse::<IpAddr>().map_err(|e| {
            RgbError::ConfigParse(format!("web.bind '{}' is not an IP address: {e}", self.web.bind))
        })?;
        Ok(())
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            host: self.gateway.host.clone(),
            port: self.gateway.port,
            client_name: self.gateway.client_name.clone(),
            timeout: Duration::from_millis(self.gateway.connect_timeout_ms),
        }
    }

    /// Address the web server binds to.
    pub fn web_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.web.bind.parse().map_err(|e| {
            RgbError::ConfigParse(format!("web.bind '{}' is not an IP address: {e}", self.web.bind))
        })?;
        Ok(SocketAddr::new(ip, self.web.port))
    }
}

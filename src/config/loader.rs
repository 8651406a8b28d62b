//! Settings loading from YAML or TOML files plus environment overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace, warn};

use super::path::resolve_path;
use super::settings::Settings;
use crate::error::{Result, RgbError};

pub const ENV_HOST: &str = "KVG_HOST";
pub const ENV_PORT: &str = "KVG_PORT";
pub const ENV_DB: &str = "KVG_DB";

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// `<config dir>/kvg-rgb/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kvg-rgb").join("config.toml"))
}

/// Load and validate settings from a file.
///
/// Relative `store.path` and `web.static_dir` values are resolved against
/// the file's directory.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file does not exist and `ConfigParse` if
/// the extension is unknown or the content does not parse.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let format = ConfigFormat::from_extension(path).ok_or_else(|| {
        RgbError::ConfigParse(format!(
            "Unknown config format for '{}': expected .yaml, .yml, or .toml",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RgbError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            RgbError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), ?format, "Read config file");

    let mut settings = load_settings_from_str(&content, format)?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    if let Some(db) = settings.store.path.take() {
        settings.store.path = Some(resolve_path(&db, config_dir)?);
    }
    if let Some(dir) = settings.web.static_dir.take() {
        settings.web.static_dir = Some(resolve_path(&dir, config_dir)?);
    }
    info!("Configuration loaded");
    Ok(settings)
}

/// Parse and validate settings from a string.
pub fn load_settings_from_str(content: &str, format: ConfigFormat) -> Result<Settings> {
    trace!(?format, "Parsing config content");
    let settings: Settings = match format {
        ConfigFormat::Yaml if content.trim().is_empty() => Settings::default(),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| RgbError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| RgbError::ConfigParse(format!("TOML: {e}")))?
        }
    };
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Settings for this run: the explicit file if given (it must exist),
    /// else the default file if present, else defaults. Environment
    /// overrides are applied on top.
    ///
    /// Returns the file actually read, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let (mut settings, source) = match explicit {
            Some(path) => (load_settings(path)?, Some(path.to_path_buf())),
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => (load_settings(&path)?, Some(path)),
                None => {
                    debug!("No config file; using defaults");
                    (Self::default(), None)
                }
            },
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok((settings, source))
    }

    /// Apply `KVG_HOST`, `KVG_PORT` and `KVG_DB` from `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.gateway.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(p) if p > 0 => self.gateway.port = p,
                _ => {
                    warn!(value = %port, "Rejecting {ENV_PORT}");
                    return Err(RgbError::ConfigParse(format!(
                        "{ENV_PORT} must be a port number, got '{port}'"
                    )));
                }
            }
        }
        if let Some(db) = lookup(ENV_DB).filter(|p| !p.is_empty()) {
            self.store.path = Some(PathBuf::from(db));
        }
        Ok(())
    }

    /// Serialize for `kvg-rgb config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RgbError::ConfigParse(format!("TOML: {e}")))
    }
}

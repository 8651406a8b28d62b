//! Configuration: gateway address, web server, store location and effect timing.
//!
//! Precedence, lowest first: built-in defaults, the config file, `KVG_*`
//! environment variables, command-line flags.

mod loader;
mod path;
mod settings;

pub use loader::{
    ConfigFormat, ENV_DB, ENV_HOST, ENV_PORT, default_config_path, load_settings,
    load_settings_from_str,
};
pub use path::{home_dir, resolve_path};
pub use settings::{EffectSettings, GatewaySettings, Settings, StoreSettings, WebSettings};

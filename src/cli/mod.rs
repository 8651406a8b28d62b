//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::Settings;
use crate::controller::DEFAULT_FLASH_CYCLES;
use crate::effects::EffectKind;

/// Default run time of `rainbow` and `breathe`, in seconds.
pub const DEFAULT_EFFECT_SECS: f64 = 60.0;

/// kvg-rgb - control RGB lighting through an OpenRGB SDK server.
///
/// Robot Mode: Use --robot or --format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "kvg-rgb", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "KVG_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty NO_COLOR also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, short = 'c', global = true, env = "KVG_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// OpenRGB server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// OpenRGB server port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Preference database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }

    /// Apply `--host`, `--port` and `--db` on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.gateway.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.gateway.port = port;
        }
        if let Some(db) = &self.db {
            settings.store.path = Some(db.clone());
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Discovery ===
    /// List devices known to the OpenRGB server
    List(ListArgs),

    /// List devices with their zones and stored preferences
    Zones,

    // === Lighting ===
    /// Set a static color on everything, a device, or a zone
    Color(ColorArgs),

    /// Resize a zone (addressable headers)
    Resize(ResizeArgs),

    /// Set or clear a zone's friendly name
    Rename(RenameArgs),

    /// Set a zone's brightness and saturation (0-100)
    Brightness(BrightnessArgs),

    /// Blink a zone to identify it
    Flash(FlashArgs),

    /// Run a rainbow effect for a while
    Rainbow(RainbowArgs),

    /// Run a breathing effect for a while
    Breathe(BreatheArgs),

    /// Store an effect assignment for a zone
    Effect(EffectArgs),

    /// Show recently used colors
    Recent,

    // === Device exclusion ===
    /// Exclude a device from lighting commands
    Exclude(DeviceArgs),

    /// Include a previously excluded device
    Include(DeviceArgs),

    /// List excluded devices
    Excluded,

    /// Force direct mode and re-apply stored colors
    ResetModes,

    // === Web API ===
    /// Run the local HTTP API
    Serve(ServeArgs),

    // === Utilities ===
    /// Show the effective configuration
    Config(ConfigArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show modes and LED counts
    #[arg(long, short = 'l')]
    pub long: bool,
}

/// Optional device/zone narrowing.
#[derive(Args, Debug, Clone, Copy)]
pub struct ScopeArgs {
    /// Device index
    #[arg(long, short = 'd')]
    pub device: Option<u32>,

    /// Zone index (requires --device)
    #[arg(long, short = 'z', requires = "device")]
    pub zone: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ColorArgs {
    /// Color as R G B (0-255 each) or hex (e.g. "#ff8800")
    #[arg(num_args = 1..=3, required = true, value_name = "COLOR")]
    pub color: Vec<String>,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct ResizeArgs {
    pub device: u32,
    pub zone: u32,
    /// New LED count
    pub size: u32,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    pub device: u32,
    pub zone: u32,
    /// New friendly name (omit to clear)
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct BrightnessArgs {
    pub device: u32,
    pub zone: u32,
    /// Brightness percentage (clamped to 0-100)
    #[arg(allow_negative_numbers = true)]
    pub brightness: i64,

    /// Saturation percentage (clamped to 0-100)
    #[arg(long, short = 's', allow_negative_numbers = true)]
    pub saturation: Option<i64>,
}

#[derive(Args, Debug)]
pub struct FlashArgs {
    pub device: u32,
    pub zone: u32,
    /// Number of white/off blinks
    #[arg(long, short = 'n', default_value_t = DEFAULT_FLASH_CYCLES)]
    pub cycles: u32,
}

#[derive(Args, Debug)]
pub struct RainbowArgs {
    /// Run time in seconds
    #[arg(long, short = 't', default_value_t = DEFAULT_EFFECT_SECS)]
    pub duration: f64,

    /// Speed multiplier (0-100]
    #[arg(long, short = 's', default_value_t = 1.0)]
    pub speed: f64,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct BreatheArgs {
    /// Color as R G B (0-255 each) or hex
    #[arg(num_args = 1..=3, required = true, value_name = "COLOR")]
    pub color: Vec<String>,

    /// Run time in seconds
    #[arg(long, short = 't', default_value_t = DEFAULT_EFFECT_SECS)]
    pub duration: f64,

    /// Speed multiplier (0-100]
    #[arg(long, short = 's', default_value_t = 1.0)]
    pub speed: f64,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct EffectArgs {
    pub device: u32,
    pub zone: u32,
    /// static, rainbow, breathing, wave or cycle
    pub effect: EffectKind,

    /// Speed multiplier (0-100]
    #[arg(long, short = 's')]
    pub speed: Option<f64>,

    /// Breathing color, or palette entries for wave/cycle (hex, repeatable)
    #[arg(long = "color", value_name = "HEX")]
    pub colors: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device index
    pub device: u32,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (default from config, else 127.0.0.1)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (default from config, else 5000).
    /// `--port` names the OpenRGB server port.
    #[arg(long, short = 'p')]
    pub web_port: Option<u16>,

    /// Directory of static files to serve next to the API
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path only
    #[arg(long)]
    pub path: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

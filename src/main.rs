//! kvg-rgb - control RGB lighting through an OpenRGB SDK server.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::json;

use kvg_rgb::cli::{self, Cli, Commands, ScopeArgs};
use kvg_rgb::color::Rgb;
use kvg_rgb::config::{Settings, default_config_path};
use kvg_rgb::controller::Controller;
use kvg_rgb::effects::{Effect, EffectKind, EffectRunner, EffectState, Speed};
use kvg_rgb::error::{Result, RgbError};
use kvg_rgb::gateway::{OpenRgbConnector, SharedConnector};
use kvg_rgb::logging::init_logging;
use kvg_rgb::selection::Scope;
use kvg_rgb::store::{PreferenceStore, default_db_path};
use kvg_rgb::web::{self, AppState};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    if cli.no_color || !io::stderr().is_terminal() {
        console::set_colors_enabled_stderr(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::List(args)) => cmd_list(cli, args),
        Some(Commands::Zones) => cmd_zones(cli),
        Some(Commands::Color(args)) => cmd_color(cli, args),
        Some(Commands::Resize(args)) => cmd_resize(cli, args),
        Some(Commands::Rename(args)) => cmd_rename(cli, args),
        Some(Commands::Brightness(args)) => cmd_brightness(cli, args),
        Some(Commands::Flash(args)) => cmd_flash(cli, args),
        Some(Commands::Rainbow(args)) => cmd_rainbow(cli, args),
        Some(Commands::Breathe(args)) => cmd_breathe(cli, args),
        Some(Commands::Effect(args)) => cmd_effect(cli, args),
        Some(Commands::Recent) => cmd_recent(cli),
        Some(Commands::Exclude(args)) => cmd_set_device_enabled(cli, args, false),
        Some(Commands::Include(args)) => cmd_set_device_enabled(cli, args, true),
        Some(Commands::Excluded) => cmd_excluded(cli),
        Some(Commands::ResetModes) => cmd_reset_modes(cli),
        Some(Commands::Serve(args)) => cmd_serve(cli, args),
        Some(Commands::Config(args)) => cmd_config(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start(cli);
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start(cli: &Cli) {
    let help = RobotQuickStart {
        tool: "kvg-rgb",
        version: build_info::VERSION,
        description: "RGB lighting control through an OpenRGB SDK server",
        discovery: RobotDiscovery {
            list_devices: "kvg-rgb list --robot",
            list_zones: "kvg-rgb zones --robot",
            recent_colors: "kvg-rgb recent --robot",
        },
        lighting: RobotLighting {
            set_all: "kvg-rgb color <R> <G> <B>",
            set_device: "kvg-rgb color <HEX> --device <D>",
            set_zone: "kvg-rgb color <HEX> --device <D> --zone <Z>",
            brightness: "kvg-rgb brightness <D> <Z> <0-100> [--saturation <0-100>]",
            resize: "kvg-rgb resize <D> <Z> <SIZE>",
            identify: "kvg-rgb flash <D> <Z>",
        },
        effects: RobotEffects {
            rainbow: "kvg-rgb rainbow --duration <SECS> [--speed <X>]",
            breathe: "kvg-rgb breathe <HEX> --duration <SECS>",
            assign: "kvg-rgb effect <D> <Z> <static|rainbow|breathing|wave|cycle>",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        gateway: "--host/--port or KVG_HOST/KVG_PORT (default 127.0.0.1:6742)",
        web_api: "kvg-rgb serve --web-port 5000",
    };
    output_json(cli, &help);
}

fn print_human_quick_start() {
    println!(
        "{} {} - OpenRGB lighting control\n",
        style("kvg-rgb").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  List devices", style("kvg-rgb list").green());
    println!("  {}  Zones and stored settings", style("kvg-rgb zones").green());
    println!("  {}  Color everything", style("kvg-rgb color ff0000").green());
    println!("  {}  Color one zone", style("kvg-rgb color 0 0 255 -d 0 -z 1").green());
    println!("  {}  Dim a zone", style("kvg-rgb brightness 0 1 40").green());
    println!("  {}  Identify a zone", style("kvg-rgb flash 0 1").green());
    println!("  {}  Rainbow for 30s", style("kvg-rgb rainbow -t 30").green());
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("kvg-rgb --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("kvg-rgb --robot").cyan());
    println!();

    println!("{}", style("WEB API").bold().underlined());
    println!();
    println!("  {}  Serve on 127.0.0.1:5000", style("kvg-rgb serve").cyan());
    println!();

    println!("Run {} for full help", style("kvg-rgb --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    discovery: RobotDiscovery,
    lighting: RobotLighting,
    effects: RobotEffects,
    output_modes: OutputModes,
    gateway: &'static str,
    web_api: &'static str,
}

#[derive(Serialize)]
struct RobotDiscovery {
    list_devices: &'static str,
    list_zones: &'static str,
    recent_colors: &'static str,
}

#[derive(Serialize)]
struct RobotLighting {
    set_all: &'static str,
    set_device: &'static str,
    set_zone: &'static str,
    brightness: &'static str,
    resize: &'static str,
    identify: &'static str,
}

#[derive(Serialize)]
struct RobotEffects {
    rainbow: &'static str,
    breathe: &'static str,
    assign: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Setup ===

/// Settings for this invocation: file, then environment, then flags.
fn load_settings(cli: &Cli) -> Result<(Settings, Option<PathBuf>)> {
    let (mut settings, source) = Settings::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings);
    settings.validate()?;
    Ok((settings, source))
}

fn open_controller(settings: &Settings) -> Result<Arc<Controller>> {
    let db_path = match &settings.store.path {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    let store =
        PreferenceStore::open(&db_path)?.with_recent_limit(settings.store.recent_colors_limit);
    let connector: SharedConnector =
        Arc::new(OpenRgbConnector::new(settings.connection_options()));
    let controller = Controller::new(connector, Arc::new(store))
        .with_flash_interval(settings.effects.flash_interval());
    Ok(Arc::new(controller))
}

fn controller(cli: &Cli) -> Result<(Settings, Arc<Controller>)> {
    let (settings, _) = load_settings(cli)?;
    let controller = open_controller(&settings)?;
    Ok((settings, controller))
}

fn scope(args: ScopeArgs) -> Result<Scope> {
    Scope::from_options(args.device, args.zone)
}

// === Command Implementations ===

fn cmd_list(cli: &Cli, args: &cli::ListArgs) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let devices = controller.overview(&snapshot)?;

    if cli.use_json() {
        let list: Vec<_> = devices
            .iter()
            .map(|d| {
                json!({
                    "index": d.index,
                    "name": d.name,
                    "kind": d.kind,
                    "vendor": d.vendor,
                    "led_count": d.led_count,
                    "zone_count": d.zones.len(),
                    "enabled": d.enabled,
                    "active_mode": d.active_mode,
                })
            })
            .collect();
        output_json(cli, &list);
    } else if devices.is_empty() {
        println!("{}", style("No devices reported by the OpenRGB server").yellow());
        println!("Check that OpenRGB detected your hardware");
    } else {
        for d in &devices {
            let excluded = if d.enabled {
                String::new()
            } else {
                format!(" {}", style("(excluded)").dim())
            };
            if args.long {
                println!(
                    "[{}] {} ({}, {} LEDs, {} zones, mode {}){excluded}",
                    d.index,
                    style(&d.name).green(),
                    d.kind.display_name(),
                    d.led_count,
                    d.zones.len(),
                    d.active_mode.as_deref().unwrap_or("unknown"),
                );
            } else {
                println!("[{}] {}{excluded}", d.index, d.name);
            }
        }
    }
    Ok(())
}

fn cmd_zones(cli: &Cli) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let devices = controller.overview(&snapshot)?;

    if cli.use_json() {
        output_json(cli, &devices);
        return Ok(());
    }
    for d in &devices {
        let header = format!("[{}] {}", d.index, d.name);
        if d.enabled {
            println!("{}", style(header).bold());
        } else {
            println!("{} {}", style(header).bold().dim(), style("(excluded)").dim());
        }
        if d.zones.is_empty() {
            println!("    (no zones, {} LEDs)", d.led_count);
        }
        for z in &d.zones {
            let color = z
                .color
                .map_or_else(|| "-".to_string(), Rgb::to_hex);
            let size = if z.resizable {
                format!("{} LEDs ({}-{})", z.led_count, z.led_min, z.led_max)
            } else {
                format!("{} LEDs", z.led_count)
            };
            let line = format!(
                "    {}: {:<24} {:<20} {color}  b{} s{}  {}",
                z.index, z.display_name, size, z.brightness, z.saturation, z.effect.kind()
            );
            if z.enabled {
                println!("{line}");
            } else {
                println!("{} {}", style(line).dim(), style("(disabled)").dim());
            }
        }
    }
    Ok(())
}

fn cmd_color(cli: &Cli, args: &cli::ColorArgs) -> Result<()> {
    let color = Rgb::from_args(args.color.as_slice())?;
    let scope = scope(args.scope)?;
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let report = controller.set_color(&snapshot, scope, color)?;

    if cli.use_json() {
        output_json(cli, &report);
    } else if !cli.quiet {
        let targets = report.zones.len() + report.zoneless_devices.len();
        if targets == 0 {
            println!("{}", style(format!("Nothing to color in {scope}")).yellow());
        } else {
            println!(
                "Set {} on {} ({} targets)",
                style(color.to_hex()).bold(),
                scope,
                targets
            );
        }
    }
    Ok(())
}

fn cmd_resize(cli: &Cli, args: &cli::ResizeArgs) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let report = controller.resize_zone(&snapshot, args.device, args.zone, args.size)?;

    if cli.use_json() {
        output_json(cli, &report);
    } else if !cli.quiet {
        println!(
            "Zone {}:{} resized {} -> {} LEDs",
            report.device, report.zone, report.previous, report.actual
        );
        if report.actual != report.requested {
            println!(
                "{}",
                style(format!("Device applied {} instead of {}", report.actual, report.requested))
                    .yellow()
            );
        }
    }
    Ok(())
}

fn cmd_rename(cli: &Cli, args: &cli::RenameArgs) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    snapshot.zone(args.device, args.zone)?;
    let pref = controller.rename_zone(args.device, args.zone, args.name.as_deref().unwrap_or(""))?;

    if cli.use_json() {
        output_json(cli, &pref);
    } else if !cli.quiet {
        match &pref.friendly_name {
            Some(name) => println!("Zone {}:{} is now '{name}'", args.device, args.zone),
            None => println!("Zone {}:{} name cleared", args.device, args.zone),
        }
    }
    Ok(())
}

fn cmd_brightness(cli: &Cli, args: &cli::BrightnessArgs) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let pref = controller.set_brightness_saturation(
        &snapshot,
        args.device,
        args.zone,
        Some(args.brightness),
        args.saturation,
    )?;

    if cli.use_json() {
        output_json(cli, &pref);
    } else if !cli.quiet {
        println!(
            "Zone {}:{} brightness {}%, saturation {}%",
            args.device, args.zone, pref.brightness, pref.saturation
        );
    }
    Ok(())
}

fn cmd_flash(cli: &Cli, args: &cli::FlashArgs) -> Result<()> {
    Controller::check_flash_cycles(args.cycles)?;
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    if !cli.use_json() && !cli.quiet {
        println!("Flashing zone {}:{} {} times", args.device, args.zone, args.cycles);
    }
    controller.flash(&snapshot, args.device, args.zone, args.cycles)?;

    if cli.use_json() {
        output_json(
            cli,
            &json!({ "device": args.device, "zone": args.zone, "cycles": args.cycles, "ok": true }),
        );
    }
    Ok(())
}

fn cmd_rainbow(cli: &Cli, args: &cli::RainbowArgs) -> Result<()> {
    let effect = Effect::Rainbow {
        speed: Speed::try_from(args.speed)?,
    };
    run_timed_effect(cli, scope(args.scope)?, effect, args.duration)
}

fn cmd_breathe(cli: &Cli, args: &cli::BreatheArgs) -> Result<()> {
    let effect = Effect::Breathing {
        speed: Speed::try_from(args.speed)?,
        color: Rgb::from_args(args.color.as_slice())?,
    };
    run_timed_effect(cli, scope(args.scope)?, effect, args.duration)
}

/// Run an effect in the foreground until it finishes, then restore stored colors.
fn run_timed_effect(cli: &Cli, scope: Scope, effect: Effect, secs: f64) -> Result<()> {
    if !(secs.is_finite() && secs > 0.0 && secs <= 86_400.0) {
        return Err(RgbError::Validation(format!(
            "duration must be between 0 and 86400 seconds, got {secs}"
        )));
    }
    let duration = Duration::from_secs_f64(secs);
    let (settings, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let runner = EffectRunner::new(controller).with_tick(settings.effects.tick());
    let kind = effect.kind();
    let handle = runner.start(&snapshot, scope, effect, Some(duration))?;

    let bar = effect_progress(cli, kind, duration);
    let started = Instant::now();
    while !handle.is_finished() {
        bar.set_position(started.elapsed().as_millis() as u64);
        thread::sleep(Duration::from_millis(100));
    }
    bar.finish_and_clear();

    let state = runner.wait(handle.id());
    if state == Some(EffectState::Failed) {
        return Err(RgbError::Other(
            handle
                .error()
                .unwrap_or_else(|| format!("{kind} effect failed")),
        ));
    }

    if cli.use_json() {
        if let Some(summary) = runner.summary(handle.id()) {
            output_json(cli, &summary);
        }
    } else if !cli.quiet {
        println!(
            "{} finished on {} zones after {:.1}s",
            style(kind).bold(),
            handle.zones().len(),
            started.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn effect_progress(cli: &Cli, kind: EffectKind, duration: Duration) -> ProgressBar {
    if cli.use_json() || cli.quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(duration.as_millis() as u64);
    let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {elapsed}/{duration}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(kind.to_string());
    bar
}

fn cmd_effect(cli: &Cli, args: &cli::EffectArgs) -> Result<()> {
    let colors = args
        .colors
        .iter()
        .map(|c| Rgb::from_hex(c))
        .collect::<Result<Vec<_>>>()?;
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let stored = controller.store().get_or_default(args.device, args.zone)?;
    let effect = Effect::from_parts(
        args.effect,
        args.speed,
        colors.first().copied(),
        (!colors.is_empty()).then_some(colors),
        stored.color,
    )?;
    let pref = controller.assign_effect(&snapshot, args.device, args.zone, effect)?;
    if pref.effect.is_static() && pref.enabled {
        controller.reapply_zone(args.device, args.zone)?;
    }

    if cli.use_json() {
        output_json(cli, &pref);
    } else if !cli.quiet {
        println!(
            "Zone {}:{} effect set to {}",
            args.device,
            args.zone,
            style(pref.effect.kind()).bold()
        );
        if !pref.effect.is_static() {
            println!("It runs while {} is active", style("kvg-rgb serve").cyan());
        }
    }
    Ok(())
}

fn cmd_recent(cli: &Cli) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let colors = controller.store().list_recent_colors()?;

    if cli.use_json() {
        output_json(cli, &colors);
    } else if colors.is_empty() {
        println!("No recent colors");
    } else {
        for c in &colors {
            println!(
                "{}  ({:>3}, {:>3}, {:>3})  {}",
                style(&c.hex).bold(),
                c.color.r,
                c.color.g,
                c.color.b,
                style(c.used_at.format("%Y-%m-%d %H:%M")).dim()
            );
        }
    }
    Ok(())
}

fn cmd_set_device_enabled(cli: &Cli, args: &cli::DeviceArgs, enabled: bool) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    controller.set_device_enabled(&snapshot, args.device, enabled)?;
    let name = &snapshot.device(args.device)?.name;

    if cli.use_json() {
        output_json(
            cli,
            &json!({ "device": args.device, "name": name, "enabled": enabled }),
        );
    } else if !cli.quiet {
        let verb = if enabled { "Included" } else { "Excluded" };
        println!("{verb} [{}] {name}", args.device);
    }
    Ok(())
}

fn cmd_excluded(cli: &Cli) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let names = controller.store().disabled_devices()?;

    if cli.use_json() {
        output_json(cli, &names);
    } else if names.is_empty() {
        println!("No excluded devices");
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_reset_modes(cli: &Cli) -> Result<()> {
    let (_, controller) = controller(cli)?;
    let snapshot = controller.snapshot()?;
    let devices = controller.reset_modes(&snapshot)?;

    if cli.use_json() {
        output_json(cli, &json!({ "devices_reset": devices }));
    } else if !cli.quiet {
        println!("Direct mode set on {devices} devices; stored colors re-applied");
    }
    Ok(())
}

fn cmd_serve(cli: &Cli, args: &cli::ServeArgs) -> Result<()> {
    let (mut settings, _) = load_settings(cli)?;
    if let Some(bind) = &args.bind {
        settings.web.bind.clone_from(bind);
    }
    if let Some(port) = args.web_port {
        settings.web.port = port;
    }
    let addr = settings.web_addr()?;
    let static_dir = args.static_dir.clone().or_else(|| settings.web.static_dir.clone());

    let controller = open_controller(&settings)?;
    let runner = EffectRunner::new(controller).with_tick(settings.effects.tick());
    let state = Arc::new(AppState::new(Arc::new(runner)));

    if !cli.use_json() && !cli.quiet {
        println!(
            "Serving on {} (gateway {}), Ctrl-C to stop",
            style(format!("http://{addr}")).cyan(),
            settings.connection_options().addr()
        );
    }
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(state, addr, static_dir))
}

fn cmd_config(cli: &Cli, args: &cli::ConfigArgs) -> Result<()> {
    let (settings, source) = load_settings(cli)?;
    let path = source.or_else(default_config_path);

    if args.path {
        if cli.use_json() {
            output_json(cli, &json!({ "path": path }));
        } else if let Some(path) = &path {
            println!("{}", path.display());
        }
        return Ok(());
    }

    if cli.use_json() {
        output_json(cli, &json!({ "path": path, "settings": settings }));
    } else {
        if let Some(path) = &path {
            let note = if path.exists() { "" } else { " (not present, defaults)" };
            println!("{}", style(format!("# {}{note}", path.display())).dim());
        }
        print!("{}", settings.to_toml()?);
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &json!({
                "version": build_info::VERSION,
                "git_sha": build_info::git_sha(),
                "git_dirty": build_info::git_dirty() == "true",
                "build_timestamp": build_info::build_timestamp(),
                "rustc_version": build_info::rustc_semver(),
                "target": build_info::target(),
            }),
        );
    } else {
        println!("kvg-rgb {}", build_info::VERSION);
        println!(
            "git: {}{}",
            build_info::git_sha(),
            if build_info::git_dirty() == "true" {
                " (dirty)"
            } else {
                ""
            }
        );
        println!("built: {}", build_info::build_timestamp());
        println!("rustc: {}", build_info::rustc_semver());
        println!("target: {}", build_info::target());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "kvg-rgb", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{}: failed to encode output: {e}", style("Error").red().bold()),
    }
}

fn output_error(cli: &Cli, error: &RgbError) {
    if cli.use_json() {
        let json = json!({
            "error": true,
            "kind": error.kind(),
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{json:#}");
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}

//! Tracing setup shared by the CLI and the web server.
//!
//! Logs always go to stderr so that stdout stays clean for command output.
//! `RUST_LOG` replaces the verbosity-derived filter entirely.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// One JSON object per line (robot mode).
    Json,
    /// Colored multi-field lines for an interactive terminal.
    Pretty,
    /// Compact lines without ANSI escapes (pipes, files, service managers).
    Plain,
}

impl LogStyle {
    /// Robot mode always logs JSON; otherwise pick by whether stderr is a TTY.
    pub fn detect(robot: bool) -> Self {
        Self::choose(robot, io::stderr().is_terminal())
    }

    fn choose(robot: bool, tty: bool) -> Self {
        match (robot, tty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }
}

/// Install the global subscriber.
///
/// `verbose` counts `-v` flags (0 info, 1 debug, 2+ trace); `quiet` keeps
/// errors only. A second call keeps the first subscriber, which lets tests
/// and embedders initialize freely.
pub fn init_logging(robot: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet)));
    let base = fmt::layer().with_writer(io::stderr).with_file(false).with_line_number(false);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match LogStyle::detect(robot) {
        LogStyle::Json => registry.with(base.json().with_target(true)).try_init(),
        LogStyle::Pretty => registry.with(base.with_target(false)).try_init(),
        LogStyle::Plain => registry
            .with(base.compact().with_ansi(false).with_target(false))
            .try_init(),
    };
    // Already installed.
    installed.ok();
}

/// Default filter for the given verbosity flags.
///
/// `-v` also surfaces `tower_http` request traces from `serve`.
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "kvg_rgb=error";
    }
    match verbose {
        0 => "kvg_rgb=info",
        1 => "kvg_rgb=debug,tower_http=debug",
        _ => "kvg_rgb=trace,tower_http=trace",
    }
}

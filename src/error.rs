//! Error types for kvg-rgb operations.

use thiserror::Error;

/// Primary error type for lighting control operations.
#[derive(Error, Debug)]
pub enum RgbError {
    // Gateway errors
    #[error("OpenRGB server unavailable at {addr}: {reason}")]
    GatewayUnavailable { addr: String, reason: String },

    #[error("Malformed response from OpenRGB server: {0}")]
    GatewayProtocol(String),

    // Caller errors
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Zone resize rejected: requested {requested} LEDs but device reports {actual}")]
    ResizeRejected { requested: u32, actual: u32 },

    // Persistence errors
    #[error("Preference store error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // Web server errors
    #[error("Web server failed to start on {addr}: {reason}")]
    WebServerFailed { addr: String, reason: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl RgbError {
    /// Stable machine-readable tag for this error, used in JSON payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GatewayUnavailable { .. } => "gateway_unavailable",
            Self::GatewayProtocol(_) => "gateway_protocol",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::ResizeRejected { .. } => "resize_rejected",
            Self::Storage(_) => "storage",
            Self::ConfigNotFound { .. } => "config_not_found",
            Self::ConfigParse(_) => "config_parse",
            Self::WebServerFailed { .. } => "web_server_failed",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::GatewayUnavailable { .. }
                | Self::Validation(_)
                | Self::NotFound(_)
                | Self::ResizeRejected { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns true when the gateway session should be discarded.
    pub const fn is_connection_lost(&self) -> bool {
        matches!(self, Self::GatewayUnavailable { .. } | Self::GatewayProtocol(_))
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::GatewayUnavailable { .. } => {
                Some("Start OpenRGB with the SDK server enabled, or pass --host/--port")
            }
            Self::NotFound(_) => Some("Run: kvg-rgb zones"),
            Self::ResizeRejected { .. } => Some("This zone may not support resizing"),
            Self::ConfigNotFound { .. } => Some("Check the --config path"),
            Self::Storage(_) => Some("Check permissions on the preferences database"),
            _ => None,
        }
    }

    /// Process exit code for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::ResizeRejected { .. } => 2,
            Self::NotFound(_) => 3,
            Self::GatewayUnavailable { .. } | Self::GatewayProtocol(_) => 4,
            Self::Storage(_) => 5,
            _ => 1,
        }
    }
}

impl From<rusqlite::Error> for RgbError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience type alias for Results using RgbError.
pub type Result<T> = std::result::Result<T, RgbError>;

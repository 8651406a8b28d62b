//! API request bodies and the error response.
//!
//! Color channels arrive as plain integers and are range-checked here so an
//! out-of-range value is a validation error, not a deserialization failure.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::effects::Effect;
use crate::error::{Result, RgbError};
use crate::selection::Scope;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ColorBody {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl ColorBody {
    pub fn rgb(self) -> Result<Rgb> {
        Rgb::checked(self.r, self.g, self.b)
    }
}

/// Optional device/zone narrowing shared by scope-wide requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeBody {
    pub device: Option<u32>,
    pub zone: Option<u32>,
}

impl ScopeBody {
    pub fn scope(self) -> Result<Scope> {
        Scope::from_options(self.device, self.zone)
    }
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    #[serde(flatten)]
    pub color: ColorBody,
    #[serde(flatten)]
    pub scope: ScopeBody,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoneRef {
    pub device: u32,
    pub zone: u32,
}

#[derive(Debug, Deserialize)]
pub struct ZoneColorRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    #[serde(flatten)]
    pub color: ColorBody,
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub struct ZoneEffectRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    pub effect: Effect,
}

#[derive(Debug, Deserialize)]
pub struct BrightnessRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    pub brightness: Option<i64>,
    pub saturation: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FlashRequest {
    #[serde(flatten)]
    pub zone: ZoneRef,
    pub flashes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceRef {
    pub device: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct RainbowRequest {
    pub duration: Option<f64>,
    pub speed: Option<f64>,
    #[serde(flatten)]
    pub scope: ScopeBody,
}

#[derive(Debug, Deserialize)]
pub struct BreatheRequest {
    #[serde(flatten)]
    pub color: ColorBody,
    pub duration: Option<f64>,
    pub speed: Option<f64>,
    #[serde(flatten)]
    pub scope: ScopeBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct StopRequest {
    pub id: Option<u64>,
}

/// Seconds to a `Duration`; must be finite and positive.
pub fn duration_from_secs(secs: Option<f64>) -> Result<Option<std::time::Duration>> {
    match secs {
        None => Ok(None),
        Some(s) if s.is_finite() && s > 0.0 && s <= 86_400.0 => {
            Ok(Some(std::time::Duration::from_secs_f64(s)))
        }
        Some(s) => Err(RgbError::Validation(format!(
            "duration must be between 0 and 86400 seconds, got {s}"
        ))),
    }
}

// ============================================================================
// Responses
// ============================================================================

/// `{"success": true, ...fields}`.
pub fn success(mut body: Value) -> Json<Value> {
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Json(body)
}

/// Error response: `{"success": false, "error": ..., "kind": ...}`.
#[derive(Debug)]
pub struct ApiError(pub RgbError);

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            RgbError::Validation(_) | RgbError::ResizeRejected { .. } => StatusCode::BAD_REQUEST,
            RgbError::NotFound(_) => StatusCode::NOT_FOUND,
            RgbError::GatewayUnavailable { .. } | RgbError::GatewayProtocol(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RgbError> for ApiError {
    fn from(e: RgbError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RgbError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(kind = self.0.kind(), error = %self.0, "Request failed");
        } else {
            debug!(kind = self.0.kind(), error = %self.0, "Request rejected");
        }
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult = std::result::Result<Json<Value>, ApiError>;

//! API route definitions.
//!
//! Handlers never touch the gateway or the store on the async executor:
//! every call goes through [`blocking`], which runs it on tokio's blocking pool.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{info, warn};

use super::AppState;
use super::types::*;
use crate::color::Rgb;
use crate::controller::{ColorReport, Controller, DEFAULT_FLASH_CYCLES};
use crate::effects::{Effect, EffectKind};
use crate::error::{Result, RgbError};
use crate::selection::Scope;

type AppStateHandle = Arc<AppState>;
type Body<T> = std::result::Result<Json<T>, JsonRejection>;

/// Create the API router with all endpoints.
pub fn create_router(state: AppStateHandle) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/devices", get(list_devices))
        .route("/api/color", post(set_color))
        // Zone endpoints
        .route("/api/zone/color", post(set_zone_color))
        .route("/api/zone/resize", post(resize_zone))
        .route("/api/zone/effect", post(set_zone_effect))
        .route("/api/zone/brightness", post(set_zone_brightness))
        .route("/api/zone/rename", post(rename_zone))
        .route("/api/zone/flash", post(flash_zone))
        .route("/api/zone/toggle", post(toggle_zone))
        .route("/api/device/toggle", post(toggle_device))
        .route("/api/colors/recent", get(recent_colors))
        // Effects
        .route("/api/effects", get(list_effects))
        .route("/api/effect/rainbow", post(start_rainbow))
        .route("/api/effect/breathe", post(start_breathe))
        .route("/api/effect/stop", post(stop_effect))
        .route("/api/reset-modes", post(reset_modes))
        .with_state(state)
}

/// Run blocking controller work off the async executor.
async fn blocking<T, F>(state: &AppStateHandle, f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError(RgbError::Other(format!("worker task failed: {e}"))))?
        .map_err(ApiError)
}

/// Release running effects from the scope's zones, then set the color.
fn apply_color(state: &AppState, scope: Scope, color: Rgb) -> Result<ColorReport> {
    let controller = state.controller();
    let snapshot = controller.snapshot()?;
    for key in controller.targets(&snapshot, scope)?.zones {
        state.runner.stop_zone(key.device, key.zone);
    }
    controller.set_color(&snapshot, scope, color)
}

// ============================================================================
// Status & listing
// ============================================================================

async fn status_handler(State(state): State<AppStateHandle>) -> ApiResult {
    let (connected, devices, effects) = blocking(&state, |s| {
        let (connected, devices) = match s.controller().snapshot() {
            Ok(snap) => (true, snap.devices().len()),
            Err(_) => (false, 0),
        };
        Ok((connected, devices, s.runner.running().len()))
    })
    .await?;
    Ok(success(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "gateway": state.controller().endpoint(),
        "connected": connected,
        "devices": devices,
        "running_effects": effects,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    })))
}

async fn list_devices(State(state): State<AppStateHandle>) -> ApiResult {
    let devices = blocking(&state, |s| {
        let controller = s.controller();
        let snapshot = controller.snapshot()?;
        controller.overview(&snapshot)
    })
    .await?;
    Ok(success(json!({ "devices": devices })))
}

async fn recent_colors(State(state): State<AppStateHandle>) -> ApiResult {
    let colors = blocking(&state, |s| s.controller().store().list_recent_colors()).await?;
    Ok(success(json!({ "colors": colors })))
}

// ============================================================================
// Colors
// ============================================================================

async fn set_color(State(state): State<AppStateHandle>, body: Body<ColorRequest>) -> ApiResult {
    let Json(req) = body?;
    let color = req.color.rgb()?;
    let scope = req.scope.scope()?;
    let report = blocking(&state, move |s| apply_color(s, scope, color)).await?;
    Ok(success(json!({ "result": report })))
}

async fn set_zone_color(
    State(state): State<AppStateHandle>,
    body: Body<ZoneColorRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let color = req.color.rgb()?;
    let scope = Scope::Zone(req.zone.device, req.zone.zone);
    let report = blocking(&state, move |s| apply_color(s, scope, color)).await?;
    Ok(success(json!({ "result": report })))
}

// ============================================================================
// Zone settings
// ============================================================================

async fn resize_zone(State(state): State<AppStateHandle>, body: Body<ResizeRequest>) -> ApiResult {
    let Json(req) = body?;
    let report = blocking(&state, move |s| {
        let controller = s.controller();
        let snapshot = controller.snapshot()?;
        controller.resize_zone(&snapshot, req.zone.device, req.zone.zone, req.size)
    })
    .await?;
    Ok(success(json!({
        "requested": report.requested,
        "actual": report.actual,
        "previous": report.previous,
    })))
}

async fn set_zone_effect(
    State(state): State<AppStateHandle>,
    body: Body<ZoneEffectRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let (preference, effect_id) = blocking(&state, move |s| {
        let snapshot = s.controller().snapshot()?;
        let (pref, handle) = s
            .runner
            .assign(&snapshot, req.zone.device, req.zone.zone, req.effect)?;
        Ok((pref, handle.map(|h| h.id())))
    })
    .await?;
    Ok(success(json!({ "preference": preference, "effect_id": effect_id })))
}

async fn set_zone_brightness(
    State(state): State<AppStateHandle>,
    body: Body<BrightnessRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let ZoneRef { device, zone } = req.zone;
    let pref = blocking(&state, move |s| {
        let controller = s.controller();
        let snapshot = controller.snapshot()?;
        let pref = controller.set_brightness_saturation(
            &snapshot,
            device,
            zone,
            req.brightness,
            req.saturation,
        )?;
        s.runner.set_adjustment(device, zone, pref.adjustment());
        Ok(pref)
    })
    .await?;
    Ok(success(json!({
        "brightness": pref.brightness,
        "saturation": pref.saturation,
    })))
}

async fn rename_zone(State(state): State<AppStateHandle>, body: Body<RenameRequest>) -> ApiResult {
    let Json(req) = body?;
    let pref = blocking(&state, move |s| {
        s.controller()
            .rename_zone(req.zone.device, req.zone.zone, &req.name)
    })
    .await?;
    Ok(success(json!({ "preference": pref })))
}

/// Validates the target, then flashes in the background.
async fn flash_zone(State(state): State<AppStateHandle>, body: Body<FlashRequest>) -> ApiResult {
    let Json(req) = body?;
    let ZoneRef { device, zone } = req.zone;
    let cycles = req.flashes.unwrap_or(DEFAULT_FLASH_CYCLES);
    Controller::check_flash_cycles(cycles)?;

    let snapshot = blocking(&state, move |s| {
        let snapshot = s.controller().snapshot()?;
        snapshot.zone(device, zone)?;
        Ok(snapshot)
    })
    .await?;

    let controller = Arc::clone(state.controller());
    tokio::task::spawn_blocking(move || {
        if let Err(e) = controller.flash(&snapshot, device, zone, cycles) {
            warn!(device, zone, error = %e, "Background flash failed");
        }
    });
    Ok(success(json!({ "flashing": true, "cycles": cycles })))
}

async fn toggle_zone(State(state): State<AppStateHandle>, body: Body<ZoneRef>) -> ApiResult {
    let Json(ZoneRef { device, zone }) = body?;
    let enabled = blocking(&state, move |s| {
        let snapshot = s.controller().snapshot()?;
        let enabled = s.controller().toggle_zone(&snapshot, device, zone)?;
        if !enabled {
            s.runner.stop_zone(device, zone);
        }
        Ok(enabled)
    })
    .await?;
    Ok(success(json!({ "enabled": enabled })))
}

async fn toggle_device(State(state): State<AppStateHandle>, body: Body<DeviceRef>) -> ApiResult {
    let Json(DeviceRef { device }) = body?;
    let enabled = blocking(&state, move |s| {
        let snapshot = s.controller().snapshot()?;
        let enabled = s.controller().toggle_device(&snapshot, device)?;
        if !enabled {
            for zone in &snapshot.device(device)?.zones {
                s.runner.stop_zone(device, zone.index);
            }
        }
        Ok(enabled)
    })
    .await?;
    Ok(success(json!({ "enabled": enabled })))
}

async fn reset_modes(State(state): State<AppStateHandle>) -> ApiResult {
    let devices = blocking(&state, |s| {
        let controller = s.controller();
        let snapshot = controller.snapshot()?;
        controller.reset_modes(&snapshot)
    })
    .await?;
    Ok(success(json!({ "devices": devices })))
}

// ============================================================================
// Effects
// ============================================================================

async fn list_effects(State(state): State<AppStateHandle>) -> ApiResult {
    let effects = blocking(&state, |s| Ok(s.runner.running())).await?;
    Ok(success(json!({ "effects": effects })))
}

async fn start_rainbow(
    State(state): State<AppStateHandle>,
    body: Body<RainbowRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let scope = req.scope.scope()?;
    let duration = duration_from_secs(req.duration)?;
    let effect = Effect::from_parts(EffectKind::Rainbow, req.speed, None, None, None)?;
    start_effect(&state, scope, effect, duration).await
}

async fn start_breathe(
    State(state): State<AppStateHandle>,
    body: Body<BreatheRequest>,
) -> ApiResult {
    let Json(req) = body?;
    let scope = req.scope.scope()?;
    let duration = duration_from_secs(req.duration)?;
    let color = req.color.rgb()?;
    let effect = Effect::from_parts(EffectKind::Breathing, req.speed, Some(color), None, None)?;
    start_effect(&state, scope, effect, duration).await
}

async fn start_effect(
    state: &AppStateHandle,
    scope: Scope,
    effect: Effect,
    duration: Option<std::time::Duration>,
) -> ApiResult {
    let summary = blocking(state, move |s| {
        let snapshot = s.controller().snapshot()?;
        let handle = s.runner.start(&snapshot, scope, effect, duration)?;
        s.runner
            .summary(handle.id())
            .ok_or_else(|| RgbError::Other("effect vanished after start".to_string()))
    })
    .await?;
    info!(id = summary.id, "Effect started via API");
    Ok(success(json!({ "effect": summary })))
}

/// Body is optional; without an id every effect stops.
async fn stop_effect(State(state): State<AppStateHandle>, body: Bytes) -> ApiResult {
    let req: StopRequest = if body.iter().all(u8::is_ascii_whitespace) {
        StopRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RgbError::Validation(format!("invalid request body: {e}")))?
    };
    let stopped = blocking(&state, move |s| match req.id {
        Some(id) => s.runner.stop(id).map(|_| 1),
        None => Ok(s.runner.stop_all()),
    })
    .await?;
    Ok(success(json!({ "stopped": stopped })))
}

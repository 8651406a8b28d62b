//! Axum server setup and startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use super::AppState;
use super::routes::create_router;
use crate::error::{Result, RgbError};

/// Build the full application: API routes, optional static files, CORS.
pub fn build_app(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = create_router(state);
    let router = match static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static files");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };
    router.layer(cors)
}

/// Put stored colors back and resume stored effects. Failures are logged.
async fn restore_on_startup(state: &Arc<AppState>) {
    let state = Arc::clone(state);
    let outcome = tokio::task::spawn_blocking(move || -> Result<(usize, usize)> {
        let snapshot = state.controller().snapshot()?;
        let restored = state.controller().restore_static_colors(&snapshot)?;
        let resumed = state.runner.resume_stored(&snapshot)?.len();
        Ok((restored, resumed))
    })
    .await;
    match outcome {
        Ok(Ok((restored, resumed))) => info!(restored, resumed, "Startup restore finished"),
        Ok(Err(e)) => warn!(error = %e, "Startup restore skipped"),
        Err(e) => warn!(error = %e, "Startup restore task failed"),
    }
}

/// Run the API server until Ctrl-C.
///
/// Stops every running effect before returning.
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RgbError::WebServerFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

    restore_on_startup(&state).await;

    let app = build_app(Arc::clone(&state), static_dir);
    info!(%addr, gateway = %state.controller().endpoint(), "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Could not listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            info!("API server shutting down gracefully");
        })
        .await
        .map_err(|e| RgbError::WebServerFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

    let runner = Arc::clone(&state.runner);
    let stopped = tokio::task::spawn_blocking(move || runner.stop_all())
        .await
        .unwrap_or_default();
    info!(stopped, "Effects stopped");
    Ok(())
}

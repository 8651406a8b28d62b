//! Local HTTP API.
//!
//! A thin JSON layer over [`Controller`] and [`EffectRunner`]; all hardware
//! and database work happens on the blocking pool.

mod routes;
mod server;
mod types;

pub use routes::create_router;
pub use server::{build_app, serve};
pub use types::ApiError;

use std::sync::Arc;
use std::time::Instant;

use crate::controller::Controller;
use crate::effects::EffectRunner;

/// State shared by every handler.
pub struct AppState {
    pub runner: Arc<EffectRunner>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(runner: Arc<EffectRunner>) -> Self {
        Self {
            runner,
            started_at: Instant::now(),
        }
    }

    pub fn controller(&self) -> &Arc<Controller> {
        self.runner.controller()
    }
}

//! Common test utilities for kvg-rgb.
//!
//! - `cli`: runner for the `kvg-rgb` binary with fluent assertions
//! - `env`: serialized environment variable overrides
#![allow(dead_code)]

pub mod cli;
pub mod env;

use std::sync::Arc;
use std::time::Duration;

use kvg_rgb::controller::Controller;
use kvg_rgb::effects::EffectRunner;
use kvg_rgb::gateway::SharedConnector;
use kvg_rgb::gateway::mock::{MockConnector, MockGateway};
use kvg_rgb::store::PreferenceStore;
use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A controller over the sample mock devices and the given store.
pub fn controller_with_store(
    mock: &Arc<MockGateway>,
    store: PreferenceStore,
) -> Arc<Controller> {
    let connector: SharedConnector = Arc::new(MockConnector::new(Arc::clone(mock)));
    Arc::new(
        Controller::new(connector, Arc::new(store)).with_flash_interval(Duration::from_millis(1)),
    )
}

/// A controller over the sample mock devices with an in-memory store.
pub fn mock_controller() -> (Arc<MockGateway>, Arc<Controller>) {
    let mock = Arc::new(MockGateway::sample());
    let store = PreferenceStore::in_memory().expect("in-memory store");
    let controller = controller_with_store(&mock, store);
    (mock, controller)
}

/// An effect runner with a fast tick for tests.
pub fn fast_runner(controller: Arc<Controller>) -> EffectRunner {
    EffectRunner::new(controller).with_tick(Duration::from_millis(5))
}

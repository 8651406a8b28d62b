//! Environment variable helpers for tests.
#![allow(dead_code)]

use env_lock::{EnvGuard as LockedEnvGuard, lock_env};
use tracing::{instrument, trace};

/// RAII guard to restore environment variables on drop.
pub struct EnvGuard<'a> {
    _guard: LockedEnvGuard<'a>,
}

impl<'a> EnvGuard<'a> {
    #[must_use]
    #[instrument]
    pub fn set(key: &'a str, value: &str) -> Self {
        trace!(key, value, "Setting env var");
        let guard = lock_env([(key, Some(value))]);
        Self { _guard: guard }
    }

    /// Set several variables under one lock.
    #[must_use]
    pub fn set_all(vars: &[(&'a str, Option<&str>)]) -> Self {
        trace!(count = vars.len(), "Setting env vars");
        let guard = lock_env(vars.iter().copied());
        Self { _guard: guard }
    }

    #[must_use]
    #[instrument]
    pub fn remove(key: &'a str) -> Self {
        trace!(key, "Removing env var");
        let guard = lock_env([(key, None::<&str>)]);
        Self { _guard: guard }
    }
}

/// Clear every `KVG_*` override so tests see file values only.
#[must_use]
pub fn without_kvg_env() -> EnvGuard<'static> {
    EnvGuard::set_all(&[
        ("KVG_HOST", None),
        ("KVG_PORT", None),
        ("KVG_DB", None),
        ("KVG_FORMAT", None),
        ("KVG_CONFIG", None),
    ])
}

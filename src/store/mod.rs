//! Persistent user preferences.
//!
//! Zone colors, friendly names, brightness/saturation, effect assignments,
//! enable flags and the recent-colors history, stored in one SQLite file in
//! the user's data directory.

mod db;
mod schema;

pub use db::{DEFAULT_RECENT_LIMIT, PreferenceStore, default_db_path};
pub use schema::{RecentColor, ZonePatch, ZonePreference};

//! SQLite-backed preference store.
//!
//! One connection guarded by a mutex; every public call holds the lock for
//! its whole duration and multi-statement writes run in one transaction, so
//! concurrent callers (HTTP handlers, effect threads) never interleave
//! inside a row update.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, instrument, trace, warn};

use super::schema::{RecentColor, ZonePatch, ZonePreference};
use crate::color::Rgb;
use crate::effects::Effect;
use crate::error::{Result, RgbError};

/// Default number of recent colors kept.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Ordered, additive schema migrations. Entry `i` moves `user_version`
/// from `i` to `i + 1`. Never edit or reorder an entry once released.
const MIGRATIONS: &[&str] = &[
    // 1: zone preferences and recent colors
    r"
    CREATE TABLE IF NOT EXISTS zone_preferences (
        device_index INTEGER NOT NULL,
        zone_index INTEGER NOT NULL,
        friendly_name TEXT,
        color_r INTEGER,
        color_g INTEGER,
        color_b INTEGER,
        brightness INTEGER NOT NULL DEFAULT 100,
        saturation INTEGER NOT NULL DEFAULT 100,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (device_index, zone_index)
    );

    CREATE TABLE IF NOT EXISTS recent_colors (
        r INTEGER NOT NULL,
        g INTEGER NOT NULL,
        b INTEGER NOT NULL,
        seq INTEGER NOT NULL,
        used_at TEXT NOT NULL,
        PRIMARY KEY (r, g, b)
    );
    ",
    // 2: per-zone effect assignment
    r"
    ALTER TABLE zone_preferences ADD COLUMN effect_type TEXT NOT NULL DEFAULT 'static';
    ALTER TABLE zone_preferences ADD COLUMN effect_params TEXT;
    ",
    // 3: enable flags and resized LED counts
    r"
    ALTER TABLE zone_preferences ADD COLUMN enabled INTEGER NOT NULL DEFAULT 1;
    ALTER TABLE zone_preferences ADD COLUMN led_count INTEGER;

    CREATE TABLE IF NOT EXISTS device_preferences (
        device_name TEXT PRIMARY KEY,
        enabled INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_recent_colors_seq ON recent_colors(seq);
    ",
];

const ZONE_COLUMNS: &str = "device_index, zone_index, friendly_name, color_r, color_g, color_b, \
     brightness, saturation, effect_params, enabled, led_count, updated_at";

/// Row as read from SQLite, before effect/timestamp decoding.
struct RawZoneRow {
    device_index: u32,
    zone_index: u32,
    friendly_name: Option<String>,
    color: (Option<u8>, Option<u8>, Option<u8>),
    brightness: i64,
    saturation: i64,
    effect_params: Option<String>,
    enabled: bool,
    led_count: Option<u32>,
    updated_at: String,
}

impl RawZoneRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            device_index: row.get(0)?,
            zone_index: row.get(1)?,
            friendly_name: row.get(2)?,
            color: (row.get(3)?, row.get(4)?, row.get(5)?),
            brightness: row.get(6)?,
            saturation: row.get(7)?,
            effect_params: row.get(8)?,
            enabled: row.get(9)?,
            led_count: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn decode(self) -> Result<ZonePreference> {
        let color = match self.color {
            (Some(r), Some(g), Some(b)) => Some(Rgb::new(r, g, b)),
            _ => None,
        };
        // Rows written by a newer build may carry effects this build does not know.
        let effect = match self.effect_params.as_deref() {
            None => Effect::Static,
            Some(json) => serde_json::from_str(json).unwrap_or_else(|e| {
                warn!(
                    device = self.device_index,
                    zone = self.zone_index,
                    error = %e,
                    "Ignoring unreadable effect parameters"
                );
                Effect::Static
            }),
        };
        let updated_at = parse_timestamp(&self.updated_at)?;
        Ok(ZonePreference {
            device_index: self.device_index,
            zone_index: self.zone_index,
            friendly_name: self.friendly_name,
            color,
            brightness: self.brightness.clamp(0, 100) as u8,
            saturation: self.saturation.clamp(0, 100) as u8,
            effect,
            enabled: self.enabled,
            led_count: self.led_count,
            updated_at,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RgbError::Storage(format!("invalid timestamp '{s}': {e}")))
}

/// Persistent store for zone, device and recent-color preferences.
pub struct PreferenceStore {
    conn: Mutex<Connection>,
    recent_limit: usize,
}

impl PreferenceStore {
    /// Opens or creates the store at the standard location.
    ///
    /// Location: `~/.local/share/kvg-rgb/preferences.db`
    #[instrument]
    pub fn open_default() -> Result<Self> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Opens or creates the store at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RgbError::Storage(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        debug!(path = %path.display(), "Opening preference database");
        let conn = Connection::open(path)
            .map_err(|e| RgbError::Storage(format!("failed to open database: {e}")))?;
        conn.busy_timeout(Duration::from_secs(5))?;

        let store = Self::from_connection(conn)?;
        debug!(path = %path.display(), "Preference database ready");
        Ok(store)
    }

    /// Creates an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RgbError::Storage(format!("failed to create in-memory database: {e}")))?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            recent_limit: DEFAULT_RECENT_LIMIT,
        })
    }

    /// Set the maximum recent-colors history length (at least 1).
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current schema version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn()
            .pragma_query_value(None, "user_version", |r| r.get(0))?)
    }

    // === Zone preferences ===

    /// Stored preferences for a zone, or `None` if the zone has never been touched.
    #[instrument(skip(self))]
    pub fn get(&self, device: u32, zone: u32) -> Result<Option<ZonePreference>> {
        let conn = self.conn();
        get_zone(&conn, device, zone)
    }

    /// Stored preferences, or defaults when the zone has no row.
    pub fn get_or_default(&self, device: u32, zone: u32) -> Result<ZonePreference> {
        Ok(self
            .get(device, zone)?
            .unwrap_or_else(|| ZonePreference::new(device, zone)))
    }

    /// Partially update a zone row, creating it if needed.
    ///
    /// Applying the same patch twice leaves the row unchanged.
    #[instrument(skip(self, patch))]
    pub fn upsert(&self, device: u32, zone: u32, patch: &ZonePatch) -> Result<ZonePreference> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let existing = get_zone(&tx, device, zone)?;
        let is_new = existing.is_none();
        let mut pref = existing.unwrap_or_else(|| ZonePreference::new(device, zone));
        if !pref.merge(patch) && !is_new {
            trace!(device, zone, "Upsert is a no-op");
            return Ok(pref);
        }
        pref.updated_at = Utc::now();

        let effect_params = if pref.effect.is_static() {
            None
        } else {
            Some(
                serde_json::to_string(&pref.effect)
                    .map_err(|e| RgbError::Storage(format!("failed to encode effect: {e}")))?,
            )
        };
        tx.execute(
            "INSERT INTO zone_preferences (device_index, zone_index, friendly_name,
                 color_r, color_g, color_b, brightness, saturation,
                 effect_type, effect_params, enabled, led_count, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(device_index, zone_index) DO UPDATE SET
                 friendly_name = excluded.friendly_name,
                 color_r = excluded.color_r,
                 color_g = excluded.color_g,
                 color_b = excluded.color_b,
                 brightness = excluded.brightness,
                 saturation = excluded.saturation,
                 effect_type = excluded.effect_type,
                 effect_params = excluded.effect_params,
                 enabled = excluded.enabled,
                 led_count = excluded.led_count,
                 updated_at = excluded.updated_at",
            params![
                device,
                zone,
                pref.friendly_name,
                pref.color.map(|c| c.r),
                pref.color.map(|c| c.g),
                pref.color.map(|c| c.b),
                pref.brightness,
                pref.saturation,
                pref.effect.kind().as_str(),
                effect_params,
                pref.enabled,
                pref.led_count,
                pref.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        debug!(device, zone, effect = %pref.effect.kind(), "Zone preference saved");
        Ok(pref)
    }

    /// Every stored zone row, ordered by device then zone.
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<ZonePreference>> {
        let conn = self.conn();
        query_zones(&conn, "1 = 1")
    }

    /// Zone rows with a non-static effect assigned.
    #[instrument(skip(self))]
    pub fn list_effects(&self) -> Result<Vec<ZonePreference>> {
        let conn = self.conn();
        query_zones(&conn, "effect_type <> 'static'")
    }

    // === Recent colors ===

    /// Record a color as most recently used, trimming the history.
    #[instrument(skip(self))]
    pub fn push_recent_color(&self, color: Rgb) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM recent_colors",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO recent_colors (r, g, b, seq, used_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(r, g, b) DO UPDATE SET seq = excluded.seq, used_at = excluded.used_at",
            params![color.r, color.g, color.b, seq, Utc::now().to_rfc3339()],
        )?;
        let trimmed = tx.execute(
            "DELETE FROM recent_colors WHERE seq NOT IN
                 (SELECT seq FROM recent_colors ORDER BY seq DESC LIMIT ?1)",
            params![self.recent_limit as i64],
        )?;
        tx.commit()?;
        trace!(%color, seq, trimmed, "Recent color recorded");
        Ok(())
    }

    /// Recent colors, newest first.
    #[instrument(skip(self))]
    pub fn list_recent_colors(&self) -> Result<Vec<RecentColor>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT r, g, b, used_at FROM recent_colors ORDER BY seq DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![self.recent_limit as i64], |row| {
                Ok((
                    Rgb::new(row.get(0)?, row.get(1)?, row.get(2)?),
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(color, used_at)| {
                Ok(RecentColor {
                    color,
                    hex: color.to_hex(),
                    used_at: parse_timestamp(&used_at)?,
                })
            })
            .collect()
    }

    // === Device preferences ===

    /// Whether a device (by name) is enabled. Unknown devices are enabled.
    pub fn device_enabled(&self, name: &str) -> Result<bool> {
        read_device_enabled(&self.conn(), name)
    }

    #[instrument(skip(self))]
    pub fn set_device_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        write_device_enabled(&self.conn(), name, enabled)
    }

    /// Flip a device's enabled flag and return the new value.
    ///
    /// The read and the write happen under one connection lock, so
    /// concurrent toggles never observe the same old value.
    #[instrument(skip(self))]
    pub fn toggle_device(&self, name: &str) -> Result<bool> {
        let conn = self.conn();
        let enabled = !read_device_enabled(&conn, name)?;
        write_device_enabled(&conn, name, enabled)?;
        Ok(enabled)
    }

    /// Names of devices the user has excluded.
    pub fn disabled_devices(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT device_name FROM device_preferences WHERE enabled = 0 ORDER BY device_name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

fn read_device_enabled(conn: &Connection, name: &str) -> Result<bool> {
    let enabled: Option<bool> = conn
        .query_row(
            "SELECT enabled FROM device_preferences WHERE device_name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(enabled.unwrap_or(true))
}

fn write_device_enabled(conn: &Connection, name: &str, enabled: bool) -> Result<()> {
    conn.execute(
        "INSERT INTO device_preferences (device_name, enabled, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(device_name) DO UPDATE
         SET enabled = excluded.enabled, updated_at = excluded.updated_at",
        params![name, enabled, Utc::now().to_rfc3339()],
    )?;
    debug!(name, enabled, "Device preference saved");
    Ok(())
}

fn get_zone(conn: &Connection, device: u32, zone: u32) -> Result<Option<ZonePreference>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {ZONE_COLUMNS} FROM zone_preferences
                 WHERE device_index = ?1 AND zone_index = ?2"
            ),
            params![device, zone],
            RawZoneRow::from_row,
        )
        .optional()?;
    raw.map(RawZoneRow::decode).transpose()
}

fn query_zones(conn: &Connection, filter: &str) -> Result<Vec<ZonePreference>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ZONE_COLUMNS} FROM zone_preferences
         WHERE {filter} ORDER BY device_index, zone_index"
    ))?;
    let rows = stmt
        .query_map([], RawZoneRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(RawZoneRow::decode).collect()
}

/// Bring the schema up to date. Databases from newer builds are left alone.
fn migrate(conn: &mut Connection) -> Result<()> {
    let current: i64 = conn.pragma_query_value(None, "user_version", |r| r.get(0))?;
    let target = MIGRATIONS.len() as i64;

    if current > target {
        warn!(current, known = target, "Database was written by a newer version");
        return Ok(());
    }

    for (i, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = i as i64 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| RgbError::Storage(format!("migration {version} failed: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!(version, "Applied schema migration");
    }
    Ok(())
}

/// Returns the default preference database path.
///
/// Location: `~/.local/share/kvg-rgb/preferences.db`
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        RgbError::Storage("could not determine local data directory".to_string())
    })?;
    Ok(data_dir.join("kvg-rgb").join("preferences.db"))
}

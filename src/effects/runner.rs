//! Background effect threads.
//!
//! Each started effect owns a gateway session and a thread that renders one
//! frame per tick for every zone it covers. Starting an effect on a zone that
//! another effect is driving takes that zone away from the older effect first,
//! so two effects never write the same zone. The older effect keeps animating
//! its remaining zones and is cancelled once it has none.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::{Effect, EffectKind};
use crate::color::Adjustment;
use crate::controller::Controller;
use crate::error::{Result, RgbError};
use crate::gateway::{ColorTarget, SharedGateway};
use crate::selection::{Scope, ZoneKey};
use crate::snapshot::DeviceSnapshot;
use crate::store::{PreferenceStore, ZonePreference};

/// 20 frames per second.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

pub type EffectId = u64;

/// Lifecycle of one started effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl EffectState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy)]
struct ZoneSlot {
    key: ZoneKey,
    leds: usize,
    /// Position in the original target list; keeps wave phases stable when
    /// zones are released mid-run.
    ordinal: usize,
}

/// State shared between the runner and an effect thread.
struct Control {
    state: Mutex<EffectState>,
    cancel: AtomicBool,
    /// Put stored colors back when the thread exits.
    restore: AtomicBool,
    ticks: AtomicU64,
    zones: Mutex<Vec<ZoneSlot>>,
    adjustments: Mutex<HashMap<ZoneKey, Adjustment>>,
    error: Mutex<Option<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Control {
    fn state(&self) -> EffectState {
        *lock(&self.state)
    }

    fn set_state(&self, state: EffectState) {
        *lock(&self.state) = state;
    }

    fn zone_keys(&self) -> Vec<ZoneKey> {
        lock(&self.zones).iter().map(|s| s.key).collect()
    }
}

/// Caller-side view of a started effect.
#[derive(Clone)]
pub struct EffectHandle {
    id: EffectId,
    effect: Effect,
    control: Arc<Control>,
}

impl EffectHandle {
    pub const fn id(&self) -> EffectId {
        self.id
    }

    pub const fn kind(&self) -> EffectKind {
        self.effect.kind()
    }

    pub fn state(&self) -> EffectState {
        self.control.state()
    }

    /// Frames rendered so far.
    pub fn ticks(&self) -> u64 {
        self.control.ticks.load(Ordering::SeqCst)
    }

    /// Zones the effect is still driving.
    pub fn zones(&self) -> Vec<ZoneKey> {
        self.control.zone_keys()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Message of the gateway error that ended the effect, if it failed.
    pub fn error(&self) -> Option<String> {
        lock(&self.control.error).clone()
    }
}

/// Serializable description of a started effect.
#[derive(Debug, Clone, Serialize)]
pub struct EffectSummary {
    pub id: EffectId,
    pub effect: Effect,
    pub state: EffectState,
    pub zones: Vec<ZoneKey>,
    pub ticks: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct ActiveEffect {
    handle: EffectHandle,
    started_at: DateTime<Utc>,
    duration: Option<Duration>,
    thread: Option<JoinHandle<()>>,
}

impl ActiveEffect {
    fn summary(&self) -> EffectSummary {
        EffectSummary {
            id: self.handle.id,
            effect: self.handle.effect.clone(),
            state: self.handle.state(),
            zones: self.handle.zones(),
            ticks: self.handle.ticks(),
            started_at: self.started_at,
            duration_secs: self.duration.map(|d| d.as_secs_f64()),
            error: self.handle.error(),
        }
    }

    /// Signal the thread and wait for it to exit.
    fn cancel_and_join(&mut self, restore: bool) {
        self.handle.control.restore.store(restore, Ordering::SeqCst);
        self.handle.control.cancel.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            if thread.join().is_err() {
                error!(id = self.handle.id, "Effect thread panicked");
                self.handle.control.set_state(EffectState::Failed);
            }
        }
    }
}

/// Starts, tracks and stops effect threads.
pub struct EffectRunner {
    controller: Arc<Controller>,
    tick: Duration,
    next_id: AtomicU64,
    effects: Mutex<Vec<ActiveEffect>>,
}

impl EffectRunner {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            tick: DEFAULT_TICK,
            next_id: AtomicU64::new(1),
            effects: Mutex::new(Vec::new()),
        }
    }

    /// Frame interval; clamped to at least one millisecond.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    pub const fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    /// Start `effect` on the zones of `scope`, optionally for a fixed time.
    ///
    /// Excluded devices and disabled zones are handled as in
    /// [`Controller::set_color`]. Devices without zones are skipped.
    #[instrument(skip(self, snapshot))]
    pub fn start(
        &self,
        snapshot: &DeviceSnapshot,
        scope: Scope,
        effect: Effect,
        duration: Option<Duration>,
    ) -> Result<EffectHandle> {
        if effect.is_static() {
            return Err(RgbError::Validation(
                "static is not an animated effect; set a color instead".to_string(),
            ));
        }
        if duration.is_some_and(|d| d.is_zero()) {
            return Err(RgbError::Validation("duration must be positive".to_string()));
        }

        let targets = self.controller.targets(snapshot, scope)?;
        if targets.zones.is_empty() {
            return Err(RgbError::Validation(format!(
                "no enabled zones to run {} on in {scope}",
                effect.kind()
            )));
        }
        let keys: BTreeSet<ZoneKey> = targets.zones.iter().copied().collect();

        let store = Arc::clone(self.controller.store());
        let mut slots = Vec::with_capacity(keys.len());
        let mut adjustments = HashMap::with_capacity(keys.len());
        for (ordinal, key) in keys.iter().enumerate() {
            let (_, zone) = snapshot.zone(key.device, key.zone)?;
            slots.push(ZoneSlot {
                key: *key,
                leds: zone.led_count as usize,
                ordinal,
            });
            adjustments.insert(*key, store.get_or_default(key.device, key.zone)?.adjustment());
        }

        let mut effects = lock(&self.effects);
        release_zones(&mut effects, &keys);

        let gateway = self.controller.connector().connect()?;
        let devices: BTreeSet<u32> = keys.iter().map(|k| k.device).collect();
        for device in devices {
            gateway.set_direct_mode(device)?;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let control = Arc::new(Control {
            state: Mutex::new(EffectState::Idle),
            cancel: AtomicBool::new(false),
            restore: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            zones: Mutex::new(slots),
            adjustments: Mutex::new(adjustments),
            error: Mutex::new(None),
        });
        let handle = EffectHandle {
            id,
            effect: effect.clone(),
            control: Arc::clone(&control),
        };

        let ticker = Ticker {
            id,
            effect,
            duration,
            tick: self.tick,
            gateway,
            store,
            control,
        };
        let thread = thread::Builder::new()
            .name(format!("effect-{id}"))
            .spawn(move || ticker.run())?;

        info!(id, kind = %handle.kind(), zones = keys.len(), ?duration, "Effect started");
        effects.push(ActiveEffect {
            handle: handle.clone(),
            started_at: Utc::now(),
            duration,
            thread: Some(thread),
        });
        Ok(handle)
    }

    /// Stop one effect and put the stored colors back on its zones.
    pub fn stop(&self, id: EffectId) -> Result<EffectSummary> {
        let mut effects = lock(&self.effects);
        let pos = effects
            .iter()
            .position(|a| a.handle.id == id)
            .ok_or_else(|| RgbError::NotFound(format!("effect {id}")))?;
        let mut active = effects.remove(pos);
        active.cancel_and_join(true);
        info!(id, "Effect stopped");
        Ok(active.summary())
    }

    /// Release one zone from whatever effect drives it. The effect keeps
    /// running on its other zones and stops once it has none left.
    ///
    /// Returns true if a running effect covered the zone.
    pub fn stop_zone(&self, device: u32, zone: u32) -> bool {
        let key = ZoneKey::new(device, zone);
        let released = release_zones(&mut lock(&self.effects), &BTreeSet::from([key]));
        if released {
            debug!(%key, "Zone released from effect");
        }
        released
    }

    /// Stop every effect, restoring stored colors. Returns how many were running.
    pub fn stop_all(&self) -> usize {
        let mut effects = lock(&self.effects);
        let mut stopped = 0;
        for active in effects.iter_mut() {
            if !active.handle.is_finished() {
                stopped += 1;
            }
            active.cancel_and_join(true);
        }
        effects.clear();
        if stopped > 0 {
            info!(count = stopped, "All effects stopped");
        }
        stopped
    }

    /// Summaries of effects that have not finished. Finished threads are reaped.
    pub fn running(&self) -> Vec<EffectSummary> {
        let mut effects = lock(&self.effects);
        for active in effects.iter_mut().filter(|a| a.handle.is_finished()) {
            if let Some(thread) = active.thread.take() {
                let _ = thread.join();
            }
        }
        effects.retain(|a| !a.handle.is_finished());
        effects.iter().map(ActiveEffect::summary).collect()
    }

    /// Summary of one tracked effect, finished or not.
    pub fn summary(&self, id: EffectId) -> Option<EffectSummary> {
        lock(&self.effects)
            .iter()
            .find(|a| a.handle.id == id)
            .map(ActiveEffect::summary)
    }

    /// Block until an effect's thread exits. Unknown ids return immediately.
    pub fn wait(&self, id: EffectId) -> Option<EffectState> {
        let thread = {
            let mut effects = lock(&self.effects);
            effects
                .iter_mut()
                .find(|a| a.handle.id == id)
                .and_then(|a| a.thread.take())
        };
        if let Some(thread) = thread {
            let _ = thread.join();
        }
        let effects = lock(&self.effects);
        effects
            .iter()
            .find(|a| a.handle.id == id)
            .map(|a| a.handle.state())
    }

    /// Push new brightness/saturation to any effect driving the zone.
    pub fn set_adjustment(&self, device: u32, zone: u32, adjustment: Adjustment) {
        let key = ZoneKey::new(device, zone);
        for active in lock(&self.effects).iter() {
            if let Some(adj) = lock(&active.handle.control.adjustments).get_mut(&key) {
                *adj = adjustment;
            }
        }
    }

    /// Persist a zone's effect and make the hardware follow it.
    ///
    /// `Static` releases the zone and re-applies its stored color; anything
    /// else starts the effect on that zone alone.
    #[instrument(skip(self, snapshot))]
    pub fn assign(
        &self,
        snapshot: &DeviceSnapshot,
        device: u32,
        zone: u32,
        effect: Effect,
    ) -> Result<(ZonePreference, Option<EffectHandle>)> {
        let pref = self
            .controller
            .assign_effect(snapshot, device, zone, effect.clone())?;
        if effect.is_static() {
            self.stop_zone(device, zone);
            if pref.enabled {
                self.controller.reapply_zone(device, zone)?;
            }
            return Ok((pref, None));
        }
        let handle = self.start(snapshot, Scope::Zone(device, zone), effect, None)?;
        Ok((pref, Some(handle)))
    }

    /// Start every persisted non-static effect on zones that still exist.
    /// Zones that fail to start are logged and skipped.
    #[instrument(skip(self, snapshot))]
    pub fn resume_stored(&self, snapshot: &DeviceSnapshot) -> Result<Vec<EffectHandle>> {
        let mut started = Vec::new();
        for pref in self.controller.store().list_effects()? {
            let (device, zone) = (pref.device_index, pref.zone_index);
            if !pref.enabled || snapshot.zone(device, zone).is_err() {
                continue;
            }
            match self.start(snapshot, Scope::Zone(device, zone), pref.effect, None) {
                Ok(handle) => started.push(handle),
                Err(e) => warn!(device, zone, error = %e, "Could not resume stored effect"),
            }
        }
        if !started.is_empty() {
            info!(count = started.len(), "Stored effects resumed");
        }
        Ok(started)
    }
}

/// Take `keys` away from every tracked effect. An effect left without zones
/// is cancelled without restoring colors; finished effects are dropped.
///
/// Returns true if any effect was driving one of the keys.
fn release_zones(effects: &mut Vec<ActiveEffect>, keys: &BTreeSet<ZoneKey>) -> bool {
    let mut released = false;
    for active in effects.iter_mut() {
        let now_empty = {
            // Waits for an in-flight frame, so released zones are never written again.
            let mut zones = lock(&active.handle.control.zones);
            let before = zones.len();
            zones.retain(|s| !keys.contains(&s.key));
            if zones.len() == before {
                continue;
            }
            released = true;
            zones.is_empty()
        };
        if now_empty {
            debug!(id = active.handle.id, "Effect lost its last zone");
            active.cancel_and_join(false);
        }
    }
    effects.retain(|a| !a.handle.is_finished());
    released
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        let effects = self
            .effects
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for active in effects.iter_mut() {
            active.cancel_and_join(false);
        }
    }
}

/// Everything an effect thread needs.
struct Ticker {
    id: EffectId,
    effect: Effect,
    duration: Option<Duration>,
    tick: Duration,
    gateway: SharedGateway,
    store: Arc<PreferenceStore>,
    control: Arc<Control>,
}

impl Ticker {
    fn run(self) {
        self.control.set_state(EffectState::Running);
        let started = Instant::now();

        let outcome = loop {
            if self.control.cancel.load(Ordering::SeqCst) {
                break EffectState::Cancelled;
            }
            let frame_start = Instant::now();
            let elapsed = started.elapsed();
            if self.duration.is_some_and(|d| elapsed >= d) {
                self.control.restore.store(true, Ordering::SeqCst);
                break EffectState::Completed;
            }
            if let Err(e) = self.render(elapsed) {
                error!(id = self.id, error = %e, "Effect failed");
                *lock(&self.control.error) = Some(e.to_string());
                break EffectState::Failed;
            }
            self.control.ticks.fetch_add(1, Ordering::SeqCst);
            thread::park_timeout(self.tick.saturating_sub(frame_start.elapsed()));
        };

        if outcome != EffectState::Failed && self.control.restore.load(Ordering::SeqCst) {
            self.restore();
        }
        self.control.set_state(outcome);
        debug!(id = self.id, state = ?outcome, "Effect thread exiting");
    }

    /// One frame for every zone. Holds the zone list so a released zone is
    /// never written after `stop_zone` returns.
    fn render(&self, elapsed: Duration) -> Result<()> {
        let zones = lock(&self.control.zones);
        let adjustments = lock(&self.control.adjustments).clone();
        for slot in zones.iter() {
            let frame = self.effect.frame(elapsed, slot.ordinal, slot.leds);
            let adjustment = adjustments
                .get(&slot.key)
                .copied()
                .unwrap_or(Adjustment::IDENTITY);
            Controller::dispatch_frame(self.gateway.as_ref(), slot.key, &frame, adjustment)?;
        }
        Ok(())
    }

    /// Best effort: stored static colors back on the zones this effect held.
    fn restore(&self) {
        for key in self.control.zone_keys() {
            let color = match self.store.get(key.device, key.zone) {
                Ok(pref) => pref.and_then(|p| p.scaled_color()),
                Err(e) => {
                    warn!(%key, error = %e, "Could not read stored color");
                    None
                }
            };
            if let Some(color) = color {
                if let Err(e) = self
                    .gateway
                    .set_color(ColorTarget::Zone(key.device, key.zone), color)
                {
                    warn!(%key, error = %e, "Could not restore zone color");
                    return;
                }
            }
        }
    }
}

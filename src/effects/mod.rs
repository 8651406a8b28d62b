//! Animated lighting effects.
//!
//! [`Effect`] describes what to render; [`EffectRunner`] renders it on a
//! background thread per running effect, each with its own gateway session.

mod kind;
mod runner;

pub use kind::{Effect, EffectKind, Palette, Speed};
pub use runner::{DEFAULT_TICK, EffectHandle, EffectId, EffectRunner, EffectState, EffectSummary};

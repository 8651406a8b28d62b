//! Effect definitions and per-frame color computation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{Hsv, Rgb};
use crate::error::{Result, RgbError};

/// Effect speed multiplier. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    pub const NORMAL: Self = Self(1.0);
    const MAX: f64 = 100.0;

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for Speed {
    type Error = RgbError;

    fn try_from(v: f64) -> Result<Self> {
        if v.is_finite() && v > 0.0 && v <= Self::MAX {
            Ok(Self(v))
        } else {
            Err(RgbError::Validation(format!(
                "speed must be greater than 0 and at most {}, got {v}",
                Self::MAX
            )))
        }
    }
}

impl From<Speed> for f64 {
    fn from(s: Speed) -> Self {
        s.0
    }
}

/// Non-empty list of colors for wave and cycle effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette(Vec<Rgb>);

impl Palette {
    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(vec![Rgb::RED, Rgb::GREEN, Rgb::BLUE])
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = RgbError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(RgbError::Validation(
                "color list must contain at least one color".to_string(),
            ));
        }
        Ok(Self(colors))
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(p: Palette) -> Self {
        p.0
    }
}

/// Name of an effect, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Static,
    Rainbow,
    Breathing,
    Wave,
    Cycle,
}

impl EffectKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rainbow => "rainbow",
            Self::Breathing => "breathing",
            Self::Wave => "wave",
            Self::Cycle => "cycle",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EffectKind {
    type Err = RgbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "none" => Ok(Self::Static),
            "rainbow" => Ok(Self::Rainbow),
            "breathing" | "breathe" => Ok(Self::Breathing),
            "wave" => Ok(Self::Wave),
            "cycle" => Ok(Self::Cycle),
            other => Err(RgbError::Validation(format!(
                "unknown effect '{other}' (expected static, rainbow, breathing, wave or cycle)"
            ))),
        }
    }
}

/// A lighting effect with exactly the parameters its kind needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Effect {
    /// Hold the zone's stored color.
    #[default]
    Static,
    /// Rotate the hue at `speed` x 60 degrees per second.
    Rainbow {
        #[serde(default)]
        speed: Speed,
    },
    /// Pulse `color` with value `|sin(t x speed)|`.
    Breathing {
        #[serde(default)]
        speed: Speed,
        color: Rgb,
    },
    /// Scroll the palette along the zone's LEDs.
    Wave {
        #[serde(default)]
        speed: Speed,
        #[serde(default)]
        colors: Palette,
    },
    /// Step through the palette, one color every `2 / speed` seconds.
    Cycle {
        #[serde(default)]
        speed: Speed,
        #[serde(default)]
        colors: Palette,
    },
}

impl Effect {
    /// Build an effect from loosely typed request fields, validating them.
    ///
    /// `fallback_color` is used by breathing when no color is given.
    pub fn from_parts(
        kind: EffectKind,
        speed: Option<f64>,
        color: Option<Rgb>,
        colors: Option<Vec<Rgb>>,
        fallback_color: Option<Rgb>,
    ) -> Result<Self> {
        let speed = speed.map_or(Ok(Speed::NORMAL), Speed::try_from)?;
        let palette = colors.map_or_else(|| Ok(Palette::default()), Palette::try_from)?;
        Ok(match kind {
            EffectKind::Static => Self::Static,
            EffectKind::Rainbow => Self::Rainbow { speed },
            EffectKind::Breathing => Self::Breathing {
                speed,
                color: color.or(fallback_color).unwrap_or(Rgb::WHITE),
            },
            EffectKind::Wave => Self::Wave {
                speed,
                colors: palette,
            },
            EffectKind::Cycle => Self::Cycle {
                speed,
                colors: palette,
            },
        })
    }

    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Static => EffectKind::Static,
            Self::Rainbow { .. } => EffectKind::Rainbow,
            Self::Breathing { .. } => EffectKind::Breathing,
            Self::Wave { .. } => EffectKind::Wave,
            Self::Cycle { .. } => EffectKind::Cycle,
        }
    }

    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static)
    }

    /// Colors for one zone `elapsed` into the effect.
    ///
    /// `ordinal` is the zone's position in the effect's target list and
    /// offsets the wave phase so neighbouring zones do not move in lockstep.
    pub fn frame(&self, elapsed: Duration, ordinal: usize, leds: usize) -> Vec<Rgb> {
        let t = elapsed.as_secs_f64();
        match self {
            Self::Static => Vec::new(),
            Self::Rainbow { speed } => {
                let hue = (t * speed.get() * 60.0).rem_euclid(360.0);
                vec![Hsv::new(hue, 1.0, 1.0).to_rgb(); leds]
            }
            Self::Breathing { speed, color } => {
                let level = (t * speed.get()).sin().abs();
                let hsv = color.to_hsv();
                vec![Hsv::new(hsv.h, hsv.s, hsv.v * level).to_rgb(); leds]
            }
            Self::Wave { speed, colors } => {
                let colors = colors.colors();
                let n = colors.len();
                let base = t * speed.get() / 2.0 + ordinal as f64 / 12.0;
                (0..leds)
                    .map(|i| {
                        let phase = (base + i as f64 / leds.max(1) as f64).rem_euclid(1.0);
                        let pos = phase * n as f64;
                        let idx = (pos.floor() as usize) % n;
                        colors[idx].lerp(colors[(idx + 1) % n], pos.fract())
                    })
                    .collect()
            }
            Self::Cycle { speed, colors } => {
                let colors = colors.colors();
                let step = (t * speed.get() / 2.0).floor() as usize % colors.len();
                vec![colors[step]; leds]
            }
        }
    }
}

//! Color model: RGB/HSV conversion and brightness/saturation scaling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RgbError};

/// An 8-bit RGB color as pushed to the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        let bytes = hex::decode(digits)
            .map_err(|e| RgbError::Validation(format!("invalid hex color '{s}': {e}")))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(RgbError::Validation(format!(
                "invalid hex color '{s}': expected 6 hex digits (e.g. ff0000)"
            ))),
        }
    }

    /// Parse CLI color arguments: either three 0-255 components or one hex string.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [hex] => Self::from_hex(hex.as_ref()),
            [r, g, b] => Ok(Self::new(
                parse_component("red", r.as_ref())?,
                parse_component("green", g.as_ref())?,
                parse_component("blue", b.as_ref())?,
            )),
            _ => Err(RgbError::Validation(format!(
                "expected R G B or a hex color, got {} values",
                args.len()
            ))),
        }
    }

    /// Build from wider integers (HTTP payloads), rejecting anything outside 0-255.
    pub fn checked(r: i64, g: i64, b: i64) -> Result<Self> {
        let channel = |name: &str, v: i64| {
            u8::try_from(v)
                .map_err(|_| RgbError::Validation(format!("{name} must be 0-255, got {v}")))
        };
        Ok(Self::new(channel("r", r)?, channel("g", g)?, channel("b", b)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    pub fn to_hsv(self) -> Hsv {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv { h, s, v: max }
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RgbError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        Self::from_args(&parts)
    }
}

fn parse_component(name: &str, s: &str) -> Result<u8> {
    s.trim()
        .parse::<u8>()
        .map_err(|_| RgbError::Validation(format!("{name} component must be 0-255, got '{s}'")))
}

/// HSV with hue in degrees `[0, 360)` and saturation/value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let c = self.v * self.s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = self.v - c;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

/// Per-zone brightness and saturation, both percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub brightness: u8,
    pub saturation: u8,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Adjustment {
    pub const IDENTITY: Self = Self {
        brightness: 100,
        saturation: 100,
    };

    /// Clamp both values into `[0, 100]`.
    pub fn clamped(brightness: i64, saturation: i64) -> Self {
        Self {
            brightness: brightness.clamp(0, 100) as u8,
            saturation: saturation.clamp(0, 100) as u8,
        }
    }

    pub const fn is_identity(self) -> bool {
        self.brightness >= 100 && self.saturation >= 100
    }

    /// Scale value by brightness and saturation by saturation in HSV space.
    pub fn apply(self, color: Rgb) -> Rgb {
        if self.is_identity() {
            return color;
        }
        let hsv = color.to_hsv();
        Hsv::new(
            hsv.h,
            hsv.s * f64::from(self.saturation.min(100)) / 100.0,
            hsv.v * f64::from(self.brightness.min(100)) / 100.0,
        )
        .to_rgb()
    }
}

//! sRGB color and the display-encoding helpers used during advection.
//!
//! `Srgb` parses and formats `#rrggbb` hex strings and serializes as one.
//! The channel helpers implement the cheap gamma approximation the advector
//! blends through: decoding squares the normalized channel value, encoding
//! takes the square root. The pair round-trips every 8-bit value exactly,
//! which keeps repeated advection passes from drifting dark.

use crate::error::DriftError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip quantizes to
/// 8 bits, which is the native precision of the raster anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Parses a hex color like `"#58b368"` or `"58b368"` (case insensitive).
    ///
    /// Returns `DriftError::InvalidColor` for anything but 6 hex digits.
    pub fn from_hex(hex: &str) -> Result<Srgb, DriftError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return Err(DriftError::InvalidColor(format!(
                "expected 6 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| DriftError::InvalidColor(e.to_string()))
        };
        Ok(Srgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Formats the color as `"#rrggbb"`, quantizing to 8 bits with rounding.
    pub fn to_hex(self) -> String {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    /// The color as an opaque RGBA8 pixel.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Decodes a display-encoded channel byte to a linear intensity in [0, 1].
///
/// Gamma-2 approximation: normalize, then square.
pub fn channel_to_linear(c: u8) -> f64 {
    let n = c as f64 / 255.0;
    n * n
}

/// Encodes a linear intensity back to a display channel byte.
///
/// Inverse of [`channel_to_linear`]: square root, scale, round.
pub fn linear_to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0).sqrt() * 255.0).round() as u8
}

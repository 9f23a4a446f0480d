//! Color handling for jersey patterns.
//!
//! Maps a scalar in [0, 1] through a piecewise color ramp, then applies the
//! optional halftone screen and the saturation blend. Colors are linear
//! floats in [0, 1]; `#RRGGBB` strings are parsed only at the boundary.
//!
//! # Example
//!
//! ```
//! use jersey_color::{ColorStop, Rgb, map_to_color};
//!
//! let stops = [
//!     ColorStop::new(0.5, "#000080".parse::<Rgb>().unwrap()),
//!     ColorStop::new(1.0, Rgb::WHITE),
//! ];
//! assert_eq!(map_to_color(0.0, &stops), stops[0].color);
//! assert_eq!(map_to_color(1.0, &stops), Rgb::WHITE);
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod gradient;
mod halftone;

pub use gradient::*;
pub use halftone::*;

/// Rec. 601 luma weights.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Errors from parsing `#RRGGBB` color strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    /// The string did not contain exactly six hex digits.
    #[error("expected 6 hex digits, got {0}")]
    InvalidLength(usize),
    /// A character outside `0-9a-fA-F`.
    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

/// An RGB color with float channels.
///
/// Channels are nominally in [0, 1]. Oversaturation may push them outside
/// that range; quantizing consumers clamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Creates a color from float channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a gray with all channels equal to `v`.
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses `#RRGGBB` (the leading `#` is optional, digits are
    /// case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, HexError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HexError::InvalidDigit(c));
        }
        if digits.len() != 6 {
            return Err(HexError::InvalidLength(digits.len()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| HexError::InvalidDigit('?'))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Quantizes to 8-bit channels, clamping to [0, 1] first.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Formats as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Returns the channels as an array.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear interpolation. Exact at `t = 0` and `t = 1`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let s = 1.0 - t;
        Rgb::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    /// Perceived brightness using [`LUMA_WEIGHTS`].
    #[inline]
    pub fn luminance(self) -> f32 {
        LUMA_WEIGHTS[0] * self.r + LUMA_WEIGHTS[1] * self.g + LUMA_WEIGHTS[2] * self.b
    }

    /// Returns true if every channel is finite.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl FromStr for Rgb {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = HexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Blends between the grayscale version of `color` and `color`.
///
/// 0 is fully desaturated, 1 leaves the color unchanged, values above 1
/// extrapolate away from gray and are not clamped. Negative amounts are
/// treated as 0 and NaN as 1.
pub fn saturate(color: Rgb, amount: f32) -> Rgb {
    let amount = if amount.is_nan() { 1.0 } else { amount.max(0.0) };
    if amount == 1.0 {
        return color;
    }
    let gray = Rgb::gray(color.luminance());
    gray.lerp(color, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Rgb::from_hex("#FF8000").unwrap();
        assert_eq!(c.to_rgb8(), [255, 128, 0]);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_from_hex_case_insensitive() {
        assert_eq!(Rgb::from_hex("#da291c"), Rgb::from_hex("#DA291C"));
        assert_eq!(Rgb::from_hex("DA291C"), Rgb::from_hex("#DA291C"));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Rgb::from_hex("#FFF"), Err(HexError::InvalidLength(3)));
        assert_eq!(Rgb::from_hex("#FF00FF00"), Err(HexError::InvalidLength(8)));
        assert_eq!(Rgb::from_hex("#GG0000"), Err(HexError::InvalidDigit('G')));
        assert_eq!(Rgb::from_hex(""), Err(HexError::InvalidLength(0)));
        assert!(Rgb::from_hex("#ÿÿ0000").is_err());
    }

    #[test]
    fn test_hex_roundtrip_format() {
        let c: Rgb = "#5b4e8e".parse().unwrap();
        assert_eq!(c.to_hex(), "#5B4E8E");
        assert_eq!(c.to_string(), "#5B4E8E");
    }

    #[test]
    fn test_lerp_exact_endpoints() {
        let a = Rgb::new(0.1, 0.7, 0.3);
        let b = Rgb::new(0.9, 0.2, 0.6);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_luminance_weights() {
        assert!((Rgb::WHITE.luminance() - 1.0).abs() < 1e-6);
        assert!((Rgb::new(1.0, 0.0, 0.0).luminance() - 0.299).abs() < 1e-6);
    }

    #[test]
    fn test_saturation_zero_is_gray() {
        let c = Rgb::from_hex("#DA291C").unwrap();
        let g = saturate(c, 0.0);
        assert_eq!(g.r, g.g);
        assert_eq!(g.g, g.b);
        assert!((g.r - c.luminance()).abs() < 1e-6);
    }

    #[test]
    fn test_saturation_one_is_identity() {
        let c = Rgb::from_hex("#1D5BA4").unwrap();
        assert_eq!(saturate(c, 1.0), c);
        assert_eq!(saturate(c, f32::NAN), c);
    }

    #[test]
    fn test_oversaturation_not_clamped() {
        let c = Rgb::new(0.9, 0.1, 0.1);
        let over = saturate(c, 2.0);
        assert!(over.r > 1.0, "oversaturation should extrapolate, got {}", over.r);
        assert!(over.g < 0.0);
    }

    #[test]
    fn test_negative_saturation_clamped() {
        let c = Rgb::new(0.9, 0.1, 0.1);
        assert_eq!(saturate(c, -1.0), saturate(c, 0.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_hex_string() {
        let c = Rgb::from_hex("#0A1A3E").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#0A1A3E\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), "#0A1A3E");
        assert!(serde_json::from_str::<Rgb>("\"#0A1A\"").is_err());
    }
}

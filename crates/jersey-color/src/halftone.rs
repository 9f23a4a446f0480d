use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Dot cells per unit of halftone scale.
const CELL_DENSITY: f32 = 2.5;

/// Width of the anti-aliased dot edge.
const EDGE: f32 = 0.02;

/// Dot-screen layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HalftonePattern {
    /// No screen; colors pass through untouched.
    #[default]
    None,
    /// Square dots on a square grid.
    Square,
    /// Round dots on a hexagonal lattice.
    Hexagonal,
    /// Round dots on a square grid.
    Radial,
}

impl HalftonePattern {
    /// All patterns in index order.
    pub const ALL: [HalftonePattern; 4] = [
        HalftonePattern::None,
        HalftonePattern::Square,
        HalftonePattern::Hexagonal,
        HalftonePattern::Radial,
    ];

    /// Numeric code used in stored parameters (0 = None).
    pub fn index(self) -> u8 {
        match self {
            HalftonePattern::None => 0,
            HalftonePattern::Square => 1,
            HalftonePattern::Hexagonal => 2,
            HalftonePattern::Radial => 3,
        }
    }

    /// Looks up a pattern by its numeric code.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Halftone stylization settings.
///
/// Dots grow with the field value, and inside a dot the base color is pulled
/// toward white by `0.2 + 0.3 * t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Halftone {
    /// Dot layout.
    pub pattern: HalftonePattern,
    /// Screen frequency; higher means smaller, denser cells.
    pub scale: f32,
}

impl Default for Halftone {
    fn default() -> Self {
        Self {
            pattern: HalftonePattern::None,
            scale: 50.0,
        }
    }
}

impl Halftone {
    /// Creates halftone settings.
    pub fn new(pattern: HalftonePattern, scale: f32) -> Self {
        Self { pattern, scale }
    }

    /// Returns true when the screen has any effect.
    pub fn is_enabled(&self) -> bool {
        self.pattern != HalftonePattern::None && self.scale.is_finite()
    }

    /// Dot coverage at `uv` for field value `t`, in [0, 1].
    pub fn mask(&self, uv: Vec2, t: f32) -> f32 {
        if !self.is_enabled() {
            return 0.0;
        }

        let st = uv * self.scale * CELL_DENSITY;
        let d = match self.pattern {
            HalftonePattern::None => return 0.0,
            HalftonePattern::Square => {
                let c = fract(st) - 0.5;
                c.x.abs().max(c.y.abs()) * 2.0
            }
            HalftonePattern::Hexagonal => hex_distance(st) * 2.0,
            HalftonePattern::Radial => (fract(st) - 0.5).length() * 2.0,
        };

        let r = t.clamp(0.0, 1.0) * 0.4 + 0.05;
        1.0 - smoothstep(r - EDGE, r, d)
    }

    /// Applies the screen to `color`.
    pub fn apply(&self, color: Rgb, uv: Vec2, t: f32) -> Rgb {
        if !self.is_enabled() || self.mask(uv, t) <= 0.5 {
            return color;
        }
        color.lerp(Rgb::WHITE, t.clamp(0.0, 1.0) * 0.3 + 0.2)
    }
}

#[inline]
fn fract(v: Vec2) -> Vec2 {
    v - v.floor()
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Distance to the nearest center of a unit-spaced hexagonal lattice.
fn hex_distance(st: Vec2) -> f32 {
    let cell = Vec2::new(1.0, 3.0f32.sqrt());
    let half = cell * 0.5;
    let wrap = |v: Vec2| v - cell * (v / cell).floor();
    let a = wrap(st) - half;
    let b = wrap(st - half) - half;
    a.length().min(b.length())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(halftone: &Halftone, t: f32) -> usize {
        let n = 64;
        (0..n * n)
            .filter(|k| {
                let uv = Vec2::new(
                    (k % n) as f32 / n as f32 * 0.37,
                    (k / n) as f32 / n as f32 * 0.37,
                );
                halftone.mask(uv, t) > 0.5
            })
            .count()
    }

    #[test]
    fn test_none_passthrough() {
        let halftone = Halftone::new(HalftonePattern::None, 50.0);
        let color = Rgb::new(0.2, 0.4, 0.6);
        for i in 0..10 {
            let uv = Vec2::splat(i as f32 * 0.1);
            assert_eq!(halftone.apply(color, uv, 0.9), color);
            assert_eq!(halftone.mask(uv, 0.9), 0.0);
        }
    }

    #[test]
    fn test_non_finite_scale_disabled() {
        let halftone = Halftone::new(HalftonePattern::Radial, f32::NAN);
        assert!(!halftone.is_enabled());
        assert_eq!(halftone.mask(Vec2::splat(0.3), 0.5), 0.0);
    }

    #[test]
    fn test_dot_center_covered() {
        // Cell centers sit at (k + 0.5) / (scale * density)
        let halftone = Halftone::new(HalftonePattern::Radial, 4.0);
        let center = Vec2::splat(0.5 / (4.0 * CELL_DENSITY));
        assert!(halftone.mask(center, 0.5) > 0.99);
        let corner = Vec2::ZERO;
        assert!(halftone.mask(corner, 0.5) < 0.01);
    }

    #[test]
    fn test_higher_values_grow_dots() {
        for pattern in [
            HalftonePattern::Square,
            HalftonePattern::Hexagonal,
            HalftonePattern::Radial,
        ] {
            let halftone = Halftone::new(pattern, 20.0);
            let low = coverage(&halftone, 0.1);
            let high = coverage(&halftone, 0.9);
            assert!(high > low, "{:?}: {} <= {}", pattern, high, low);
        }
    }

    #[test]
    fn test_square_covers_more_than_round() {
        let square = coverage(&Halftone::new(HalftonePattern::Square, 20.0), 0.8);
        let round = coverage(&Halftone::new(HalftonePattern::Radial, 20.0), 0.8);
        assert!(square > round);
    }

    #[test]
    fn test_apply_lightens_inside_dots() {
        let halftone = Halftone::new(HalftonePattern::Radial, 4.0);
        let center = Vec2::splat(0.5 / (4.0 * CELL_DENSITY));
        let color = Rgb::new(0.1, 0.1, 0.3);
        let lit = halftone.apply(color, center, 0.5);
        assert!(lit.luminance() > color.luminance());
        let expected = color.lerp(Rgb::WHITE, 0.35);
        assert!((lit.r - expected.r).abs() < 1e-6);
    }

    #[test]
    fn test_pattern_index_roundtrip() {
        for pattern in HalftonePattern::ALL {
            assert_eq!(HalftonePattern::from_index(pattern.index()), Some(pattern));
        }
        assert_eq!(HalftonePattern::from_index(4), None);
    }
}

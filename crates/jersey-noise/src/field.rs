use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Fbm, Field, quintic};

/// Horizontal stretch applied when mapping UV into noise space.
pub const ASPECT: f32 = 1.5;

/// Frequency of the final fBm lookup relative to the warped domain.
pub const FIELD_SCALE: f32 = 0.8;

/// Magnitude of the dither offset added to the remapped value.
pub const DITHER_AMPLITUDE: f32 = 1.0 / 255.0;

/// Largest accepted warp strength magnitude.
pub const WARP_STRENGTH_MAX: f32 = 8.0;

const WARP_OFFSET_COARSE: Vec2 = Vec2::new(5.2, 1.3);
const WARP_OFFSET_FINE: Vec2 = Vec2::new(3.7, 2.9);

/// The full scalar field behind a jersey pattern.
///
/// Sampling takes UV coordinates in [0, 1] and returns a value in [0, 1]:
///
/// 1. UV is mapped to `[-1.5, 1.5] x [-1, 1]`.
/// 2. The point is displaced by a coarse (3-octave) and a fine (2-octave)
///    warp, scaled by `warp_strength`.
/// 3. The configured fBm is evaluated at the warped point.
/// 4. The result is remapped with `t = quintic(clamp(raw * 0.5 + 0.5))`.
/// 5. A coordinate hash adds up to half a quantization step of dither.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseField {
    /// Octave settings shared by the warp and the final lookup.
    pub fbm: Fbm,
    /// Domain warp displacement. Zero disables warping.
    pub warp_strength: f32,
    /// Whether to add the anti-banding dither offset.
    pub dither: bool,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(Fbm::default())
    }
}

impl NoiseField {
    /// Creates an unwarped, dithered field from an fBm.
    pub fn new(fbm: Fbm) -> Self {
        Self {
            fbm,
            warp_strength: 0.0,
            dither: true,
        }
    }

    /// Sets the warp strength.
    pub fn with_warp_strength(mut self, warp_strength: f32) -> Self {
        self.warp_strength = warp_strength;
        self
    }

    /// Enables or disables dithering.
    pub fn with_dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// Maps UV in [0, 1] to the noise domain.
    #[inline]
    pub fn domain(uv: Vec2) -> Vec2 {
        let mut p = uv * 2.0 - 1.0;
        p.x *= ASPECT;
        p
    }

    fn sanitized_warp(&self) -> f32 {
        if self.warp_strength.is_nan() {
            0.0
        } else {
            self.warp_strength
                .clamp(-WARP_STRENGTH_MAX, WARP_STRENGTH_MAX)
        }
    }

    /// Displaces a domain point by the two warp layers.
    ///
    /// Returns `p` unchanged when the warp strength is zero.
    pub fn warp(&self, p: Vec2) -> Vec2 {
        let strength = self.sanitized_warp();
        if strength == 0.0 {
            return p;
        }

        let coarse = self.fbm.with_layers(3);
        let q = p * 0.5;
        let warp1 = Vec2::new(coarse.sample(q), coarse.sample(q + WARP_OFFSET_COARSE))
            * strength
            * 0.5;

        let fine = self.fbm.with_layers(2);
        let r = (p + warp1) * 1.2;
        let warp2 =
            Vec2::new(fine.sample(r), fine.sample(r + WARP_OFFSET_FINE)) * strength * 0.3;

        p + warp1 + warp2
    }

    /// Evaluates the warped fBm at a domain point, before remapping.
    pub fn raw(&self, p: Vec2) -> f32 {
        self.fbm.sample(self.warp(p) * FIELD_SCALE)
    }

    /// Evaluates the field at UV coordinates, returning a value in [0, 1].
    pub fn value(&self, uv: Vec2) -> f32 {
        let raw = self.raw(Self::domain(uv));
        let mut t = remap(raw);
        if self.dither {
            t += dither_offset(uv * 1000.0) * DITHER_AMPLITUDE;
        }
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
    }
}

impl Field<Vec2, f32> for NoiseField {
    fn sample(&self, input: Vec2) -> f32 {
        self.value(input)
    }
}

/// Remaps a raw fBm value from roughly [-1, 1] to [0, 1] with quintic contrast.
#[inline]
pub fn remap(raw: f32) -> f32 {
    quintic((raw * 0.5 + 0.5).clamp(0.0, 1.0))
}

#[inline]
fn hash(p: Vec2, k: Vec2) -> f32 {
    let x = p.dot(k).sin() * 43758.5453;
    x - x.floor()
}

/// Deterministic per-coordinate offset in [-0.5, 0.5].
///
/// Averages two sine hashes, which skews the distribution toward zero.
pub fn dither_offset(p: Vec2) -> f32 {
    let a = hash(p, Vec2::new(12.9898, 78.233));
    let b = hash(p, Vec2::new(93.9898, 67.345));
    (a + b) * 0.5 - 0.5
}

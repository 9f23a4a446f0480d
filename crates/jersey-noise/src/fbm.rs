use glam::{Mat2, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::simplex2v;

/// Upper bound on octaves; extra layers are ignored.
pub const MAX_LAYERS: i32 = 8;

/// Rotation in radians added per octave to decorrelate orientations.
pub const OCTAVE_ROTATION: f32 = 0.5;

/// Smallest accepted lacunarity.
pub const LACUNARITY_MIN: f32 = 0.01;

/// Largest accepted lacunarity.
pub const LACUNARITY_MAX: f32 = 8.0;

/// Largest accepted gain.
///
/// Gain above 1 weights fine octaves more heavily than coarse ones. The sum
/// is normalised by the total octave amplitude, so the field stays bounded
/// by `amplitude` regardless.
pub const GAIN_MAX: f32 = 4.0;

/// Largest accepted overall amplitude.
pub const AMPLITUDE_MAX: f32 = 4.0;

/// Fractal Brownian motion over 2D simplex noise.
///
/// Each octave is rotated by `i * OCTAVE_ROTATION`, scaled in frequency by
/// `lacunarity^i` and in weight by `gain^i`. The weighted sum is divided by
/// the total weight and then multiplied by `amplitude`, so adding layers adds
/// detail without changing the overall strength of the field.
///
/// Out-of-range settings are clamped on every sample rather than rejected;
/// see [`Fbm::sanitized`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fbm {
    /// Overall field strength applied after normalisation (0-4).
    pub amplitude: f32,
    /// Number of octaves. Zero or negative yields a flat field.
    pub layers: i32,
    /// Frequency multiplier per octave (typically 0.7-4.0).
    pub lacunarity: f32,
    /// Amplitude multiplier per octave, a.k.a. persistence (typically 0.1-0.95).
    pub gain: f32,
}

impl Default for Fbm {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            layers: 4,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl Fbm {
    /// Creates an fBm with the given octave count and default shaping.
    pub fn new(layers: i32) -> Self {
        Self {
            layers,
            ..Default::default()
        }
    }

    /// Sets the overall amplitude.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Sets the octave count.
    pub fn with_layers(mut self, layers: i32) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the per-octave frequency multiplier.
    pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    /// Sets the per-octave amplitude multiplier.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Returns a copy with every setting pulled into its valid range.
    ///
    /// - `layers` is clamped to `0..=MAX_LAYERS`.
    /// - `lacunarity` is clamped to `[LACUNARITY_MIN, LACUNARITY_MAX]`; NaN
    ///   falls back to 2.0.
    /// - `gain` is clamped to `[0, GAIN_MAX]`; NaN falls back to 0.5.
    /// - `amplitude` is clamped to `[0, AMPLITUDE_MAX]`; NaN becomes 0.
    pub fn sanitized(&self) -> Self {
        let lacunarity = if self.lacunarity.is_nan() {
            2.0
        } else {
            self.lacunarity.clamp(LACUNARITY_MIN, LACUNARITY_MAX)
        };
        let gain = if self.gain.is_nan() {
            0.5
        } else {
            self.gain.clamp(0.0, GAIN_MAX)
        };
        let amplitude = if self.amplitude.is_nan() {
            0.0
        } else {
            self.amplitude.clamp(0.0, AMPLITUDE_MAX)
        };

        Self {
            amplitude,
            layers: self.layers.clamp(0, MAX_LAYERS),
            lacunarity,
            gain,
        }
    }

    /// Samples the field at `p`.
    ///
    /// Returns a value in `[-amplitude, amplitude]`.
    pub fn sample(&self, p: Vec2) -> f32 {
        let s = self.sanitized();
        if s.layers == 0 {
            return 0.0;
        }

        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total_amplitude = 0.0;

        for i in 0..s.layers {
            let rotated = Mat2::from_angle(i as f32 * OCTAVE_ROTATION) * p;
            value += amplitude * simplex2v(rotated * frequency);
            total_amplitude += amplitude;

            frequency *= s.lacunarity;
            amplitude *= s.gain;
        }

        // The first octave always contributes weight 1.
        (value / total_amplitude) * s.amplitude
    }
}

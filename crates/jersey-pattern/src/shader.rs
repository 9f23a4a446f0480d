//! The per-pixel pipeline: field value, color ramp, halftone, saturation.

use glam::Vec2;
use jersey_color::{Gradient, Halftone, Rgb, saturate};
use jersey_noise::{Field, NoiseField};

use crate::NoiseParameters;

/// Resolved per-pixel pipeline for one parameter set.
///
/// Built once per render so the hot loop does not re-sort stops or
/// re-sanitize settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternShader {
    /// Scalar field producing `t`.
    pub field: NoiseField,
    /// Ramp with stops already sorted.
    pub gradient: Gradient,
    /// Dot screen applied after the ramp.
    pub halftone: Halftone,
    /// Final saturation blend amount.
    pub saturation: f32,
}

impl PatternShader {
    /// Resolves the pipeline for `params`.
    pub fn new(params: &NoiseParameters) -> Self {
        Self {
            field: params.noise_field(),
            gradient: params.gradient(),
            halftone: params.halftone(),
            saturation: params.saturation,
        }
    }

    /// Disables the dither offset, for exact comparisons.
    pub fn without_dither(mut self) -> Self {
        self.field = self.field.with_dither(false);
        self
    }

    /// Final color at `uv` in [0, 1]^2.
    pub fn shade(&self, uv: Vec2) -> Rgb {
        let t = self.field.value(uv);
        let color = self.gradient.sample(t);
        let color = self.halftone.apply(color, uv, t);
        saturate(color, self.saturation)
    }
}

impl Field<Vec2, Rgb> for PatternShader {
    fn sample(&self, uv: Vec2) -> Rgb {
        self.shade(uv)
    }
}

/// Shades a single pixel. Prefer [`PatternShader`] when shading many.
pub fn shade(uv: Vec2, params: &NoiseParameters) -> Rgb {
    PatternShader::new(params).shade(uv)
}

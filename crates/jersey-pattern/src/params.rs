use jersey_color::{ColorStop, Gradient, Halftone, HalftonePattern, Rgb};
use jersey_noise::{Fbm, NoiseField};
use serde::{Deserialize, Serialize};

use crate::{Palette, ParamsError};

/// Parameters for one visualization.
///
/// A value is built once per player or per edit and is read-only while a
/// render uses it; edits produce a new value. Serializes with camelCase keys,
/// colors as `#RRGGBB` and the halftone pattern as its numeric code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseParameters {
    /// Overall field strength (0-4).
    pub amplitude: f32,
    /// 0 = grayscale, 1 = unchanged, above 1 oversaturates (0-2).
    pub saturation: f32,
    /// fBm octave count (1-8).
    pub layers: i32,
    /// Per-octave frequency multiplier.
    pub lacunarity: f32,
    /// Per-octave amplitude multiplier.
    pub gain: f32,
    /// Domain warp displacement; 0 disables warping.
    pub warp_strength: f32,
    /// Dot-screen layout.
    #[serde(with = "pattern_code")]
    pub halftone_pattern: HalftonePattern,
    /// Dot-screen frequency.
    pub halftone_scale: f32,
    /// Ordered color ramp.
    pub color_stops: Vec<ColorStop>,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            saturation: 1.0,
            layers: 4,
            lacunarity: 2.0,
            gain: 0.5,
            warp_strength: 0.3,
            halftone_pattern: HalftonePattern::None,
            halftone_scale: 50.0,
            color_stops: vec![
                ColorStop::new(0.25, Rgb::from_rgb8(0x5B, 0x4E, 0x8E)),
                ColorStop::new(0.50, Rgb::from_rgb8(0x0A, 0x1A, 0x3E)),
                ColorStop::new(0.75, Rgb::from_rgb8(0x7B, 0x9F, 0xC4)),
                ColorStop::new(1.00, Rgb::from_rgb8(0xB8, 0x61, 0x4D)),
            ],
        }
    }
}

/// Two-stop ramp used when a career yields no usable colors.
pub fn fallback_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, Rgb::from_rgb8(0x5B, 0x4E, 0x8E)),
        ColorStop::new(1.0, Rgb::from_rgb8(0xB8, 0x61, 0x4D)),
    ]
}

impl NoiseParameters {
    /// Default shaping with the given stops.
    pub fn with_stops(stops: Vec<ColorStop>) -> Self {
        Self {
            color_stops: stops,
            ..Default::default()
        }
    }

    /// The stronger, more warped look used for player archives.
    ///
    /// An empty stop list is replaced by [`fallback_stops`].
    pub fn archive(stops: Vec<ColorStop>) -> Self {
        let color_stops = if stops.is_empty() {
            fallback_stops()
        } else {
            stops
        };
        Self {
            amplitude: 2.0,
            saturation: 1.0,
            layers: 4,
            lacunarity: 2.3,
            gain: 0.65,
            warp_strength: 1.0,
            halftone_pattern: HalftonePattern::None,
            halftone_scale: 50.0,
            color_stops,
        }
    }

    /// Replaces the color stops with those derived from a palette.
    pub fn with_palette(mut self, palette: &Palette) -> Self {
        self.color_stops = palette.color_stops();
        self
    }

    /// Sets the halftone screen.
    pub fn with_halftone(mut self, pattern: HalftonePattern, scale: f32) -> Self {
        self.halftone_pattern = pattern;
        self.halftone_scale = scale;
        self
    }

    /// Recovers the editable palette from the stored stops.
    pub fn palette(&self) -> Palette {
        Palette::from_stops(&self.color_stops)
    }

    /// The fBm described by these parameters.
    pub fn fbm(&self) -> Fbm {
        Fbm {
            amplitude: self.amplitude,
            layers: self.layers,
            lacunarity: self.lacunarity,
            gain: self.gain,
        }
    }

    /// The warped scalar field described by these parameters.
    pub fn noise_field(&self) -> NoiseField {
        NoiseField::new(self.fbm()).with_warp_strength(self.warp_strength)
    }

    /// The color ramp, with stops sorted by position.
    pub fn gradient(&self) -> Gradient {
        Gradient::new(self.color_stops.clone())
    }

    /// The halftone screen.
    pub fn halftone(&self) -> Halftone {
        Halftone::new(self.halftone_pattern, self.halftone_scale)
    }

    /// Checks the invariants the renderer relies on.
    ///
    /// Numeric settings are clamped during evaluation and never fail here.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.color_stops.is_empty() {
            return Err(ParamsError::NoStops);
        }
        Ok(())
    }

    /// Parses parameters from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod pattern_code {
    use jersey_color::HalftonePattern;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(pattern: &HalftonePattern, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(pattern.index())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<HalftonePattern, D::Error> {
        let code = u8::deserialize(d)?;
        HalftonePattern::from_index(code)
            .ok_or_else(|| D::Error::custom(crate::ParamsError::UnknownPattern(code)))
    }
}

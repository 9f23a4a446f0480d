//! Parameters and per-pixel pipeline for career jersey patterns.
//!
//! A player's career (clubs, kit colors, share of years) becomes an ordered
//! list of color stops. Together with the fBm and halftone settings these form
//! a [`NoiseParameters`] value, which is all the renderer needs.
//!
//! - [`evaluate_field`] turns a coordinate into a scalar in [0, 1].
//! - [`map_to_color`] turns that scalar into a color.
//! - [`PatternShader`] chains both with the halftone and saturation passes.
//!
//! Editing happens on a [`Palette`]; a rejected edit leaves it unchanged.
//! [`ParamsCell`] publishes whole parameter snapshots to renderers.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use jersey_pattern::{Club, NoiseParameters, PatternShader, derive_color_stops};
//!
//! let clubs = [
//!     Club::new("Kyoto Purple Sanga", "#6B2F8E", 3.0, 40.0),
//!     Club::new("Manchester United", "#DA291C", 7.0, 60.0),
//! ];
//! let params = NoiseParameters::archive(derive_color_stops(&clubs).unwrap());
//! let color = PatternShader::new(&params).shade(Vec2::new(0.5, 0.5));
//! assert!(color.is_finite());
//! ```

use glam::Vec2;

mod career;
mod error;
mod palette;
mod params;
mod shader;
mod snapshot;

pub use career::{Club, PlayerRow, TeamColorRecord, cumulative_positions, derive_color_stops};
pub use error::ParamsError;
pub use palette::{MAX_STOPS, MIN_STOPS, NEW_STOP_PROPORTION, Palette, PaletteEntry};
pub use params::{NoiseParameters, fallback_stops};
pub use shader::{PatternShader, shade};
pub use snapshot::{ParamsCell, Snapshot};

pub use jersey_color::{ColorStop, HalftonePattern, Rgb, map_to_color};

/// Scalar field value in [0, 1] at `(x, y)` in UV space.
///
/// Pure and deterministic; out-of-range settings are clamped rather than
/// rejected, and the result is always finite.
pub fn evaluate_field(x: f32, y: f32, params: &NoiseParameters) -> f32 {
    params.noise_field().value(Vec2::new(x, y))
}

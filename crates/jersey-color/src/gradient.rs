#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// One anchor of a color ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorStop {
    /// Position along the ramp in [0, 1].
    pub position: f32,
    /// Color at this position.
    pub color: Rgb,
}

impl ColorStop {
    /// Creates a stop.
    pub const fn new(position: f32, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// How colors blend within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Interpolation {
    /// Straight linear blend.
    Linear,
    /// Hermite smoothstep, eases in and out of each stop.
    #[default]
    Smooth,
}

impl Interpolation {
    #[inline]
    fn shape(self, blend: f32) -> f32 {
        match self {
            Interpolation::Linear => blend,
            Interpolation::Smooth => blend * blend * (3.0 - 2.0 * blend),
        }
    }
}

/// An ordered piecewise color ramp.
///
/// Construction sorts stops by position, so lookups can assume order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gradient {
    stops: Vec<ColorStop>,
    /// Blend curve applied to every segment.
    pub interpolation: Interpolation,
}

impl Gradient {
    /// Creates a gradient, clamping positions to [0, 1] and sorting them.
    ///
    /// The sort is stable, so stops sharing a position keep their order.
    /// NaN positions are treated as 0.
    pub fn new(stops: Vec<ColorStop>) -> Self {
        let mut stops: Vec<ColorStop> = stops
            .into_iter()
            .map(|s| {
                let position = if s.position.is_nan() {
                    0.0
                } else {
                    s.position.clamp(0.0, 1.0)
                };
                ColorStop::new(position, s.color)
            })
            .collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self {
            stops,
            interpolation: Interpolation::default(),
        }
    }

    /// Sets the blend curve.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Returns the sorted stops.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Samples the ramp at `t`.
    pub fn sample(&self, t: f32) -> Rgb {
        sample_stops(&self.stops, t, self.interpolation)
    }
}

/// Maps `t` through sorted `stops` with smoothstep blending.
///
/// See [`sample_stops`] for the exact rules.
pub fn map_to_color(t: f32, stops: &[ColorStop]) -> Rgb {
    sample_stops(stops, t, Interpolation::Smooth)
}

/// Maps `t` through sorted `stops`.
///
/// - `t` is clamped to [0, 1] (NaN is treated as 0).
/// - A single stop yields its color everywhere.
/// - Before the first stop or after the last, the boundary color is used.
/// - Zero-width segments are skipped.
/// - An empty slice yields black; callers must supply at least one stop.
pub fn sample_stops(stops: &[ColorStop], t: f32, interpolation: Interpolation) -> Rgb {
    let (first, last) = match stops {
        [] => return Rgb::BLACK,
        [only] => return only.color,
        [first, .., last] => (first, last),
    };

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t <= first.position {
        return first.color;
    }
    if t >= last.position {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let width = b.position - a.position;
        if width <= 0.0 {
            continue;
        }
        if t >= a.position && t <= b.position {
            let blend = interpolation.shape((t - a.position) / width);
            return a.color.lerp(b.color, blend);
        }
    }

    last.color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Rgb {
        Rgb::from_hex(s).unwrap()
    }

    fn close(a: Rgb, b: Rgb, eps: f32) -> bool {
        (a.r - b.r).abs() < eps && (a.g - b.g).abs() < eps && (a.b - b.b).abs() < eps
    }

    fn park_ji_sung() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.09, hex("#000080")),
            ColorStop::new(0.24, hex("#6B2F8E")),
            ColorStop::new(0.36, hex("#ED1C24")),
            ColorStop::new(0.81, hex("#DA291C")),
            ColorStop::new(1.00, hex("#1D5BA4")),
        ]
    }

    #[test]
    fn test_single_stop_everywhere() {
        let stop = ColorStop::new(0.4, hex("#6B2F8E"));
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert_eq!(map_to_color(t, &[stop]), stop.color);
        }
    }

    #[test]
    fn test_empty_is_black() {
        assert_eq!(map_to_color(0.5, &[]), Rgb::BLACK);
    }

    #[test]
    fn test_clamps_outside_stops() {
        let stops = park_ji_sung();
        assert_eq!(map_to_color(0.0, &stops), stops[0].color);
        assert_eq!(map_to_color(0.05, &stops), stops[0].color);
        assert_eq!(map_to_color(-4.0, &stops), stops[0].color);
        assert_eq!(map_to_color(7.0, &stops), stops[4].color);
        assert_eq!(map_to_color(f32::NAN, &stops), stops[0].color);
    }

    #[test]
    fn test_hits_stop_colors() {
        let stops = park_ji_sung();
        for stop in &stops {
            assert!(close(map_to_color(stop.position, &stops), stop.color, 1e-6));
        }
    }

    #[test]
    fn test_continuous_at_interior_stops() {
        let stops = park_ji_sung();
        for interpolation in [Interpolation::Linear, Interpolation::Smooth] {
            for stop in &stops[1..stops.len() - 1] {
                let eps = 1e-4;
                let below = sample_stops(&stops, stop.position - eps, interpolation);
                let above = sample_stops(&stops, stop.position + eps, interpolation);
                assert!(
                    close(below, stop.color, 0.01),
                    "{:?} below {}",
                    interpolation,
                    stop.position
                );
                assert!(
                    close(above, stop.color, 0.01),
                    "{:?} above {}",
                    interpolation,
                    stop.position
                );
            }
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let stops = [
            ColorStop::new(0.0, Rgb::BLACK),
            ColorStop::new(1.0, Rgb::WHITE),
        ];
        let mid = sample_stops(&stops, 0.5, Interpolation::Linear);
        assert!(close(mid, Rgb::gray(0.5), 1e-6));
        let quarter_linear = sample_stops(&stops, 0.25, Interpolation::Linear);
        let quarter_smooth = sample_stops(&stops, 0.25, Interpolation::Smooth);
        assert!(quarter_smooth.r < quarter_linear.r, "smoothstep eases in");
    }

    #[test]
    fn test_zero_width_segment_skipped() {
        let stops = [
            ColorStop::new(0.0, Rgb::BLACK),
            ColorStop::new(0.5, Rgb::new(1.0, 0.0, 0.0)),
            ColorStop::new(0.5, Rgb::new(0.0, 1.0, 0.0)),
            ColorStop::new(1.0, Rgb::WHITE),
        ];
        for i in 0..=100 {
            let c = map_to_color(i as f32 / 100.0, &stops);
            assert!(c.is_finite(), "zero-width segment produced {:?}", c);
        }
        // Just past the shared position, the second stop at 0.5 leads
        let after = map_to_color(0.5001, &stops);
        assert!(close(after, Rgb::new(0.0, 1.0, 0.0), 0.01));
    }

    #[test]
    fn test_gradient_sorts_and_clamps() {
        let g = Gradient::new(vec![
            ColorStop::new(1.4, Rgb::WHITE),
            ColorStop::new(0.2, Rgb::BLACK),
            ColorStop::new(f32::NAN, Rgb::new(1.0, 0.0, 0.0)),
        ]);
        let positions: Vec<f32> = g.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.2, 1.0]);
        assert_eq!(g.sample(1.0), Rgb::WHITE);
    }

    #[test]
    fn test_gradient_interpolation_choice() {
        let g = Gradient::new(vec![
            ColorStop::new(0.0, Rgb::BLACK),
            ColorStop::new(1.0, Rgb::WHITE),
        ])
        .with_interpolation(Interpolation::Linear);
        assert!(close(g.sample(0.25), Rgb::gray(0.25), 1e-6));
    }
}

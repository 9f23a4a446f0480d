//! Coherent noise for jersey patterns.
//!
//! The pattern engine needs a single scalar field per visualization: a
//! simplex primitive layered into rotated fractal Brownian motion, fed
//! through two rounds of domain warping and remapped to [0, 1].
//!
//! Everything here is a pure function of its inputs. There is no RNG state,
//! so the same coordinate always produces the same value and every sample
//! can be computed independently (one per pixel or fragment).
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use jersey_noise::{Fbm, Field, NoiseField};
//!
//! let field = NoiseField::new(Fbm::new(4).with_amplitude(0.5)).with_warp_strength(0.3);
//! let t = field.sample(Vec2::new(0.25, 0.75));
//! assert!((0.0..=1.0).contains(&t));
//! ```

use glam::Vec2;

mod fbm;
mod field;

pub use fbm::*;
pub use field::*;

/// A function that can be sampled over a domain.
///
/// Implementations must be pure: sampling the same input twice yields the
/// same output, with no shared mutable state between samples.
pub trait Field<I, O> {
    /// Samples the field at `input`.
    fn sample(&self, input: I) -> O;
}

/// Permutation table for gradient selection.
/// Classic permutation from Ken Perlin's reference implementation.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

#[inline]
fn perm(x: i32) -> u8 {
    PERM[(x & 255) as usize]
}

#[inline]
fn grad2(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 7;
    let u = if h < 4 { x } else { y };
    let v = if h < 4 { y } else { x };
    (if h & 1 != 0 { -u } else { u }) + (if h & 2 != 0 { -2.0 * v } else { 2.0 * v })
}

// Skew factors for the 2D simplex grid
const F2: f32 = 0.5 * (1.732_050_8 - 1.0); // (sqrt(3) - 1) / 2
const G2: f32 = (3.0 - 1.732_050_8) / 6.0; // (3 - sqrt(3)) / 6

/// Radial falloff contribution of one simplex corner.
#[inline]
fn corner(hash: u8, x: f32, y: f32) -> f32 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * grad2(hash, x, y)
    }
}

/// 2D simplex noise.
///
/// Returns a value in [-1, 1]. Integer lattice corners map to zero, so
/// sample at non-integer coordinates when checking for variation.
/// Non-finite input returns 0.
pub fn simplex2(x: f32, y: f32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }

    let s = (x + y) * F2;
    let fi = (x + s).floor();
    let fj = (y + s).floor();

    let t = (fi + fj) * G2;
    let x0 = x - (fi - t);
    let y0 = y - (fj - t);

    let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

    let x1 = x0 - i1 as f32 + G2;
    let y1 = y0 - j1 as f32 + G2;
    let x2 = x0 - 1.0 + 2.0 * G2;
    let y2 = y0 - 1.0 + 2.0 * G2;

    // Lattice indices only feed the 256-entry table.
    let i = lattice(fi);
    let j = lattice(fj);
    let gi0 = perm(perm(i) as i32 + j);
    let gi1 = perm(perm(i + i1) as i32 + j + j1);
    let gi2 = perm(perm(i + 1) as i32 + j + 1);

    let n = corner(gi0, x0, y0) + corner(gi1, x1, y1) + corner(gi2, x2, y2);
    if !n.is_finite() {
        return 0.0;
    }

    (70.0 * n).clamp(-1.0, 1.0)
}

/// Wraps a floored lattice coordinate into `0..=256`.
#[inline]
fn lattice(v: f32) -> i32 {
    v.rem_euclid(256.0) as i32
}

/// 2D simplex noise with Vec2 input.
#[inline]
pub fn simplex2v(p: Vec2) -> f32 {
    simplex2(p.x, p.y)
}

/// Quintic smoothing curve `6t^5 - 15t^4 + 10t^3`.
///
/// Flat first and second derivatives at 0 and 1, steeper in the midtones.
#[inline]
pub fn quintic(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

//! CPU rendering of jersey patterns.
//!
//! Every pixel is an independent evaluation of a pure field, so rows are
//! shaded in parallel with rayon and the result does not depend on the
//! thread count. UV coordinates go from (0, 0) at the top-left to (1, 1) at
//! the bottom-right, sampled at pixel centers.
//!
//! # Example
//!
//! ```
//! use jersey_bake::{BakeConfig, bake_params};
//! use jersey_pattern::NoiseParameters;
//!
//! let image = bake_params(&NoiseParameters::default(), &BakeConfig::new(32, 16));
//! assert_eq!(image.dimensions(), (32, 16));
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use jersey_color::Rgb;
use jersey_noise::Field;
use jersey_pattern::{NoiseParameters, ParamsCell, PatternShader};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, info_span};

/// Errors from baking or exporting.
#[derive(Debug, Error)]
pub enum BakeError {
    /// PNG encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Output directory could not be created.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The cancel flag was raised before the bake finished.
    #[error("bake cancelled")]
    Cancelled,
}

/// Configuration for texture baking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakeConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Samples per pixel for anti-aliasing (1 = no AA). Rounded up to a
    /// square grid.
    pub samples: u32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples: 1,
        }
    }
}

impl BakeConfig {
    /// Creates a new bake config with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: 1,
        }
    }

    /// Sets the number of anti-aliasing samples per pixel.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples.max(1);
        self
    }

    fn grid(&self) -> u32 {
        (self.samples.max(1) as f32).sqrt().ceil() as u32
    }
}

/// Row-major RGBA float pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    /// Wraps existing pixel data. Returns `None` when the length does not
    /// match the dimensions.
    pub fn from_raw(data: Vec<[f32; 4]>, width: u32, height: u32) -> Option<Self> {
        (data.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) as usize).copied()
    }

    /// Quantizes to 8-bit RGBA, clamping each channel to [0, 1].
    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.data[(y * self.width + x) as usize];
            image::Rgba(p.map(quantize))
        })
    }
}

fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Averages `sample` over the pixel's sub-sample grid.
fn pixel<T, F>(x: u32, y: u32, config: &BakeConfig, mut sample: F) -> [f32; 4]
where
    F: FnMut(Vec2) -> T,
    T: Into<[f32; 4]>,
{
    let (w, h) = (config.width as f32, config.height as f32);
    let n = config.grid();
    if n == 1 {
        let uv = Vec2::new((x as f32 + 0.5) / w, (y as f32 + 0.5) / h);
        return sample(uv).into();
    }

    let mut sum = [0.0f32; 4];
    for sy in 0..n {
        for sx in 0..n {
            let u = (x as f32 + (sx as f32 + 0.5) / n as f32) / w;
            let v = (y as f32 + (sy as f32 + 0.5) / n as f32) / h;
            let c: [f32; 4] = sample(Vec2::new(u, v)).into();
            for (s, c) in sum.iter_mut().zip(c) {
                *s += c;
            }
        }
    }
    let count = (n * n) as f32;
    sum.map(|s| s / count)
}

struct Px(Rgb);

impl From<Px> for [f32; 4] {
    fn from(Px(c): Px) -> Self {
        [c.r, c.g, c.b, 1.0]
    }
}

struct Gray(f32);

impl From<Gray> for [f32; 4] {
    fn from(Gray(v): Gray) -> Self {
        [v, v, v, 1.0]
    }
}

/// Shades every row. Rows that start after `cancel` is raised are skipped.
fn bake_with<T, F>(sample: F, config: &BakeConfig, cancel: Option<&AtomicBool>) -> Pixmap
where
    F: Fn(Vec2) -> T + Sync,
    T: Into<[f32; 4]>,
{
    let (width, height) = (config.width, config.height);
    let mut data = vec![[0.0f32, 0.0, 0.0, 1.0]; width as usize * height as usize];
    if width > 0 && height > 0 {
        data.par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                    return;
                }
                for (x, out) in row.iter_mut().enumerate() {
                    *out = pixel(x as u32, y as u32, config, &sample);
                }
            });
    }
    Pixmap {
        width,
        height,
        data,
    }
}

/// Bakes a color field.
pub fn bake_rgb<F: Field<Vec2, Rgb> + Sync>(field: &F, config: &BakeConfig) -> Pixmap {
    let _span = info_span!("bake", width = config.width, height = config.height).entered();
    bake_with(|uv| Px(field.sample(uv)), config, None)
}

/// Bakes a scalar field to grayscale, clamped to [0, 1].
pub fn bake_scalar<F: Field<Vec2, f32> + Sync>(field: &F, config: &BakeConfig) -> Pixmap {
    let _span = info_span!("bake", width = config.width, height = config.height).entered();
    bake_with(|uv| Gray(field.sample(uv).clamp(0.0, 1.0)), config, None)
}

/// Bakes the full pipeline for one parameter set.
pub fn bake_params(params: &NoiseParameters, config: &BakeConfig) -> Pixmap {
    bake_rgb(&PatternShader::new(params), config)
}

/// Bakes the current snapshot of `cell`.
///
/// Edits published while the bake runs do not affect it. Rows check
/// `cancel` before shading; once it is raised the bake stops and returns
/// [`BakeError::Cancelled`] instead of a partial image.
pub fn bake_snapshot(
    cell: &ParamsCell,
    config: &BakeConfig,
    cancel: &AtomicBool,
) -> Result<(u64, Pixmap), BakeError> {
    let snapshot = cell.load();
    let _span = info_span!(
        "bake",
        generation = snapshot.generation,
        width = config.width,
        height = config.height
    )
    .entered();
    let shader = PatternShader::new(&snapshot.params);
    let pixmap = bake_with(|uv| Px(shader.shade(uv)), config, Some(cancel));
    if cancel.load(Ordering::Relaxed) {
        debug!(generation = snapshot.generation, "bake cancelled");
        return Err(BakeError::Cancelled);
    }
    Ok((snapshot.generation, pixmap))
}

/// Writes a pixmap as PNG, creating parent directories as needed.
pub fn export_png<P: AsRef<Path>>(pixmap: &Pixmap, path: P) -> Result<(), BakeError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    pixmap.to_rgba8().save_with_format(path, ImageFormat::Png)?;
    let (width, height) = pixmap.dimensions();
    info!(path = %path.display(), width, height, "wrote png");
    Ok(())
}

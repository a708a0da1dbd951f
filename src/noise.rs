//! Noise fields for grass displacement.
//!
//! The displacement algorithm reads all of its organic variation from a 2D
//! scalar field sampled with wrap-around addressing. The field is usually
//! the red channel of a tileable noise image, but anything implementing
//! [`NoiseField`] drops in: a generated hash-noise field, or a constant
//! field to switch variation off in tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use sward::noise::{sample_scaled, TextureField};
//!
//! let field = TextureField::from_image("assets/noise.png")?;
//! let n = sample_scaled(&field, offset, 0.2, 2.0);
//! ```

use std::path::Path;

use glam::Vec2;

use crate::error::NoiseError;

/// A read-only 2D scalar field with tileable addressing.
///
/// `sample` must be pure: the same coordinate always yields the same value.
/// Coordinates outside `[0,1)` wrap.
pub trait NoiseField {
    /// Sample the field at a coordinate.
    fn sample(&self, coord: Vec2) -> f32;
}

/// Sample a field at `coord * scale`, tiled into the unit square, and scale
/// the result by `amplitude`.
///
/// This is the lookup the displacement algorithm builds everything from.
/// `scale = 0` degenerates to sampling the field origin, which is a defined
/// value rather than a failure.
#[inline]
pub fn sample_scaled(field: &dyn NoiseField, coord: Vec2, scale: f32, amplitude: f32) -> f32 {
    field.sample((coord * scale).fract_gl()) * amplitude
}

/// A constant field. Disables spatial variation while keeping every sample
/// deterministic and in range.
#[derive(Debug, Clone, Copy)]
pub struct FlatField(pub f32);

impl NoiseField for FlatField {
    fn sample(&self, _coord: Vec2) -> f32 {
        self.0
    }
}

/// A texture-backed scalar field: one `f32` per texel in `[0,1]`, sampled
/// with bilinear filtering and repeat addressing, matching the GPU sampler
/// the grass shader uses.
#[derive(Debug, Clone)]
pub struct TextureField {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl TextureField {
    /// Load a field from an image file's red channel.
    ///
    /// Supports PNG and JPEG.
    pub fn from_image<P: AsRef<Path>>(path: P) -> Result<Self, NoiseError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        let data = img.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a field from raw single-channel bytes.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    pub fn from_r8(data: &[u8], width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "R8 data size mismatch"
        );
        Self {
            width,
            height,
            data: data.iter().map(|&v| v as f32 / 255.0).collect(),
        }
    }

    /// Generate a tileable hash-noise field.
    ///
    /// The procedural drop-in for a noise image: no asset on disk, same
    /// sampling contract, deterministic for a given `(size, seed)`.
    pub fn generated(size: u32, seed: u32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                data.push(hash_noise(x, y, seed) as f32 / 255.0);
            }
        }
        Self {
            width: size,
            height: size,
            data,
        }
    }

    /// Texture width in texels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in texels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texels quantized back to bytes, for upload as an `R8Unorm` texture.
    pub fn to_r8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }
}

impl NoiseField for TextureField {
    fn sample(&self, coord: Vec2) -> f32 {
        // Texel-space position of the sample, offset so texel centers land
        // on integer coordinates.
        let x = coord.x.rem_euclid(1.0) * self.width as f32 - 0.5;
        let y = coord.y.rem_euclid(1.0) * self.height as f32 - 0.5;

        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;

        let xi = wrap_index(x0, self.width);
        let yi = wrap_index(y0, self.height);
        let xj = wrap_index(x0 + 1.0, self.width);
        let yj = wrap_index(y0 + 1.0, self.height);

        let top = crate::shading::mix(self.texel(xi, yi), self.texel(xj, yi), tx);
        let bottom = crate::shading::mix(self.texel(xi, yj), self.texel(xj, yj), tx);
        crate::shading::mix(top, bottom, ty)
    }
}

#[inline]
fn wrap_index(v: f32, extent: u32) -> u32 {
    v.rem_euclid(extent as f32) as u32 % extent
}

/// Integer hash noise, one byte per texel.
fn hash_noise(x: u32, y: u32, seed: u32) -> u8 {
    let mut n = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1013904223));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n ^= n >> 16;
    (n & 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_is_constant() {
        let field = FlatField(0.5);
        assert_eq!(field.sample(Vec2::ZERO), 0.5);
        assert_eq!(field.sample(Vec2::new(100.0, -3.7)), 0.5);
        assert_eq!(sample_scaled(&field, Vec2::new(0.3, 0.9), 10.0, 2.0), 1.0);
    }

    #[test]
    fn test_generated_field_is_deterministic() {
        let a = TextureField::generated(64, 7);
        let b = TextureField::generated(64, 7);
        let c = TextureField::generated(64, 8);

        let coord = Vec2::new(0.37, 0.81);
        assert_eq!(a.sample(coord), b.sample(coord));
        assert_ne!(a.sample(coord), c.sample(coord));
    }

    #[test]
    fn test_samples_stay_in_unit_range() {
        let field = TextureField::generated(32, 42);
        for i in 0..100 {
            let coord = Vec2::new(i as f32 * 0.173, i as f32 * -0.311);
            let v = field.sample(coord);
            assert!((0.0..=1.0).contains(&v), "sample {} out of range", v);
        }
    }

    #[test]
    fn test_sampling_tiles() {
        let field = TextureField::generated(16, 3);
        let coord = Vec2::new(0.23, 0.71);
        assert_eq!(field.sample(coord), field.sample(coord + Vec2::ONE));
        assert_eq!(field.sample(coord), field.sample(coord - Vec2::splat(2.0)));
    }

    #[test]
    fn test_zero_scale_degenerates_to_origin() {
        let field = TextureField::generated(16, 3);
        let origin = field.sample(Vec2::ZERO);
        assert_eq!(sample_scaled(&field, Vec2::new(5.0, -3.0), 0.0, 1.0), origin);
        assert_eq!(sample_scaled(&field, Vec2::new(0.1, 0.9), 0.0, 2.0), origin * 2.0);
    }

    #[test]
    fn test_single_texel_field_is_uniform() {
        let field = TextureField::from_r8(&[128], 1, 1);
        let expected = 128.0 / 255.0;
        assert_eq!(field.sample(Vec2::ZERO), expected);
        assert_eq!(field.sample(Vec2::new(0.9, 0.4)), expected);
    }

    #[test]
    fn test_bilinear_blend_between_texels() {
        // Two texels, 0 and 255: halfway between their centers reads 0.5.
        let field = TextureField::from_r8(&[0, 255], 2, 1);
        let at_first_center = field.sample(Vec2::new(0.25, 0.5));
        let between = field.sample(Vec2::new(0.5, 0.5));
        assert_eq!(at_first_center, 0.0);
        assert!((between - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_r8_round_trip() {
        let field = TextureField::generated(8, 11);
        let bytes = field.to_r8();
        let back = TextureField::from_r8(&bytes, 8, 8);
        assert_eq!(field.sample(Vec2::new(0.6, 0.1)), back.sample(Vec2::new(0.6, 0.1)));
    }
}

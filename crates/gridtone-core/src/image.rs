//! RGBA image buffer.
//!
//! [`Image`] stores interleaved RGBA `f32` samples behind an `Arc`, so
//! clones are cheap and mutation copies on write. It is the in-memory form
//! of both the source texture and the rendered frame.
//!
//! # Example
//!
//! ```rust
//! use gridtone_core::Image;
//!
//! let mut img = Image::filled(4, 4, [1.0, 0.0, 0.0, 1.0]);
//! img.set_pixel(0, 0, [0.0, 1.0, 0.0, 1.0]);
//! assert_eq!(img.pixel(0, 0), [0.0, 1.0, 0.0, 1.0]);
//! assert_eq!(img.pixel(1, 0), [1.0, 0.0, 0.0, 1.0]);
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pixel::{Rgb, from_u8, to_u8};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// RGBA `f32` image with copy-on-write storage.
#[derive(Clone, PartialEq)]
pub struct Image {
    /// Interleaved RGBA samples, row-major, top row first
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
}

impl Image {
    /// Creates a transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: Arc::new(vec![0.0; width as usize * height as usize * CHANNELS]),
            width,
            height,
        }
    }

    /// Creates an image from interleaved RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * 4`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates an image filled with a single pixel value.
    pub fn filled(width: u32, height: u32, pixel: [f32; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Creates an image from 8-bit RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] on a length mismatch.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_data(width, height, bytes.iter().map(|&b| from_u8(b)).collect())
    }

    /// Quantizes the image to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().map(|&v| to_u8(v)).collect()
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the samples mutably, cloning shared storage first.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Returns the RGB part of the pixel at `(x, y)`.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        let p = self.pixel(x, y);
        [p[0], p[1], p[2]]
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; 4]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        Arc::make_mut(&mut self.data)[o..o + CHANNELS].copy_from_slice(&pixel);
    }

    /// Bilinear sample with clamp-to-edge addressing.
    ///
    /// Coordinates are in pixel units with pixel `i` centered at `i + 0.5`,
    /// the same convention a GPU texture sampler uses. Sampling a constant
    /// image returns that constant exactly.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> [f32; 4] {
        if self.is_empty() {
            return [0.0; 4];
        }
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let fx = (x - 0.5).clamp(0.0, max_x);
        let fy = (y - 0.5).clamp(0.0, max_y);

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);

        let mut out = [0.0; 4];
        for c in 0..CHANNELS {
            let top = p00[c] + (p10[c] - p00[c]) * tx;
            let bottom = p01[c] + (p11[c] - p01[c]) * tx;
            out[c] = top + (bottom - top) * ty;
        }
        out
    }

    /// Bilinear sample at normalized texture coordinates (`(0, 0)` is the
    /// top-left corner, `(1, 1)` the bottom-right).
    #[inline]
    pub fn sample_uv(&self, u: f32, v: f32) -> [f32; 4] {
        self.sample_bilinear(u * self.width as f32, v * self.height as f32)
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

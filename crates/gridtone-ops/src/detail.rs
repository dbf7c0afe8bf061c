//! Edge-aware detail estimation.
//!
//! Sharpness and structure are driven by the difference between a pixel's
//! luma and an edge-preserving (bilateral) base around it. The base uses a
//! fixed 13-tap pattern whose offsets are stretched by the spatial sigma;
//! each tap is weighted by a spatial Gaussian of its unscaled offset and a
//! range Gaussian of its luma difference to the center tap. Range
//! weighting keeps strong edges out of the base, which is what keeps the
//! boost free of halos.
//!
//! Two bases are evaluated per pixel:
//!
//! | base   | σ spatial | σ range | feeds      |
//! |--------|-----------|---------|------------|
//! | fine   | 1.25      | 0.10    | sharpness  |
//! | mid    | 4.0       | 0.25    | structure  |

use gridtone_core::{Image, Rgb, luma};
use serde::{Deserialize, Serialize};

/// Tap offsets in pixels: center, ±1 and ±2 on both axes, four diagonals.
pub const TAPS: [[f32; 2]; 13] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [2.0, 0.0],
    [-2.0, 0.0],
    [0.0, 2.0],
    [0.0, -2.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// Tunables of the detail stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSettings {
    /// Spatial sigma of the fine base
    pub sharp_sigma_spatial: f32,
    /// Range sigma of the fine base
    pub sharp_sigma_range: f32,
    /// Spatial sigma of the mid base
    pub structure_sigma_spatial: f32,
    /// Range sigma of the mid base
    pub structure_sigma_range: f32,
    /// Luma the structure boost is centered on
    pub midtone_center: f32,
    /// Width of the midtone Gaussian
    pub midtone_width: f32,
    /// Dead-zone applied to both detail signals
    pub threshold: f32,
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self {
            sharp_sigma_spatial: 1.25,
            sharp_sigma_range: 0.10,
            structure_sigma_spatial: 4.0,
            structure_sigma_range: 0.25,
            midtone_center: 0.5,
            midtone_width: 0.35,
            threshold: 0.003,
        }
    }
}

/// Detail signals at one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetailLayers {
    /// Luma of the source pixel
    pub src_luma: f32,
    /// `luma(src) - luma(fine base)`
    pub fine: f32,
    /// `luma(src) - luma(mid base)`
    pub mid: f32,
}

/// Bilateral base color at pixel-space position `(x, y)`.
///
/// `(x, y)` uses the same convention as [`Image::sample_bilinear`]; taps land
/// at `(x, y) + offset * sigma_spatial` and are sampled bilinearly with
/// clamp-to-edge. The weighted average is accumulated relative to the
/// center tap, so a constant neighbourhood returns the center exactly.
pub fn bilateral13(image: &Image, x: f32, y: f32, sigma_spatial: f32, sigma_range: f32) -> Rgb {
    let center = rgb(image.sample_bilinear(x, y));
    let center_y = luma(center);
    let two_s2 = 2.0 * sigma_spatial * sigma_spatial;
    let two_r2 = 2.0 * sigma_range * sigma_range;

    let mut acc = [0.0f32; 3];
    let mut wsum = 0.0f32;
    for [ox, oy] in TAPS {
        let s = rgb(image.sample_bilinear(x + ox * sigma_spatial, y + oy * sigma_spatial));
        let dy = luma(s) - center_y;
        let ws = (-(ox * ox + oy * oy) / two_s2).exp();
        let wr = (-(dy * dy) / two_r2).exp();
        let w = ws * wr;
        for i in 0..3 {
            acc[i] += w * (s[i] - center[i]);
        }
        wsum += w;
    }

    let norm = wsum.max(1e-6);
    [
        center[0] + acc[0] / norm,
        center[1] + acc[1] / norm,
        center[2] + acc[2] / norm,
    ]
}

/// Zero inside `[-t, t]`, shrunk toward zero by `t` outside.
#[inline]
pub fn soft_threshold(x: f32, t: f32) -> f32 {
    let a = x.abs();
    if a <= t { 0.0 } else { (a - t) * x.signum() }
}

/// Gaussian emphasis of midtones, 1 at `center`.
#[inline]
pub fn midtone_weight(y: f32, center: f32, width: f32) -> f32 {
    let z = (y - center) / width.max(1e-6);
    (-0.5 * z * z).exp()
}

/// Evaluates both bases at `(x, y)` and returns the raw detail signals.
pub fn estimate(image: &Image, x: f32, y: f32, settings: &DetailSettings) -> DetailLayers {
    let src_luma = luma(rgb(image.sample_bilinear(x, y)));
    let fine_base = bilateral13(
        image,
        x,
        y,
        settings.sharp_sigma_spatial,
        settings.sharp_sigma_range,
    );
    let mid_base = bilateral13(
        image,
        x,
        y,
        settings.structure_sigma_spatial,
        settings.structure_sigma_range,
    );
    DetailLayers {
        src_luma,
        fine: src_luma - luma(fine_base),
        mid: src_luma - luma(mid_base),
    }
}

#[inline]
fn rgb(p: [f32; 4]) -> Rgb {
    [p[0], p[1], p[2]]
}

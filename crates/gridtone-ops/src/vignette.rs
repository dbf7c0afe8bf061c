//! Radial vignette applied after the LUT stage.
//!
//! `factor = smoothstep(0.8, offset * 0.799, |uv - 0.5| * (darkness + offset))`
//! with `offset = vignette_sharpness` and `darkness = vignette_size`. The
//! edges run high-to-low, so the factor falls from 1 at the center toward 0
//! at the rim. With both parameters at zero the factor is exactly 1.

use gridtone_core::Rgb;
use gridtone_core::pixel::scale;

/// GLSL `smoothstep`, including reversed edges (`edge0 > edge1`).
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span == 0.0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Darkening factor at surface coordinate `uv` (`[0, 1]²`).
#[inline]
pub fn vignette_factor(uv: [f32; 2], size: f32, sharpness: f32) -> f32 {
    let dx = uv[0] - 0.5;
    let dy = uv[1] - 0.5;
    let dist = (dx * dx + dy * dy).sqrt();
    smoothstep(0.8, sharpness * 0.799, dist * (size + sharpness))
}

/// Applies the vignette to a color.
#[inline]
pub fn vignette(c: Rgb, uv: [f32; 2], size: f32, sharpness: f32) -> Rgb {
    if size == 0.0 && sharpness == 0.0 {
        return c;
    }
    scale(c, vignette_factor(uv, size, sharpness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_identity() {
        for uv in [[0.0, 0.0], [0.5, 0.5], [1.0, 0.3]] {
            assert_eq!(vignette_factor(uv, 0.0, 0.0), 1.0);
        }
    }

    #[test]
    fn darkens_corners_more_than_center() {
        let center = vignette_factor([0.5, 0.5], 1.0, 0.5);
        let corner = vignette_factor([0.0, 0.0], 1.0, 0.5);
        assert_relative_eq!(center, 1.0);
        assert!(corner < center);
    }

    #[test]
    fn size_increases_darkness() {
        let a = vignette_factor([0.1, 0.1], 0.3, 0.2);
        let b = vignette_factor([0.1, 0.1], 0.9, 0.2);
        assert!(b < a);
    }

    #[test]
    fn smoothstep_reversed_edges() {
        assert_eq!(smoothstep(0.8, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.8, 0.0, 0.8), 0.0);
        assert_relative_eq!(smoothstep(0.8, 0.0, 0.4), 0.5);
    }
}

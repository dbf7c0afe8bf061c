//! Global color adjustments: exposure, contrast, saturation, hue rotation.
//!
//! Each takes kernel units (multipliers, radians). A neutral value returns
//! the input unchanged.

use glam::{Mat3, Vec3};
use gridtone_core::pixel::{LUMA_B, LUMA_G, LUMA_R, luma, mix, scale};
use gridtone_core::Rgb;

/// Multiplies the color by `gain`.
#[inline]
pub fn exposure(c: Rgb, gain: f32) -> Rgb {
    if gain == 1.0 { c } else { scale(c, gain) }
}

/// Scales distance from mid-grey 0.5 by `amount`.
#[inline]
pub fn contrast(c: Rgb, amount: f32) -> Rgb {
    if amount == 1.0 {
        return c;
    }
    [
        (c[0] - 0.5) * amount + 0.5,
        (c[1] - 0.5) * amount + 0.5,
        (c[2] - 0.5) * amount + 0.5,
    ]
}

/// Blends between the color's luma `y` and the color by `amount`.
///
/// `y` is passed in because the grading kernel reuses the same luma for the
/// detail recomposition.
#[inline]
pub fn saturation(c: Rgb, y: f32, amount: f32) -> Rgb {
    if amount == 1.0 { c } else { mix([y, y, y], c, amount) }
}

/// Convenience form of [`saturation`] that computes the luma itself.
#[inline]
pub fn saturate_by(c: Rgb, amount: f32) -> Rgb {
    saturation(c, luma(c), amount)
}

/// Sine coefficients of the YIQ hue rotation, row-major.
const HUE_SIN: [[f32; 3]; 3] = [
    [0.168, 0.330, -0.497],
    [-0.328, 0.035, 0.292],
    [1.250, -1.050, -0.203],
];

/// Luma-preserving hue rotation matrix for `angle` radians.
///
/// `M = L + cos(a)·(I − L) + sin(a)·S`, where every row of `L` is the BT.601
/// luma weights and `S` holds the fixed sine coefficients. At `a = 0` (and
/// any multiple of 2π) `M` is the identity, and `luma(M·c) == luma(c)` up
/// to the three-decimal rounding of `S`.
pub fn hue_matrix(angle: f32) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    let w = [LUMA_R, LUMA_G, LUMA_B];
    let mut rows = [[0.0f32; 3]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, m) in row.iter_mut().enumerate() {
            let ident = if i == j { 1.0 } else { 0.0 };
            *m = w[j] + cos_a * (ident - w[j]) + sin_a * HUE_SIN[i][j];
        }
    }
    // glam stores columns; the rows above go in transposed.
    Mat3::from_cols_array_2d(&rows).transpose()
}

/// Rotates hue with a matrix from [`hue_matrix`].
#[inline]
pub fn rotate_hue(c: Rgb, m: &Mat3) -> Rgb {
    (*m * Vec3::from(c)).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::TAU;

    #[test]
    fn neutral_values_are_identity() {
        let c = [0.2, 0.7, 0.9];
        assert_eq!(exposure(c, 1.0), c);
        assert_eq!(contrast(c, 1.0), c);
        assert_eq!(saturate_by(c, 1.0), c);
    }

    #[test]
    fn exposure_is_monotonic() {
        let c = [0.0, 0.3, 0.05];
        let lo = exposure(c, 1.1);
        let hi = exposure(c, 1.2);
        assert!(hi[1] > lo[1] && hi[2] > lo[2]);
    }

    #[test]
    fn contrast_pivots_on_mid_grey() {
        assert_eq!(contrast([0.5, 0.5, 0.5], 1.8), [0.5, 0.5, 0.5]);
        assert_relative_eq!(contrast([0.75, 0.25, 0.5], 2.0)[0], 1.0);
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = [0.8, 0.2, 0.4];
        let g = saturate_by(c, 0.0);
        assert_relative_eq!(g[0], luma(c));
        assert_eq!(g[0], g[1]);
        assert_eq!(g[1], g[2]);
    }

    #[test]
    fn full_turn_is_identity() {
        let m = hue_matrix(TAU);
        for c in [[1.0, 0.0, 0.0], [0.2, 0.6, 0.9], [0.5, 0.5, 0.5]] {
            let out = rotate_hue(c, &m);
            for i in 0..3 {
                assert!((out[i] - c[i]).abs() < 1e-4, "{c:?} -> {out:?}");
            }
        }
    }

    #[test]
    fn rotation_preserves_luma() {
        let m = hue_matrix(1.3);
        let c = [0.9, 0.3, 0.1];
        assert_relative_eq!(luma(rotate_hue(c, &m)), luma(c), epsilon = 2e-3);
    }

    #[test]
    fn matrix_matches_reference_rows() {
        let a = 0.7f32;
        let (s, c) = a.sin_cos();
        let m = hue_matrix(a);
        // Row 0 of the reference matrix applied to pure red picks column 0.
        let red = rotate_hue([1.0, 0.0, 0.0], &m);
        assert_relative_eq!(red[0], 0.299 + 0.701 * c + 0.168 * s, epsilon = 1e-6);
        assert_relative_eq!(red[1], 0.299 - 0.299 * c - 0.328 * s, epsilon = 1e-6);
        assert_relative_eq!(red[2], 0.299 - 0.299 * c + 1.250 * s, epsilon = 1e-6);
    }
}

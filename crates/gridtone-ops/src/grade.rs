//! The color grading kernel.
//!
//! [`grade`] maps one source color to its graded color before the LUT and
//! vignette stages. Stage order is fixed:
//!
//! 1. exposure
//! 2. contrast around 0.5
//! 3. saturation around BT.601 luma `Y` (taken after contrast)
//! 4. hue rotation
//! 5. six-band HSL offsets
//! 6. detail recomposition: `Yout = Y + sharpness·fine + structure·mid`,
//!    color scaled by `Yout / Y`, clamped to `[0, 1]`
//!
//! # Example
//!
//! ```rust
//! use gridtone_core::ImageProperties;
//! use gridtone_ops::{DetailLayers, DetailSettings, GradeParams, grade};
//!
//! let params = GradeParams::from_properties(&ImageProperties::default(), &DetailSettings::default());
//! let out = grade([0.2, 0.5, 0.8], &params, &DetailLayers::default());
//! assert!((out[1] - 0.5).abs() < 1e-5);
//! ```

use glam::Mat3;
use gridtone_core::pixel::{luma, saturate, scale};
use gridtone_core::{ImageProperties, Rgb};

use crate::adjust::{contrast, exposure, hue_matrix, rotate_hue, saturation};
use crate::bands::{BandSet, apply_bands};
use crate::detail::{DetailLayers, DetailSettings, midtone_weight, soft_threshold};

/// Grading parameters in kernel units.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeParams {
    /// Exposure multiplier (`brightness / 100`)
    pub brightness: f32,
    /// Contrast multiplier (`contrast / 100`)
    pub contrast: f32,
    /// Saturation multiplier (`saturation / 100`)
    pub saturation: f32,
    /// Hue rotation in radians
    pub hue: f32,
    hue_matrix: Option<Mat3>,
    /// Band offsets
    pub bands: BandSet,
    /// Fine detail gain (raw UI value)
    pub sharpness: f32,
    /// Midtone local-contrast gain (raw UI value)
    pub structure: f32,
    /// Detail stage tunables
    pub detail: DetailSettings,
}

impl GradeParams {
    /// Converts UI-unit properties to kernel units.
    pub fn from_properties(props: &ImageProperties, detail: &DetailSettings) -> Self {
        let hue = props.hue.to_radians();
        Self {
            brightness: props.brightness / 100.0,
            contrast: props.contrast / 100.0,
            saturation: props.saturation / 100.0,
            hue,
            hue_matrix: (hue != 0.0).then(|| hue_matrix(hue)),
            bands: BandSet::from_properties(props),
            sharpness: props.sharpness,
            structure: props.structure,
            detail: *detail,
        }
    }

    /// Whether the detail signals affect the output.
    ///
    /// When `false`, callers may pass [`DetailLayers::default`] and skip the
    /// bilateral taps.
    pub fn needs_detail(&self) -> bool {
        self.sharpness != 0.0 || self.structure != 0.0
    }

    /// Returns `true` if [`grade`] leaves in-gamut colors unchanged.
    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0
            && self.contrast == 1.0
            && self.saturation == 1.0
            && self.hue_matrix.is_none()
            && self.bands.is_zero()
            && !self.needs_detail()
    }

    /// The precomputed hue rotation, `None` when the angle is zero.
    pub fn hue_rotation(&self) -> Option<&Mat3> {
        self.hue_matrix.as_ref()
    }
}

/// Grades one source color.
///
/// `detail` must be the layers estimated at the same source position; it
/// is ignored when [`GradeParams::needs_detail`] is `false`.
pub fn grade(src: Rgb, params: &GradeParams, detail: &DetailLayers) -> Rgb {
    let mut c = exposure(src, params.brightness);
    c = contrast(c, params.contrast);
    let y = luma(c);
    c = saturation(c, y, params.saturation);
    if let Some(m) = &params.hue_matrix {
        c = rotate_hue(c, m);
    }
    c = apply_bands(c, &params.bands);

    if !params.needs_detail() {
        return saturate(c);
    }

    let settings = &params.detail;
    let fine = soft_threshold(detail.fine, settings.threshold);
    let mid = soft_threshold(detail.mid, settings.threshold)
        * midtone_weight(detail.src_luma, settings.midtone_center, settings.midtone_width);

    let y_out = y + params.sharpness * fine + params.structure * mid;
    let gain = if y > 1e-6 { y_out / y } else { 1.0 };
    saturate(scale(c, gain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::estimate;
    use gridtone_core::Image;

    fn params(props: &ImageProperties) -> GradeParams {
        GradeParams::from_properties(props, &DetailSettings::default())
    }

    fn close(a: Rgb, b: Rgb, eps: f32) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() <= eps)
    }

    #[test]
    fn defaults_are_identity() {
        let p = params(&ImageProperties::default());
        assert!(p.is_identity());
        for c in [
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.2, 0.5, 0.8],
            [0.93, 0.41, 0.07],
        ] {
            let out = grade(c, &p, &DetailLayers::default());
            assert!(close(out, c, 1e-5), "{c:?} -> {out:?}");
        }
    }

    #[test]
    fn full_hue_turn_is_identity() {
        let mut props = ImageProperties::default();
        props.hue = 360.0;
        let p = params(&props);
        let c = [0.7, 0.2, 0.4];
        assert!(close(grade(c, &p, &DetailLayers::default()), c, 1e-4));
    }

    #[test]
    fn brightness_raises_every_channel() {
        let c = [0.1, 0.2, 0.3];
        let mut lo = ImageProperties::default();
        lo.brightness = 110.0;
        let mut hi = lo.clone();
        hi.brightness = 120.0;
        let a = grade(c, &params(&lo), &DetailLayers::default());
        let b = grade(c, &params(&hi), &DetailLayers::default());
        assert!((0..3).all(|i| b[i] > a[i]), "{a:?} {b:?}");
    }

    #[test]
    fn zero_saturation_greys_out() {
        let mut props = ImageProperties::default();
        props.saturation = 0.0;
        let out = grade([0.9, 0.2, 0.1], &params(&props), &DetailLayers::default());
        assert!((out[0] - out[1]).abs() < 1e-5 && (out[1] - out[2]).abs() < 1e-5);
    }

    #[test]
    fn detail_on_flat_image_has_no_effect() {
        let img = Image::filled(6, 6, [0.3, 0.5, 0.7, 1.0]);
        let mut props = ImageProperties::default();
        props.sharpness = 200.0;
        props.structure = 200.0;
        let p = params(&props);
        let layers = estimate(&img, 2.5, 3.5, &p.detail);
        let out = grade([0.3, 0.5, 0.7], &p, &layers);
        assert!(close(out, [0.3, 0.5, 0.7], 1e-5), "{out:?}");
    }

    #[test]
    fn sharpness_boosts_local_highlight() {
        let layers = DetailLayers {
            src_luma: 0.5,
            fine: 0.01,
            mid: 0.0,
        };
        let mut props = ImageProperties::default();
        props.sharpness = 10.0;
        let out = grade([0.5, 0.5, 0.5], &params(&props), &layers);
        // Yout = 0.5 + 10 * (0.01 - 0.003)
        assert!((out[0] - 0.57).abs() < 1e-5, "{out:?}");
    }

    #[test]
    fn output_is_clamped() {
        let mut props = ImageProperties::default();
        props.brightness = 200.0;
        props.contrast = 200.0;
        let out = grade([0.9, 0.8, 0.1], &params(&props), &DetailLayers::default());
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

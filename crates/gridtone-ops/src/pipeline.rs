//! Per-pixel fragment program: grade, then LUT, then vignette.

use std::sync::Arc;

use gridtone_core::{Image, ImageProperties, Rgb};
use gridtone_lut::Lut3D;

use crate::detail::{DetailLayers, DetailSettings, estimate};
use crate::grade::{GradeParams, grade};
use crate::vignette::vignette;

/// Everything needed to shade one output pixel.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Kernel parameters
    pub grade: GradeParams,
    /// Resolved LUT, `None` for the identity stage
    pub lut: Option<Arc<Lut3D>>,
    /// Vignette darkness
    pub vignette_size: f32,
    /// Vignette offset
    pub vignette_sharpness: f32,
}

impl Pipeline {
    /// Builds a pipeline from UI-unit properties and a resolved LUT.
    ///
    /// The LUT is passed separately because `props.lut` only names it;
    /// resolving the name is the caller's job.
    pub fn new(props: &ImageProperties, detail: &DetailSettings, lut: Option<Arc<Lut3D>>) -> Self {
        Self {
            grade: GradeParams::from_properties(props, detail),
            lut,
            vignette_size: props.vignette_size,
            vignette_sharpness: props.vignette_sharpness,
        }
    }

    /// Returns `true` if shading leaves every in-gamut pixel unchanged.
    pub fn is_identity(&self) -> bool {
        self.grade.is_identity()
            && self.lut.is_none()
            && self.vignette_size == 0.0
            && self.vignette_sharpness == 0.0
    }

    /// Shades one pixel.
    ///
    /// `(x, y)` is the source sample position in pixel units (see
    /// [`Image::sample_bilinear`]); `uv` is the output position on the
    /// surface, which drives the vignette.
    pub fn shade(&self, src: &Image, x: f32, y: f32, uv: [f32; 2]) -> Rgb {
        let p = src.sample_bilinear(x, y);
        let color = [p[0], p[1], p[2]];
        let layers = if self.grade.needs_detail() {
            estimate(src, x, y, &self.grade.detail)
        } else {
            DetailLayers::default()
        };
        let mut c = grade(color, &self.grade, &layers);
        if let Some(lut) = &self.lut {
            c = lut.apply(c);
        }
        vignette(c, uv, self.vignette_size, self.vignette_sharpness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_lut_keeps_color() {
        let img = Image::filled(2, 2, [0.25, 0.5, 0.75, 1.0]);
        let pipe = Pipeline::new(
            &ImageProperties::default(),
            &DetailSettings::default(),
            Some(Arc::new(Lut3D::identity(17))),
        );
        let out = pipe.shade(&img, 1.0, 1.0, [0.5, 0.5]);
        for (o, e) in out.iter().zip([0.25, 0.5, 0.75]) {
            assert!((o - e).abs() < 1e-5);
        }
        assert!(!pipe.is_identity());
    }

    #[test]
    fn lut_runs_before_vignette() {
        // LUT maps everything to white; vignette then darkens the corner.
        let white = Lut3D::from_data(vec![[1.0; 3]; 8], 2).unwrap();
        let mut props = ImageProperties::default();
        props.vignette_size = 1.0;
        props.vignette_sharpness = 0.5;
        let pipe = Pipeline::new(&props, &DetailSettings::default(), Some(Arc::new(white)));
        let img = Image::filled(2, 2, [0.0, 0.0, 0.0, 1.0]);
        let center = pipe.shade(&img, 1.0, 1.0, [0.5, 0.5]);
        let corner = pipe.shade(&img, 0.5, 0.5, [0.0, 0.0]);
        assert_eq!(center, [1.0, 1.0, 1.0]);
        assert!(corner[0] < 1.0);
    }
}

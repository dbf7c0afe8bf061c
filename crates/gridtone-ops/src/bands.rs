//! Six-band HSL targeting.
//!
//! Each [`Band`] has a hue center. A color's membership in a band is a
//! Gaussian of its angular distance to the center (σ = 15°), so offsets
//! blend smoothly between neighbouring bands.

use std::f32::consts::TAU;

use gridtone_core::{Band, BandAdjust, ImageProperties, Rgb};

use crate::hsl::{hsl_to_rgb, hue_distance, rgb_to_hsl};

/// Gaussian falloff width, 15° in radians.
pub const BAND_SIGMA: f32 = 15.0 / 360.0 * TAU;

/// Per-band offsets in [`Band::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandSet {
    /// Offsets indexed by [`Band::index`]
    pub bands: [BandAdjust; 6],
}

impl BandSet {
    /// Collects the band offsets from a parameter record.
    pub fn from_properties(props: &ImageProperties) -> Self {
        let mut bands = [BandAdjust::default(); 6];
        for band in Band::ALL {
            bands[band.index()] = props.band(band);
        }
        Self { bands }
    }

    /// Returns `true` when every offset is zero.
    pub fn is_zero(&self) -> bool {
        self.bands.iter().all(BandAdjust::is_zero)
    }
}

/// Membership weight of `hue` in the band centered at `center` (radians).
#[inline]
pub fn band_weight(hue: f32, center: f32) -> f32 {
    let z = hue_distance(hue, center) / BAND_SIGMA;
    (-0.5 * z * z).exp()
}

/// Applies the six band offsets to a color.
///
/// Bands are visited in order and each weight is measured from the hue as
/// already shifted by the earlier bands. Hue is wrapped once at the end;
/// saturation and lightness are clamped to `[0, 1]`.
pub fn apply_bands(c: Rgb, set: &BandSet) -> Rgb {
    let [mut h, mut s, mut l] = rgb_to_hsl(c);

    for band in Band::ALL {
        let adj = &set.bands[band.index()];
        let w = band_weight(h, band.center_radians());
        h += adj.hue * w;
        s += adj.saturation * w;
        l += adj.lightness * w;
    }

    if h < 0.0 {
        h += TAU;
    }
    if h >= TAU {
        h -= TAU;
    }

    hsl_to_rgb([h, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_offsets_round_trip() {
        let set = BandSet::default();
        let c = [0.8, 0.35, 0.1];
        let out = apply_bands(c, &set);
        for i in 0..3 {
            assert_relative_eq!(out[i], c[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn weight_peaks_at_center() {
        assert_relative_eq!(band_weight(Band::Green.center_radians(), Band::Green.center_radians()), 1.0);
        assert_relative_eq!(band_weight(BAND_SIGMA, 0.0), (-0.5f32).exp(), epsilon = 1e-6);
        assert!(band_weight(Band::Blue.center_radians(), 0.0) < 1e-6);
    }

    #[test]
    fn red_saturation_only_touches_reds() {
        let mut props = ImageProperties::default();
        props.red_saturation = -0.5;
        let set = BandSet::from_properties(&props);

        let red = apply_bands([0.9, 0.1, 0.1], &set);
        assert!(red[0] - red[1] < 0.8 * (0.9 - 0.1));

        let blue = [0.1, 0.2, 0.9];
        let out = apply_bands(blue, &set);
        for i in 0..3 {
            assert_relative_eq!(out[i], blue[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn lightness_is_clamped() {
        let mut props = ImageProperties::default();
        props.red_lightness = 0.5;
        let out = apply_bands([1.0, 0.6, 0.6], &BandSet::from_properties(&props));
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

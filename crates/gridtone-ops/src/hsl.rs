//! RGB <-> HSL conversion with hue in radians.
//!
//! Hue lives in `[0, 2π)`, saturation and lightness in `[0, 1]`.
//! Achromatic colors (channel spread below `1e-6`) report hue and
//! saturation of zero.

use std::f32::consts::TAU;

use gridtone_core::Rgb;

/// Hue, saturation, lightness.
pub type Hsl = [f32; 3];

/// Converts RGB to HSL.
pub fn rgb_to_hsl(c: Rgb) -> Hsl {
    let [r, g, b] = c;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;

    if d < 1e-6 {
        return [0.0, 0.0, l];
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    [h / 6.0 * TAU, s, l]
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Converts HSL back to RGB. Saturation and lightness are clamped first.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl[0] / TAU;
    let s = hsl[1].clamp(0.0, 1.0);
    let l = hsl[2].clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

/// Shortest angular distance between two hues, in `[0, π]`.
#[inline]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    d.min(TAU - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn primaries() {
        let red = rgb_to_hsl([1.0, 0.0, 0.0]);
        assert_relative_eq!(red[0], 0.0);
        assert_relative_eq!(red[1], 1.0);
        assert_relative_eq!(red[2], 0.5);

        let blue = rgb_to_hsl([0.0, 0.0, 1.0]);
        assert_relative_eq!(blue[0], 240f32.to_radians(), epsilon = 1e-5);
    }

    #[test]
    fn grey_has_no_hue() {
        assert_eq!(rgb_to_hsl([0.4, 0.4, 0.4]), [0.0, 0.0, 0.4]);
        assert_eq!(hsl_to_rgb([1.0, 0.0, 0.4]), [0.4, 0.4, 0.4]);
    }

    #[test]
    fn round_trip_random_colors() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..1000 {
            let c: Rgb = [rng.r#gen(), rng.r#gen(), rng.r#gen()];
            let back = hsl_to_rgb(rgb_to_hsl(c));
            for i in 0..3 {
                assert!((back[i] - c[i]).abs() < 1e-4, "{c:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn distance_wraps() {
        assert_relative_eq!(hue_distance(0.1, TAU - 0.1), 0.2, epsilon = 1e-5);
        assert_relative_eq!(hue_distance(1.0, 2.5), 1.5);
    }
}

//! RGB helpers shared by the grading stages.

/// An RGB triple of display-encoded values.
pub type Rgb = [f32; 3];

/// BT.601 luma weight for red.
pub const LUMA_R: f32 = 0.299;
/// BT.601 luma weight for green.
pub const LUMA_G: f32 = 0.587;
/// BT.601 luma weight for blue.
pub const LUMA_B: f32 = 0.114;

/// Returns BT.601 luma `0.299R + 0.587G + 0.114B`.
#[inline]
pub fn luma(c: Rgb) -> f32 {
    LUMA_R * c[0] + LUMA_G * c[1] + LUMA_B * c[2]
}

/// Linear blend `a + (b - a) * t` per channel.
///
/// `t = 0` returns `a`, `t = 1` returns `b` exactly.
#[inline]
pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Multiplies every channel by `k`.
#[inline]
pub fn scale(c: Rgb, k: f32) -> Rgb {
    [c[0] * k, c[1] * k, c[2] * k]
}

/// Clamps every channel to `[0, 1]`.
#[inline]
pub fn saturate(c: Rgb) -> Rgb {
    [c[0].clamp(0.0, 1.0), c[1].clamp(0.0, 1.0), c[2].clamp(0.0, 1.0)]
}

/// Maps a `[0, 1]` value to an 8-bit channel, rounding to nearest.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Maps an 8-bit channel to `[0, 1]`.
#[inline]
pub fn from_u8(v: u8) -> f32 {
    v as f32 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn luma_weights_sum_to_one() {
        assert_relative_eq!(luma([1.0, 1.0, 1.0]), 1.0, epsilon = 1e-6);
        assert_relative_eq!(luma([1.0, 0.0, 0.0]), 0.299);
    }

    #[test]
    fn mix_endpoints() {
        let a = [0.1, 0.2, 0.3];
        let b = [0.9, 0.8, 0.7];
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
    }

    #[test]
    fn u8_conversion() {
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(-0.5), 0);
        assert_eq!(to_u8(from_u8(128)), 128);
    }
}

//! 3-dimensional lookup table.

use gridtone_core::Rgb;

use crate::{LutError, LutResult};

/// A 3-dimensional lookup table.
///
/// Stores a cube of RGB values indexed by input RGB.
///
/// # Structure
///
/// - `size^3` entries, each an output RGB triple
/// - Stored red-fastest: `idx = r + g*size + b*size²`, the `.cube` file order
/// - Trilinear interpolation for lookup
///
/// # Example
///
/// ```rust
/// use gridtone_lut::Lut3D;
///
/// let lut = Lut3D::identity(33);
/// let out = lut.apply([0.25, 0.5, 0.75]);
/// assert!((out[2] - 0.75).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// LUT data, red-fastest
    pub data: Vec<Rgb>,
    /// Cube size (e.g. 32 or 64)
    pub size: usize,
    /// Input domain minimum (per channel)
    pub domain_min: [f32; 3],
    /// Input domain maximum (per channel)
    pub domain_max: [f32; 3],
}

impl Lut3D {
    /// Largest accepted cube size.
    pub const MAX_SIZE: usize = 256;

    /// Creates an identity (pass-through) 3D LUT.
    ///
    /// `size` is clamped to `2..=MAX_SIZE`.
    pub fn identity(size: usize) -> Self {
        let size = size.clamp(2, Self::MAX_SIZE);
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 / n, g as f32 / n, b as f32 / n]);
                }
            }
        }
        Self {
            data,
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        }
    }

    /// Creates a 3D LUT from red-fastest data with exactly `size^3` entries.
    pub fn from_data(data: Vec<Rgb>, size: usize) -> LutResult<Self> {
        let expected = Self::checked_entry_count(size)?;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} entries for size {}, got {}",
                expected,
                size,
                data.len()
            )));
        }
        Ok(Self {
            data,
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        })
    }

    /// Number of entries a cube of `size` holds, or `InvalidSize` when the
    /// size is outside `2..=MAX_SIZE`.
    pub fn checked_entry_count(size: usize) -> LutResult<usize> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!("cube size {} is below 2", size)));
        }
        if size > Self::MAX_SIZE {
            return Err(LutError::InvalidSize(format!(
                "cube size {} exceeds {}",
                size,
                Self::MAX_SIZE
            )));
        }
        size.checked_mul(size)
            .and_then(|s| s.checked_mul(size))
            .ok_or_else(|| LutError::InvalidSize(format!("cube size {} overflows", size)))
    }

    /// Sets the input domain.
    pub fn with_domain(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    /// Returns the total number of entries in the LUT.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size * self.size * self.size
    }

    #[inline]
    fn get(&self, r: usize, g: usize, b: usize) -> Rgb {
        self.data[r + g * self.size + b * self.size * self.size]
    }

    /// Applies the LUT to an RGB value with trilinear interpolation.
    ///
    /// Inputs are normalized to the domain and clamped to `[0, 1]` first.
    pub fn apply(&self, rgb: Rgb) -> Rgb {
        let [r, g, b] = self.normalize(rgb);
        let n = (self.size - 1) as f32;

        let ri = ((r * n).floor() as usize).min(self.size - 2);
        let gi = ((g * n).floor() as usize).min(self.size - 2);
        let bi = ((b * n).floor() as usize).min(self.size - 2);

        let rf = r * n - ri as f32;
        let gf = g * n - gi as f32;
        let bf = b * n - bi as f32;

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        let mut out = [0.0f32; 3];
        for i in 0..3 {
            let c00 = c000[i] + (c100[i] - c000[i]) * rf;
            let c01 = c001[i] + (c101[i] - c001[i]) * rf;
            let c10 = c010[i] + (c110[i] - c010[i]) * rf;
            let c11 = c011[i] + (c111[i] - c011[i]) * rf;

            let c0 = c00 + (c10 - c00) * gf;
            let c1 = c01 + (c11 - c01) * gf;

            out[i] = c0 + (c1 - c0) * bf;
        }
        out
    }

    fn normalize(&self, rgb: Rgb) -> [f32; 3] {
        let mut out = [0.0; 3];
        for i in 0..3 {
            let span = self.domain_max[i] - self.domain_min[i];
            let v = if span.abs() > f32::EPSILON {
                (rgb[i] - self.domain_min[i]) / span
            } else {
                0.0
            };
            out[i] = v.clamp(0.0, 1.0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_passes_through() {
        let lut = Lut3D::identity(33);
        for rgb in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.5, 0.3, 0.2], [0.91, 0.07, 0.64]] {
            let out = lut.apply(rgb);
            for i in 0..3 {
                assert_relative_eq!(out[i], rgb[i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn rejects_oversized_cube() {
        for size in [Lut3D::MAX_SIZE + 1, 4_194_304, usize::MAX] {
            let err = Lut3D::from_data(Vec::new(), size).unwrap_err();
            assert!(matches!(err, LutError::InvalidSize(_)), "size {size}");
        }
        assert_eq!(Lut3D::checked_entry_count(Lut3D::MAX_SIZE).unwrap(), 256 * 256 * 256);
        assert_eq!(Lut3D::identity(usize::MAX).size, Lut3D::MAX_SIZE);
    }

    #[test]
    fn clamps_out_of_domain() {
        let lut = Lut3D::identity(2);
        assert_eq!(lut.apply([-1.0, 2.0, 0.5]), [0.0, 1.0, 0.5]);
    }

    #[test]
    fn red_fastest_layout() {
        // Invert red only: entry index r + g*2 + b*4
        let mut lut = Lut3D::identity(2);
        for e in &mut lut.data {
            e[0] = 1.0 - e[0];
        }
        assert_eq!(lut.apply([0.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(lut.apply([1.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
        assert_relative_eq!(lut.apply([0.25, 0.0, 0.0])[0], 0.75);
    }

    #[test]
    fn from_data_checks_count() {
        assert!(Lut3D::from_data(vec![[0.0; 3]; 7], 2).is_err());
        assert!(Lut3D::from_data(vec![[0.0; 3]; 1], 1).is_err());
        assert!(Lut3D::from_data(vec![[0.0; 3]; 8], 2).is_ok());
    }
}

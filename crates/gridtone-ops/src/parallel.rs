//! Row-parallel frame evaluation.
//!
//! With the `parallel` feature rows are distributed over the Rayon pool;
//! without it they run on the calling thread. Output is identical either
//! way since every pixel is computed independently.

use gridtone_core::Image;
use gridtone_core::image::CHANNELS;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::pipeline::Pipeline;
use crate::{OpsError, OpsResult};

/// Fills an RGBA buffer of `width` columns by calling `f(x, y)` per pixel.
pub fn fill_rows<F>(data: &mut [f32], width: u32, f: F)
where
    F: Fn(u32, u32) -> [f32; 4] + Sync,
{
    let row_len = width as usize * CHANNELS;
    if row_len == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| fill_row(&f, y as u32, row));
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| fill_row(&f, y as u32, row));
}

fn fill_row<F>(f: &F, y: u32, row: &mut [f32])
where
    F: Fn(u32, u32) -> [f32; 4],
{
    for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
        px.copy_from_slice(&f(x as u32, y));
    }
}

/// Shades a whole image at its own resolution.
///
/// Output pixels are opaque; `uv` for the vignette is the pixel center in
/// normalized image coordinates.
pub fn grade_image(src: &Image, pipeline: &Pipeline) -> OpsResult<Image> {
    let (w, h) = src.dimensions();
    if src.is_empty() {
        return Err(OpsError::InvalidDimensions(format!("{}x{}", w, h)));
    }
    trace!(w, h, "grade_image");
    let mut out = Image::new(w, h);
    let (fw, fh) = (w as f32, h as f32);
    fill_rows(out.data_mut(), w, |x, y| {
        let sx = x as f32 + 0.5;
        let sy = y as f32 + 0.5;
        let c = pipeline.shade(src, sx, sy, [sx / fw, sy / fh]);
        [c[0], c[1], c[2], 1.0]
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailSettings;
    use gridtone_core::ImageProperties;

    #[test]
    fn defaults_reproduce_source() {
        let mut src = Image::new(3, 2);
        src.set_pixel(0, 0, [1.0, 0.0, 0.0, 1.0]);
        src.set_pixel(2, 1, [0.2, 0.4, 0.6, 1.0]);
        let pipe = Pipeline::new(&ImageProperties::default(), &DetailSettings::default(), None);
        let out = grade_image(&src, &pipe).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                let a = src.pixel(x, y);
                let b = out.pixel(x, y);
                for i in 0..3 {
                    assert!((a[i] - b[i]).abs() < 1e-5);
                }
                assert_eq!(b[3], 1.0);
            }
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        let pipe = Pipeline::new(&ImageProperties::default(), &DetailSettings::default(), None);
        assert!(grade_image(&Image::new(0, 4), &pipe).is_err());
    }
}

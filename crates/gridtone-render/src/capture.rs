//! PNG encoding of rendered frames.

use gridtone_core::Image;
use tracing::debug;

use crate::{RenderError, RenderResult};

/// Encodes a frame as an 8-bit RGBA PNG with an sRGB chunk.
///
/// Channels are quantized with `round(clamp(v, 0, 1) * 255)`.
pub fn encode_png(frame: &Image) -> RenderResult<Vec<u8>> {
    if frame.is_empty() {
        return Err(RenderError::CaptureFailure("frame has zero area".into()));
    }
    let pixels = frame.to_rgba8();
    let fail = |e: png::EncodingError| RenderError::CaptureFailure(e.to_string());

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, frame.width(), frame.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut writer = encoder.write_header().map_err(fail)?;
        writer.write_image_data(&pixels).map_err(fail)?;
        writer.finish().map_err(fail)?;
    }

    if out.is_empty() {
        return Err(RenderError::CaptureFailure("encoder produced no data".into()));
    }
    debug!(bytes = out.len(), width = frame.width(), height = frame.height(), "encoded capture");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture;

    #[test]
    fn encoded_frame_decodes_back() {
        let mut frame = Image::filled(3, 2, [0.0, 0.0, 0.0, 0.0]);
        frame.set_pixel(1, 1, [1.0, 0.5, 0.25, 1.0]);
        let bytes = encode_png(&frame).unwrap();
        let back = texture::decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.to_rgba8(), frame.to_rgba8());
    }

    #[test]
    fn empty_frame_fails() {
        assert!(matches!(
            encode_png(&Image::new(0, 0)),
            Err(RenderError::CaptureFailure(_))
        ));
    }
}

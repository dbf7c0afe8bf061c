//! Source texture decoding.
//!
//! PNG and baseline JPEG are recognized by their magic bytes. Every layout
//! is expanded to RGBA `f32` in `[0, 1]`; 16-bit PNG keeps its precision.

use std::io::Cursor;

use gridtone_core::Image;
use tracing::debug;

use crate::{RenderError, RenderResult};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

/// Decodes an encoded image into an RGBA texture.
pub fn decode(bytes: &[u8]) -> RenderResult<Image> {
    let image = if bytes.starts_with(PNG_MAGIC) {
        decode_png(bytes)?
    } else if bytes.starts_with(JPEG_MAGIC) {
        decode_jpeg(bytes)?
    } else {
        return Err(RenderError::TextureLoadFailure(
            "unrecognized image format (expected PNG or JPEG)".into(),
        ));
    };
    if image.is_empty() {
        return Err(RenderError::TextureLoadFailure("image has zero area".into()));
    }
    debug!(width = image.width(), height = image.height(), "decoded texture");
    Ok(image)
}

fn decode_png(bytes: &[u8]) -> RenderResult<Image> {
    let fail = |e: png::DecodingError| RenderError::TextureLoadFailure(e.to_string());

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().map_err(fail)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| RenderError::TextureLoadFailure("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).map_err(fail)?;
    let buf = &buf[..info.buffer_size()];

    let samples: Vec<f32> = match info.bit_depth {
        png::BitDepth::Sixteen => buf
            .chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as f32 / 65535.0)
            .collect(),
        _ => buf.iter().map(|&b| b as f32 / 255.0).collect(),
    };

    let rgba = expand_to_rgba(&samples, info.color_type.samples())?;
    Image::from_data(info.width, info.height, rgba)
        .map_err(|e| RenderError::TextureLoadFailure(e.to_string()))
}

fn decode_jpeg(bytes: &[u8]) -> RenderResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|e| RenderError::TextureLoadFailure(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| RenderError::TextureLoadFailure("missing JPEG header".into()))?;

    let channels = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => 1,
        jpeg_decoder::PixelFormat::RGB24 => 3,
        other => {
            return Err(RenderError::TextureLoadFailure(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };
    let samples: Vec<f32> = pixels.iter().map(|&b| b as f32 / 255.0).collect();
    let rgba = expand_to_rgba(&samples, channels)?;
    Image::from_data(info.width as u32, info.height as u32, rgba)
        .map_err(|e| RenderError::TextureLoadFailure(e.to_string()))
}

fn expand_to_rgba(samples: &[f32], channels: usize) -> RenderResult<Vec<f32>> {
    let rgba = match channels {
        1 => samples.iter().flat_map(|&g| [g, g, g, 1.0]).collect(),
        2 => samples
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        3 => samples
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 1.0])
            .collect(),
        4 => samples.to_vec(),
        n => {
            return Err(RenderError::TextureLoadFailure(format!(
                "unsupported channel count: {}",
                n
            )));
        }
    };
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_rgb8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn decodes_rgb_png_as_opaque_rgba() {
        let bytes = encode_rgb8(2, 1, &[255, 0, 0, 0, 0, 255]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.pixel(0, 0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(img.pixel(1, 0), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_unknown_bytes() {
        assert!(matches!(
            decode(b"GIF89a...."),
            Err(RenderError::TextureLoadFailure(_))
        ));
    }

    #[test]
    fn rejects_truncated_png() {
        let bytes = encode_rgb8(4, 4, &[10; 48]);
        assert!(decode(&bytes[..bytes.len() / 2]).is_err());
    }
}

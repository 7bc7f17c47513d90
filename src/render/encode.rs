use std::io::Cursor;

use image::{ImageEncoder, codecs::jpeg::JpegEncoder, codecs::png::PngEncoder};

use crate::{
    foundation::core::Rgba8,
    foundation::error::{VerseCardError, VerseCardResult},
    render::FrameRGBA,
};

/// JPEG quality used for exports.
pub const JPEG_QUALITY: u8 = 95;

/// Encode `frame` as PNG, keeping its alpha channel.
pub fn encode_png(frame: &FrameRGBA) -> VerseCardResult<Vec<u8>> {
    check_len(frame)?;
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        for px in rgba.chunks_exact_mut(4) {
            unpremultiply_px(px);
        }
    }

    let mut out = Vec::new();
    PngEncoder::new(Cursor::new(&mut out))
        .write_image(
            &rgba,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| VerseCardError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Encode `frame` as JPEG, compositing it over the opaque `background` first.
pub fn encode_jpeg(frame: &FrameRGBA, background: Rgba8) -> VerseCardResult<Vec<u8>> {
    check_len(frame)?;
    let mut flat = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(
        &mut flat,
        &frame.data,
        frame.premultiplied,
        [background.r, background.g, background.b, 255],
    )?;

    let rgb: Vec<u8> = flat
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut out), JPEG_QUALITY)
        .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| VerseCardError::export(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

fn check_len(frame: &FrameRGBA) -> VerseCardResult<()> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(VerseCardError::export(format!(
            "frame buffer does not match {}x{}",
            frame.width, frame.height
        )));
    }
    Ok(())
}

pub(crate) fn unpremultiply_px(px: &mut [u8]) {
    let a = u16::from(px[3]);
    if a == 0 {
        px[0] = 0;
        px[1] = 0;
        px[2] = 0;
        return;
    }
    if a == 255 {
        return;
    }
    for c in &mut px[..3] {
        *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> VerseCardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(VerseCardError::export(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255(bg_r, inv),
                u16::from(s[1]) + mul_div255(bg_g, inv),
                u16::from(s[2]) + mul_div255(bg_b, inv),
            )
        } else {
            (
                mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv),
                mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv),
                mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;

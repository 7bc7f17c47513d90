use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{VerseCardError, VerseCardResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> VerseCardResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(VerseCardError::decode("image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Split a base64 `data:` URI into its media type and payload bytes.
pub fn parse_data_uri(uri: &str) -> VerseCardResult<(String, Vec<u8>)> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| VerseCardError::decode("not a data: URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| VerseCardError::decode("data: URI has no payload"))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| VerseCardError::decode("only base64 data: URIs are supported"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| VerseCardError::decode(format!("invalid base64 payload: {e}")))?;
    Ok((media_type.to_string(), bytes))
}

/// Encode image bytes as a `data:` URI, sniffing the media type from the content.
pub fn to_data_uri(bytes: &[u8]) -> VerseCardResult<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| VerseCardError::decode(format!("unrecognized image format: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", format.to_mime_type()))
}

/// Decode a photo background payload.
pub fn decode_data_uri_image(uri: &str) -> VerseCardResult<PreparedImage> {
    let (_, bytes) = parse_data_uri(uri)?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

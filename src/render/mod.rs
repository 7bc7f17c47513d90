//! Rasterization of arranged compositions and still-image encoding.

pub(crate) mod cpu;
pub(crate) mod encode;

/// A rendered canvas as RGBA8 pixels.
///
/// Frames coming out of [`cpu::CpuRasterizer`] are premultiplied; the flag makes that explicit
/// at the encoder boundary.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha RGBA8 of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        let mut out = [px[0], px[1], px[2], px[3]];
        if self.premultiplied {
            encode::unpremultiply_px(&mut out);
        }
        Some(out)
    }
}

/// What a rasterization is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// On-screen preview; a transparent background shows a checkerboard.
    Preview {
        /// Use the dark checkerboard tones.
        dark_mode: bool,
    },
    /// Captured image; a transparent background stays transparent.
    Export,
}

use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

use vello_cpu::kurbo as vk;

use crate::{
    assets::decode::decode_data_uri_image,
    assets::fonts::TextLayoutEngine,
    foundation::core::{Rect, Rgba8},
    foundation::error::{VerseCardError, VerseCardResult},
    layout::arrange::{Arrangement, Placement},
    layout::compose::{Background, BlockKind, Content, TextStyle},
    render::{FrameRGBA, RenderTarget},
    settings::model::TextAlign,
};

/// Side of one checkerboard cell in logical units.
pub const CHECKER_CELL: f64 = 8.0;

const CHECKER_LIGHT: (Rgba8, Rgba8) = (
    Rgba8::opaque(0xff, 0xff, 0xff),
    Rgba8::opaque(0xe5, 0xe5, 0xe5),
);
const CHECKER_DARK: (Rgba8, Rgba8) = (
    Rgba8::opaque(0x26, 0x26, 0x26),
    Rgba8::opaque(0x17, 0x17, 0x17),
);
const SPINNER_TONE: Rgba8 = Rgba8::opaque(0x94, 0xa3, 0xb8);
const SPINNER_DOTS: usize = 8;

#[derive(Clone)]
struct PhotoPaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// Draws [`Arrangement`]s into premultiplied RGBA8 frames with `vello_cpu`.
///
/// Decoded photos and font handles are cached across calls, so re-rendering the same
/// composition only pays for rasterization.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    font_cache: HashMap<String, vello_cpu::peniko::FontData>,
    photo_cache: Option<(u64, PhotoPaint)>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("fonts_cached", &self.font_cache.len())
            .field("photo_cached", &self.photo_cache.is_some())
            .finish()
    }
}

impl CpuRasterizer {
    /// Create a rasterizer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize `arrangement` at `scale` pixels per logical unit.
    #[tracing::instrument(skip(self, arrangement, text), fields(canvas = ?arrangement.composition.canvas))]
    pub fn rasterize(
        &mut self,
        arrangement: &Arrangement,
        text: &mut TextLayoutEngine,
        scale: u32,
        target: RenderTarget,
    ) -> VerseCardResult<FrameRGBA> {
        if scale == 0 {
            return Err(VerseCardError::render("scale factor must be >= 1"));
        }
        let canvas = arrangement.composition.canvas.scaled(scale);
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| VerseCardError::render("frame width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| VerseCardError::render("frame height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(VerseCardError::render("frame has zero size"));
        }

        let base = vk::Affine::scale(f64::from(scale));
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        pixmap.data_as_u8_slice_mut().fill(0);

        self.with_ctx_mut(width, height, |this, ctx| {
            this.draw_background(ctx, arrangement, base, target)?;
            if let Some(tint) = arrangement.composition.overlay {
                ctx.set_transform(base);
                ctx.set_paint(color(tint));
                ctx.fill_rect(&logical_rect(arrangement.composition.canvas.rect()));
            }
            this.draw_content(ctx, arrangement, text, base)?;

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> VerseCardResult<R>,
    ) -> VerseCardResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn draw_background(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        arrangement: &Arrangement,
        base: vk::Affine,
        target: RenderTarget,
    ) -> VerseCardResult<()> {
        let canvas = arrangement.composition.canvas.rect();
        match &arrangement.composition.background {
            Background::Solid(c) => {
                ctx.set_transform(base);
                ctx.set_paint(color(*c));
                ctx.fill_rect(&logical_rect(canvas));
            }
            Background::Transparent => {
                if let RenderTarget::Preview { dark_mode } = target {
                    draw_checkerboard(ctx, canvas, base, dark_mode);
                }
            }
            Background::Photo(uri) => {
                let photo = self.photo_paint_for(uri)?;
                let (iw, ih) = (f64::from(photo.w), f64::from(photo.h));
                let s = (canvas.width() / iw).max(canvas.height() / ih);
                let tx = (canvas.width() - iw * s) * 0.5;
                let ty = (canvas.height() - ih * s) * 0.5;
                ctx.set_transform(
                    base * vk::Affine::translate((tx, ty)) * vk::Affine::scale(s),
                );
                ctx.set_paint(photo.paint);
                ctx.fill_rect(&vk::Rect::new(0.0, 0.0, iw, ih));
            }
        }
        Ok(())
    }

    fn photo_paint_for(&mut self, uri: &str) -> VerseCardResult<PhotoPaint> {
        let mut hasher = DefaultHasher::new();
        uri.hash(&mut hasher);
        let key = hasher.finish();
        if let Some((cached_key, paint)) = &self.photo_cache
            && *cached_key == key
        {
            return Ok(paint.clone());
        }

        let prepared = decode_data_uri_image(uri)?;
        let pixmap =
            pixmap_from_premul_bytes(&prepared.rgba8_premul, prepared.width, prepared.height)?;
        let paint = PhotoPaint {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: prepared.width,
            h: prepared.height,
        };
        tracing::debug!(w = paint.w, h = paint.h, "photo decoded");
        self.photo_cache = Some((key, paint.clone()));
        Ok(paint)
    }

    fn font_for(
        &mut self,
        text: &TextLayoutEngine,
        family: &str,
    ) -> VerseCardResult<vello_cpu::peniko::FontData> {
        let loaded = text.resolve(family)?;
        let key = loaded.name.to_lowercase();
        if let Some(font) = self.font_cache.get(&key) {
            return Ok(font.clone());
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(loaded.font_bytes.as_ref().clone()),
            0,
        );
        self.font_cache.insert(key, font.clone());
        Ok(font)
    }

    fn draw_content(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        arrangement: &Arrangement,
        text: &mut TextLayoutEngine,
        base: vk::Affine,
    ) -> VerseCardResult<()> {
        match (&arrangement.composition.content, &arrangement.placement) {
            (Content::Loading, Placement::Spinner { bounds }) => {
                draw_spinner(ctx, *bounds, base);
                Ok(())
            }
            (Content::Empty { prompt, style }, Placement::Placeholder { glyph, prompt: at }) => {
                draw_placeholder_glyph(ctx, *glyph, base, style.color);
                self.draw_text(ctx, text, prompt, style, *at, base)
            }
            (Content::Blocks { blocks, .. }, Placement::Blocks(frames)) => {
                if blocks.len() != frames.len() {
                    return Err(VerseCardError::render(
                        "arrangement frames do not match composition blocks",
                    ));
                }
                for (block, frame) in blocks.iter().zip(frames) {
                    match &block.kind {
                        BlockKind::Text { text: body, style } => {
                            self.draw_text(ctx, text, body, style, *frame, base)?;
                        }
                        BlockKind::Divider { color: c, thickness } => {
                            ctx.set_transform(base);
                            ctx.set_paint(color(*c));
                            ctx.fill_rect(&vk::Rect::new(
                                frame.x0,
                                frame.y0,
                                frame.x1,
                                frame.y0 + thickness.max(0.0),
                            ));
                        }
                        BlockKind::Footer {
                            leading,
                            trailing,
                            style,
                        } => {
                            if !leading.is_empty() {
                                let left = TextStyle {
                                    align: TextAlign::Left,
                                    ..style.clone()
                                };
                                self.draw_text(ctx, text, leading, &left, *frame, base)?;
                            }
                            if !trailing.is_empty() {
                                let right = TextStyle {
                                    align: TextAlign::Right,
                                    ..style.clone()
                                };
                                self.draw_text(ctx, text, trailing, &right, *frame, base)?;
                            }
                        }
                    }
                }
                Ok(())
            }
            _ => Err(VerseCardError::render(
                "arrangement placement does not match composition content",
            )),
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &mut TextLayoutEngine,
        body: &str,
        style: &TextStyle,
        frame: Rect,
        base: vk::Affine,
    ) -> VerseCardResult<()> {
        if body.trim().is_empty() {
            return Ok(());
        }
        let font = self.font_for(text, &style.font_family)?;
        let layout = text.layout(body, style, frame.width() as f32)?;

        ctx.set_transform(base * vk::Affine::translate((frame.x0, frame.y0)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id.into(),
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn draw_checkerboard(
    ctx: &mut vello_cpu::RenderContext,
    canvas: Rect,
    base: vk::Affine,
    dark_mode: bool,
) {
    let (even, odd) = if dark_mode { CHECKER_DARK } else { CHECKER_LIGHT };
    ctx.set_transform(base);
    ctx.set_paint(color(even));
    ctx.fill_rect(&logical_rect(canvas));

    ctx.set_paint(color(odd));
    let cols = (canvas.width() / CHECKER_CELL).ceil() as u32;
    let rows = (canvas.height() / CHECKER_CELL).ceil() as u32;
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 == 0 {
                continue;
            }
            let x = f64::from(col) * CHECKER_CELL;
            let y = f64::from(row) * CHECKER_CELL;
            ctx.fill_rect(&vk::Rect::new(x, y, x + CHECKER_CELL, y + CHECKER_CELL));
        }
    }
}

fn draw_spinner(ctx: &mut vello_cpu::RenderContext, bounds: Rect, base: vk::Affine) {
    use vk::Shape as _;

    let center = bounds.center();
    let ring = bounds.width().min(bounds.height()) * 0.35;
    let dot = bounds.width().min(bounds.height()) * 0.075;
    ctx.set_transform(base);
    for i in 0..SPINNER_DOTS {
        let t = i as f64 / SPINNER_DOTS as f64;
        let angle = t * std::f64::consts::TAU - std::f64::consts::FRAC_PI_2;
        let c = vk::Point::new(
            center.x + ring * angle.cos(),
            center.y + ring * angle.sin(),
        );
        ctx.set_paint(color(SPINNER_TONE.with_opacity(1.0 - 0.8 * t)));
        ctx.fill_path(&vk::Circle::new(c, dot).to_path(0.1));
    }
}

// Open-book outline: two rounded pages either side of a spine gap.
fn draw_placeholder_glyph(
    ctx: &mut vello_cpu::RenderContext,
    glyph: Rect,
    base: vk::Affine,
    tone: Rgba8,
) {
    use vk::Shape as _;

    let inset_x = glyph.width() * 0.125;
    let inset_y = glyph.height() * 0.2;
    let spine = glyph.width() * 0.04;
    let mid = glyph.center().x;
    let radius = glyph.width() * 0.06;

    ctx.set_transform(base);
    ctx.set_paint(color(tone));
    for (x0, x1) in [
        (glyph.x0 + inset_x, mid - spine),
        (mid + spine, glyph.x1 - inset_x),
    ] {
        let page = vk::RoundedRect::new(x0, glyph.y0 + inset_y, x1, glyph.y1 - inset_y, radius);
        ctx.fill_path(&page.to_path(0.1));
    }
}

fn color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn logical_rect(r: Rect) -> vk::Rect {
    vk::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VerseCardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VerseCardError::render("photo width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VerseCardError::render("photo height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VerseCardError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

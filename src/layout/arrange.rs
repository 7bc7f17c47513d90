use kurbo::Size;

use crate::{
    foundation::core::Rect,
    foundation::error::VerseCardResult,
    layout::compose::{BlockKind, Composition, Content, TextStyle},
    settings::model::VerticalAnchor,
};

/// Distance from the canvas edge for `start` and `end` anchors.
pub const ANCHOR_INSET: f64 = 48.0;
/// Side of the empty-state glyph box.
pub const PLACEHOLDER_GLYPH: f64 = 48.0;
/// Side of the loading spinner box.
pub const SPINNER_SIZE: f64 = 40.0;

/// Measures shaped text.
pub trait TextMeasure {
    /// Size of `text` wrapped at `max_width` with `style`.
    fn measure(&mut self, text: &str, style: &TextStyle, max_width: f64)
    -> VerseCardResult<Size>;
}

/// Where the text layer lands on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Spinner bounds.
    Spinner {
        /// Spinner box.
        bounds: Rect,
    },
    /// Empty-state glyph and prompt.
    Placeholder {
        /// Glyph box.
        glyph: Rect,
        /// Prompt paragraph box.
        prompt: Rect,
    },
    /// One frame per block, in block order.
    Blocks(Vec<Rect>),
}

/// A composition with every block positioned.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement {
    /// Source composition.
    pub composition: Composition,
    /// Resolved positions of the text layer.
    pub placement: Placement,
}

/// Position the text layer of `comp` using `measure` for text extents.
#[tracing::instrument(skip_all)]
pub fn arrange(comp: &Composition, measure: &mut dyn TextMeasure) -> VerseCardResult<Arrangement> {
    let canvas = comp.canvas.rect();
    let (w, h) = (canvas.width(), canvas.height());
    let center = canvas.center();

    let placement = match &comp.content {
        Content::Loading => Placement::Spinner {
            bounds: Rect::from_center_size(center, (SPINNER_SIZE, SPINNER_SIZE)),
        },
        Content::Empty { prompt, style } => {
            let max_w = (w - 2.0 * ANCHOR_INSET).max(1.0);
            let size = measure.measure(prompt, style, max_w)?;
            let gap = 16.0;
            let total = PLACEHOLDER_GLYPH + gap + size.height;
            let top = (h - total) * 0.5;
            let glyph = Rect::new(
                center.x - PLACEHOLDER_GLYPH * 0.5,
                top,
                center.x + PLACEHOLDER_GLYPH * 0.5,
                top + PLACEHOLDER_GLYPH,
            );
            let prompt_top = glyph.y1 + gap;
            let prompt = Rect::new(
                center.x - max_w * 0.5,
                prompt_top,
                center.x + max_w * 0.5,
                prompt_top + size.height,
            );
            Placement::Placeholder { glyph, prompt }
        }
        Content::Blocks {
            anchor,
            padding_x,
            blocks,
        } => {
            let content_w = (w - 2.0 * padding_x).max(1.0);
            let mut heights = Vec::with_capacity(blocks.len());
            for block in blocks {
                heights.push(block_height(&block.kind, content_w, measure)?);
            }
            let total: f64 = blocks
                .iter()
                .zip(&heights)
                .map(|(b, h)| b.spacing_before + h)
                .sum();

            let mut y = match anchor {
                VerticalAnchor::Start => ANCHOR_INSET,
                VerticalAnchor::Center => (h - total) * 0.5,
                VerticalAnchor::End => h - ANCHOR_INSET - total,
            };
            let mut frames = Vec::with_capacity(blocks.len());
            for (block, bh) in blocks.iter().zip(heights) {
                y += block.spacing_before;
                frames.push(Rect::new(*padding_x, y, padding_x + content_w, y + bh));
                y += bh;
            }
            Placement::Blocks(frames)
        }
    };

    Ok(Arrangement {
        composition: comp.clone(),
        placement,
    })
}

fn block_height(
    kind: &BlockKind,
    content_w: f64,
    measure: &mut dyn TextMeasure,
) -> VerseCardResult<f64> {
    match kind {
        BlockKind::Text { text, style } => Ok(measure.measure(text, style, content_w)?.height),
        BlockKind::Divider { thickness, .. } => Ok(thickness.max(0.0)),
        BlockKind::Footer {
            leading,
            trailing,
            style,
        } => {
            let mut h: f64 = 0.0;
            for label in [leading, trailing] {
                if !label.is_empty() {
                    h = h.max(measure.measure(label, style, content_w)?.height);
                }
            }
            if h == 0.0 {
                h = f64::from(style.font_size * style.line_height).max(0.0);
            }
            Ok(h)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/arrange.rs"]
mod tests;

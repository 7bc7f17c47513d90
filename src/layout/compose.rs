use crate::{
    corpus::model::{Surah, Verse},
    foundation::core::{Canvas, Rgba8},
    layout::order::{BlockId, Visibility, block_order, spacing_between},
    settings::model::{
        BackgroundMode, Settings, TextAlign, Typography, VerticalAnchor, parse_color_or,
    },
};

/// Prompt shown when no verse is available.
pub const EMPTY_PROMPT: &str = "Pilih surat dan ayat";
/// Footer font size in logical pixels.
pub const FOOTER_FONT_SIZE: f32 = 12.0;
/// Footer text opacity.
pub const FOOTER_OPACITY: f64 = 0.7;
/// Divider rule opacity.
pub const DIVIDER_OPACITY: f64 = 0.3;
/// Empty-state prompt and glyph opacity.
pub const PROMPT_OPACITY: f64 = 0.6;

/// Resolved text styling used for measurement and drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Size in logical pixels.
    pub font_size: f32,
    /// Straight-alpha color.
    pub color: Rgba8,
    /// Line height multiplier.
    pub line_height: f32,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl TextStyle {
    fn from_typography(t: &Typography, fallback: Rgba8) -> Self {
        Self {
            font_family: t.font_family.clone(),
            font_size: t.font_size,
            color: parse_color_or(&t.color, fallback),
            line_height: t.line_height,
            align: t.align,
        }
    }
}

/// Background layer of a composition.
#[derive(Clone, Debug, PartialEq)]
pub enum Background {
    /// Opaque fill.
    Solid(Rgba8),
    /// Nothing is drawn; previews show a checkerboard instead.
    Transparent,
    /// Cover-fitted photo from a `data:` URI.
    Photo(String),
}

/// Block payload.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    /// Wrapped paragraph.
    Text {
        /// Content.
        text: String,
        /// Styling.
        style: TextStyle,
    },
    /// Horizontal rule spanning the content width.
    Divider {
        /// Rule color.
        color: Rgba8,
        /// Rule thickness in logical pixels.
        thickness: f64,
    },
    /// One-line row with a left and a right label.
    Footer {
        /// Left-aligned chapter label.
        leading: String,
        /// Right-aligned verse label.
        trailing: String,
        /// Styling shared by both labels.
        style: TextStyle,
    },
}

/// One entry of the content group.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Which block this is.
    pub id: BlockId,
    /// Space above this block; zero for the first one.
    pub spacing_before: f64,
    /// Payload.
    pub kind: BlockKind,
}

/// What the text layer shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Verse fetch in flight: spinner only.
    Loading,
    /// No verse: placeholder glyph and prompt.
    Empty {
        /// Prompt text.
        prompt: String,
        /// Prompt styling.
        style: TextStyle,
    },
    /// The verse blocks, top to bottom.
    Blocks {
        /// Vertical anchor of the group.
        anchor: VerticalAnchor,
        /// Inset on both horizontal sides.
        padding_x: f64,
        /// Ordered blocks.
        blocks: Vec<Block>,
    },
}

/// Font-independent description of everything on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    /// Logical canvas.
    pub canvas: Canvas,
    /// Background layer.
    pub background: Background,
    /// Tint drawn above the photo and below the text.
    pub overlay: Option<Rgba8>,
    /// Text layer.
    pub content: Content,
    /// Chapter ordinal used for export file names.
    pub chapter_number: Option<u32>,
    /// Verse ordinal used for export file names and the footer.
    pub verse_number: u32,
}

/// Map settings and the current verse to a composition.
///
/// Pure: the result depends only on the arguments. `loading` wins over everything else in the
/// text layer; without a verse the empty-state placeholder is shown.
pub fn compose(
    settings: &Settings,
    verse: Option<&Verse>,
    chapter: Option<&Surah>,
    verse_number: u32,
    loading: bool,
) -> Composition {
    let background = match settings.background_mode() {
        BackgroundMode::Solid(c) => Background::Solid(c),
        BackgroundMode::Transparent => Background::Transparent,
        BackgroundMode::Photo(uri) => Background::Photo(uri),
    };

    let content = if loading {
        Content::Loading
    } else {
        match verse {
            Some(v) => Content::Blocks {
                anchor: settings.vertical_align,
                padding_x: f64::from(settings.horizontal_padding).max(0.0),
                blocks: compose_blocks(settings, v, chapter, verse_number),
            },
            None => Content::Empty {
                prompt: EMPTY_PROMPT.to_string(),
                style: TextStyle {
                    font_family: settings.translation.font_family.clone(),
                    font_size: 14.0,
                    color: parse_color_or(&settings.translation.color, Rgba8::WHITE)
                        .with_opacity(PROMPT_OPACITY),
                    line_height: 1.4,
                    align: TextAlign::Center,
                },
            },
        }
    };

    Composition {
        canvas: Canvas::STORY,
        background,
        overlay: settings.overlay_tint(),
        content,
        chapter_number: chapter.map(|c| c.number),
        verse_number,
    }
}

fn compose_blocks(
    settings: &Settings,
    verse: &Verse,
    chapter: Option<&Surah>,
    verse_number: u32,
) -> Vec<Block> {
    let order = block_order(settings.vertical_align, Visibility::from_settings(settings));
    let translation_color = parse_color_or(&settings.translation.color, Rgba8::WHITE);
    let content_gap = f64::from(settings.content_gap).max(0.0);

    let mut out = Vec::with_capacity(order.len());
    let mut prev: Option<BlockId> = None;
    for id in order {
        let kind = match id {
            BlockId::Arabic => BlockKind::Text {
                text: verse.arabic.clone(),
                style: TextStyle::from_typography(&settings.arabic, Rgba8::WHITE),
            },
            BlockId::Translation => BlockKind::Text {
                text: verse.translation.clone(),
                style: TextStyle::from_typography(&settings.translation, Rgba8::WHITE),
            },
            BlockId::Divider => BlockKind::Divider {
                color: translation_color.with_opacity(DIVIDER_OPACITY),
                thickness: 1.0,
            },
            BlockId::Footer => BlockKind::Footer {
                leading: chapter
                    .map(|c| format!("QS. {}", c.name_latin))
                    .unwrap_or_default(),
                trailing: format!("Ayat {verse_number}"),
                style: TextStyle {
                    font_family: settings.translation.font_family.clone(),
                    font_size: FOOTER_FONT_SIZE,
                    color: translation_color.with_opacity(FOOTER_OPACITY),
                    line_height: 1.4,
                    align: TextAlign::Left,
                },
            },
        };
        let spacing_before = prev
            .map(|p| spacing_between(p, id, content_gap))
            .unwrap_or(0.0);
        out.push(Block {
            id,
            spacing_before,
            kind,
        });
        prev = Some(id);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/compose.rs"]
mod tests;

use std::{collections::BTreeMap, path::Path, sync::Arc};

use kurbo::Size;

use crate::{
    foundation::error::{VerseCardError, VerseCardResult},
    layout::arrange::TextMeasure,
    layout::compose::TextStyle,
    settings::model::TextAlign,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A registered font family and the bytes of its first face.
#[derive(Clone)]
pub struct LoadedFamily {
    /// Family name as reported by the font.
    pub name: String,
    /// Font file bytes used to draw glyph outlines.
    pub font_bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for LoadedFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFamily")
            .field("name", &self.name)
            .field("font_bytes_len", &self.font_bytes.len())
            .finish()
    }
}

/// Font registry plus Parley contexts for shaping text blocks.
///
/// Only fonts registered through [`TextLayoutEngine::register_font_bytes`] or
/// [`TextLayoutEngine::load_fonts_dir`] are visible; a family that was never registered fails
/// with [`VerseCardError::Font`].
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: BTreeMap<String, LoadedFamily>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new engine with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: BTreeMap::new(),
        }
    }

    /// Register every face in `font_bytes`; returns the family names it provided.
    pub fn register_font_bytes(&mut self, font_bytes: Vec<u8>) -> VerseCardResult<Vec<String>> {
        let bytes = Arc::new(font_bytes);
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        if registered.is_empty() {
            return Err(VerseCardError::font("no font families registered from font bytes"));
        }

        let mut names = Vec::with_capacity(registered.len());
        for (family_id, _) in registered {
            let name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| VerseCardError::font("registered font family has no name"))?
                .to_string();
            self.families
                .entry(name.to_lowercase())
                .or_insert_with(|| LoadedFamily {
                    name: name.clone(),
                    font_bytes: bytes.clone(),
                });
            names.push(name);
        }
        Ok(names)
    }

    /// Register every `.ttf`/`.otf`/`.ttc` file directly inside `dir`.
    ///
    /// Unreadable files are skipped with a warning. Returns the number of files registered.
    pub fn load_fonts_dir(&mut self, dir: &Path) -> usize {
        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::debug!(dir = %dir.display(), "font dir not readable");
            return 0;
        };

        let mut paths: Vec<_> = rd.flatten().map(|e| e.path()).collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            let result = std::fs::read(&path)
                .map_err(|e| VerseCardError::font(format!("read font file: {e}")))
                .and_then(|bytes| self.register_font_bytes(bytes));
            match result {
                Ok(names) => {
                    tracing::debug!(path = %path.display(), ?names, "font registered");
                    loaded += 1;
                }
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "font skipped"),
            }
        }
        loaded
    }

    /// Names of all registered families, sorted case-insensitively.
    pub fn families(&self) -> Vec<String> {
        self.families.values().map(|f| f.name.clone()).collect()
    }

    /// Look up a family by case-insensitive name.
    pub fn resolve(&self, family: &str) -> VerseCardResult<&LoadedFamily> {
        self.families
            .get(&family.trim().to_lowercase())
            .ok_or_else(|| VerseCardError::font(format!("font '{family}' is not loaded")))
    }

    /// Shape and wrap `text` at `max_width` with `style`.
    pub fn layout(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width: f32,
    ) -> VerseCardResult<parley::Layout<TextBrushRgba8>> {
        if !style.font_size.is_finite() {
            return Err(VerseCardError::validation("font size must be finite"));
        }
        let size_px = style.font_size.max(1.0);
        let line_height = if style.line_height.is_finite() && style.line_height > 0.0 {
            style.line_height
        } else {
            1.0
        };
        let max_width = if max_width.is_finite() {
            max_width.max(1.0)
        } else {
            1.0
        };
        let family_name = self.resolve(&style.font_family)?.name.clone();
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(format!(
                "\"{family_name}\""
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LineHeight(
            parley::style::LineHeight::FontSizeRelative(line_height),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width));
        layout.align(
            Some(max_width),
            alignment_for(style.align),
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width: f64,
    ) -> VerseCardResult<Size> {
        let layout = self.layout(text, style, max_width as f32)?;
        Ok(Size::new(f64::from(layout.width()), f64::from(layout.height())))
    }
}

fn alignment_for(align: TextAlign) -> parley::Alignment {
    match align {
        TextAlign::Left => parley::Alignment::Left,
        TextAlign::Center => parley::Alignment::Center,
        TextAlign::Right => parley::Alignment::Right,
        TextAlign::Justify => parley::Alignment::Justify,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;

/// Horizontal alignment of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    Left,
    /// Center each line.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
    /// Stretch lines to fill the width.
    Justify,
}

/// Where the content group sits vertically on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    /// Top, below a fixed inset.
    Start,
    /// Vertically centered.
    #[default]
    Center,
    /// Bottom, above a fixed inset.
    End,
}

/// Typography of one text block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    /// Font family name, resolved against the loaded font book.
    pub font_family: String,
    /// Font size in logical pixels.
    pub font_size: f32,
    /// Hex text color.
    pub color: String,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl Typography {
    fn arabic_default() -> Self {
        Self {
            font_family: "Amiri".to_string(),
            font_size: 32.0,
            color: "#ffffff".to_string(),
            line_height: 2.0,
            align: TextAlign::Center,
        }
    }

    fn translation_default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 16.0,
            color: "#e5e5e5".to_string(),
            line_height: 1.6,
            align: TextAlign::Center,
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self::translation_default()
    }
}

/// Every user-adjustable visual parameter of one composition.
///
/// A snapshot is never patched in place by the session: edits build a new value (usually with
/// struct update syntax) and replace the live one wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Original-script block typography.
    pub arabic: Typography,
    /// Translation block typography.
    pub translation: Typography,

    /// Solid background color (hex).
    pub background_color: String,
    /// Transparent background; takes precedence over a photo.
    pub is_transparent: bool,
    /// Photo background as a `data:` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Draw a tint above the photo.
    pub overlay_enabled: bool,
    /// Tint color (hex).
    pub overlay_color: String,
    /// Tint opacity in percent.
    pub overlay_opacity: f32,

    /// Gap between the Arabic and translation blocks.
    pub content_gap: f32,
    /// Inset applied on both horizontal sides.
    pub horizontal_padding: f32,
    /// Vertical anchor of the content group.
    pub vertical_align: VerticalAnchor,

    /// Show the chapter/verse footer.
    pub show_surah_info: bool,
    /// Show a divider rule next to the footer.
    pub show_divider: bool,
    /// Show the translation block.
    pub show_translation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arabic: Typography::arabic_default(),
            translation: Typography::translation_default(),
            background_color: "#0f172a".to_string(),
            is_transparent: false,
            background_image: None,
            overlay_enabled: true,
            overlay_color: "#000000".to_string(),
            overlay_opacity: 40.0,
            content_gap: 32.0,
            horizontal_padding: 32.0,
            vertical_align: VerticalAnchor::Center,
            show_surah_info: true,
            show_divider: true,
            show_translation: true,
        }
    }
}

/// Background mode in effect after resolving the settings flags.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundMode {
    /// Opaque fill.
    Solid(Rgba8),
    /// True alpha; shown as a checkerboard while editing.
    Transparent,
    /// Photo payload as a `data:` URI.
    Photo(String),
}

/// User choice of background, used to build a consistent snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundChoice {
    /// Solid color (hex).
    Solid(String),
    /// Transparent.
    Transparent,
    /// Photo `data:` URI.
    Photo(String),
}

impl Settings {
    /// Resolve the single active background mode.
    ///
    /// Precedence is transparent, then photo, then solid color. An unparsable solid color falls
    /// back to black.
    pub fn background_mode(&self) -> BackgroundMode {
        if self.is_transparent {
            return BackgroundMode::Transparent;
        }
        if let Some(uri) = self.background_image.as_ref().filter(|s| !s.is_empty()) {
            return BackgroundMode::Photo(uri.clone());
        }
        BackgroundMode::Solid(parse_color_or(&self.background_color, Rgba8::BLACK))
    }

    /// Copy of `self` with exactly one background mode selected.
    ///
    /// Choosing a solid color or transparency drops the photo; choosing a photo clears the
    /// transparent flag. The solid color is kept for photo/transparent choices so switching back
    /// restores it.
    pub fn with_background(&self, choice: BackgroundChoice) -> Settings {
        match choice {
            BackgroundChoice::Solid(color) => Settings {
                background_color: color,
                is_transparent: false,
                background_image: None,
                ..self.clone()
            },
            BackgroundChoice::Transparent => Settings {
                is_transparent: true,
                background_image: None,
                ..self.clone()
            },
            BackgroundChoice::Photo(uri) => Settings {
                is_transparent: false,
                background_image: Some(uri),
                ..self.clone()
            },
        }
    }

    /// Tint to draw above the photo, if any.
    ///
    /// Only present when a photo is the active background and the overlay is enabled.
    pub fn overlay_tint(&self) -> Option<Rgba8> {
        if !self.overlay_enabled {
            return None;
        }
        match self.background_mode() {
            BackgroundMode::Photo(_) => {
                let base = parse_color_or(&self.overlay_color, Rgba8::BLACK);
                Some(base.with_opacity(f64::from(self.overlay_opacity) / 100.0))
            }
            _ => None,
        }
    }
}

/// Parse a hex color, logging and substituting `fallback` when it is malformed.
pub fn parse_color_or(hex: &str, fallback: Rgba8) -> Rgba8 {
    match Rgba8::parse_hex(hex) {
        Ok(c) => c,
        Err(err) => {
            tracing::debug!(error = %err, "falling back to default color");
            fallback
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;

use crate::settings::model::{Settings, VerticalAnchor};

/// Margin between the text blocks and the footer section.
pub const FOOTER_MARGIN: f64 = 32.0;
/// Padding between the divider rule and the footer row.
pub const RULE_PADDING: f64 = 16.0;

/// Identifies one block of the content group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// Original-script text.
    Arabic,
    /// Translated text.
    Translation,
    /// Thin rule separating the footer from the text.
    Divider,
    /// Chapter name and verse number row.
    Footer,
}

/// Which optional blocks are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    /// Translation block.
    pub translation: bool,
    /// Footer row.
    pub footer: bool,
    /// Divider rule; only drawn together with the footer.
    pub divider: bool,
}

impl Visibility {
    /// Flags taken from a settings snapshot.
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            translation: s.show_translation,
            footer: s.show_surah_info,
            divider: s.show_divider,
        }
    }
}

/// Top-to-bottom order of the visible blocks for `anchor`.
///
/// For `start` and `center` the footer follows the text with the divider above it. For `end`
/// the footer moves above the text and the divider moves below the footer, keeping the rule
/// between footer and text.
pub fn block_order(anchor: VerticalAnchor, vis: Visibility) -> Vec<BlockId> {
    let mut text = vec![BlockId::Arabic];
    if vis.translation {
        text.push(BlockId::Translation);
    }

    let mut footer = Vec::new();
    if vis.footer {
        if vis.divider {
            footer.push(BlockId::Divider);
        }
        footer.push(BlockId::Footer);
    }

    match anchor {
        VerticalAnchor::Start | VerticalAnchor::Center => {
            text.extend(footer);
            text
        }
        VerticalAnchor::End => {
            footer.reverse();
            footer.extend(text);
            footer
        }
    }
}

/// Vertical space inserted between two adjacent blocks.
pub fn spacing_between(prev: BlockId, next: BlockId, content_gap: f64) -> f64 {
    use BlockId::*;
    match (prev, next) {
        (Arabic, Translation) | (Translation, Arabic) => content_gap,
        (Divider, Footer) | (Footer, Divider) => RULE_PADDING,
        (Arabic | Translation, Divider | Footer) | (Divider | Footer, Arabic | Translation) => {
            FOOTER_MARGIN
        }
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/order.rs"]
mod tests;

//! versecard composes Quran verses into styled vertical images.
//!
//! A verse fetched from the remote corpus is laid out over a solid, transparent or photo
//! background on a 360x640 canvas, rasterized on the CPU, and exported as a 1080x1920 PNG or
//! JPEG. The typical flow goes through [`Studio`]:
//!
//! - [`Studio::open`] restores the last session and presets from a [`KeyValueStore`]
//! - [`Studio::select_chapter`] / [`Studio::select_verse`] fetch from a [`VerseSource`]
//! - [`Studio::update_settings`] and the preset methods adjust the look
//! - [`Studio::preview`] and [`Studio::export`] render it
//!
//! The lower layers ([`compose`], [`arrange`], [`CpuRasterizer`], [`Exporter`]) are public for
//! callers that want to drive rendering themselves.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Environment-driven runtime configuration.
pub mod config;
pub(crate) mod corpus;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod presets;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod settings;
pub(crate) mod storage;
mod studio;

pub use crate::foundation::core::{
    Affine, Canvas, Point, Rect, Rgba8, Rgba8Premul, SUPERSAMPLE_FACTOR, Vec2,
};
pub use crate::foundation::error::{VerseCardError, VerseCardResult};

pub use crate::assets::decode::{
    PreparedImage, decode_data_uri_image, decode_image, parse_data_uri, to_data_uri,
};
pub use crate::assets::fonts::{LoadedFamily, TextBrushRgba8, TextLayoutEngine};
pub use crate::config::AppConfig;
pub use crate::corpus::client::{HttpVerseSource, VerseSource, find_verse};
pub use crate::corpus::model::{Surah, Verse};
pub use crate::export::pipeline::{
    ExportFormat, ExportGuard, ExportOutcome, ExportedImage, Exporter, MountedSurface,
};
pub use crate::layout::arrange::{
    ANCHOR_INSET, Arrangement, Placement, TextMeasure, arrange,
};
pub use crate::layout::compose::{
    Background, Block, BlockKind, Composition, Content, EMPTY_PROMPT, TextStyle,
    compose,
};
pub use crate::layout::order::{
    BlockId, FOOTER_MARGIN, RULE_PADDING, Visibility, block_order, spacing_between,
};
pub use crate::presets::store::{Preset, PresetStore};
pub use crate::render::cpu::CpuRasterizer;
pub use crate::render::encode::{JPEG_QUALITY, encode_jpeg, encode_png};
pub use crate::render::{FrameRGBA, RenderTarget};
pub use crate::session::editor::{EditorSession, FetchTicket, PersistEffect, VerseState};
pub use crate::settings::model::{
    BackgroundChoice, BackgroundMode, Settings, TextAlign, Typography, VerticalAnchor,
    parse_color_or,
};
pub use crate::storage::kv::{FileStore, KeyValueStore, MemoryStore, keys, load_json, save_json};
pub use crate::studio::Studio;

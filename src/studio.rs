use std::path::Path;

use crate::{
    assets::fonts::TextLayoutEngine,
    corpus::client::VerseSource,
    corpus::model::Verse,
    export::pipeline::{ExportFormat, ExportOutcome, Exporter, MountedSurface},
    foundation::error::{VerseCardError, VerseCardResult},
    layout::arrange::{Arrangement, arrange},
    presets::store::{Preset, PresetStore},
    render::cpu::CpuRasterizer,
    render::{FrameRGBA, RenderTarget},
    session::editor::{EditorSession, PersistEffect},
    settings::model::{BackgroundChoice, Settings},
    storage::kv::KeyValueStore,
};

/// The editor as a whole: session state wired to a verse source, storage, presets, fonts and
/// the exporter.
///
/// Every state change is persisted before the method returns.
pub struct Studio<S, K> {
    source: S,
    kv: K,
    session: EditorSession,
    presets: PresetStore,
    text: TextLayoutEngine,
    rasterizer: CpuRasterizer,
    exporter: Exporter,
}

impl<S: VerseSource, K: KeyValueStore> Studio<S, K> {
    /// Restore the last session and presets from `kv`. No fonts are loaded yet.
    pub fn open(source: S, kv: K) -> Self {
        let session = EditorSession::restore(&kv);
        let presets = PresetStore::load_all(&kv);
        Self {
            source,
            kv,
            session,
            presets,
            text: TextLayoutEngine::new(),
            rasterizer: CpuRasterizer::new(),
            exporter: Exporter::new(),
        }
    }

    /// Current session state.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Backing store.
    pub fn store(&self) -> &K {
        &self.kv
    }

    /// Saved presets in creation order.
    pub fn presets(&self) -> &[Preset] {
        self.presets.list()
    }

    /// Font registry used for layout and drawing.
    pub fn text_engine(&mut self) -> &mut TextLayoutEngine {
        &mut self.text
    }

    /// Register every font file in `dir`; returns how many files loaded.
    pub fn load_fonts_dir(&mut self, dir: &Path) -> usize {
        self.text.load_fonts_dir(dir)
    }

    /// Reload the chapter list from the source; returns how many chapters are known.
    pub fn refresh_chapters(&mut self) -> usize {
        let chapters = self.source.list_chapters();
        let n = chapters.len();
        self.session.set_chapters(chapters);
        n
    }

    /// Select a chapter (verse resets to 1) and fetch its first verse.
    pub fn select_chapter(&mut self, chapter: u32) -> VerseCardResult<Option<&Verse>> {
        let effects = self.session.select_chapter(chapter)?;
        self.persist(&effects)?;
        Ok(self.load_verse())
    }

    /// Select a verse of the current chapter and fetch it.
    pub fn select_verse(&mut self, verse: u32) -> VerseCardResult<Option<&Verse>> {
        let effects = self.session.select_verse(verse)?;
        self.persist(&effects)?;
        Ok(self.load_verse())
    }

    /// Fetch the selected verse, replacing any local edits.
    pub fn load_verse(&mut self) -> Option<&Verse> {
        let ticket = self.session.begin_verse_fetch();
        let verse = self.source.get_verse(ticket.chapter, ticket.verse);
        self.session.finish_verse_fetch(ticket, verse);
        self.session.current_verse()
    }

    /// Replace the Arabic text of the loaded verse for this session.
    pub fn edit_arabic(&mut self, text: impl Into<String>) -> bool {
        self.session.edit_arabic(text)
    }

    /// Replace the translation of the loaded verse for this session.
    pub fn edit_translation(&mut self, text: impl Into<String>) -> bool {
        self.session.edit_translation(text)
    }

    /// Replace the settings wholesale and persist them.
    pub fn replace_settings(&mut self, settings: Settings) -> VerseCardResult<()> {
        let effects = self.session.replace_settings(settings);
        self.persist(&effects)
    }

    /// Edit a copy of the settings with `f`, then replace and persist.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) -> VerseCardResult<()> {
        let mut next = self.session.settings().clone();
        f(&mut next);
        self.replace_settings(next)
    }

    /// Switch to exactly one background mode.
    pub fn set_background(&mut self, choice: BackgroundChoice) -> VerseCardResult<()> {
        let next = self.session.settings().with_background(choice);
        self.replace_settings(next)
    }

    /// Restore default settings.
    pub fn reset_settings(&mut self) -> VerseCardResult<()> {
        self.replace_settings(Settings::default())
    }

    /// Save the current settings as a preset; a blank name is a no-op.
    pub fn save_preset(&mut self, name: &str) -> VerseCardResult<Option<Preset>> {
        let snapshot = self.session.settings().clone();
        self.presets.save(&mut self.kv, name, &snapshot)
    }

    /// Apply the preset with `id` to the settings.
    pub fn apply_preset(&mut self, id: &str) -> VerseCardResult<()> {
        let preset = self
            .presets
            .get(id)
            .ok_or_else(|| VerseCardError::validation(format!("no preset with id '{id}'")))?;
        let settings = PresetStore::apply(preset);
        self.replace_settings(settings)
    }

    /// Delete the preset with `id`; returns whether one was removed.
    pub fn delete_preset(&mut self, id: &str) -> VerseCardResult<bool> {
        self.presets.delete(&mut self.kv, id)
    }

    /// Set the preview theme.
    pub fn set_dark_mode(&mut self, dark_mode: bool) -> VerseCardResult<()> {
        let effects = self.session.set_dark_mode(dark_mode);
        self.persist(&effects)
    }

    /// Flip the preview theme; returns the new value.
    pub fn toggle_dark_mode(&mut self) -> VerseCardResult<bool> {
        let next = !self.session.dark_mode();
        self.set_dark_mode(next)?;
        Ok(next)
    }

    /// Lay out the current composition in logical units.
    pub fn arrangement(&mut self) -> VerseCardResult<Arrangement> {
        arrange(&self.session.composition(), &mut self.text)
    }

    /// Render the preview at 1x with theme-dependent chrome.
    pub fn preview(&mut self) -> VerseCardResult<FrameRGBA> {
        let arrangement = self.arrangement()?;
        let target = RenderTarget::Preview {
            dark_mode: self.session.dark_mode(),
        };
        self.rasterizer
            .rasterize(&arrangement, &mut self.text, 1, target)
    }

    /// Export the current composition.
    ///
    /// The exclusive borrow already serializes exports made through `Studio`, so this never
    /// returns [`ExportOutcome::Busy`]. Callers sharing the slot across threads go through
    /// [`Studio::exporter`] and [`Exporter::begin`].
    pub fn export(&mut self, format: ExportFormat) -> VerseCardResult<ExportOutcome> {
        let composition = self.session.composition();
        let surface = MountedSurface {
            composition: &composition,
            chapter: self.session.chapter(),
            verse: self.session.verse(),
        };
        self.exporter
            .export(Some(surface), format, &mut self.text, &mut self.rasterizer)
    }

    /// The exporter, for callers that need to observe or hold the in-flight slot.
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    fn persist(&mut self, effects: &[PersistEffect]) -> VerseCardResult<()> {
        self.session.apply_effects(&mut self.kv, effects)
    }
}

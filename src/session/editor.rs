use crate::{
    corpus::model::{Surah, Verse},
    foundation::error::{VerseCardError, VerseCardResult},
    layout::compose::{Composition, compose},
    settings::model::Settings,
    storage::kv::{KeyValueStore, keys, load_json, save_json},
};

/// State that must be written to storage after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistEffect {
    /// Selected chapter and verse.
    SaveSelection,
    /// Full settings snapshot.
    SaveSettings,
    /// Dark-mode flag.
    SaveDarkMode,
}

/// Lifecycle of the verse shown by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum VerseState {
    /// Nothing requested yet for the current selection.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The fetched verse, possibly edited locally.
    Ready(Verse),
    /// The fetch failed or the verse does not exist.
    Missing,
}

/// Identifies one verse request; only the most recent ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonic request token.
    pub token: u64,
    /// Chapter requested.
    pub chapter: u32,
    /// Verse requested.
    pub verse: u32,
}

/// Editing state: settings, selection, current verse, chapter list and theme.
///
/// Transitions are plain methods that mutate the session and return the [`PersistEffect`]s the
/// caller must apply with [`EditorSession::apply_effects`].
#[derive(Clone, Debug)]
pub struct EditorSession {
    settings: Settings,
    chapter: u32,
    verse: u32,
    verse_state: VerseState,
    chapters: Vec<Surah>,
    dark_mode: bool,
    next_token: u64,
    pending: Option<u64>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            chapter: 1,
            verse: 1,
            verse_state: VerseState::Idle,
            chapters: Vec::new(),
            dark_mode: false,
            next_token: 1,
            pending: None,
        }
    }
}

impl EditorSession {
    /// Fresh session on Al-Fatihah 1 with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted selection, theme and settings.
    ///
    /// Missing or corrupt values fall back to defaults; a zero ordinal counts as corrupt.
    pub fn restore(kv: &dyn KeyValueStore) -> Self {
        let mut session = Self::default();
        if let Some(chapter) = load_json::<u32>(kv, keys::SELECTED_SURAH).filter(|&n| n >= 1) {
            session.chapter = chapter;
        }
        if let Some(verse) = load_json::<u32>(kv, keys::SELECTED_AYAT).filter(|&n| n >= 1) {
            session.verse = verse;
        }
        if let Some(dark) = load_json::<bool>(kv, keys::DARK_MODE) {
            session.dark_mode = dark;
        }
        if let Some(settings) = load_json::<Settings>(kv, keys::SETTINGS) {
            session.settings = settings;
        }
        tracing::debug!(
            chapter = session.chapter,
            verse = session.verse,
            dark_mode = session.dark_mode,
            "session restored"
        );
        session
    }

    /// Write the state named by `effects`.
    pub fn apply_effects(
        &self,
        kv: &mut dyn KeyValueStore,
        effects: &[PersistEffect],
    ) -> VerseCardResult<()> {
        for effect in effects {
            match effect {
                PersistEffect::SaveSelection => {
                    save_json(kv, keys::SELECTED_SURAH, &self.chapter)?;
                    save_json(kv, keys::SELECTED_AYAT, &self.verse)?;
                }
                PersistEffect::SaveSettings => save_json(kv, keys::SETTINGS, &self.settings)?,
                PersistEffect::SaveDarkMode => save_json(kv, keys::DARK_MODE, &self.dark_mode)?,
            }
        }
        Ok(())
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Selected chapter ordinal.
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Selected verse ordinal.
    pub fn verse(&self) -> u32 {
        self.verse
    }

    /// Lifecycle of the current verse.
    pub fn verse_state(&self) -> &VerseState {
        &self.verse_state
    }

    /// The loaded verse, if any.
    pub fn current_verse(&self) -> Option<&Verse> {
        match &self.verse_state {
            VerseState::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Known chapters, possibly empty.
    pub fn chapters(&self) -> &[Surah] {
        &self.chapters
    }

    /// Metadata of the selected chapter, when the list is loaded.
    pub fn current_chapter(&self) -> Option<&Surah> {
        self.chapters.iter().find(|c| c.number == self.chapter)
    }

    /// Whether preview chrome uses dark tones.
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Replace the chapter list.
    pub fn set_chapters(&mut self, chapters: Vec<Surah>) {
        tracing::debug!(count = chapters.len(), "chapters loaded");
        self.chapters = chapters;
    }

    /// Select a chapter; the verse resets to 1.
    pub fn select_chapter(&mut self, chapter: u32) -> VerseCardResult<Vec<PersistEffect>> {
        if chapter == 0 {
            return Err(VerseCardError::validation("chapter ordinal starts at 1"));
        }
        self.chapter = chapter;
        self.verse = 1;
        self.invalidate_verse();
        tracing::debug!(chapter, "chapter selected");
        Ok(vec![PersistEffect::SaveSelection])
    }

    /// Select a verse of the current chapter.
    ///
    /// Ordinals beyond the chapter's verse count are accepted; the fetch then ends in
    /// [`VerseState::Missing`].
    pub fn select_verse(&mut self, verse: u32) -> VerseCardResult<Vec<PersistEffect>> {
        if verse == 0 {
            return Err(VerseCardError::validation("verse ordinal starts at 1"));
        }
        self.verse = verse;
        self.invalidate_verse();
        tracing::debug!(chapter = self.chapter, verse, "verse selected");
        Ok(vec![PersistEffect::SaveSelection])
    }

    fn invalidate_verse(&mut self) {
        self.pending = None;
        self.verse_state = VerseState::Idle;
    }

    /// Start fetching the selected verse; any earlier ticket becomes stale.
    pub fn begin_verse_fetch(&mut self) -> FetchTicket {
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(token);
        self.verse_state = VerseState::Loading;
        FetchTicket {
            token,
            chapter: self.chapter,
            verse: self.verse,
        }
    }

    /// Complete a fetch. Returns `false` and changes nothing when `ticket` is stale.
    pub fn finish_verse_fetch(&mut self, ticket: FetchTicket, verse: Option<Verse>) -> bool {
        if self.pending != Some(ticket.token) {
            tracing::debug!(token = ticket.token, "stale verse fetch discarded");
            return false;
        }
        self.pending = None;
        self.verse_state = match verse {
            Some(v) => VerseState::Ready(v),
            None => VerseState::Missing,
        };
        true
    }

    /// Overwrite the Arabic text of the loaded verse for this session only.
    pub fn edit_arabic(&mut self, text: impl Into<String>) -> bool {
        match &mut self.verse_state {
            VerseState::Ready(v) => {
                v.arabic = text.into();
                true
            }
            _ => false,
        }
    }

    /// Overwrite the translation of the loaded verse for this session only.
    pub fn edit_translation(&mut self, text: impl Into<String>) -> bool {
        match &mut self.verse_state {
            VerseState::Ready(v) => {
                v.translation = text.into();
                true
            }
            _ => false,
        }
    }

    /// Replace the settings wholesale.
    pub fn replace_settings(&mut self, settings: Settings) -> Vec<PersistEffect> {
        self.settings = settings;
        vec![PersistEffect::SaveSettings]
    }

    /// Set the preview theme.
    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Vec<PersistEffect> {
        self.dark_mode = dark_mode;
        vec![PersistEffect::SaveDarkMode]
    }

    /// Compose what the preview currently shows.
    pub fn composition(&self) -> Composition {
        compose(
            &self.settings,
            self.current_verse(),
            self.current_chapter(),
            self.verse,
            matches!(self.verse_state, VerseState::Loading),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;

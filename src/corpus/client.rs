use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    corpus::model::{Envelope, Surah, SuratDetailDto, SuratDto, Verse},
    foundation::error::{VerseCardError, VerseCardResult},
};

/// Read access to the verse corpus.
///
/// Implementations never surface errors: failures are logged and mapped to an empty list or
/// an absent verse so callers can fall back to an empty UI state.
pub trait VerseSource {
    /// All chapters with their metadata, or an empty list on failure.
    fn list_chapters(&self) -> Vec<Surah>;

    /// One verse of `chapter` selected by its ordinal, or `None` on failure or when the
    /// ordinal does not exist.
    fn get_verse(&self, chapter: u32, verse: u32) -> Option<Verse>;
}

/// [`VerseSource`] backed by the remote HTTP verse API.
#[derive(Clone, Debug)]
pub struct HttpVerseSource {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpVerseSource {
    /// Build a client for `base` (e.g. `https://equran.id/api/v2`).
    ///
    /// `timeout` of `None` waits indefinitely.
    pub fn new(base: impl Into<String>, timeout: Option<Duration>) -> VerseCardResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("versecard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| VerseCardError::fetch(format!("build http client: {e}")))?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch the chapter list, surfacing errors.
    pub fn try_list_chapters(&self) -> VerseCardResult<Vec<Surah>> {
        let list: Envelope<Vec<SuratDto>> = self.get_json("surat")?;
        Ok(list.into_inner().into_iter().map(Surah::from).collect())
    }

    /// Fetch every verse of `chapter`, surfacing errors.
    pub fn try_fetch_chapter(&self, chapter: u32) -> VerseCardResult<Vec<Verse>> {
        let detail: Envelope<SuratDetailDto> = self.get_json(&format!("surat/{chapter}"))?;
        Ok(detail
            .into_inner()
            .ayat
            .into_iter()
            .map(Verse::from)
            .collect())
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> VerseCardResult<T> {
        let url = format!("{}/{}", self.base, path);
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| VerseCardError::fetch(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VerseCardError::fetch(format!("GET {url}: HTTP {status}")));
        }
        let body = resp
            .text()
            .map_err(|e| VerseCardError::fetch(format!("read body of {url}: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| VerseCardError::serde(format!("parse response of {url}: {e}")))
    }
}

impl VerseSource for HttpVerseSource {
    fn list_chapters(&self) -> Vec<Surah> {
        match self.try_list_chapters() {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "chapter list unavailable");
                Vec::new()
            }
        }
    }

    fn get_verse(&self, chapter: u32, verse: u32) -> Option<Verse> {
        match self.try_fetch_chapter(chapter) {
            Ok(verses) => {
                let found = find_verse(verses, verse);
                if found.is_none() {
                    tracing::warn!(chapter, verse, "verse ordinal not found in chapter");
                }
                found
            }
            Err(err) => {
                tracing::warn!(chapter, verse, error = %err, "verse fetch failed");
                None
            }
        }
    }
}

/// Linear scan for the verse with ordinal `number`.
pub fn find_verse(verses: Vec<Verse>, number: u32) -> Option<Verse> {
    verses.into_iter().find(|v| v.number == number)
}

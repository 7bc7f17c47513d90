use serde::{Deserialize, Serialize};

/// Chapter metadata as listed by the verse API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
    /// 1-based chapter ordinal.
    pub number: u32,
    /// Name in Arabic script.
    pub name: String,
    /// Romanized name, e.g. `Al-Fatihah`.
    pub name_latin: String,
    /// Number of verses in the chapter.
    pub verse_count: u32,
}

/// One verse of a chapter.
///
/// `arabic` and `translation` may be edited in-session before export; those edits never
/// travel back to the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 1-based ordinal within its chapter.
    pub number: u32,
    /// Original-script text.
    pub arabic: String,
    /// Romanized transliteration, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    /// Translated text.
    pub translation: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuratDto {
    pub nomor: u32,
    pub nama: String,
    pub nama_latin: String,
    pub jumlah_ayat: u32,
}

impl From<SuratDto> for Surah {
    fn from(d: SuratDto) -> Self {
        Self {
            number: d.nomor,
            name: d.nama,
            name_latin: d.nama_latin,
            verse_count: d.jumlah_ayat,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuratDetailDto {
    #[serde(default)]
    pub ayat: Vec<AyatDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AyatDto {
    pub nomor_ayat: u32,
    pub teks_arab: String,
    #[serde(default)]
    pub teks_latin: Option<String>,
    pub teks_indonesia: String,
}

impl From<AyatDto> for Verse {
    fn from(d: AyatDto) -> Self {
        Self {
            number: d.nomor_ayat,
            arabic: d.teks_arab,
            transliteration: d.teks_latin.filter(|s| !s.trim().is_empty()),
            translation: d.teks_indonesia,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/model.rs"]
mod tests;

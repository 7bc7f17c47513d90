use std::{path::PathBuf, time::Duration};

use crate::foundation::error::{VerseCardError, VerseCardResult};

/// Verse API used when `VERSECARD_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "https://equran.id/api/v2";

/// Environment variable names read by [`AppConfig::from_env`].
pub mod env {
    /// Verse API base URL.
    pub const API_BASE: &str = "VERSECARD_API_BASE";
    /// Directory holding persisted state.
    pub const STATE_DIR: &str = "VERSECARD_STATE_DIR";
    /// Directory scanned for font files.
    pub const FONTS_DIR: &str = "VERSECARD_FONTS_DIR";
    /// Directory exports are written to.
    pub const OUT_DIR: &str = "VERSECARD_OUT_DIR";
    /// HTTP timeout in whole seconds.
    pub const HTTP_TIMEOUT_SECS: &str = "VERSECARD_HTTP_TIMEOUT_SECS";
}

/// Runtime locations and network settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Verse API base URL, without a trailing slash.
    pub api_base: String,
    /// Directory for the key/value store.
    pub state_dir: PathBuf,
    /// Directory scanned for `.ttf`/`.otf`/`.ttc` fonts.
    pub fonts_dir: PathBuf,
    /// Directory exported images are written to.
    pub out_dir: PathBuf,
    /// Per-request HTTP timeout; `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> VerseCardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for variables; unset or blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> VerseCardResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base = get(env::API_BASE)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let state_dir = get(env::STATE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);
        let fonts_dir = get(env::FONTS_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| state_dir.join("fonts"));
        let out_dir = get(env::OUT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let http_timeout = match get(env::HTTP_TIMEOUT_SECS) {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    VerseCardError::validation(format!(
                        "{} must be a whole number of seconds, got '{raw}'",
                        env::HTTP_TIMEOUT_SECS
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            api_base,
            state_dir,
            fonts_dir,
            out_dir,
            http_timeout,
        })
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("versecard")
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

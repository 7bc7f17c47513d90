/// Convenience result type used across versecard.
pub type VerseCardResult<T> = Result<T, VerseCardError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum VerseCardError {
    /// Invalid user-provided data (colors, names, data URIs).
    #[error("validation error: {0}")]
    Validation(String),

    /// Remote verse API request failed or returned an unexpected status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Image payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A requested font family is not loaded.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while laying out or rasterizing a composition.
    #[error("render error: {0}")]
    Render(String),

    /// Capture or encoding failed during export.
    #[error("export error: {0}")]
    Export(String),

    /// Persistent key/value storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VerseCardError {
    /// Build a [`VerseCardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VerseCardError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`VerseCardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`VerseCardError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`VerseCardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VerseCardError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`VerseCardError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`VerseCardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for VerseCardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

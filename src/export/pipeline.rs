use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::fonts::TextLayoutEngine,
    foundation::core::{Rgba8, SUPERSAMPLE_FACTOR},
    foundation::error::{VerseCardError, VerseCardResult},
    layout::arrange::arrange,
    layout::compose::Composition,
    render::cpu::CpuRasterizer,
    render::encode::{encode_jpeg, encode_png},
    render::RenderTarget,
};

/// Still-image container for exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Lossless, keeps transparency.
    Png,
    /// Lossy, always opaque.
    Jpg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }
}

/// The composition currently on screen together with the selection it shows.
#[derive(Clone, Copy, Debug)]
pub struct MountedSurface<'a> {
    /// What is drawn.
    pub composition: &'a Composition,
    /// Selected chapter ordinal.
    pub chapter: u32,
    /// Selected verse ordinal.
    pub verse: u32,
}

/// An encoded image ready to be saved.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    /// `{chapter}-{verse}.{ext}`.
    pub file_name: String,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Container format.
    pub format: ExportFormat,
}

impl ExportedImage {
    /// Write the image into `dir` under its file name, creating `dir` if needed.
    ///
    /// The bytes go to a sibling temp file first, so a failed write never leaves a partial image
    /// under the final name.
    pub fn write_to_dir(&self, dir: &Path) -> VerseCardResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| {
            VerseCardError::export(format!("create output dir '{}': {e}", dir.display()))
        })?;
        let path = dir.join(&self.file_name);
        let tmp = dir.join(format!("{}.tmp", self.file_name));
        let written = std::fs::write(&tmp, &self.bytes)
            .map_err(|e| VerseCardError::export(format!("write '{}': {e}", tmp.display())))
            .and_then(|()| {
                std::fs::rename(&tmp, &path).map_err(|e| {
                    VerseCardError::export(format!("replace '{}': {e}", path.display()))
                })
            });
        if let Err(err) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(err);
        }
        Ok(path)
    }
}

/// Result of an export request that did not fail.
#[derive(Clone, Debug)]
pub enum ExportOutcome {
    /// Nothing is mounted; nothing happened.
    NoSurface,
    /// Another export is still running; this request was dropped.
    Busy,
    /// The image was produced.
    Exported(ExportedImage),
}

/// Single-flight export of mounted compositions.
#[derive(Debug, Default)]
pub struct Exporter {
    in_flight: AtomicBool,
}

/// Holds the export slot; released on drop.
#[derive(Debug)]
pub struct ExportGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Exporter {
    /// Create an idle exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the export slot, or `None` when it is already taken.
    pub fn begin(&self) -> Option<ExportGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard {
                flag: &self.in_flight,
            })
    }

    /// Capture `surface` at the supersampled resolution and encode it as `format`.
    ///
    /// Transparent backgrounds stay transparent in PNG and become white in JPEG.
    #[tracing::instrument(skip(self, surface, text, rasterizer))]
    pub fn export(
        &self,
        surface: Option<MountedSurface<'_>>,
        format: ExportFormat,
        text: &mut TextLayoutEngine,
        rasterizer: &mut CpuRasterizer,
    ) -> VerseCardResult<ExportOutcome> {
        let Some(surface) = surface else {
            tracing::debug!("export skipped: no surface");
            return Ok(ExportOutcome::NoSurface);
        };
        let Some(_guard) = self.begin() else {
            tracing::debug!("export skipped: already in flight");
            return Ok(ExportOutcome::Busy);
        };

        let arrangement = arrange(surface.composition, &mut *text)
            .map_err(|e| VerseCardError::export(format!("layout failed: {e}")))?;
        let frame = rasterizer
            .rasterize(&arrangement, text, SUPERSAMPLE_FACTOR, RenderTarget::Export)
            .map_err(|e| VerseCardError::export(format!("capture failed: {e}")))?;
        let bytes = match format {
            ExportFormat::Png => encode_png(&frame)?,
            ExportFormat::Jpg => encode_jpeg(&frame, Rgba8::WHITE)?,
        };

        let image = ExportedImage {
            file_name: format!(
                "{}-{}.{}",
                surface.chapter,
                surface.verse,
                format.extension()
            ),
            bytes,
            width: frame.width,
            height: frame.height,
            format,
        };
        tracing::info!(file = %image.file_name, bytes = image.bytes.len(), "exported");
        Ok(ExportOutcome::Exported(image))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::foundation::{
    color::BorderColor,
    error::{PadmarkError, PadmarkResult},
};

/// Token inserted before the extension of every output file.
pub const SUFFIX_MARKER: &str = "_1x1";

/// Watermark margin from the bottom-right corner, as a fraction of the canvas width.
pub const WATERMARK_MARGIN_RATIO: f64 = 0.02;

/// Default JPEG quality for lossy outputs.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Default watermark width as a fraction of the squared image width.
pub const DEFAULT_WATERMARK_RATIO: f64 = 0.15;

/// Default watermark opacity.
pub const DEFAULT_WATERMARK_OPACITY: f64 = 0.6;

/// Immutable batch configuration, shared read-only by every worker.
#[derive(Clone, Debug)]
pub struct ProcessingConfig {
    /// Directory scanned (non-recursively) for input images.
    pub input_dir: PathBuf,
    /// Destination directory; `None` writes next to the inputs.
    pub output_dir: Option<PathBuf>,
    /// Fill color for the padding border.
    pub border_color: BorderColor,
    /// Quality (1-100) used for JPEG outputs.
    pub jpeg_quality: u8,
    /// Remove each source file after its output was written.
    pub delete_originals: bool,
    /// Worker pool size; `None` uses the host parallelism.
    pub worker_count: Option<usize>,
}

impl ProcessingConfig {
    /// Config with defaults for everything except the input directory.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            border_color: BorderColor::WHITE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            delete_originals: false,
            worker_count: None,
        }
    }

    /// Effective output directory.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }

    /// Effective worker pool size (always >= 1).
    pub fn workers(&self) -> usize {
        match self.worker_count {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }

    /// Check value ranges. Does not touch the filesystem.
    pub fn validate(&self) -> PadmarkResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PadmarkError::validation(format!(
                "jpeg quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.worker_count == Some(0) {
            return Err(PadmarkError::validation(
                "worker count must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Watermark overlay settings.
///
/// Only the source path is shared; every pipeline invocation decodes its own copy.
#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkSpec {
    /// Watermark image file.
    pub path: PathBuf,
    /// Watermark box side as a fraction of the squared image width, in `(0, 1]`.
    pub size_ratio: f64,
    /// Opacity multiplier applied to the watermark alpha, in `[0, 1]`.
    pub opacity: f64,
}

impl WatermarkSpec {
    /// Spec with the default ratio and opacity.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size_ratio: DEFAULT_WATERMARK_RATIO,
            opacity: DEFAULT_WATERMARK_OPACITY,
        }
    }

    /// Check value ranges. Does not touch the filesystem.
    pub fn validate(&self) -> PadmarkResult<()> {
        if !(self.size_ratio > 0.0 && self.size_ratio <= 1.0) {
            return Err(PadmarkError::validation(format!(
                "watermark ratio must be in (0, 1], got {}",
                self.size_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PadmarkError::validation(format!(
                "watermark opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;

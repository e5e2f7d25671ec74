//! padmark squares and watermarks every image in a folder.
//!
//! Each file runs through the same pipeline:
//!
//! 1. **Square**: pad to `max(width, height)` on both axes with a solid border, content centered
//!    ([`pad_to_square`]).
//! 2. **Watermark** (optional): scale, fade and blend a logo into the bottom-right corner
//!    ([`apply_watermark`]). A watermark that fails to load never fails the file.
//! 3. **Reconcile**: pick the color mode the output container can hold and re-attach ICC/EXIF
//!    metadata ([`reconcile_mode`], [`encode_image`]).
//! 4. **Write** `<stem>_1x1.<ext>`, then optionally delete the source ([`process_file`]).
//!
//! [`run_batch`] fans files out over a rayon pool. Workers share no image state; every outcome
//! streams back over a channel to an [`OutcomeSink`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No ambient state**: configuration and reporting are passed in explicitly.
//! - **At-most-once per file**: outputs carry a suffix marker and marked files are never reprocessed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod batch;
mod effects;
mod encode;
mod foundation;
mod pipeline;
mod transform;

/// `tracing` subscriber setup used by the binary.
pub mod logging;
/// Command-line path normalization helpers.
pub mod paths;

pub use assets::decode::{DecodedImage, decode_image, decode_image_file};
pub use assets::metadata::{ImageMetadata, MetadataKey};
pub use batch::coordinator::{BatchSummary, check_preconditions, run_batch};
pub use batch::discover::{Discovery, discover, has_supported_extension};
pub use batch::sink::{BatchPlan, ConsoleSink, InMemorySink, JsonLinesSink, OutcomeSink};
pub use effects::composite::{StraightRgba8, blend_onto, blend_over};
pub use effects::watermark::{
    apply_opacity, apply_watermark, composite_watermark, fit_watermark, load_watermark,
    watermark_position,
};
pub use encode::format::{ColorMode, OutputFormat, SUPPORTED_EXTENSIONS};
pub use encode::reconcile::{
    EncodeAttempt, EncodeOptions, EncodedImage, encode_image, reconcile_mode,
};
pub use foundation::color::BorderColor;
pub use foundation::config::{
    DEFAULT_JPEG_QUALITY, DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_RATIO, ProcessingConfig,
    SUFFIX_MARKER, WATERMARK_MARGIN_RATIO, WatermarkSpec,
};
pub use foundation::error::{PadmarkError, PadmarkResult};
pub use pipeline::file::{is_processed_name, output_file_name, process_file, skip_reason};
pub use pipeline::outcome::{FileOutcome, FileReport, SkipReason};
pub use transform::square::{SquareLayout, pad_to_square, square_layout};

use std::{
    any::Any,
    ffi::OsString,
    io::Write as _,
    panic::{self, AssertUnwindSafe},
    path::Path,
};

use anyhow::Context as _;
use image::DynamicImage;

use crate::{
    assets::decode::decode_image_file,
    effects::watermark::apply_watermark,
    encode::{
        format::OutputFormat,
        reconcile::{EncodeAttempt, EncodeOptions, encode_image, reconcile_mode},
    },
    foundation::{
        config::{ProcessingConfig, SUFFIX_MARKER, WatermarkSpec},
        error::{PadmarkError, PadmarkResult},
    },
    pipeline::outcome::{FileOutcome, SkipReason},
    transform::square::pad_to_square,
};

/// Whether a file name already carries the processed-file suffix marker.
pub fn is_processed_name(name: &str) -> bool {
    name.contains(SUFFIX_MARKER)
}

/// Output file name for `input`: `<stem>_1x1.<ext>`, extension case preserved.
pub fn output_file_name(input: &Path) -> Option<OsString> {
    let stem = input.file_stem()?;
    let ext = input.extension()?;
    let mut name = stem.to_os_string();
    name.push(SUFFIX_MARKER);
    name.push(".");
    name.push(ext);
    Some(name)
}

/// Reason to leave `input` alone without opening it, if any.
pub fn skip_reason(input: &Path) -> Option<SkipReason> {
    let name = input.file_name()?.to_string_lossy();
    if is_processed_name(&name) {
        return Some(SkipReason::AlreadyProcessed);
    }
    if OutputFormat::from_path(input).is_none() {
        return Some(SkipReason::UnsupportedExtension);
    }
    None
}

struct Written {
    output_name: String,
    watermarked: bool,
    watermark_fallback: Option<String>,
}

/// Run the full pipeline on one file: pad, watermark, reconcile, write, then optionally delete.
///
/// Never panics and never returns an error; every failure ends up in the [`FileOutcome`].
/// The source is only removed after its output was written.
#[tracing::instrument(skip_all, fields(file = %input.display()))]
pub fn process_file(
    input: &Path,
    config: &ProcessingConfig,
    watermark: Option<&WatermarkSpec>,
    output_dir: &Path,
) -> FileOutcome {
    if let Some(reason) = skip_reason(input) {
        tracing::debug!(%reason, "skipping");
        return FileOutcome::skipped(reason);
    }

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
        render_and_write(input, config, watermark, output_dir)
    }));
    let written = match attempt {
        Ok(Ok(written)) => written,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "processing failed");
            return FileOutcome::failed(format!("{e:#}"));
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(panic = %msg, "processing panicked");
            return FileOutcome::failed(format!("internal error: {msg}"));
        }
    };

    let (original_deleted, delete_error) = if config.delete_originals {
        match std::fs::remove_file(input) {
            Ok(()) => {
                tracing::debug!("removed original");
                (true, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not remove original");
                (false, Some(e.to_string()))
            }
        }
    } else {
        (false, None)
    };

    FileOutcome::Processed {
        output_name: written.output_name,
        watermarked: written.watermarked,
        original_deleted,
        watermark_fallback: written.watermark_fallback,
        delete_error,
    }
}

fn render_and_write(
    input: &Path,
    config: &ProcessingConfig,
    watermark: Option<&WatermarkSpec>,
    output_dir: &Path,
) -> PadmarkResult<Written> {
    let format = OutputFormat::from_path(input)
        .ok_or_else(|| PadmarkError::validation("unsupported file extension"))?;
    let output_name = output_file_name(input)
        .ok_or_else(|| PadmarkError::validation("input path has no file name"))?;

    let decoded = decode_image_file(input)?;
    let squared = pad_to_square(&decoded.pixels, config.border_color);

    let (composited, watermarked, watermark_fallback) = match watermark {
        None => (squared, false, None),
        Some(spec) => match apply_watermark(&squared, spec) {
            Ok(rgba) => (DynamicImage::ImageRgba8(rgba), true, None),
            Err(e) => {
                tracing::warn!(error = %e, "watermark not applied, keeping bordered image");
                (squared, false, Some(format!("{e:#}")))
            }
        },
    };

    let out = reconcile_mode(composited, decoded.mode, watermarked, format);
    let opts = EncodeOptions::for_format(format, config.jpeg_quality);
    let encoded = encode_image(&out, &decoded.metadata, opts)?;
    if encoded.attempt == EncodeAttempt::Stripped {
        tracing::info!(
            dropped = ?encoded.dropped,
            reason = encoded.stripped_reason.as_deref().unwrap_or_default(),
            "metadata dropped for this output"
        );
    }

    let out_path = output_dir.join(&output_name);
    write_output(&out_path, output_dir, &encoded.bytes, input)?;

    Ok(Written {
        output_name: output_name.to_string_lossy().into_owned(),
        watermarked,
        watermark_fallback,
    })
}

/// Write `bytes` to a temporary sibling in `dir`, then rename it onto `out_path`.
///
/// A failed write never leaves a partial file under the marked output name.
fn write_output(out_path: &Path, dir: &Path, bytes: &[u8], source: &Path) -> PadmarkResult<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".padmark-")
        .suffix(".part")
        .tempfile_in(dir)
        .with_context(|| format!("create temporary file in '{}'", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("write '{}'", out_path.display()))?;

    // Temporary files are created owner-only; the output takes the source's permissions.
    if let Ok(meta) = std::fs::metadata(source) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("set permissions on '{}'", out_path.display()))?;
    }

    tmp.persist(out_path)
        .map_err(|e| e.error)
        .with_context(|| format!("write '{}'", out_path.display()))?;
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/file.rs"]
mod tests;

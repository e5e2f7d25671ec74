use std::io::Cursor;

use image::{
    DynamicImage, ImageEncoder,
    codecs::{
        bmp::BmpEncoder, jpeg::JpegEncoder, png::PngEncoder, tiff::TiffEncoder,
        webp::WebPEncoder,
    },
};

use crate::{
    assets::metadata::{ImageMetadata, MetadataKey},
    encode::format::{ColorMode, OutputFormat},
    foundation::{
        config::DEFAULT_JPEG_QUALITY,
        error::{PadmarkError, PadmarkResult},
    },
};

/// Per-format encoder settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Target container.
    pub format: OutputFormat,
    /// Quality for lossy formats; `None` for lossless ones.
    pub quality: Option<u8>,
}

impl EncodeOptions {
    /// Options for `format`, attaching `jpeg_quality` only where the encoder uses it.
    pub fn for_format(format: OutputFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            quality: format.is_lossy().then_some(jpeg_quality.clamp(1, 100)),
        }
    }
}

/// Which of the two encode attempts produced the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeAttempt {
    /// All preserved metadata was embedded.
    WithMetadata,
    /// The encoder rejected some metadata; written with only the entries it accepted.
    Stripped,
}

/// Encoded output bytes, ready to be written.
#[derive(Clone, Debug)]
pub struct EncodedImage {
    /// Complete file contents.
    pub bytes: Vec<u8>,
    /// Attempt that succeeded.
    pub attempt: EncodeAttempt,
    /// Why metadata was dropped, when `attempt` is [`EncodeAttempt::Stripped`].
    pub stripped_reason: Option<String>,
    /// Entries left out of the output.
    pub dropped: Vec<MetadataKey>,
}

#[derive(Debug)]
enum EncodeFailure {
    MetadataRejected { key: MetadataKey, reason: String },
    Codec(String),
}

/// Bring `img` into the color mode the output file should have.
///
/// - Formats without alpha get an opaque buffer; alpha is dropped, not blended.
/// - Otherwise, an unwatermarked image returns to `original` mode.
/// - Finally the mode is narrowed to something the encoder accepts.
pub fn reconcile_mode(
    img: DynamicImage,
    original: ColorMode,
    watermarked: bool,
    format: OutputFormat,
) -> DynamicImage {
    let current = ColorMode::of(&img);
    let wanted = if !format.supports_alpha() && current.has_alpha() {
        current.without_alpha()
    } else if current != original && !watermarked {
        original
    } else {
        current
    };
    wanted.nearest_supported(format).convert(img)
}

/// Encode `img` into memory, embedding `metadata` when the encoder accepts it.
///
/// An entry the encoder rejects is left out and the image is encoded again with the remaining
/// entries; the quality setting is kept. Codec failures are not retried.
pub fn encode_image(
    img: &DynamicImage,
    metadata: &ImageMetadata,
    opts: EncodeOptions,
) -> PadmarkResult<EncodedImage> {
    let mut kept = metadata.clone();
    let mut dropped = Vec::new();
    let mut reasons = Vec::new();
    loop {
        let embed = (!kept.is_empty()).then_some(&kept);
        match encode_once(img, embed, opts) {
            Ok(bytes) => {
                let attempt = if dropped.is_empty() {
                    EncodeAttempt::WithMetadata
                } else {
                    EncodeAttempt::Stripped
                };
                return Ok(EncodedImage {
                    bytes,
                    attempt,
                    stripped_reason: (!reasons.is_empty()).then(|| reasons.join("; ")),
                    dropped,
                });
            }
            Err(EncodeFailure::MetadataRejected { key, reason }) => {
                tracing::debug!(
                    ?key,
                    %reason,
                    "encoder rejected metadata entry, retrying without it"
                );
                if kept.remove(key).is_none() {
                    return Err(into_error(EncodeFailure::MetadataRejected { key, reason }));
                }
                dropped.push(key);
                reasons.push(reason);
            }
            Err(e) => return Err(into_error(e)),
        }
    }
}

fn encode_once(
    img: &DynamicImage,
    metadata: Option<&ImageMetadata>,
    opts: EncodeOptions,
) -> Result<Vec<u8>, EncodeFailure> {
    let mut buf = Vec::new();
    match opts.format {
        OutputFormat::Jpeg => {
            let quality = opts.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
            write_with(JpegEncoder::new_with_quality(&mut buf, quality), img, metadata)?;
        }
        OutputFormat::Png => write_with(PngEncoder::new(&mut buf), img, metadata)?,
        OutputFormat::Bmp => write_with(BmpEncoder::new(&mut buf), img, metadata)?,
        OutputFormat::Tiff => {
            write_with(TiffEncoder::new(Cursor::new(&mut buf)), img, metadata)?;
        }
        OutputFormat::WebP => write_with(WebPEncoder::new_lossless(&mut buf), img, metadata)?,
        OutputFormat::Gif => {
            if let Some(meta) = metadata
                && let Some((key, _)) = meta.iter().next()
            {
                return Err(EncodeFailure::MetadataRejected {
                    key,
                    reason: format!("gif encoder cannot embed {key:?}"),
                });
            }
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Gif)
                .map_err(|e| EncodeFailure::Codec(e.to_string()))?;
        }
    }
    Ok(buf)
}

fn write_with<E: ImageEncoder>(
    mut encoder: E,
    img: &DynamicImage,
    metadata: Option<&ImageMetadata>,
) -> Result<(), EncodeFailure> {
    if let Some(meta) = metadata {
        for (key, value) in meta.iter() {
            let res = match key {
                MetadataKey::IccProfile => encoder.set_icc_profile(value.to_vec()),
                MetadataKey::Exif => encoder.set_exif_metadata(value.to_vec()),
            };
            res.map_err(|e| EncodeFailure::MetadataRejected {
                key,
                reason: format!("{key:?}: {e}"),
            })?;
        }
    }
    img.write_with_encoder(encoder)
        .map_err(|e| EncodeFailure::Codec(e.to_string()))
}

fn into_error(failure: EncodeFailure) -> PadmarkError {
    match failure {
        EncodeFailure::MetadataRejected { reason, .. } => {
            PadmarkError::encode(format!("metadata rejected: {reason}"))
        }
        EncodeFailure::Codec(msg) => PadmarkError::encode(msg),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/reconcile.rs"]
mod tests;

use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::{
    assets::metadata::{ImageMetadata, MetadataKey},
    encode::format::ColorMode,
    foundation::error::{PadmarkError, PadmarkResult},
};

/// A decoded input image together with what is needed to write it back faithfully.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Decoded pixels.
    pub pixels: DynamicImage,
    /// Color mode of the pixels as decoded.
    pub mode: ColorMode,
    /// Metadata captured from the source container.
    pub metadata: ImageMetadata,
}

/// Read and decode an image file, guessing the format from its content.
pub fn decode_image_file(path: &Path) -> PadmarkResult<DecodedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Decode in-memory image bytes and capture ICC/EXIF metadata.
///
/// Metadata that cannot be read is dropped rather than failing the decode.
pub fn decode_image(bytes: &[u8]) -> PadmarkResult<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    if reader.format().is_none() {
        return Err(PadmarkError::decode("unrecognized image format"));
    }
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| PadmarkError::decode(e.to_string()))?;

    let mut metadata = ImageMetadata::new();
    if let Ok(Some(icc)) = decoder.icc_profile() {
        metadata.insert(MetadataKey::IccProfile, icc);
    }
    if let Ok(Some(exif)) = decoder.exif_metadata() {
        metadata.insert(MetadataKey::Exif, exif);
    }

    let pixels =
        DynamicImage::from_decoder(decoder).map_err(|e| PadmarkError::decode(e.to_string()))?;
    let mode = ColorMode::of(&pixels);
    tracing::debug!(
        width = pixels.width(),
        height = pixels.height(),
        ?mode,
        metadata_entries = metadata.len(),
        "decoded image"
    );
    Ok(DecodedImage {
        pixels,
        mode,
        metadata,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

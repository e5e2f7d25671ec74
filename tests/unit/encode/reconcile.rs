use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

use super::*;
use crate::assets::decode::decode_image;

fn noisy_rgb(w: u32, h: u32) -> DynamicImage {
    let img = RgbImage::from_fn(w, h, |x, y| {
        let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) as u8;
        Rgb([v, v.wrapping_mul(3), v.wrapping_add(91)])
    });
    DynamicImage::ImageRgb8(img)
}

#[test]
fn jpeg_output_flattens_alpha() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0])));
    let out = reconcile_mode(rgba, ColorMode::Rgb8, true, OutputFormat::Jpeg);
    assert_eq!(ColorMode::of(&out), ColorMode::Rgb8);
    // alpha is discarded, not blended against a background
    assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn unwatermarked_image_returns_to_original_mode() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([50, 50, 50, 255])));
    let out = reconcile_mode(rgba, ColorMode::L8, false, OutputFormat::Png);
    assert_eq!(ColorMode::of(&out), ColorMode::L8);
}

#[test]
fn watermarked_image_keeps_alpha_when_container_allows() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
    let out = reconcile_mode(rgba, ColorMode::Rgb8, true, OutputFormat::Png);
    assert_eq!(ColorMode::of(&out), ColorMode::Rgba8);
}

#[test]
fn sixteen_bit_is_narrowed_only_when_needed() {
    let deep = DynamicImage::ImageRgb16(image::ImageBuffer::new(2, 2));
    let png = reconcile_mode(deep.clone(), ColorMode::Rgb16, false, OutputFormat::Png);
    assert_eq!(ColorMode::of(&png), ColorMode::Rgb16);
    let jpg = reconcile_mode(deep, ColorMode::Rgb16, false, OutputFormat::Jpeg);
    assert_eq!(ColorMode::of(&jpg), ColorMode::Rgb8);
}

#[test]
fn quality_only_applies_to_lossy_formats() {
    assert_eq!(
        EncodeOptions::for_format(OutputFormat::Jpeg, 80).quality,
        Some(80)
    );
    assert_eq!(EncodeOptions::for_format(OutputFormat::Png, 80).quality, None);
}

#[test]
fn jpeg_quality_changes_output_size() {
    let img = noisy_rgb(64, 64);
    let meta = ImageMetadata::new();
    let low = encode_image(&img, &meta, EncodeOptions::for_format(OutputFormat::Jpeg, 10)).unwrap();
    let high =
        encode_image(&img, &meta, EncodeOptions::for_format(OutputFormat::Jpeg, 100)).unwrap();
    assert!(low.bytes.len() < high.bytes.len());

    let decoded = decode_image(&high.bytes).unwrap();
    assert_eq!(decoded.pixels.dimensions(), (64, 64));
}

#[test]
fn every_format_round_trips_dimensions() {
    let img = noisy_rgb(9, 9);
    for format in [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::Tiff,
        OutputFormat::WebP,
    ] {
        let encoded = encode_image(
            &img,
            &ImageMetadata::new(),
            EncodeOptions::for_format(format, 90),
        )
        .unwrap();
        assert_eq!(encoded.attempt, EncodeAttempt::WithMetadata);
        let decoded = decode_image(&encoded.bytes).unwrap();
        assert_eq!(decoded.pixels.dimensions(), (9, 9), "{format:?}");
    }
}

#[test]
fn png_embeds_icc_profile() {
    let img = noisy_rgb(4, 4);
    let icc = vec![0x42u8; 64];
    let mut meta = ImageMetadata::new();
    meta.insert(MetadataKey::IccProfile, icc.clone());
    let encoded =
        encode_image(&img, &meta, EncodeOptions::for_format(OutputFormat::Png, 95)).unwrap();
    assert_eq!(encoded.attempt, EncodeAttempt::WithMetadata);

    let decoded = decode_image(&encoded.bytes).unwrap();
    assert_eq!(decoded.metadata.get(MetadataKey::IccProfile), Some(icc.as_slice()));
}

#[test]
fn rejected_metadata_falls_back_to_stripped_encode() {
    let img = noisy_rgb(4, 4);
    let mut meta = ImageMetadata::new();
    meta.insert(MetadataKey::IccProfile, vec![1, 2, 3, 4]);
    meta.insert(MetadataKey::Exif, vec![5, 6]);

    let encoded =
        encode_image(&img, &meta, EncodeOptions::for_format(OutputFormat::Gif, 95)).unwrap();
    assert_eq!(encoded.attempt, EncodeAttempt::Stripped);
    assert_eq!(
        encoded.dropped,
        vec![MetadataKey::IccProfile, MetadataKey::Exif]
    );
    let reason = encoded.stripped_reason.unwrap();
    assert!(reason.contains("IccProfile") && reason.contains("Exif"), "{reason}");
    let decoded = decode_image(&encoded.bytes).unwrap();
    assert_eq!(decoded.pixels.dimensions(), (4, 4));
}

#[test]
fn tiff_keeps_icc_when_only_exif_is_rejected() {
    let img = noisy_rgb(4, 4);
    let icc = vec![0x17u8; 48];
    let mut meta = ImageMetadata::new();
    meta.insert(MetadataKey::IccProfile, icc.clone());
    meta.insert(MetadataKey::Exif, b"MM\0*\0\0\0\x08\0\0".to_vec());

    let encoded =
        encode_image(&img, &meta, EncodeOptions::for_format(OutputFormat::Tiff, 95)).unwrap();
    assert_eq!(encoded.attempt, EncodeAttempt::Stripped);
    assert_eq!(encoded.dropped, vec![MetadataKey::Exif]);

    let decoded = decode_image(&encoded.bytes).unwrap();
    assert_eq!(decoded.metadata.get(MetadataKey::IccProfile), Some(icc.as_slice()));
}

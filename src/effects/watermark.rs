use std::path::Path;

use image::{DynamicImage, RgbaImage, imageops};

use crate::{
    assets::decode::decode_image_file,
    effects::composite::blend_onto,
    foundation::{
        config::{WATERMARK_MARGIN_RATIO, WatermarkSpec},
        error::PadmarkResult,
    },
};

/// Decode a watermark image into straight RGBA8.
///
/// Called once per pipeline invocation so every worker owns its own pixels.
pub fn load_watermark(path: &Path) -> PadmarkResult<RgbaImage> {
    let decoded = decode_image_file(path)?;
    Ok(decoded.pixels.into_rgba8())
}

/// Shrink `watermark` to fit a square box of side `floor(canvas_width * ratio)`.
///
/// Aspect ratio is preserved and the watermark is never enlarged.
pub fn fit_watermark(watermark: RgbaImage, canvas_width: u32, ratio: f64) -> RgbaImage {
    let target = ((f64::from(canvas_width) * ratio).floor() as u32).max(1);
    let (w, h) = watermark.dimensions();
    if w <= target && h <= target {
        return watermark;
    }

    let scale = (f64::from(target) / f64::from(w)).min(f64::from(target) / f64::from(h));
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, target);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, target);
    imageops::resize(&watermark, nw, nh, imageops::FilterType::Lanczos3)
}

/// Scale the alpha channel by `opacity`, keeping fully transparent pixels transparent.
pub fn apply_opacity(watermark: &mut RgbaImage, opacity: f64) {
    if opacity >= 1.0 {
        return;
    }
    let opacity = opacity.max(0.0);
    for px in watermark.pixels_mut() {
        let a = px.0[3];
        px.0[3] = if a > 0 {
            (f64::from(a) * opacity).floor() as u8
        } else {
            0
        };
    }
}

/// Top-left position of a `wm_width` x `wm_height` watermark in the bottom-right corner.
///
/// The margin is `floor(canvas_width * 0.02)`; coordinates that would go negative clamp to 0.
pub fn watermark_position(canvas: (u32, u32), wm_width: u32, wm_height: u32) -> (u32, u32) {
    let margin = (f64::from(canvas.0) * WATERMARK_MARGIN_RATIO).floor() as u32;
    (
        canvas.0.saturating_sub(wm_width).saturating_sub(margin),
        canvas.1.saturating_sub(wm_height).saturating_sub(margin),
    )
}

/// Scale, fade and blend an already-decoded watermark onto `base`.
///
/// The result is always RGBA8, whatever the mode of `base`.
pub fn composite_watermark(
    base: &DynamicImage,
    watermark: RgbaImage,
    spec: &WatermarkSpec,
) -> RgbaImage {
    let mut canvas = base.to_rgba8();
    let mut mark = fit_watermark(watermark, canvas.width(), spec.size_ratio);
    apply_opacity(&mut mark, spec.opacity);
    let (x, y) = watermark_position(canvas.dimensions(), mark.width(), mark.height());
    blend_onto(&mut canvas, &mark, x, y);
    canvas
}

/// Decode the watermark described by `spec` and blend it onto `base`.
#[tracing::instrument(skip(base, spec), fields(watermark = %spec.path.display()))]
pub fn apply_watermark(base: &DynamicImage, spec: &WatermarkSpec) -> PadmarkResult<RgbaImage> {
    let watermark = load_watermark(&spec.path)?;
    tracing::debug!(
        width = watermark.width(),
        height = watermark.height(),
        "decoded watermark"
    );
    Ok(composite_watermark(base, watermark, spec))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/watermark.rs"]
mod tests;

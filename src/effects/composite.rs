use image::RgbaImage;

/// Straight-alpha RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Straight-alpha "over": `out = a * src + (1 - a) * dst` per color channel, `a = src_alpha / 255`.
///
/// Output alpha is `src_a + dst_a * (1 - a)`, so an opaque base stays opaque.
pub fn blend_over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let a = u16::from(src[3]);
    if a == 0 {
        return dst;
    }
    if a == 255 {
        return src;
    }
    let inv = 255 - a;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(
            mul_div255(u16::from(src[i]), a),
            mul_div255(u16::from(dst[i]), inv),
        );
    }
    out
}

/// Blend `overlay` onto `base` with its top-left corner at (`x`, `y`).
///
/// Parts of the overlay falling outside `base` are clipped.
pub fn blend_onto(base: &mut RgbaImage, overlay: &RgbaImage, x: u32, y: u32) {
    let (bw, bh) = base.dimensions();
    for (ox, oy, src) in overlay.enumerate_pixels() {
        let (Some(tx), Some(ty)) = (x.checked_add(ox), y.checked_add(oy)) else {
            continue;
        };
        if tx >= bw || ty >= bh {
            continue;
        }
        let dst = base.get_pixel_mut(tx, ty);
        dst.0 = blend_over(dst.0, src.0);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

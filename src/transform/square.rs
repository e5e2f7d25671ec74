use image::{DynamicImage, ImageBuffer, Pixel, RgbaImage, imageops};

use crate::foundation::color::BorderColor;

/// Placement of an image inside its square canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareLayout {
    /// Canvas side, `max(width, height)`.
    pub side: u32,
    /// Left padding.
    pub offset_x: u32,
    /// Top padding.
    pub offset_y: u32,
}

impl SquareLayout {
    /// Whether the source is already square.
    pub fn is_identity(&self) -> bool {
        self.offset_x == 0 && self.offset_y == 0
    }
}

/// Centered placement of a `width` x `height` image on a square canvas.
///
/// Odd padding puts the extra pixel on the right/bottom edge.
pub fn square_layout(width: u32, height: u32) -> SquareLayout {
    let side = width.max(height);
    SquareLayout {
        side,
        offset_x: (side - width) / 2,
        offset_y: (side - height) / 2,
    }
}

/// Pad `img` to a square filled with `color`, keeping its pixel type.
pub fn pad_to_square(img: &DynamicImage, color: BorderColor) -> DynamicImage {
    let layout = square_layout(img.width(), img.height());
    if layout.side == img.width() && layout.side == img.height() {
        return img.clone();
    }

    let swatch = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, color.to_rgba()));
    match img {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(pad_buffer(buf, layout, *swatch.to_luma8().get_pixel(0, 0)))
        }
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(pad_buffer(
            buf,
            layout,
            *swatch.to_luma_alpha8().get_pixel(0, 0),
        )),
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(pad_buffer(buf, layout, *swatch.to_rgb8().get_pixel(0, 0)))
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(pad_buffer(buf, layout, color.to_rgba()))
        }
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(pad_buffer(
            buf,
            layout,
            *swatch.to_luma16().get_pixel(0, 0),
        )),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(pad_buffer(
            buf,
            layout,
            *swatch.to_luma_alpha16().get_pixel(0, 0),
        )),
        DynamicImage::ImageRgb16(buf) => {
            DynamicImage::ImageRgb16(pad_buffer(buf, layout, *swatch.to_rgb16().get_pixel(0, 0)))
        }
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(pad_buffer(
            buf,
            layout,
            *swatch.to_rgba16().get_pixel(0, 0),
        )),
        DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(pad_buffer(
            buf,
            layout,
            *swatch.to_rgb32f().get_pixel(0, 0),
        )),
        DynamicImage::ImageRgba32F(buf) => DynamicImage::ImageRgba32F(pad_buffer(
            buf,
            layout,
            *swatch.to_rgba32f().get_pixel(0, 0),
        )),
        other => DynamicImage::ImageRgba8(pad_buffer(&other.to_rgba8(), layout, color.to_rgba())),
    }
}

fn pad_buffer<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    layout: SquareLayout,
    fill: P,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut canvas = ImageBuffer::from_pixel(layout.side, layout.side, fill);
    imageops::replace(
        &mut canvas,
        src,
        i64::from(layout.offset_x),
        i64::from(layout.offset_y),
    );
    canvas
}

#[cfg(test)]
#[path = "../../tests/unit/transform/square.rs"]
mod tests;

use image::{GenericImageView, Rgb, RgbImage};

use super::*;

const RED: Rgb<u8> = Rgb([200, 10, 10]);

fn solid(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, RED))
}

/// Returns (left, right, top, bottom) border widths by scanning for the content color.
fn borders(img: &DynamicImage) -> (u32, u32, u32, u32) {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let content: Vec<(u32, u32)> = rgb
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == RED)
        .map(|(x, y, _)| (x, y))
        .collect();
    let min_x = content.iter().map(|p| p.0).min().unwrap();
    let max_x = content.iter().map(|p| p.0).max().unwrap();
    let min_y = content.iter().map(|p| p.1).min().unwrap();
    let max_y = content.iter().map(|p| p.1).max().unwrap();
    (min_x, w - 1 - max_x, min_y, h - 1 - max_y)
}

#[test]
fn layout_is_centered_with_at_most_one_pixel_skew() {
    for (w, h) in [(300, 200), (200, 300), (7, 4), (1, 2), (10, 1), (5, 5), (1, 1)] {
        let l = square_layout(w, h);
        assert_eq!(l.side, w.max(h));
        let right = l.side - w - l.offset_x;
        let bottom = l.side - h - l.offset_y;
        assert!(right.abs_diff(l.offset_x) <= 1, "{w}x{h}");
        assert!(bottom.abs_diff(l.offset_y) <= 1, "{w}x{h}");
    }
}

#[test]
fn landscape_gets_equal_top_and_bottom_bands() {
    let out = pad_to_square(&solid(300, 200), BorderColor::WHITE);
    assert_eq!(out.dimensions(), (300, 300));
    assert_eq!(borders(&out), (0, 0, 50, 50));
    assert_eq!(out.to_rgb8().get_pixel(150, 10).0, [255, 255, 255]);
    assert_eq!(out.to_rgb8().get_pixel(150, 290).0, [255, 255, 255]);
}

#[test]
fn odd_padding_is_split_within_one_pixel() {
    let out = pad_to_square(&solid(4, 7), BorderColor::rgb(0, 0, 0));
    assert_eq!(out.dimensions(), (7, 7));
    let (l, r, t, b) = borders(&out);
    assert_eq!((t, b), (0, 0));
    assert_eq!((l, r), (1, 2));
}

#[test]
fn square_input_is_unchanged() {
    let src = solid(5, 5);
    assert_eq!(pad_to_square(&src, BorderColor::WHITE), src);
    assert!(square_layout(5, 5).is_identity());
}

#[test]
fn degenerate_sizes_do_not_panic() {
    let out = pad_to_square(&solid(1, 1), BorderColor::WHITE);
    assert_eq!(out.dimensions(), (1, 1));
    let out = pad_to_square(&solid(1, 3), BorderColor::WHITE);
    assert_eq!(out.dimensions(), (3, 3));
}

#[test]
fn pixel_type_is_preserved_and_border_is_converted() {
    let gray = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(2, 4, image::Luma([0u16])));
    let out = pad_to_square(&gray, BorderColor::WHITE);
    assert_eq!(out.color(), image::ColorType::L16);
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.to_luma16().get_pixel(0, 0).0, [u16::MAX]);
    assert_eq!(out.to_luma16().get_pixel(1, 0).0, [0]);

    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 2, image::Rgba([1, 2, 3, 4])));
    let out = pad_to_square(&rgba, BorderColor::rgb(9, 8, 7));
    assert_eq!(out.color(), image::ColorType::Rgba8);
    assert_eq!(out.to_rgba8().get_pixel(1, 0).0, [9, 8, 7, 255]);
}

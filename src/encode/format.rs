use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};
use serde::Serialize;

/// Lower-cased extensions accepted as batch inputs.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Container formats padmark can write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG (lossy, no alpha).
    Jpeg,
    /// PNG.
    Png,
    /// Windows bitmap.
    Bmp,
    /// GIF (first frame only).
    Gif,
    /// TIFF.
    Tiff,
    /// Lossless WebP.
    WebP,
}

impl OutputFormat {
    /// Map a file extension (any case, without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Equivalent `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
            Self::WebP => ImageFormat::WebP,
        }
    }

    /// Whether the container can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Whether the encoder takes a quality setting.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Whether the encoder accepts buffers of `mode` as-is.
    pub fn supports_mode(self, mode: ColorMode) -> bool {
        use ColorMode::*;
        match self {
            Self::Jpeg => matches!(mode, L8 | Rgb8),
            Self::Png => !matches!(mode, Rgb32F | Rgba32F),
            Self::Bmp | Self::WebP => matches!(mode, L8 | La8 | Rgb8 | Rgba8),
            Self::Gif => matches!(mode, Rgb8 | Rgba8),
            Self::Tiff => matches!(mode, L8 | L16 | Rgb8 | Rgb16 | Rgba8 | Rgba16),
        }
    }
}

/// Pixel layout of a decoded buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ColorMode {
    /// 8-bit grayscale.
    L8,
    /// 8-bit grayscale with alpha.
    La8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit RGB with alpha.
    Rgba8,
    /// 16-bit grayscale.
    L16,
    /// 16-bit grayscale with alpha.
    La16,
    /// 16-bit RGB.
    Rgb16,
    /// 16-bit RGB with alpha.
    Rgba16,
    /// 32-bit float RGB.
    Rgb32F,
    /// 32-bit float RGB with alpha.
    Rgba32F,
}

impl ColorMode {
    /// Mode of an `image` color type; unknown future types map to RGBA8.
    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 => Self::L8,
            ColorType::La8 => Self::La8,
            ColorType::Rgb8 => Self::Rgb8,
            ColorType::Rgba8 => Self::Rgba8,
            ColorType::L16 => Self::L16,
            ColorType::La16 => Self::La16,
            ColorType::Rgb16 => Self::Rgb16,
            ColorType::Rgba16 => Self::Rgba16,
            ColorType::Rgb32F => Self::Rgb32F,
            ColorType::Rgba32F => Self::Rgba32F,
            _ => Self::Rgba8,
        }
    }

    /// Mode of a decoded image.
    pub fn of(img: &DynamicImage) -> Self {
        Self::from_color_type(img.color())
    }

    /// Whether the mode carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            Self::La8 | Self::Rgba8 | Self::La16 | Self::Rgba16 | Self::Rgba32F
        )
    }

    /// Whether the mode is single-channel luminance.
    pub fn is_gray(self) -> bool {
        matches!(self, Self::L8 | Self::La8 | Self::L16 | Self::La16)
    }

    /// Same channel layout with the alpha channel removed.
    pub fn without_alpha(self) -> Self {
        match self {
            Self::La8 => Self::L8,
            Self::Rgba8 => Self::Rgb8,
            Self::La16 => Self::L16,
            Self::Rgba16 => Self::Rgb16,
            Self::Rgba32F => Self::Rgb32F,
            other => other,
        }
    }

    /// Same channel layout at 8 bits per sample.
    pub fn to_8bit(self) -> Self {
        match self {
            Self::L16 => Self::L8,
            Self::La16 => Self::La8,
            Self::Rgb16 | Self::Rgb32F => Self::Rgb8,
            Self::Rgba16 | Self::Rgba32F => Self::Rgba8,
            other => other,
        }
    }

    /// Closest mode `format` can encode, preferring to keep alpha, then gray, then depth.
    pub fn nearest_supported(self, format: OutputFormat) -> Self {
        let eight = self.to_8bit();
        let color = if eight.has_alpha() {
            Self::Rgba8
        } else {
            Self::Rgb8
        };
        let opaque = self.without_alpha();
        let candidates = [
            self,
            eight,
            color,
            opaque,
            opaque.to_8bit(),
            if opaque.is_gray() { Self::L8 } else { Self::Rgb8 },
        ];
        candidates
            .into_iter()
            .find(|m| format.supports_mode(*m))
            .unwrap_or(Self::Rgb8)
    }

    /// Convert `img` into this mode (no-op when it already matches).
    pub fn convert(self, img: DynamicImage) -> DynamicImage {
        if Self::of(&img) == self {
            return img;
        }
        match self {
            Self::L8 => DynamicImage::ImageLuma8(img.to_luma8()),
            Self::La8 => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
            Self::Rgb8 => DynamicImage::ImageRgb8(img.to_rgb8()),
            Self::Rgba8 => DynamicImage::ImageRgba8(img.to_rgba8()),
            Self::L16 => DynamicImage::ImageLuma16(img.to_luma16()),
            Self::La16 => DynamicImage::ImageLumaA16(img.to_luma_alpha16()),
            Self::Rgb16 => DynamicImage::ImageRgb16(img.to_rgb16()),
            Self::Rgba16 => DynamicImage::ImageRgba16(img.to_rgba16()),
            Self::Rgb32F => DynamicImage::ImageRgb32F(img.to_rgb32f()),
            Self::Rgba32F => DynamicImage::ImageRgba32F(img.to_rgba32f()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;

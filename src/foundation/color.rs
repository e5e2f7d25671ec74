use std::{fmt, str::FromStr};

use serde::Serialize;

/// Straight-alpha RGBA8 color used to fill the padding border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BorderColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl BorderColor {
    /// Opaque white, the default border.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color as an `image` RGBA pixel.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for BorderColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for BorderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for BorderColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return parse_hex(s);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(c) = named_color(&lower) {
            return Ok(c);
        }
        // Bare hex without the leading '#'.
        if matches!(s.len(), 3 | 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit()) {
            return parse_hex(s);
        }
        Err(format!(
            "unknown color \"{s}\" (expected a color name or #RGB, #RRGGBB, #RRGGBBAA)"
        ))
    }
}

fn parse_hex(s: &str) -> Result<BorderColor, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err(format!("invalid hex color \"{s}\""));
    }

    match s.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, ch) in rgb.iter_mut().zip(s.chars()) {
                let nibble = ch
                    .to_digit(16)
                    .ok_or_else(|| format!("invalid hex digit '{ch}'"))?
                    as u8;
                *slot = nibble * 17;
            }
            Ok(BorderColor::rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Ok(BorderColor::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(BorderColor {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

fn named_color(name: &str) -> Option<BorderColor> {
    let c = match name {
        "white" => BorderColor::rgb(255, 255, 255),
        "black" => BorderColor::rgb(0, 0, 0),
        "red" => BorderColor::rgb(255, 0, 0),
        "green" => BorderColor::rgb(0, 128, 0),
        "lime" => BorderColor::rgb(0, 255, 0),
        "blue" => BorderColor::rgb(0, 0, 255),
        "yellow" => BorderColor::rgb(255, 255, 0),
        "cyan" | "aqua" => BorderColor::rgb(0, 255, 255),
        "magenta" | "fuchsia" => BorderColor::rgb(255, 0, 255),
        "gray" | "grey" => BorderColor::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => BorderColor::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => BorderColor::rgb(169, 169, 169),
        "silver" => BorderColor::rgb(192, 192, 192),
        "navy" => BorderColor::rgb(0, 0, 128),
        "maroon" => BorderColor::rgb(128, 0, 0),
        "olive" => BorderColor::rgb(128, 128, 0),
        "purple" => BorderColor::rgb(128, 0, 128),
        "teal" => BorderColor::rgb(0, 128, 128),
        "orange" => BorderColor::rgb(255, 165, 0),
        "pink" => BorderColor::rgb(255, 192, 203),
        "brown" => BorderColor::rgb(165, 42, 42),
        "beige" => BorderColor::rgb(245, 245, 220),
        "ivory" => BorderColor::rgb(255, 255, 240),
        "whitesmoke" => BorderColor::rgb(245, 245, 245),
        "transparent" => BorderColor {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        },
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;

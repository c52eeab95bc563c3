//! Hex color parsing.

use std::str::FromStr;

use palette::Srgb;

use crate::error::{OgError, OgResult};

/// An 8-bit RGB triple.
pub type Rgb8 = (u8, u8, u8);

/// Parses `#RRGGBB` or `RRGGBB` into an RGB triple.
///
/// Exactly six hex digits are required after the optional `#`; shorthand
/// forms and anything longer are rejected rather than truncated.
pub fn hex_to_rgb(text: &str) -> OgResult<Rgb8> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(OgError::InvalidColorFormat(text.to_string()));
    }

    let rgb = Srgb::<u8>::from_str(digits)
        .map_err(|_| OgError::InvalidColorFormat(text.to_string()))?;
    Ok((rgb.red, rgb.green, rgb.blue))
}

/// Formats an RGB triple as lowercase `#rrggbb`.
pub fn rgb_to_hex(color: Rgb8) -> String {
    let (r, g, b) = color;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

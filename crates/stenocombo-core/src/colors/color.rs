//! RGBA color values with `#RRGGBB` parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ColorParseError;

/// Alpha applied to the secondary (cooldown bar / high score) color of a tier.
pub const BAR_ALPHA: u8 = 220;

/// An 8-bit-per-channel color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#RRGGBB` (case-insensitive, surrounding whitespace ignored)
    /// into a color carrying the given alpha.
    ///
    /// # Errors
    ///
    /// Returns an error unless the text is `#` followed by exactly six hex
    /// digits.
    pub fn from_hex(spec: &str, alpha: u8) -> Result<Self, ColorParseError> {
        let spec = spec.trim();
        let digits = spec
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(spec.to_string()))?;

        if digits.len() != 6 {
            return Err(ColorParseError::WrongLength(spec.to_string()));
        }
        // from_str_radix tolerates a leading '+', so check digits explicitly.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(spec.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::InvalidDigit(spec.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
            a: alpha,
        })
    }

    /// Formats as `#RRGGBB` (uppercase, alpha dropped).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Formats as a CSS `rgba(r, g, b, a)` value with the raw 0-255 alpha.
    #[must_use]
    pub fn to_css_rgba(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

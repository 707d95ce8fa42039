//! RGB color values and hex notation parsing
//!
//! Colors travel through the UI as CSS-style hex strings (`#3b82f6`) and
//! through the paint logic as normalized float triples. Parsing accepts the
//! 6-digit and 3-digit forms with or without the leading `#`.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ColorParseError {
    #[error("expected 3 or 6 hex digits, got {0} characters")]
    BadLength(usize),
    #[error("invalid hex digit in color: {0}")]
    BadDigit(String),
}

/// A color as normalized RGB components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channel values.
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a CSS-style hex color: `#rrggbb`, `rrggbb`, `#rgb`, or `rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(ColorParseError::BadDigit(hex.to_string()));
        }

        let channel = |pair: &str| {
            u8::from_str_radix(pair, 16).map_err(|_| ColorParseError::BadDigit(hex.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::from_u8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // Shorthand: each digit doubles, f -> ff
            3 => {
                let wide = |i: usize| {
                    let d = &digits[i..i + 1];
                    channel(&format!("{d}{d}"))
                };
                Ok(Self::from_u8(wide(0)?, wide(1)?, wide(2)?))
            }
            n => Err(ColorParseError::BadLength(n)),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_u8(self.r),
            channel_u8(self.g),
            channel_u8(self.b)
        )
    }

    /// 8-bit channel values, for UIs that edit colors as byte triples.
    pub fn to_u8(self) -> [u8; 3] {
        [channel_u8(self.r), channel_u8(self.g), channel_u8(self.b)]
    }
}

fn channel_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

//! Named paint swatches and the default showroom palette

use crate::color::Rgb;

/// Custom-picker starting color (the palette's blue).
pub const DEFAULT_PICKER_COLOR: Rgb = Rgb::from_u8(0x3b, 0x82, 0xf6);

/// A named palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub name: String,
    pub color: Rgb,
}

impl Swatch {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// The stock eight-color palette.
pub fn default_palette() -> Vec<Swatch> {
    vec![
        Swatch::new("Black", Rgb::from_u8(0x0b, 0x0f, 0x14)),
        Swatch::new("Red", Rgb::from_u8(0xef, 0x44, 0x44)),
        Swatch::new("Blue", Rgb::from_u8(0x3b, 0x82, 0xf6)),
        Swatch::new("Green", Rgb::from_u8(0x22, 0xc5, 0x5e)),
        Swatch::new("Orange", Rgb::from_u8(0xf5, 0x9e, 0x0b)),
        Swatch::new("Purple", Rgb::from_u8(0xa8, 0x55, 0xf7)),
        Swatch::new("White", Rgb::from_u8(0xff, 0xff, 0xff)),
        Swatch::new("Silver", Rgb::from_u8(0x9c, 0xa3, 0xaf)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = default_palette();
        assert_eq!(palette.len(), 8);
        assert_eq!(palette[0].name, "Black");
        assert_eq!(palette[2].color, DEFAULT_PICKER_COLOR);
        assert_eq!(palette[7].color.to_hex(), "#9ca3af");
    }
}

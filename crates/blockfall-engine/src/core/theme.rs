use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseColorError;

/// Display color attached to a cell.
///
/// The engine never looks at colors; they only travel with cells so that a
/// renderer can draw them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn from_u32(rgb: u32) -> Self {
        let [_, r, g, b] = rgb.to_be_bytes();
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or(ParseColorError)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError);
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| ParseColorError)?;
        Ok(Self::from_u32(rgb))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("{e}: '{s}'")))
    }
}

/// Number of colors in a theme's piece palette.
pub const PALETTE_LEN: usize = 5;

/// Background color and the palette new pieces are painted from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorTheme {
    pub background: Color,
    pub tetrominos: [Color; PALETTE_LEN],
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ColorTheme {
    pub const DEFAULT: Self = Self {
        background: Color::from_u32(0xFF_FF_FF),
        tetrominos: [
            Color::from_u32(0xD9_E5_D6),
            Color::from_u32(0x5F_AD_56),
            Color::from_u32(0xFF_A6_30),
            Color::from_u32(0xF1_59_46),
            Color::from_u32(0x25_4E_70),
        ],
    };
}

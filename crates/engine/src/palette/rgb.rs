use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of distinct 24-bit color codes.
pub const RGB_SPACE: u32 = 1 << 24;

const RGB_MASK: u32 = RGB_SPACE - 1;

/// A 24-bit color code. Serialized as `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb(u32);

impl Rgb {
    /// Keeps the low 24 bits of `code`.
    pub const fn new(code: u32) -> Self {
        Self(code & RGB_MASK)
    }

    pub const fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color code {0:?}, expected #rrggbb")]
pub struct RgbParseError(String);

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| RgbParseError(s.to_owned()))?;
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| RgbParseError(s.to_owned()))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = RgbParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

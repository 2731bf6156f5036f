use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::error::GeosieveError;

/// Single-byte field separator for delimited text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
    Custom(u8),
}

impl Delimiter {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b',' => Delimiter::Comma,
            b';' => Delimiter::Semicolon,
            b'\t' => Delimiter::Tab,
            b'|' => Delimiter::Pipe,
            other => Delimiter::Custom(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Custom(b) => *b,
        }
    }

    /// Whether the delimiter collides with decimal-comma normalization
    pub fn conflicts_with_decimal_comma(&self) -> bool {
        self.as_byte() == b','
    }
}

impl FromStr for Delimiter {
    type Err = GeosieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab" | "\\t" | "\t" => return Ok(Delimiter::Tab),
            "comma" => return Ok(Delimiter::Comma),
            "semicolon" => return Ok(Delimiter::Semicolon),
            "pipe" => return Ok(Delimiter::Pipe),
            _ => {}
        }

        match s.as_bytes() {
            [b] if b.is_ascii() => Ok(Delimiter::from_byte(*b)),
            _ => Err(GeosieveError::InvalidDelimiter {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            other => write!(f, "{}", other.as_byte() as char),
        }
    }
}

impl<'de> Deserialize<'de> for Delimiter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! Built-in numbering symbol schemes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NumberScheme;

/// Symbol schemes shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// `1`, `2`, `3`, ...
    #[default]
    Decimal,
    /// `A`, `B`, ..., `Z`, `AA`, `AB`, ...
    UpperLatin,
    /// `a`, `b`, ..., `z`, `aa`, `ab`, ...
    LowerLatin,
}

impl Scheme {
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Decimal => "decimal",
            Scheme::UpperLatin => "upper-latin",
            Scheme::LowerLatin => "lower-latin",
        }
    }
}

impl NumberScheme for Scheme {
    fn symbol(&self, ordinal: u32) -> String {
        match self {
            Scheme::Decimal => ordinal.to_string(),
            Scheme::UpperLatin => latin(ordinal, b'A'),
            Scheme::LowerLatin => latin(ordinal, b'a'),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown scheme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScheme(pub String);

impl fmt::Display for UnknownScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown numbering scheme '{}' (expected decimal, upper-latin or lower-latin)",
            self.0
        )
    }
}

impl std::error::Error for UnknownScheme {}

impl FromStr for Scheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" => Ok(Scheme::Decimal),
            "upper-latin" => Ok(Scheme::UpperLatin),
            "lower-latin" => Ok(Scheme::LowerLatin),
            other => Err(UnknownScheme(other.to_string())),
        }
    }
}

/// Bijective base-26 letters. Ordinal 0 has no symbol.
fn latin(mut ordinal: u32, first: u8) -> String {
    let mut letters = Vec::new();
    while ordinal > 0 {
        ordinal -= 1;
        // ordinal % 26 < 26, always fits in a u8
        letters.push(char::from(first + (ordinal % 26) as u8));
        ordinal /= 26;
    }
    letters.iter().rev().collect()
}

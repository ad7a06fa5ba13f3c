use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("expected FIRST-LAST or START,LENGTH, got '{0}'")]
    Syntax(String),

    #[error("bad address '{text}': {source}")]
    Address {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("range '{0}' covers no address in the 32-bit space")]
    Empty(String),
}

/// Inclusive span of addresses, the argument shape of `get_memrange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub first: u32,
    pub last: u32,
}

impl AddressRange {
    /// `None` if `first > last`.
    pub fn new(first: u32, last: u32) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    /// `None` if `length` is zero or the span runs past `u32::MAX`.
    pub fn with_length(start: u32, length: u32) -> Option<Self> {
        let last = start.checked_add(length.checked_sub(1)?)?;
        Some(Self { first: start, last })
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}-{:#06X}", self.first, self.last)
    }
}

/// Hex with a `0x` prefix, decimal otherwise.
fn parse_address(text: &str) -> Result<u32, RangeError> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|source| RangeError::Address {
        text: text.to_string(),
        source,
    })
}

impl FromStr for AddressRange {
    type Err = RangeError;

    /// `0xF000-0xFFFF` (inclusive end) or `0xF000,4096` (start and length).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let range = if let Some((start, length)) = s.split_once(',') {
            Self::with_length(parse_address(start)?, parse_address(length)?)
        } else if let Some((first, last)) = s.split_once('-') {
            Self::new(parse_address(first)?, parse_address(last)?)
        } else {
            return Err(RangeError::Syntax(s.to_string()));
        };
        range.ok_or_else(|| RangeError::Empty(s.to_string()))
    }
}

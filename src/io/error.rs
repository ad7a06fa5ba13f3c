use std::num::ParseIntError;

use thiserror::Error;

use super::Format;

/// Malformed input. Every variant is a format error: the autodetection
/// cascade moves on to the next codec when it sees one.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line} is not valid Intel-HEX data: '{prefix}...'")]
    MissingStartCode { line: usize, prefix: String },

    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("invalid hex digit at line {line}: {char:?}")]
    InvalidHexDigit { line: usize, char: char },

    #[error("file is not valid TI-Text at line {line}: {token:?} ({source})")]
    InvalidByte {
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid TI-Text address at line {line}: {source}")]
    InvalidAddress {
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("input is not valid text: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("invalid ELF: {0}")]
    InvalidElf(String),

    #[error("address overflow: {0}")]
    AddressOverflow(String),

    #[error("file could not be loaded (not {}){}", list_formats(.attempts), list_reasons(.attempts))]
    Unrecognized { attempts: Vec<(Format, String)> },
}

fn list_formats(attempts: &[(Format, String)]) -> String {
    let names: Vec<&str> = attempts.iter().map(|(f, _)| f.name()).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
        Some((last, _)) => last.to_string(),
        None => "any known format".to_string(),
    }
}

fn list_reasons(attempts: &[(Format, String)]) -> String {
    attempts
        .iter()
        .map(|(f, reason)| format!("\n  {}: {reason}", f.name()))
        .collect()
}

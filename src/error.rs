use thiserror::Error;

use crate::io::ParseError;
use crate::ops::AccessError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no executable: ELF type {e_type:#06x} is not ET_EXEC")]
    UnsupportedBinary { e_type: u16 },

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl Error {
    /// Malformed content. The load cascade falls through to the next format
    /// only on these; every other kind propagates.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(
        "could not collect the requested data: {size} bytes at {address:#06X}, only {collected} backed by segments"
    )]
    RangeNotBacked {
        address: u32,
        size: usize,
        collected: usize,
    },

    #[error(
        "could not write all data at {address:#06X}: {written} bytes written, {remaining} bytes not covered by any segment"
    )]
    IncompleteWrite {
        address: u32,
        written: usize,
        remaining: usize,
    },
}

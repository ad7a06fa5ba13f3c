mod access;
mod checksum;
mod error;

pub use access::PADDING_BYTE;
pub use checksum::{Checksum, ChecksumAlgorithm};
pub use error::AccessError;

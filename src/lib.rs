pub mod error;
pub mod image;
pub mod io;
pub mod ops;
pub mod range;
pub mod segment;

pub use error::Error;
pub use image::MemoryImage;
pub use io::{
    Format, IntelHexWriteOptions, LoadOptions, ParseError, TiTextWriteOptions, detect, load,
    load_file, load_reader, parse_elf, parse_intel_hex, parse_ti_text, write_intel_hex,
    write_ti_text,
};
pub use ops::{AccessError, Checksum, ChecksumAlgorithm, PADDING_BYTE};
pub use range::{AddressRange, RangeError};
pub use segment::Segment;

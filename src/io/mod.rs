mod detect;
mod elf;
mod error;
mod intel_hex;
mod ti_text;

pub use detect::{Format, LoadOptions, detect, load, load_file, load_reader};
pub use elf::parse_elf;
pub use error::ParseError;
pub use intel_hex::{IntelHexWriteOptions, parse_intel_hex, write_intel_hex};
pub use ti_text::{TiTextWriteOptions, parse_ti_text, write_ti_text};

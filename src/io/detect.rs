use std::fmt;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{ParseError, parse_elf, parse_intel_hex, parse_ti_text};
use crate::{Error, MemoryImage};

/// Input formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Elf,
    IntelHex,
    TiText,
}

/// Order of the content based detection.
const CASCADE: [Format; 3] = [Format::Elf, Format::IntelHex, Format::TiText];

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Elf => "ELF",
            Self::IntelHex => "Intel-Hex",
            Self::TiText => "TI-Text",
        }
    }

    /// Format implied by the file extension: `.txt` is TI-Text, `.a43` and
    /// `.hex` are Intel-HEX. Case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::TiText),
            "a43" | "hex" => Some(Self::IntelHex),
            _ => None,
        }
    }

    pub fn parse(&self, input: &[u8], options: &LoadOptions) -> Result<MemoryImage, Error> {
        match self {
            Self::Elf => parse_elf(input, options),
            Self::IntelHex => Ok(parse_intel_hex(input)?),
            Self::TiText => Ok(parse_ti_text(input)?),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Emit a debug event for every allocated ELF section.
    pub report_sections: bool,
}

/// Read a file and load it with [`load`].
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<MemoryImage, Error> {
    let content = std::fs::read(path)?;
    load(path, &content, options)
}

/// Read a source to the end and load it with [`load`]. `name` is only used for
/// the extension hint.
pub fn load_reader<R: Read>(
    name: &Path,
    mut reader: R,
    options: &LoadOptions,
) -> Result<MemoryImage, Error> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    load(name, &content, options)
}

/// Load memory contents, choosing the codec from the file name and content.
///
/// A known extension is tried first; if that parse reports malformed content
/// the content based detection runs: ELF, then Intel-HEX, then TI-Text. Only
/// format errors move on to the next candidate; anything else is returned as
/// is. Each attempt starts from a fresh image, so a failed attempt leaves no
/// segments behind.
pub fn load(path: &Path, input: &[u8], options: &LoadOptions) -> Result<MemoryImage, Error> {
    if let Some(format) = Format::from_path(path) {
        match format.parse(input, options) {
            Ok(image) => return Ok(image),
            Err(e) if e.is_format() => {
                debug!(path = %path.display(), "not {format} despite extension: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    detect(input, options)
}

/// Content based detection without an extension hint.
pub fn detect(input: &[u8], options: &LoadOptions) -> Result<MemoryImage, Error> {
    let mut attempts = Vec::with_capacity(CASCADE.len());
    for format in CASCADE {
        match format.parse(input, options) {
            Ok(image) => {
                debug!("loaded {} segments as {format}", image.len());
                return Ok(image);
            }
            Err(e) if e.is_format() => {
                debug!("not {format}: {e}");
                attempts.push((format, e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }
    Err(ParseError::Unrecognized { attempts }.into())
}

//! Section extraction from ELF executables.
//!
//! The structural parse is done by `object`; this module only decides which
//! sections carry data to place and where that data is loaded.

use object::elf;
use object::read::elf::{FileHeader, ProgramHeader, SectionHeader};
use object::{Endianness, FileKind};
use tracing::debug;

use super::{LoadOptions, ParseError};
use crate::{Error, MemoryImage, Segment};

/// Load the allocated, non-empty sections of an ELF executable.
///
/// Structural problems (bad magic, truncated tables) are format errors so the
/// caller can try another codec. A valid ELF that is not `ET_EXEC` is
/// [`Error::UnsupportedBinary`].
pub fn parse_elf(input: &[u8], options: &LoadOptions) -> Result<MemoryImage, Error> {
    match FileKind::parse(input) {
        Ok(FileKind::Elf32) => extract_sections::<elf::FileHeader32<Endianness>>(input, options),
        Ok(FileKind::Elf64) => extract_sections::<elf::FileHeader64<Endianness>>(input, options),
        Ok(other) => Err(ParseError::InvalidElf(format!("not an ELF file ({other:?})")).into()),
        Err(e) => Err(ParseError::InvalidElf(e.to_string()).into()),
    }
}

fn invalid(err: object::Error) -> Error {
    ParseError::InvalidElf(err.to_string()).into()
}

fn extract_sections<Elf: FileHeader<Endian = Endianness>>(
    data: &[u8],
    options: &LoadOptions,
) -> Result<MemoryImage, Error> {
    let header = Elf::parse(data).map_err(invalid)?;
    let endian = header.endian().map_err(invalid)?;

    let e_type = header.e_type(endian);
    if e_type != elf::ET_EXEC {
        return Err(Error::UnsupportedBinary { e_type });
    }

    let program_headers = header.program_headers(endian, data).map_err(invalid)?;
    let sections = header.sections(endian, data).map_err(invalid)?;

    let mut image = MemoryImage::new();
    for section in sections.iter() {
        let flags: u64 = section.sh_flags(endian).into();
        if flags & u64::from(elf::SHF_ALLOC) == 0 || section.sh_type(endian) == elf::SHT_NOBITS {
            continue;
        }

        let payload = section.data(endian, data).map_err(invalid)?;
        let lma = load_address::<Elf>(section, program_headers, endian)?;

        if options.report_sections {
            let name = sections
                .section_name(endian, section)
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            debug!(
                "ELF section {name} at {lma:#06x} {} bytes",
                payload.len()
            );
        }

        if payload.is_empty() {
            continue;
        }

        let start = u32::try_from(lma).map_err(|_| {
            ParseError::AddressOverflow(format!("ELF section load address {lma:#X}"))
        })?;
        image.append(Segment::new(start, payload.to_vec()));
    }

    Ok(image)
}

/// Physical load address of a section: taken from the `PT_LOAD` segment whose
/// file image contains it, or the section address when no segment does.
///
/// Header fields come straight from the file, so every sum is checked.
fn load_address<Elf: FileHeader>(
    section: &Elf::SectionHeader,
    program_headers: &[Elf::ProgramHeader],
    endian: Elf::Endian,
) -> Result<u64, Error> {
    let offset: u64 = section.sh_offset(endian).into();
    for phdr in program_headers {
        if phdr.p_type(endian) != elf::PT_LOAD {
            continue;
        }
        let p_offset: u64 = phdr.p_offset(endian).into();
        let p_filesz: u64 = phdr.p_filesz(endian).into();
        let p_end = p_offset.checked_add(p_filesz).ok_or_else(|| {
            ParseError::InvalidElf(format!(
                "PT_LOAD file range {p_offset:#X}+{p_filesz:#X} overflows"
            ))
        })?;
        if offset >= p_offset && offset < p_end {
            let p_paddr: u64 = phdr.p_paddr(endian).into();
            let lma = p_paddr.checked_add(offset - p_offset).ok_or_else(|| {
                ParseError::AddressOverflow(format!(
                    "ELF section load address {p_paddr:#X}+{:#X}",
                    offset - p_offset
                ))
            })?;
            return Ok(lma);
        }
    }
    Ok(section.sh_addr(endian).into())
}

use tracing::warn;

use super::ParseError;
use crate::{MemoryImage, Segment};

const RECORD_DATA: u8 = 0x00;
const RECORD_EOF: u8 = 0x01;
const RECORD_EXTENDED_SEGMENT: u8 = 0x02;
const RECORD_START_SEGMENT: u8 = 0x03;
const RECORD_EXTENDED_LINEAR: u8 = 0x04;
const RECORD_START_LINEAR: u8 = 0x05;

/// Highest address reachable with extended segment address records.
const MAX_SEGMENTED_ADDRESS: u32 = 0xF_FFFF;

#[derive(Debug, Clone)]
pub struct IntelHexWriteOptions {
    pub bytes_per_line: u8,
}

impl Default for IntelHexWriteOptions {
    fn default() -> Self {
        Self { bytes_per_line: 16 }
    }
}

/// Parse Intel-HEX input.
///
/// Consecutive data records are collected into one segment; a record whose
/// address does not continue the current run starts a new segment. Checksums
/// are not verified. Only extended segment address records (type 02) move the
/// address base; start address and extended linear records are accepted and
/// ignored. Unknown record types are reported and skipped.
pub fn parse_intel_hex(input: &[u8]) -> Result<MemoryImage, ParseError> {
    let text = std::str::from_utf8(input)?;

    let mut image = MemoryImage::new();
    let mut run: Vec<u8> = Vec::new();
    let mut run_start: u32 = 0;
    let mut current_address: u32 = 0;
    let mut extended_address: u32 = 0;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;

        if line.trim().is_empty() {
            continue;
        }

        if !line.starts_with(':') {
            return Err(ParseError::MissingStartCode {
                line: line_num,
                prefix: line.chars().take(10).collect(),
            });
        }

        let bytes = parse_hex_bytes(&line.trim_end()[1..], line_num)?;
        if bytes.len() < 5 {
            return Err(ParseError::InvalidRecord {
                line: line_num,
                message: "record too short".to_string(),
            });
        }

        let byte_count = bytes[0] as usize;
        if bytes.len() < 5 + byte_count {
            return Err(ParseError::InvalidRecord {
                line: line_num,
                message: format!(
                    "byte count too large: header says {}, but record only has {} data bytes",
                    byte_count,
                    bytes.len() - 5,
                ),
            });
        }

        let address = u16::from_be_bytes([bytes[1], bytes[2]]) as u32 + extended_address;
        let record_type = bytes[3];
        let data = &bytes[4..4 + byte_count];

        match record_type {
            RECORD_DATA => {
                if current_address != address {
                    flush_run(&mut image, run_start, &mut run);
                    run_start = address;
                    current_address = address;
                }
                run.extend_from_slice(data);
                current_address += byte_count as u32;
            }
            RECORD_EXTENDED_SEGMENT => {
                if byte_count < 2 {
                    return Err(ParseError::InvalidRecord {
                        line: line_num,
                        message: "extended segment address must have 2 data bytes".to_string(),
                    });
                }
                let base = u16::from_be_bytes([data[0], data[1]]);
                extended_address = (base as u32) << 4;
            }
            RECORD_EOF | RECORD_START_SEGMENT | RECORD_EXTENDED_LINEAR | RECORD_START_LINEAR => {}
            _ => {
                warn!(
                    line = line_num,
                    "ignored unknown field (type {record_type:#04x}) in Intel-HEX input"
                );
            }
        }
    }

    flush_run(&mut image, run_start, &mut run);
    Ok(image)
}

fn flush_run(image: &mut MemoryImage, start: u32, run: &mut Vec<u8>) {
    if !run.is_empty() {
        image.append(Segment::new(start, std::mem::take(run)));
    }
}

/// Write Intel-HEX output with CRLF line endings.
///
/// Segments are written in stored order. An extended segment address record
/// is emitted whenever the 64 KiB bank changes; images below `0x10000` consist
/// of data records and the final end-of-file record only.
pub fn write_intel_hex(
    image: &MemoryImage,
    options: &IntelHexWriteOptions,
) -> Result<Vec<u8>, ParseError> {
    let mut output = Vec::new();
    let bytes_per_line = if options.bytes_per_line == 0 {
        16
    } else {
        options.bytes_per_line
    } as usize;

    let mut current_bank: u32 = 0;

    for segment in image {
        let mut addr = segment.start_address;
        let mut data_offset = 0;

        while data_offset < segment.len() {
            if addr > MAX_SEGMENTED_ADDRESS {
                return Err(ParseError::AddressOverflow(format!(
                    "{addr:#X} cannot be expressed in Intel-HEX segment addressing"
                )));
            }

            let bank = addr & 0xF_0000;
            if bank != current_bank {
                let base = (bank >> 4) as u16;
                write_record(&mut output, RECORD_EXTENDED_SEGMENT, 0, &base.to_be_bytes());
                current_bank = bank;
            }

            let offset_addr = (addr & 0xFFFF) as u16;
            let remaining_in_bank = 0x10000 - offset_addr as usize;
            let remaining_data = segment.len() - data_offset;
            let chunk_len = bytes_per_line.min(remaining_in_bank).min(remaining_data);

            let chunk = &segment.data[data_offset..data_offset + chunk_len];
            write_record(&mut output, RECORD_DATA, offset_addr, chunk);

            data_offset += chunk_len;
            addr += chunk_len as u32;
        }
    }

    write_record(&mut output, RECORD_EOF, 0, &[]);
    Ok(output)
}

fn write_record(output: &mut Vec<u8>, record_type: u8, address: u16, data: &[u8]) {
    let byte_count = data.len() as u8;
    let addr_bytes = address.to_be_bytes();

    let mut checksum: u8 = 0;
    checksum = checksum.wrapping_add(byte_count);
    checksum = checksum.wrapping_add(addr_bytes[0]);
    checksum = checksum.wrapping_add(addr_bytes[1]);
    checksum = checksum.wrapping_add(record_type);
    for &b in data {
        checksum = checksum.wrapping_add(b);
    }
    checksum = (!checksum).wrapping_add(1);

    output.push(b':');
    write_hex_byte(output, byte_count);
    write_hex_byte(output, addr_bytes[0]);
    write_hex_byte(output, addr_bytes[1]);
    write_hex_byte(output, record_type);
    for &b in data {
        write_hex_byte(output, b);
    }
    write_hex_byte(output, checksum);
    output.extend_from_slice(b"\r\n");
}

fn write_hex_byte(output: &mut Vec<u8>, byte: u8) {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    output.push(HEX_CHARS[(byte >> 4) as usize]);
    output.push(HEX_CHARS[(byte & 0x0F) as usize]);
}

fn parse_hex_bytes(hex_str: &str, line_num: usize) -> Result<Vec<u8>, ParseError> {
    let bytes = hex_str.as_bytes();
    if !bytes.len().is_multiple_of(2) {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: "odd number of hex digits".to_string(),
        });
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let high = hex_digit(chunk[0], line_num)?;
        let low = hex_digit(chunk[1], line_num)?;
        out.push((high << 4) | low);
    }

    Ok(out)
}

fn hex_digit(b: u8, line_num: usize) -> Result<u8, ParseError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(ParseError::InvalidHexDigit {
            line: line_num,
            char: b as char,
        }),
    }
}

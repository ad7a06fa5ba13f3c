use super::ParseError;
use crate::{MemoryImage, Segment};

#[derive(Debug, Clone)]
pub struct TiTextWriteOptions {
    pub bytes_per_line: usize,
}

impl Default for TiTextWriteOptions {
    fn default() -> Self {
        Self { bytes_per_line: 16 }
    }
}

/// Parse TI-Text input.
///
/// `@addr` starts a new segment, `q` ends the file, anything else is a row of
/// whitespace separated hex bytes. Bytes before the first `@` land at address 0.
pub fn parse_ti_text(input: &[u8]) -> Result<MemoryImage, ParseError> {
    let text = std::str::from_utf8(input)?;

    let mut image = MemoryImage::new();
    let mut start_address: u32 = 0;
    let mut run: Vec<u8> = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('q') {
            break;
        }

        if let Some(address) = line.strip_prefix('@') {
            if !run.is_empty() {
                image.append(Segment::new(start_address, std::mem::take(&mut run)));
            }
            start_address = u32::from_str_radix(address.trim(), 16)
                .map_err(|source| ParseError::InvalidAddress {
                    line: line_num,
                    source,
                })?;
            continue;
        }

        for token in line.split_whitespace() {
            let byte = u8::from_str_radix(token, 16).map_err(|source| ParseError::InvalidByte {
                line: line_num,
                token: token.to_string(),
                source,
            })?;
            run.push(byte);
        }
    }

    if !run.is_empty() {
        image.append(Segment::new(start_address, run));
    }

    Ok(image)
}

/// Write TI-Text output: one `@addr` block per segment, rows of space
/// separated lowercase bytes, terminated by `q`.
pub fn write_ti_text(image: &MemoryImage, options: &TiTextWriteOptions) -> Vec<u8> {
    let bytes_per_line = if options.bytes_per_line == 0 {
        16
    } else {
        options.bytes_per_line
    };

    let mut out = String::new();
    for segment in image {
        out.push_str(&format!("@{:04x}\n", segment.start_address));
        for row in segment.data.chunks(bytes_per_line) {
            let bytes: Vec<String> = row.iter().map(|b| format!("{b:02x}")).collect();
            out.push_str(&bytes.join(" "));
            out.push('\n');
        }
    }
    out.push_str("q\n");
    out.into_bytes()
}

//! Checksums over padded memory ranges, for comparing an image against what a
//! flashing tool reads back from the target.

use std::fmt;

use crate::{AddressRange, MemoryImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// Sum of all bytes, wrapping at 16 bits.
    ByteSum16,
    /// CRC-16 CCITT, init 0xFFFF (IBM-SDLC).
    Crc16Ccitt,
    /// CRC-32 IEEE (ISO-HDLC).
    Crc32,
}

impl ChecksumAlgorithm {
    /// Size of the checksum result in bytes.
    pub fn result_size(&self) -> usize {
        match self {
            Self::Crc32 => 4,
            _ => 2,
        }
    }

    pub fn compute(&self, data: &[u8]) -> u32 {
        match self {
            Self::ByteSum16 => byte_sum(data) as u32,
            Self::Crc16Ccitt => crc16_ibm_sdlc(data) as u32,
            Self::Crc32 => crc32_iso_hdlc(data),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub value: u32,
}

impl Checksum {
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let bytes = self.value.to_be_bytes();
        bytes[4 - self.algorithm.result_size()..].to_vec()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.algorithm.result_size() * 2;
        write!(f, "{:0width$X}", self.value)
    }
}

impl MemoryImage {
    /// Checksum over `range`, or over the whole image extent when `None`.
    /// Gaps read as 0xFF, as in [`MemoryImage::get_memrange`].
    pub fn checksum(&self, algorithm: ChecksumAlgorithm, range: Option<AddressRange>) -> Checksum {
        let span = match range {
            Some(r) => Some((r.first, r.last)),
            None => self.min_address().zip(self.max_address()),
        };
        let data = match span {
            Some((start, end)) => self.get_memrange(start, end),
            None => Vec::new(),
        };
        Checksum {
            algorithm,
            value: algorithm.compute(&data),
        }
    }
}

/// Sum all bytes, wrapping to 16-bit.
fn byte_sum(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16))
}

fn crc32_iso_hdlc(data: &[u8]) -> u32 {
    const CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
    CRC.checksum(data)
}

fn crc16_ibm_sdlc(data: &[u8]) -> u16 {
    const CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_IBM_SDLC);
    CRC.checksum(data)
}

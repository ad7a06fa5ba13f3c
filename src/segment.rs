use std::ops::Index;

/// A contiguous run of known memory content starting at `start_address`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub start_address: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(start_address: u32, data: Vec<u8>) -> Self {
        Self {
            start_address,
            data,
        }
    }

    /// Address one past the last byte. Wider than `u32` so a segment ending
    /// at the top of the address space does not wrap.
    pub fn end_address_exclusive(&self) -> u64 {
        self.start_address as u64 + self.data.len() as u64
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.start_address && (addr as u64) < self.end_address_exclusive()
    }

    /// Offset of `addr` into `data`, if the segment covers it.
    pub fn offset_of(&self, addr: u32) -> Option<usize> {
        self.contains(addr)
            .then(|| (addr - self.start_address) as usize)
    }
}

impl Index<usize> for Segment {
    type Output = u8;

    fn index(&self, offset: usize) -> &u8 {
        &self.data[offset]
    }
}

//! Address based reads and writes.
//!
//! All three accessors walk the segments in stored (load) order and use the
//! first segment that covers the current address. Segments are never sorted,
//! merged or resized here.

use crate::MemoryImage;

use super::AccessError;

/// Value read for addresses no segment covers (erased flash).
pub const PADDING_BYTE: u8 = 0xFF;

impl MemoryImage {
    /// Read `from..=to`. Uncovered addresses read as [`PADDING_BYTE`]; the
    /// result always holds `to - from + 1` bytes (empty if `from > to`).
    pub fn get_memrange(&self, from: u32, to: u32) -> Vec<u8> {
        if from > to {
            return Vec::new();
        }

        let end = to as u64 + 1;
        let mut out = Vec::with_capacity((end - from as u64) as usize);
        let mut addr = from as u64;

        while addr < end {
            let current = addr as u32;
            match self.segments().iter().find(|s| s.contains(current)) {
                Some(seg) => {
                    let offset = (current - seg.start_address) as usize;
                    let count = (seg.end_address_exclusive().min(end) - addr) as usize;
                    out.extend_from_slice(&seg.data[offset..offset + count]);
                    addr += count as u64;
                }
                None => {
                    out.push(PADDING_BYTE);
                    addr += 1;
                }
            }
        }

        out
    }

    /// Read exactly `size` bytes at `address` without padding.
    ///
    /// Makes a single pass over the segments in stored order, taking from each
    /// one that covers the next wanted address. If the backing segments are
    /// stored out of address order the pass can miss data that is present, and
    /// the read fails.
    pub fn get_mem(&self, address: u32, size: usize) -> Result<Vec<u8>, AccessError> {
        let mut data = Vec::with_capacity(size);
        let mut addr = address as u64;

        for seg in self.segments() {
            if data.len() == size {
                break;
            }
            let Ok(current) = u32::try_from(addr) else {
                break;
            };
            if let Some(offset) = seg.offset_of(current) {
                let length = (seg.len() - offset).min(size - data.len());
                data.extend_from_slice(&seg.data[offset..offset + length]);
                addr += length as u64;
            }
        }

        if data.len() != size {
            return Err(AccessError::RangeNotBacked {
                address,
                size,
                collected: data.len(),
            });
        }
        Ok(data)
    }

    /// Overwrite memory at `address` with `contents`.
    ///
    /// Only existing segments are written; their length and start address do
    /// not change. On [`AccessError::IncompleteWrite`] the bytes that could be
    /// placed have already been written.
    pub fn set_mem(&mut self, address: u32, contents: &[u8]) -> Result<(), AccessError> {
        let mut remaining = contents;
        let mut addr = address as u64;

        for seg in self.segments_mut() {
            if remaining.is_empty() {
                break;
            }
            let Ok(current) = u32::try_from(addr) else {
                break;
            };
            if let Some(offset) = seg.offset_of(current) {
                let length = (seg.len() - offset).min(remaining.len());
                seg.data[offset..offset + length].copy_from_slice(&remaining[..length]);
                remaining = &remaining[length..];
                addr += length as u64;
            }
        }

        if !remaining.is_empty() {
            return Err(AccessError::IncompleteWrite {
                address,
                written: contents.len() - remaining.len(),
                remaining: remaining.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segment;

    fn image(segments: Vec<Segment>) -> MemoryImage {
        MemoryImage::with_segments(segments)
    }

    #[test]
    fn test_memrange_uncovered_is_all_padding() {
        let img = image(vec![Segment::new(0x100, vec![0x01; 4])]);
        assert_eq!(img.get_memrange(0x200, 0x20F), vec![0xFF; 16]);
        assert_eq!(MemoryImage::new().get_memrange(0, 0), vec![0xFF]);
    }

    #[test]
    fn test_memrange_pads_gaps() {
        let img = image(vec![
            Segment::new(0x102, vec![0xCC, 0xDD]),
            Segment::new(0x100, vec![0xAA]),
        ]);
        assert_eq!(
            img.get_memrange(0x0FF, 0x105),
            vec![0xFF, 0xAA, 0xFF, 0xCC, 0xDD, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_memrange_clips_to_requested_end() {
        let img = image(vec![Segment::new(0x100, vec![1, 2, 3, 4, 5, 6])]);
        assert_eq!(img.get_memrange(0x101, 0x103), vec![2, 3, 4]);
    }

    #[test]
    fn test_memrange_overlap_prefers_first_stored() {
        let img = image(vec![
            Segment::new(0x100, vec![0xAA; 2]),
            Segment::new(0x100, vec![0xBB; 4]),
        ]);
        assert_eq!(img.get_memrange(0x100, 0x103), vec![0xAA, 0xAA, 0xBB, 0xBB]);
    }

    #[test]
    fn test_memrange_reversed_is_empty() {
        let img = image(vec![Segment::new(0x100, vec![1])]);
        assert!(img.get_memrange(0x101, 0x100).is_empty());
    }

    #[test]
    fn test_memrange_top_of_address_space() {
        let img = image(vec![Segment::new(u32::MAX - 1, vec![0x11, 0x22])]);
        assert_eq!(
            img.get_memrange(u32::MAX - 2, u32::MAX),
            vec![0xFF, 0x11, 0x22]
        );
    }

    #[test]
    fn test_get_mem_within_segment() {
        let img = image(vec![Segment::new(0xF000, vec![1, 2, 3, 4])]);
        assert_eq!(img.get_mem(0xF001, 2).unwrap(), vec![2, 3]);
        assert_eq!(img.get_mem(0xF000, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_get_mem_across_adjacent_segments() {
        let img = image(vec![
            Segment::new(0x100, vec![1, 2]),
            Segment::new(0x102, vec![3, 4]),
        ]);
        assert_eq!(img.get_mem(0x101, 3).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_get_mem_uncovered_byte_fails() {
        let img = image(vec![
            Segment::new(0x100, vec![1, 2]),
            Segment::new(0x103, vec![4]),
        ]);
        let err = img.get_mem(0x100, 4).unwrap_err();
        assert!(matches!(
            err,
            AccessError::RangeNotBacked {
                address: 0x100,
                size: 4,
                collected: 2,
            }
        ));
        assert!(img.get_mem(0x200, 1).is_err());
    }

    #[test]
    fn test_get_mem_depends_on_stored_order() {
        let ordered = image(vec![
            Segment::new(0x100, vec![1, 2]),
            Segment::new(0x102, vec![3, 4]),
        ]);
        let reversed = image(vec![
            Segment::new(0x102, vec![3, 4]),
            Segment::new(0x100, vec![1, 2]),
        ]);
        assert_eq!(ordered.get_mem(0x100, 4).unwrap(), vec![1, 2, 3, 4]);
        assert!(matches!(
            reversed.get_mem(0x100, 4),
            Err(AccessError::RangeNotBacked { collected: 2, .. })
        ));
    }

    #[test]
    fn test_set_mem_in_place() {
        let mut img = image(vec![Segment::new(0x100, vec![0; 4])]);
        img.set_mem(0x101, &[0xAA, 0xBB]).unwrap();
        assert_eq!(img[0].data, vec![0x00, 0xAA, 0xBB, 0x00]);
        assert_eq!(img[0].len(), 4);
        assert_eq!(img[0].start_address, 0x100);
    }

    #[test]
    fn test_set_mem_across_adjacent_segments() {
        let mut img = image(vec![
            Segment::new(0x100, vec![0; 2]),
            Segment::new(0x102, vec![0; 2]),
        ]);
        img.set_mem(0x101, &[1, 2, 3]).unwrap();
        assert_eq!(img[0].data, vec![0, 1]);
        assert_eq!(img[1].data, vec![2, 3]);
    }

    #[test]
    fn test_set_mem_overlap_writes_first_stored_segment_first() {
        // The second segment alone would cover the whole write, but the first
        // covering segment in stored order takes the leading bytes.
        let mut img = image(vec![
            Segment::new(0x100, vec![0; 4]),
            Segment::new(0x100, vec![0; 16]),
        ]);
        img.set_mem(0x102, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img[0].data, vec![0, 0, 1, 2]);
        assert_eq!(&img[1].data[..8], &[0, 0, 0, 0, 3, 4, 5, 6]);
    }

    #[test]
    fn test_set_mem_partial_write_is_visible() {
        let mut img = image(vec![Segment::new(0x100, vec![0; 4])]);
        let err = img.set_mem(0x102, &[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(
            err,
            AccessError::IncompleteWrite {
                address: 0x102,
                written: 2,
                remaining: 2,
            }
        ));
        assert_eq!(img[0].data, vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_set_mem_uncovered_fails_without_change() {
        let mut img = image(vec![Segment::new(0x100, vec![0; 4])]);
        assert!(img.set_mem(0x200, &[1]).is_err());
        assert_eq!(img[0].data, vec![0; 4]);
    }

    #[test]
    fn test_set_mem_empty_contents() {
        let mut img = MemoryImage::new();
        img.set_mem(0x100, &[]).unwrap();
    }

    #[test]
    fn test_set_then_get() {
        let mut img = image(vec![Segment::new(0xFFE0, vec![0xFF; 32])]);
        img.set_mem(0xFFFE, &[0x00, 0xF0]).unwrap();
        assert_eq!(img.get_mem(0xFFFE, 2).unwrap(), vec![0x00, 0xF0]);
        assert_eq!(img.get_memrange(0xFFFC, 0x10001), vec![0xFF, 0xFF, 0x00, 0xF0, 0xFF, 0xFF]);
    }
}

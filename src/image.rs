use std::fmt;
use std::ops::Index;

use crate::Segment;

/// Memory contents as an ordered list of segments.
///
/// Segments are kept in load order, not sorted by address. They may overlap
/// or leave gaps; nothing merges or normalizes them. Address-based accessors
/// (`get_memrange`, `get_mem`, `set_mem`) scan segments in this stored order,
/// so for overlapping data the earlier-loaded segment takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    segments: Vec<Segment>,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self { segments: vec![] }
    }

    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Add a segment at the end. No dedup or merge with existing segments.
    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Number of segments (not bytes).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn min_address(&self) -> Option<u32> {
        self.segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.start_address)
            .min()
    }

    /// Highest covered address (inclusive).
    pub fn max_address(&self) -> Option<u32> {
        self.segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| (s.end_address_exclusive() - 1) as u32)
            .max()
    }

    pub fn total_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }
}

impl Index<usize> for MemoryImage {
    type Output = Segment;

    fn index(&self, index: usize) -> &Segment {
        &self.segments[index]
    }
}

impl<'a> IntoIterator for &'a MemoryImage {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for MemoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory:")?;
        for seg in &self.segments {
            writeln!(
                f,
                "  segment at {:#06x}, {} bytes",
                seg.start_address,
                seg.len()
            )?;
        }
        Ok(())
    }
}

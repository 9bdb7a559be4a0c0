//! Human-readable snapshots of pool state
//!
//! Both types are plain values produced by the engine; rendering is left
//! to the caller via `Display`, the engine itself never prints.

use core::fmt;

use crate::block::Block;

/// Aggregate pool state at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReport {
    /// Total pool size in bytes
    pub total: usize,
    /// Bytes in allocated blocks
    pub allocated: usize,
    /// Bytes in free blocks
    pub free: usize,
    /// Number of free blocks
    pub holes: usize,
    /// Size of the largest free block, 0 if none
    pub largest_free: usize,
}

impl MemoryReport {
    /// Mean free-block size, or `None` when there are no holes
    #[must_use]
    pub fn average_hole_size(&self) -> Option<f64> {
        (self.holes > 0).then(|| self.free as f64 / self.holes as f64)
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} of {} bytes allocated", self.allocated, self.total)?;
        write!(
            f,
            "{} bytes free in {} holes; largest free block is {} bytes",
            self.free, self.holes, self.largest_free
        )?;
        if let Some(average) = self.average_hole_size() {
            write!(f, "\naverage hole size is {average:.1} bytes")?;
        }
        Ok(())
    }
}

/// One line of a [`BlockMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry {
    pub offset: usize,
    pub size: usize,
    pub allocated: bool,
}

/// Full block layout in pool order, for debugging output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMap {
    entries: Vec<BlockEntry>,
}

impl BlockMap {
    pub(crate) fn from_blocks<'a>(blocks: impl Iterator<Item = &'a Block>) -> Self {
        Self {
            entries: blocks
                .map(|block| BlockEntry {
                    offset: block.offset,
                    size: block.size,
                    allocated: block.allocated,
                })
                .collect(),
        }
    }

    /// Entries in pool order
    #[must_use]
    pub fn entries(&self) -> &[BlockEntry] {
        &self.entries
    }
}

impl fmt::Display for BlockMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "block map ({} blocks):", self.entries.len())?;
        for entry in &self.entries {
            writeln!(
                f,
                "  offset {:>8}  size {:>8}  {}",
                entry.offset,
                entry.size,
                if entry.allocated { "ALLOCATED" } else { "FREE" }
            )?;
        }
        Ok(())
    }
}

//! Block bookkeeping records

/// Index of a block slot inside the [`BlockList`](crate::list::BlockList)
/// arena.
///
/// A newtype rather than a raw `usize` to prevent accidental mixing with
/// pool offsets, which are also `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One contiguous run of the pool, free or allocated.
///
/// `prev`/`next` are arena indices, not references; the list owns every
/// block and a removed block's slot is recycled rather than deallocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Byte offset into the pool where this block begins
    pub offset: usize,
    /// Byte length; always >= 1
    pub size: usize,
    /// Occupied vs. free
    pub allocated: bool,
    pub(crate) prev: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
}

impl Block {
    /// One past the last byte of this block
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Whether this free block can service a request of `requested` bytes
    #[inline]
    pub(crate) fn fits(&self, requested: usize) -> bool {
        !self.allocated && self.size >= requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end() {
        let block = Block {
            offset: 100,
            size: 50,
            allocated: false,
            prev: None,
            next: None,
        };
        assert_eq!(block.end(), 150);
    }

    #[test]
    fn test_fits_requires_free() {
        let mut block = Block {
            offset: 0,
            size: 64,
            allocated: false,
            prev: None,
            next: None,
        };
        assert!(block.fits(64));
        assert!(block.fits(1));
        assert!(!block.fits(65));

        block.allocated = true;
        assert!(!block.fits(1));
    }
}

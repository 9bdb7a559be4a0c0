//! Allocator engine
//!
//! Owns the pool bookkeeping and the block list, services allocate/free
//! requests under the configured placement strategy, and answers the
//! introspection queries. One engine instance is one independent pool;
//! there is no shared or global state.

use crate::block::{Block, BlockId};
use crate::error::{MemoryError, MemoryResult};
use crate::list::{BlockList, Merge};
use crate::report::{BlockMap, MemoryReport};
use crate::strategy::Strategy;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Simulated heap over a single contiguous byte pool.
///
/// The pool is bookkeeping-only: addresses are byte offsets from
/// [`pool_base`](Self::pool_base) (always 0) and no backing memory is
/// touched. All operations are synchronous and run in time linear in the
/// number of blocks; mutation requires `&mut self`, so the type system
/// rules out the unsynchronized sharing the engine does not support.
#[derive(Debug, Clone)]
pub struct MemoryPool {
    strategy: Strategy,
    total_size: usize,
    list: BlockList,
    /// Block of the last successful next-fit allocation; repaired eagerly
    /// when coalescing removes it and validated lazily at scan start.
    cursor: Option<BlockId>,
}

impl MemoryPool {
    /// Create a pool of `total_size` bytes covered by a single free block.
    ///
    /// A zero-size pool is legal; every allocation against it fails with
    /// `OutOfMemory`.
    #[must_use]
    pub fn new(strategy: Strategy, total_size: usize) -> Self {
        #[cfg(feature = "logging")]
        debug!(%strategy, total_size, "initializing memory pool");

        let list = BlockList::new(total_size);
        let cursor = list.head();
        Self {
            strategy,
            total_size,
            list,
            cursor,
        }
    }

    /// Re-initialize in place, fully discarding all prior state.
    ///
    /// Always legal, including with allocations outstanding; no block,
    /// cursor, or pool residue survives. Addresses handed out before the
    /// call become invalid.
    pub fn initialize(&mut self, strategy: Strategy, total_size: usize) {
        *self = Self::new(strategy, total_size);
    }

    /// Allocate `requested` bytes and return the block's offset.
    ///
    /// The candidate free block is chosen by the configured strategy. An
    /// exact fit is marked allocated in place; a larger block is split,
    /// with the allocated prefix keeping the original offset. On any error
    /// the engine state is unchanged.
    pub fn allocate(&mut self, requested: usize) -> MemoryResult<usize> {
        if requested == 0 {
            return Err(MemoryError::invalid_argument(
                "requested size must be >= 1",
            ));
        }

        let candidate = match self.strategy {
            Strategy::FirstFit => self.list.find_first(requested),
            Strategy::BestFit => self.list.find_best(requested),
            Strategy::WorstFit => self.list.find_worst(requested),
            Strategy::NextFit => self.list.find_next(self.cursor, requested),
        };
        let Some(id) = candidate else {
            return Err(MemoryError::out_of_memory(requested, self.bytes_free()));
        };

        let offset = self.list.allocate_at(id, requested);
        if self.strategy == Strategy::NextFit {
            self.cursor = Some(id);
        }

        #[cfg(feature = "logging")]
        trace!(requested, offset, "allocated block");

        Ok(offset)
    }

    /// Free the allocated block whose offset is exactly `address`.
    ///
    /// Anything else, including a second free of the same address, is an
    /// `InvalidAddress` error and leaves the engine unchanged. Adjacent
    /// free neighbors are coalesced (left, then right; at most two merges
    /// by the no-adjacent-free invariant), redirecting the next-fit cursor
    /// to the surviving block when a merge removes the block it referenced.
    pub fn free(&mut self, address: usize) -> MemoryResult<()> {
        let id = self
            .list
            .find_by_offset(address)
            .filter(|&id| self.list.get(id).is_some_and(|block| block.allocated))
            .ok_or(MemoryError::InvalidAddress { address })?;

        self.list.mark_free(id);
        let mut survivor = id;
        if let Some(merge) = self.list.merge_with_prev(survivor) {
            self.repair_cursor(merge);
            survivor = merge.survivor;
        }
        if let Some(merge) = self.list.merge_with_next(survivor) {
            self.repair_cursor(merge);
        }

        #[cfg(feature = "logging")]
        trace!(address, "freed block");

        Ok(())
    }

    fn repair_cursor(&mut self, merge: Merge) {
        if self.cursor == Some(merge.removed) {
            self.cursor = Some(merge.survivor);
        }
    }

    // --- Introspection (read-only linear scans, no caching) ---

    /// Number of free blocks
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.blocks().filter(|block| !block.allocated).count()
    }

    /// Sum of sizes of allocated blocks
    #[must_use]
    pub fn bytes_allocated(&self) -> usize {
        self.blocks()
            .filter(|block| block.allocated)
            .map(|block| block.size)
            .sum()
    }

    /// Sum of sizes of free blocks
    #[must_use]
    pub fn bytes_free(&self) -> usize {
        self.blocks()
            .filter(|block| !block.allocated)
            .map(|block| block.size)
            .sum()
    }

    /// Size of the largest free block, or 0 if none
    #[must_use]
    pub fn largest_free_block(&self) -> usize {
        self.blocks()
            .filter(|block| !block.allocated)
            .map(|block| block.size)
            .max()
            .unwrap_or(0)
    }

    /// Number of free blocks with `size <= threshold`
    #[must_use]
    pub fn small_free_count(&self, threshold: usize) -> usize {
        self.blocks()
            .filter(|block| !block.allocated && block.size <= threshold)
            .count()
    }

    /// Allocation status of the block that begins exactly at `address`
    pub fn is_allocated(&self, address: usize) -> MemoryResult<bool> {
        self.list
            .find_by_offset(address)
            .and_then(|id| self.list.get(id))
            .map(|block| block.allocated)
            .ok_or(MemoryError::InvalidAddress { address })
    }

    /// Base address of the pool; all returned offsets are relative to it
    #[must_use]
    pub fn pool_base(&self) -> usize {
        0
    }

    /// Total number of bytes in the pool
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.total_size
    }

    /// The configured placement strategy
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Iterate blocks in pool order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.list.iter().map(|(_, block)| block)
    }

    /// Snapshot of the aggregate pool state
    #[must_use]
    pub fn report(&self) -> MemoryReport {
        MemoryReport {
            total: self.total_size,
            allocated: self.bytes_allocated(),
            free: self.bytes_free(),
            holes: self.hole_count(),
            largest_free: self.largest_free_block(),
        }
    }

    /// Snapshot of the full block layout, for debugging output
    #[must_use]
    pub fn dump(&self) -> BlockMap {
        BlockMap::from_blocks(self.blocks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_pool_is_one_free_block() {
        let pool = MemoryPool::new(Strategy::FirstFit, 500);
        assert_eq!(pool.pool_size(), 500);
        assert_eq!(pool.hole_count(), 1);
        assert_eq!(pool.bytes_free(), 500);
        assert_eq!(pool.bytes_allocated(), 0);
        assert_eq!(pool.largest_free_block(), 500);
    }

    #[test]
    fn test_allocate_splits_and_exact_fit_does_not() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 100);
        let a = pool.allocate(60).unwrap();
        assert_eq!(a, 0);
        assert_eq!(pool.hole_count(), 1);

        let b = pool.allocate(40).unwrap();
        assert_eq!(b, 60);
        assert_eq!(pool.hole_count(), 0);
        assert_eq!(pool.bytes_allocated(), 100);
    }

    #[test]
    fn test_allocate_zero_is_invalid_argument() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 100);
        let err = pool.allocate(0).unwrap_err();
        assert_eq!(err.code(), "SIM:ARG:INVALID");
        assert_eq!(pool.bytes_free(), 100);
    }

    #[test]
    fn test_out_of_memory_is_a_state_noop() {
        let mut pool = MemoryPool::new(Strategy::BestFit, 100);
        pool.allocate(60).unwrap();

        let err = pool.allocate(50).unwrap_err();
        assert_eq!(err, MemoryError::OutOfMemory {
            requested: 50,
            available: 40,
        });
        assert_eq!(pool.hole_count(), 1);
        assert_eq!(pool.bytes_allocated(), 60);
        assert_eq!(pool.bytes_free(), 40);
    }

    #[test]
    fn test_zero_size_pool_never_allocates() {
        let mut pool = MemoryPool::new(Strategy::WorstFit, 0);
        assert_eq!(pool.hole_count(), 0);
        assert_eq!(pool.bytes_free(), 0);
        let err = pool.allocate(1).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_free_unknown_address_is_invalid() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 100);
        pool.allocate(50).unwrap();
        assert_eq!(
            pool.free(25).unwrap_err(),
            MemoryError::InvalidAddress { address: 25 }
        );
    }

    #[test]
    fn test_free_of_free_block_is_invalid() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 100);
        pool.allocate(50).unwrap();
        // Offset 50 is the free remainder, not an allocation.
        assert_eq!(
            pool.free(50).unwrap_err(),
            MemoryError::InvalidAddress { address: 50 }
        );
    }

    #[test]
    fn test_is_allocated() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 100);
        let a = pool.allocate(50).unwrap();
        assert!(pool.is_allocated(a).unwrap());
        assert!(!pool.is_allocated(50).unwrap());
        assert_eq!(
            pool.is_allocated(10).unwrap_err(),
            MemoryError::InvalidAddress { address: 10 }
        );
    }

    #[test]
    fn test_small_free_count() {
        let mut pool = MemoryPool::new(Strategy::FirstFit, 300);
        let a = pool.allocate(100).unwrap();
        let _b = pool.allocate(150).unwrap();
        pool.free(a).unwrap();
        // Holes: 100 at offset 0, 50 at offset 250.
        assert_eq!(pool.small_free_count(50), 1);
        assert_eq!(pool.small_free_count(100), 2);
        assert_eq!(pool.small_free_count(49), 0);
    }

    #[test]
    fn test_reinitialize_leaves_no_residue() {
        let mut pool = MemoryPool::new(Strategy::NextFit, 500);
        let a = pool.allocate(100).unwrap();
        pool.allocate(100).unwrap();

        pool.initialize(Strategy::FirstFit, 200);
        assert_eq!(pool.pool_size(), 200);
        assert_eq!(pool.bytes_free(), 200);
        assert_eq!(pool.bytes_allocated(), 0);
        assert_eq!(pool.hole_count(), 1);
        assert_eq!(pool.strategy(), Strategy::FirstFit);
        // Addresses from the previous session are gone: offset 0 is now the
        // single free block, so freeing the old allocation is an error.
        assert_eq!(
            pool.free(a).unwrap_err(),
            MemoryError::InvalidAddress { address: a }
        );
    }

    #[test]
    fn test_next_fit_cursor_survives_coalescing() {
        let mut pool = MemoryPool::new(Strategy::NextFit, 300);
        let a = pool.allocate(100).unwrap();
        let b = pool.allocate(100).unwrap();
        let c = pool.allocate(100).unwrap();

        // Cursor points at c's block; freeing b then c merges c's block
        // into b's freed one and must redirect the cursor to the survivor.
        pool.free(b).unwrap();
        pool.free(c).unwrap();
        assert_eq!(pool.hole_count(), 1);

        // A next-fit scan after the repair still works and wraps correctly.
        let d = pool.allocate(150).unwrap();
        assert_eq!(d, 100);
        pool.free(a).unwrap();
        pool.free(d).unwrap();
        assert_eq!(pool.bytes_free(), 300);
        assert_eq!(pool.hole_count(), 1);
    }

    #[test]
    fn test_conservation_across_mixed_workload() {
        let mut pool = MemoryPool::new(Strategy::BestFit, 1000);
        let a = pool.allocate(200).unwrap();
        let b = pool.allocate(300).unwrap();
        pool.free(a).unwrap();
        let c = pool.allocate(100).unwrap();
        pool.free(b).unwrap();

        assert_eq!(pool.bytes_allocated() + pool.bytes_free(), pool.pool_size());
        assert_eq!(pool.bytes_allocated(), 100);
        pool.free(c).unwrap();
        assert_eq!(pool.bytes_free(), 1000);
    }
}

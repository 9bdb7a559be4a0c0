//! Ordered block list over a slot arena
//!
//! Blocks are linked by arena indices rather than references or raw
//! pointers; removing a block marks its slot vacant for reuse instead of
//! deallocating, so a stale [`BlockId`] can never dangle.

use crate::block::{Block, BlockId};

/// Outcome of coalescing two adjacent free blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Merge {
    /// Block that absorbed its neighbor and remains in the list
    pub survivor: BlockId,
    /// Block that was unlinked; its slot is vacant after the merge
    pub removed: BlockId,
}

/// Ordered, mutable collection of [`Block`]s that always partitions the
/// pool exactly.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    slots: Vec<Option<Block>>,
    vacant: Vec<usize>,
    head: Option<BlockId>,
    len: usize,
}

impl BlockList {
    /// Create a list covering a pool of `total_size` bytes with one free
    /// block, or an empty list for a zero-size pool.
    #[must_use]
    pub fn new(total_size: usize) -> Self {
        let mut list = Self::default();
        if total_size > 0 {
            let id = list.insert_slot(Block {
                offset: 0,
                size: total_size,
                allocated: false,
                prev: None,
                next: None,
            });
            list.head = Some(id);
        }
        list
    }

    /// First block in pool order, if any
    #[must_use]
    pub fn head(&self) -> Option<BlockId> {
        self.head
    }

    /// Number of blocks in the list
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` refers to a block currently in the list
    #[must_use]
    pub fn is_live(&self, id: BlockId) -> bool {
        self.slots.get(id.index()).is_some_and(Option::is_some)
    }

    /// Look up a block by id
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Iterate blocks in pool order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Find the block that begins exactly at `offset`
    #[must_use]
    pub fn find_by_offset(&self, offset: usize) -> Option<BlockId> {
        self.iter()
            .find(|(_, block)| block.offset == offset)
            .map(|(id, _)| id)
    }

    // --- Placement scans (pure: no list mutation) ---

    /// First free block with `size >= requested`, in list order
    pub(crate) fn find_first(&self, requested: usize) -> Option<BlockId> {
        self.iter()
            .find(|(_, block)| block.fits(requested))
            .map(|(id, _)| id)
    }

    /// Smallest free block with `size >= requested`; ties go to the first
    /// occurrence in list order
    pub(crate) fn find_best(&self, requested: usize) -> Option<BlockId> {
        let mut best: Option<(BlockId, usize)> = None;
        for (id, block) in self.iter() {
            if block.fits(requested) && best.is_none_or(|(_, size)| block.size < size) {
                best = Some((id, block.size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Largest free block with `size >= requested`; ties go to the first
    /// occurrence in list order
    pub(crate) fn find_worst(&self, requested: usize) -> Option<BlockId> {
        let mut worst: Option<(BlockId, usize)> = None;
        for (id, block) in self.iter() {
            if block.fits(requested) && worst.is_none_or(|(_, size)| block.size > size) {
                worst = Some((id, block.size));
            }
        }
        worst.map(|(id, _)| id)
    }

    /// First free block with `size >= requested` scanning circularly,
    /// starting just after `cursor` and stopping after one full circuit.
    ///
    /// A cursor that is unset or no longer live is treated as the head, so
    /// the scan begins at the head's successor and checks the anchor block
    /// itself last.
    pub(crate) fn find_next(&self, cursor: Option<BlockId>, requested: usize) -> Option<BlockId> {
        let head = self.head?;
        let anchor = cursor.filter(|&id| self.is_live(id)).unwrap_or(head);
        let start = self.node(anchor).next.unwrap_or(head);
        let mut current = start;
        loop {
            let block = self.node(current);
            if block.fits(requested) {
                return Some(current);
            }
            current = block.next.unwrap_or(head);
            if current == start {
                return None;
            }
        }
    }

    // --- List surgery ---

    /// Mark the free block `id` allocated, splitting off a free remainder
    /// when it is strictly larger than `requested`.
    ///
    /// Returns the allocated block's offset. The caller guarantees `id` is
    /// a live free block with `size >= requested >= 1`.
    pub(crate) fn allocate_at(&mut self, id: BlockId, requested: usize) -> usize {
        let (offset, size) = {
            let block = self.node_mut(id);
            block.allocated = true;
            (block.offset, block.size)
        };
        if size > requested {
            // Split: the allocated prefix keeps the original offset, the
            // free remainder is inserted immediately after.
            self.node_mut(id).size = requested;
            self.insert_after(
                id,
                Block {
                    offset: offset + requested,
                    size: size - requested,
                    allocated: false,
                    prev: None,
                    next: None,
                },
            );
        }
        offset
    }

    /// Merge `id` into its predecessor if both are free.
    pub(crate) fn merge_with_prev(&mut self, id: BlockId) -> Option<Merge> {
        let prev = self.node(id).prev?;
        if self.node(prev).allocated || self.node(id).allocated {
            return None;
        }
        let size = self.node(id).size;
        self.node_mut(prev).size += size;
        self.remove(id);
        Some(Merge {
            survivor: prev,
            removed: id,
        })
    }

    /// Merge the successor of `id` into `id` if both are free.
    pub(crate) fn merge_with_next(&mut self, id: BlockId) -> Option<Merge> {
        let next = self.node(id).next?;
        if self.node(next).allocated || self.node(id).allocated {
            return None;
        }
        let size = self.node(next).size;
        self.node_mut(id).size += size;
        self.remove(next);
        Some(Merge {
            survivor: id,
            removed: next,
        })
    }

    /// Mark the block free. The caller guarantees `id` is live.
    pub(crate) fn mark_free(&mut self, id: BlockId) {
        self.node_mut(id).allocated = false;
    }

    fn insert_after(&mut self, id: BlockId, mut block: Block) -> BlockId {
        let old_next = self.node(id).next;
        block.prev = Some(id);
        block.next = old_next;
        let new_id = self.insert_slot(block);
        self.node_mut(id).next = Some(new_id);
        if let Some(next) = old_next {
            self.node_mut(next).prev = Some(new_id);
        }
        new_id
    }

    fn remove(&mut self, id: BlockId) {
        let (prev, next) = {
            let block = self.node(id);
            (block.prev, block.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        if let Some(next) = next {
            self.node_mut(next).prev = prev;
        }
        self.slots[id.index()] = None;
        self.vacant.push(id.index());
        self.len -= 1;
    }

    fn insert_slot(&mut self, block: Block) -> BlockId {
        self.len += 1;
        match self.vacant.pop() {
            Some(index) => {
                self.slots[index] = Some(block);
                BlockId(index)
            }
            None => {
                self.slots.push(Some(block));
                BlockId(self.slots.len() - 1)
            }
        }
    }

    fn node(&self, id: BlockId) -> &Block {
        self.slots[id.index()]
            .as_ref()
            .expect("block id refers to a vacant slot")
    }

    fn node_mut(&mut self, id: BlockId) -> &mut Block {
        self.slots[id.index()]
            .as_mut()
            .expect("block id refers to a vacant slot")
    }
}

/// Iterator over blocks in pool order
pub struct Iter<'a> {
    list: &'a BlockList,
    current: Option<BlockId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let block = self.list.node(id);
        self.current = block.next;
        Some((id, block))
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = (BlockId, &'a Block);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

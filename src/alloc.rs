use crate::block::BlockNumber;
use crate::fs::FsError;

/// Tracks which blocks are owned by a file with one bit per block. Allocation
/// always hands out the lowest free index so behavior is reproducible: the
/// blocks of a freshly created file land at the smallest holes left by prior
/// deletions.
pub struct FreeListAllocator {
    /// A set bit marks the block as owned; bit `i` lives in word `i / 64`.
    used: Vec<u64>,
    total_blocks: usize,
    free: usize,
}

impl FreeListAllocator {
    pub fn new(total_blocks: usize) -> Self {
        Self {
            used: vec![0; (total_blocks + 63) / 64],
            total_blocks,
            free: total_blocks,
        }
    }

    fn is_used(&self, blocknr: BlockNumber) -> bool {
        assert!(blocknr < self.total_blocks, "block {} out of range", blocknr);
        let mask = 0b01_u64 << (blocknr % 64);
        self.used[blocknr / 64] & mask != 0
    }

    fn mark_used(&mut self, blocknr: BlockNumber) {
        let mask = 0b01_u64 << (blocknr % 64);
        self.used[blocknr / 64] |= mask;
    }

    /// Removes and returns the smallest free index.
    pub fn allocate(&mut self) -> Result<BlockNumber, FsError> {
        for blocknr in 0..self.total_blocks {
            if !self.is_used(blocknr) {
                self.mark_used(blocknr);
                self.free -= 1;
                return Ok(blocknr);
            }
        }
        Err(FsError::OutOfSpace {
            needed: 1,
            available: 0,
        })
    }

    /// Reserves `count` blocks as one atomic operation, returned in ascending
    /// order. If fewer than `count` blocks are free nothing is allocated.
    pub fn allocate_n(&mut self, count: usize) -> Result<Vec<BlockNumber>, FsError> {
        if count > self.free {
            return Err(FsError::OutOfSpace {
                needed: count,
                available: self.free,
            });
        }
        // The pre-check guarantees every single-block allocation succeeds.
        (0..count).map(|_| self.allocate()).collect()
    }

    /// Returns a block to the free set. Releasing a block that is already
    /// free is a programming error and panics.
    pub fn release(&mut self, blocknr: BlockNumber) {
        assert!(
            self.is_used(blocknr),
            "double release of block {}",
            blocknr
        );
        let mask = 0b01_u64 << (blocknr % 64);
        self.used[blocknr / 64] &= !mask;
        self.free += 1;
    }

    pub fn free_count(&self) -> usize {
        self.free
    }

    /// Free indices in ascending order, for status reporting.
    pub fn free_indices(&self) -> Vec<BlockNumber> {
        (0..self.total_blocks)
            .filter(|&blocknr| !self.is_used(blocknr))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_ascending_from_zero() {
        let mut alloc = FreeListAllocator::new(8);
        assert_eq!(alloc.allocate().unwrap(), 0);
        assert_eq!(alloc.allocate().unwrap(), 1);
        assert_eq!(alloc.allocate().unwrap(), 2);
        assert_eq!(alloc.free_count(), 5);
    }

    #[test]
    fn released_block_is_reused_first() {
        let mut alloc = FreeListAllocator::new(8);
        let blocks = alloc.allocate_n(4).unwrap();
        assert_eq!(blocks, vec![0, 1, 2, 3]);

        alloc.release(1);
        assert_eq!(alloc.allocate().unwrap(), 1);
        assert_eq!(alloc.allocate().unwrap(), 4);
    }

    #[test]
    fn allocate_n_is_all_or_nothing() {
        let mut alloc = FreeListAllocator::new(4);
        alloc.allocate().unwrap();

        match alloc.allocate_n(4) {
            Err(FsError::OutOfSpace { needed, available }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected OutOfSpace, got {:?}", other),
        }
        // The failed request must not leak any reservation.
        assert_eq!(alloc.free_count(), 3);
        assert_eq!(alloc.free_indices(), vec![1, 2, 3]);
    }

    #[test]
    fn exhausting_the_free_set_fails_with_out_of_space() {
        let mut alloc = FreeListAllocator::new(2);
        alloc.allocate_n(2).unwrap();
        assert!(matches!(alloc.allocate(), Err(FsError::OutOfSpace { .. })));
    }

    #[test]
    fn free_indices_are_sorted_after_out_of_order_releases() {
        let mut alloc = FreeListAllocator::new(6);
        alloc.allocate_n(6).unwrap();
        alloc.release(4);
        alloc.release(0);
        alloc.release(2);
        assert_eq!(alloc.free_indices(), vec![0, 2, 4]);
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn releasing_a_free_block_panics() {
        let mut alloc = FreeListAllocator::new(4);
        alloc.release(0);
    }

    #[test]
    fn tracks_blocks_past_the_first_bitmap_word() {
        let mut alloc = FreeListAllocator::new(100);
        let blocks = alloc.allocate_n(70).unwrap();
        assert_eq!(blocks[69], 69);
        alloc.release(65);
        assert_eq!(alloc.allocate().unwrap(), 65);
    }
}

/// The block number to access ranging from 0 (the first block) to n - 1 (the
/// last block) where n is the number of blocks available.
pub type BlockNumber = usize;

/// Either the index of the next block in a file's chain or `None`, the
/// end-of-chain sentinel. `None` never refers to a real block.
pub type BlockPointer = Option<BlockNumber>;

/// One fixed-size storage cell: a single character of content and a link to
/// the next block of the same file. A block owned by no file holds
/// `content: None, next: None`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub content: Option<char>,
    pub next: BlockPointer,
}

impl Block {
    pub fn is_free(&self) -> bool {
        self.content.is_none() && self.next.is_none()
    }
}

/// Fixed-capacity arena of blocks addressed by index. Chains are encoded as
/// indices into this arena rather than language-level references so the store
/// models disk block addressing faithfully.
///
/// Out-of-range block numbers are programming errors and panic; they are not
/// recoverable conditions.
pub struct BlockStore {
    blocks: Vec<Block>,
}

impl BlockStore {
    pub fn new(total_blocks: usize) -> Self {
        Self {
            blocks: vec![Block::default(); total_blocks],
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, blocknr: BlockNumber) -> Block {
        assert!(blocknr < self.blocks.len(), "block {} out of range", blocknr);
        self.blocks[blocknr]
    }

    pub fn set_content(&mut self, blocknr: BlockNumber, content: char) {
        assert!(blocknr < self.blocks.len(), "block {} out of range", blocknr);
        self.blocks[blocknr].content = Some(content);
    }

    pub fn set_next(&mut self, blocknr: BlockNumber, next: BlockPointer) {
        assert!(blocknr < self.blocks.len(), "block {} out of range", blocknr);
        if let Some(target) = next {
            assert!(target < self.blocks.len(), "next pointer {} out of range", target);
        }
        self.blocks[blocknr].next = next;
    }

    /// Resets the block to the unowned state.
    pub fn clear(&mut self, blocknr: BlockNumber) {
        assert!(blocknr < self.blocks.len(), "block {} out of range", blocknr);
        self.blocks[blocknr] = Block::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockNumber, &Block)> {
        self.blocks.iter().enumerate()
    }
}

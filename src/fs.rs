use log::{debug, info};
use thiserror::Error;

use crate::alloc::FreeListAllocator;
use crate::block::{BlockNumber, BlockStore};
use crate::dir::{DirectoryEntry, FileDirectory};
use crate::status::{BlockRow, FileRow, ReportSink, StatusSnapshot};
use crate::{BLOCK_SIZE, TOTAL_MEMORY_BYTES};

#[derive(Error, Debug)]
pub enum FsError {
    #[error("file '{0}' already exists")]
    AlreadyExists(String),
    #[error("file '{0}' not found")]
    NotFound(String),
    #[error("not enough free blocks: need {needed}, have {available}")]
    OutOfSpace { needed: usize, available: usize },
    #[error("corrupt block chain: {0}")]
    Corruption(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// In-memory filesystem storing each file as a singly-linked chain of blocks.
///
/// Composes the block store, the free-list allocator, and the directory; all
/// state is owned by the instance, so independent filesystems never interact.
/// Operations are all-or-nothing: a failed create or delete leaves the
/// directory, the allocator, and the block store exactly as they were.
pub struct FileSystem {
    store: BlockStore,
    allocator: FreeListAllocator,
    directory: FileDirectory,
    sink: Option<Box<dyn ReportSink>>,
}

impl FileSystem {
    /// Builds a filesystem with the default geometry: 96 bytes of simulated
    /// memory in 3-byte blocks, 32 blocks total.
    pub fn new() -> Self {
        Self::with_geometry(TOTAL_MEMORY_BYTES, BLOCK_SIZE)
            .expect("default geometry is valid")
    }

    /// Builds a filesystem over `total_memory_bytes` of simulated memory
    /// split into `block_size`-byte blocks. Remainder bytes past the last
    /// whole block are unaddressable.
    pub fn with_geometry(total_memory_bytes: usize, block_size: usize) -> Result<Self, FsError> {
        if block_size == 0 {
            return Err(FsError::InvalidArgument(
                "block size must be non-zero".to_string(),
            ));
        }
        let total_blocks = total_memory_bytes / block_size;
        if total_blocks == 0 {
            return Err(FsError::InvalidArgument(format!(
                "{} bytes cannot hold a single {}-byte block",
                total_memory_bytes, block_size
            )));
        }

        Ok(Self {
            store: BlockStore::new(total_blocks),
            allocator: FreeListAllocator::new(total_blocks),
            directory: FileDirectory::new(),
            sink: None,
        })
    }

    /// Registers the collaborator that receives a status snapshot after every
    /// create and delete.
    pub fn attach_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sink = Some(sink);
    }

    pub fn total_blocks(&self) -> usize {
        self.store.len()
    }

    /// Creates `name` holding `content`, one character per block.
    ///
    /// Zero-length content is accepted and produces an entry with no chain.
    /// The blocks for the whole file are reserved up front, so an
    /// out-of-space failure never leaves a partial allocation behind.
    pub fn create(&mut self, name: &str, content: &str) -> Result<(), FsError> {
        if name.is_empty() {
            return Err(FsError::InvalidArgument(
                "file name must be non-empty".to_string(),
            ));
        }
        if self.directory.contains(name) {
            return Err(FsError::AlreadyExists(name.to_string()));
        }

        let chars: Vec<char> = content.chars().collect();
        if chars.is_empty() {
            self.directory
                .insert(name, DirectoryEntry { size: 0, head: None })?;
            info!("created empty file '{}'", name);
            self.publish_status();
            return Ok(());
        }

        let blocks = self.allocator.allocate_n(chars.len())?;
        for (i, &blocknr) in blocks.iter().enumerate() {
            self.store.set_content(blocknr, chars[i]);
            self.store.set_next(blocknr, blocks.get(i + 1).copied());
        }
        self.directory.insert(
            name,
            DirectoryEntry {
                size: blocks.len(),
                head: Some(blocks[0]),
            },
        )?;

        info!("created file '{}' in {} blocks", name, blocks.len());
        self.publish_status();
        Ok(())
    }

    /// Returns the file's content by walking its chain. Mutates nothing.
    pub fn read(&self, name: &str) -> Result<String, FsError> {
        let entry = self.directory.lookup(name)?;
        let chain = self.collect_chain(entry)?;

        let mut content = String::with_capacity(chain.len());
        for blocknr in chain {
            match self.store.get(blocknr).content {
                Some(ch) => content.push(ch),
                None => {
                    return Err(FsError::Corruption(format!(
                        "chain of '{}' reaches free block {}",
                        name, blocknr
                    )))
                }
            }
        }
        debug!("read {} characters from '{}'", content.chars().count(), name);
        Ok(content)
    }

    /// Deletes `name`, returning every block of its chain to the free set.
    ///
    /// The chain is collected in full before anything is cleared, so a
    /// corrupt chain aborts the delete with all state untouched.
    pub fn delete(&mut self, name: &str) -> Result<(), FsError> {
        let entry = self.directory.lookup(name)?;
        let chain = self.collect_chain(entry)?;

        for &blocknr in &chain {
            self.store.clear(blocknr);
            self.allocator.release(blocknr);
        }
        self.directory.remove(name)?;

        info!("deleted file '{}', released {} blocks", name, chain.len());
        self.publish_status();
        Ok(())
    }

    /// Assembles a read-only snapshot of every block, every directory entry,
    /// and the free list.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            blocks: self
                .store
                .iter()
                .map(|(index, block)| BlockRow {
                    index,
                    content: block.content,
                    next: block.next,
                })
                .collect(),
            files: self
                .directory
                .entries()
                .map(|(name, entry)| FileRow {
                    name: name.to_string(),
                    size: entry.size,
                    head: entry.head,
                })
                .collect(),
            free: self.allocator.free_indices(),
        }
    }

    /// Walks the chain from `entry.head` to the NULL sentinel and returns the
    /// visited indices. Fails with `Corruption` if the walk exceeds the total
    /// block count (a cycle) or disagrees with the recorded size.
    fn collect_chain(&self, entry: DirectoryEntry) -> Result<Vec<BlockNumber>, FsError> {
        let mut chain = Vec::with_capacity(entry.size);
        let mut cursor = entry.head;
        while let Some(blocknr) = cursor {
            if chain.len() == self.store.len() {
                return Err(FsError::Corruption(
                    "chain does not terminate within the block count".to_string(),
                ));
            }
            chain.push(blocknr);
            cursor = self.store.get(blocknr).next;
        }
        if chain.len() != entry.size {
            return Err(FsError::Corruption(format!(
                "directory records {} blocks but the chain holds {}",
                entry.size,
                chain.len()
            )));
        }
        Ok(chain)
    }

    fn publish_status(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let snapshot = self.status();
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(&snapshot);
        }
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

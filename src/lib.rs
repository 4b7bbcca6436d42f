//! A simulated block-storage filesystem held entirely in memory.
//!
//! A fixed-size region is partitioned into equal-size blocks, each holding one
//! character of content plus a pointer to the next block. Files are stored as
//! singly-linked chains of blocks and a directory maps file names to chain
//! heads. Single-threaded, single-process; every [`FileSystem`] instance owns
//! all of its state.

mod alloc;
mod block;
mod dir;
mod fs;
mod status;

pub use crate::alloc::FreeListAllocator;
pub use crate::block::{Block, BlockNumber, BlockPointer, BlockStore};
pub use crate::dir::{DirectoryEntry, FileDirectory};
pub use crate::fs::{FileSystem, FsError};
pub use crate::status::{BlockRow, FileRow, LogSink, ReportSink, StatusSnapshot};

/// Total simulated capacity in bytes for the default geometry.
pub const TOTAL_MEMORY_BYTES: usize = 96;

/// Bytes per block: one character of content and a two-byte next-pointer.
pub const BLOCK_SIZE: usize = 3;

/// Blocks addressable under the default geometry. Integer division; any
/// remainder bytes are unaddressable.
pub const TOTAL_BLOCKS: usize = TOTAL_MEMORY_BYTES / BLOCK_SIZE;

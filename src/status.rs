use log::debug;

use crate::block::{BlockNumber, BlockPointer};

/// One row of the per-block table: the cell's content (or `None` if the block
/// is free) and its next-pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRow {
    pub index: BlockNumber,
    pub content: Option<char>,
    pub next: BlockPointer,
}

/// One row of the file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub name: String,
    pub size: usize,
    pub head: BlockPointer,
}

/// Read-only view of the whole filesystem, assembled from the block store,
/// the directory, and the allocator. Presentation-only: the core never
/// depends on how a snapshot is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub blocks: Vec<BlockRow>,
    /// File rows in directory insertion order.
    pub files: Vec<FileRow>,
    /// Free block indices in ascending order.
    pub free: Vec<BlockNumber>,
}

/// Receives the snapshot the filesystem emits after every create and delete.
/// Implement this to forward state to a console, a log, or a UI.
pub trait ReportSink {
    fn publish(&mut self, snapshot: &StatusSnapshot);
}

/// Stock sink that renders each snapshot through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn publish(&mut self, snapshot: &StatusSnapshot) {
        for file in &snapshot.files {
            debug!(
                "file {:?}: size {} head {:?}",
                file.name, file.size, file.head
            );
        }
        debug!("free blocks: {:?}", snapshot.free);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinks_can_capture_published_snapshots() {
        struct Capture(Vec<StatusSnapshot>);
        impl ReportSink for Capture {
            fn publish(&mut self, snapshot: &StatusSnapshot) {
                self.0.push(snapshot.clone());
            }
        }

        let snapshot = StatusSnapshot {
            blocks: vec![BlockRow {
                index: 0,
                content: Some('a'),
                next: None,
            }],
            files: vec![FileRow {
                name: "a.file".to_string(),
                size: 1,
                head: Some(0),
            }],
            free: vec![1, 2],
        };

        let mut sink = Capture(Vec::new());
        sink.publish(&snapshot);
        assert_eq!(sink.0, vec![snapshot]);
    }
}

//! On-disk layout and persistence for the relatos pipeline.

pub mod config;
pub mod gold;
pub mod paths;
pub mod results;
pub mod sink;
pub mod status;

pub use gold::{GoldDataset, GoldEntry};
pub use paths::DataPaths;
pub use results::{merge_by_start, ResultStore};
pub use sink::FileReviewSink;
pub use status::{PipelineStatus, StageState, VideoStatus};

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Held exclusive lock; released on drop.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock, blocking until it is free.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

impl DataPaths {
    pub fn results(&self) -> ResultStore {
        ResultStore::new(&self.segmentation_dir, &self.lock_file)
    }

    pub fn review_sink(&self) -> FileReviewSink {
        FileReviewSink::new(self.results(), &self.gold_json)
    }
}

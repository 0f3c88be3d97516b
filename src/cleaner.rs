use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::CleanError;
use crate::recycle_bin::{self, BinOutcome, RecycleBin};
use crate::targets::{TargetGroup, TargetSet};
use crate::utils;

/// One directory entry the cleaner looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub file_name: String,
    pub source_dir: PathBuf,
}

/// Why an entry was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InUse,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: EntryRecord,
    pub reason: SkipReason,
}

/// Reported for each entry as soon as it has been handled, in listing order.
#[derive(Debug, Clone, Copy)]
pub enum CleanEvent<'e> {
    Removed(&'e EntryRecord),
    Skipped(&'e SkippedEntry),
}

/// Result of one cleanup run.
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub group: TargetGroup,
    pub removed: Vec<EntryRecord>,
    pub skipped: Vec<SkippedEntry>,
    pub bytes_freed: u64,
    /// `None` when the group does not touch the recycle bin.
    pub recycle_bin: Option<BinOutcome>,
    pub elapsed: Duration,
}

impl CleanupResult {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Deletes a single directory entry. Returns bytes freed.
pub trait EntryRemover {
    fn remove(&self, path: &Path) -> io::Result<u64>;
}

/// Removes entries from the real filesystem.
pub struct FsRemover;

impl EntryRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<u64> {
        utils::remove_file(path)
    }
}

/// Empties the configured temp directories for a target group.
pub struct Cleaner<'a> {
    targets: &'a TargetSet,
    remover: &'a dyn EntryRemover,
    recycle_bin: &'a dyn RecycleBin,
}

impl<'a> Cleaner<'a> {
    pub fn new(
        targets: &'a TargetSet,
        remover: &'a dyn EntryRemover,
        recycle_bin: &'a dyn RecycleBin,
    ) -> Self {
        Self {
            targets,
            remover,
            recycle_bin,
        }
    }

    /// Parse `selector` and clean. Unknown selectors fail before any deletion.
    pub fn clean_selector(&self, selector: &str) -> Result<CleanupResult, CleanError> {
        let group: TargetGroup = selector.parse()?;
        self.clean(group)
    }

    pub fn clean(&self, group: TargetGroup) -> Result<CleanupResult, CleanError> {
        self.clean_with(group, |_| {})
    }

    /// Delete every immediate child file of each directory in `group`.
    ///
    /// Files another process holds open are skipped. Subdirectories are
    /// never entered. Any other failure aborts the run; entries handled
    /// before it have already been passed to `on_event`.
    pub fn clean_with(
        &self,
        group: TargetGroup,
        mut on_event: impl FnMut(CleanEvent<'_>),
    ) -> Result<CleanupResult, CleanError> {
        let start = Instant::now();
        let mut removed = Vec::new();
        let mut skipped = Vec::new();
        let mut bytes_freed = 0u64;

        for dir in self.targets.resolve(group) {
            debug!(dir = %dir.display(), %group, "cleaning directory");
            let read_dir = std::fs::read_dir(dir).map_err(|source| CleanError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;

            for entry in read_dir {
                let entry = entry.map_err(|source| CleanError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
                let path = entry.path();
                let record = EntryRecord {
                    file_name: entry.file_name().to_string_lossy().into_owned(),
                    source_dir: dir.to_path_buf(),
                };

                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    debug!(file = %record.file_name, dir = %dir.display(), "skipping subdirectory");
                    let skip = SkippedEntry {
                        entry: record,
                        reason: SkipReason::Directory,
                    };
                    on_event(CleanEvent::Skipped(&skip));
                    skipped.push(skip);
                    continue;
                }

                match self.remover.remove(&path) {
                    Ok(freed) => {
                        info!(file = %record.file_name, dir = %dir.display(), "removed");
                        bytes_freed += freed;
                        on_event(CleanEvent::Removed(&record));
                        removed.push(record);
                    }
                    Err(e) if utils::is_in_use(&e) => {
                        info!(file = %record.file_name, dir = %dir.display(), "in use, left in place");
                        let skip = SkippedEntry {
                            entry: record,
                            reason: SkipReason::InUse,
                        };
                        on_event(CleanEvent::Skipped(&skip));
                        skipped.push(skip);
                    }
                    Err(source) => return Err(CleanError::Remove { path, source }),
                }
            }
        }

        let recycle_bin = group
            .empties_recycle_bin()
            .then(|| recycle_bin::empty_quietly(self.recycle_bin));

        let result = CleanupResult {
            group,
            removed,
            skipped,
            bytes_freed,
            recycle_bin,
            elapsed: start.elapsed(),
        };
        info!(
            %group,
            count = result.removed_count(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "cleanup complete"
        );
        Ok(result)
    }
}

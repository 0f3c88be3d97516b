use tracing::{debug, warn};

pub use crate::error::BinError;

/// The OS-managed staging area for deleted files.
pub trait RecycleBin {
    /// Number of items currently in the bin.
    fn item_count(&self) -> Result<usize, BinError>;

    /// Permanently delete everything in the bin, without prompting.
    fn empty(&self) -> Result<(), BinError>;
}

/// What happened when the bin was asked to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinOutcome {
    Emptied(usize),
    AlreadyEmpty,
    Skipped(String),
}

/// Empty `bin`, absorbing every failure.
///
/// Emptying the bin is a courtesy step after directory cleanup: the run is
/// never failed because of it. Errors are logged and returned as
/// [`BinOutcome::Skipped`].
pub fn empty_quietly(bin: &dyn RecycleBin) -> BinOutcome {
    let count = match bin.item_count() {
        Ok(0) => {
            debug!("recycle bin already empty");
            return BinOutcome::AlreadyEmpty;
        }
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "cannot inspect recycle bin");
            return BinOutcome::Skipped(e.to_string());
        }
    };

    match bin.empty() {
        Ok(()) => {
            debug!(count, "recycle bin emptied");
            BinOutcome::Emptied(count)
        }
        Err(e) => {
            warn!(error = %e, "failed to empty recycle bin");
            BinOutcome::Skipped(e.to_string())
        }
    }
}

/// The platform recycle bin (Windows) or freedesktop trash.
pub struct SystemRecycleBin;

#[cfg(any(
    target_os = "windows",
    all(
        unix,
        not(target_os = "macos"),
        not(target_os = "ios"),
        not(target_os = "android")
    )
))]
impl RecycleBin for SystemRecycleBin {
    fn item_count(&self) -> Result<usize, BinError> {
        Ok(trash::os_limited::list()?.len())
    }

    fn empty(&self) -> Result<(), BinError> {
        let items = trash::os_limited::list()?;
        if items.is_empty() {
            return Ok(());
        }
        Ok(trash::os_limited::purge_all(items)?)
    }
}

#[cfg(not(any(
    target_os = "windows",
    all(
        unix,
        not(target_os = "macos"),
        not(target_os = "ios"),
        not(target_os = "android")
    )
)))]
impl RecycleBin for SystemRecycleBin {
    fn item_count(&self) -> Result<usize, BinError> {
        Err(BinError("recycle bin is not supported on this platform".into()))
    }

    fn empty(&self) -> Result<(), BinError> {
        Err(BinError("recycle bin is not supported on this platform".into()))
    }
}

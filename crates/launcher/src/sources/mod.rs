mod archive;
mod installed;

pub use archive::LocalArchiveSource;
pub use installed::InstalledPackageSource;

use crate::entry::AppEntry;
use crate::host::LauncherHost;
use protocol::AppResult;

/// A producer of raw app entries. Each source enumerates independently; the
/// reconciler isolates a failing source so the others still contribute.
pub trait AppSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn enumerate(&self, host: &dyn LauncherHost) -> AppResult<Vec<AppEntry>>;
}

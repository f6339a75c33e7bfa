use super::AppSource;
use crate::entry::AppEntry;
use crate::filter::InclusionFilter;
use crate::host::LauncherHost;
use crate::naming::path_stem_string;
use crate::settings::LauncherSettingsRecord;
use protocol::AppResult;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const LOCAL_ARCHIVE_SOURCE_NAME: &str = "local_archives";

pub struct LocalArchiveSource {
    staging_dir: PathBuf,
    extension: String,
    filter: InclusionFilter,
}

impl LocalArchiveSource {
    pub fn from_settings(settings: &LauncherSettingsRecord) -> Self {
        Self {
            staging_dir: PathBuf::from(settings.archive_dir.as_str()),
            extension: settings.archive_extension.clone(),
            filter: InclusionFilter::from_patterns(settings.include_patterns.as_slice()),
        }
    }
}

impl AppSource for LocalArchiveSource {
    fn name(&self) -> &'static str {
        LOCAL_ARCHIVE_SOURCE_NAME
    }

    fn enumerate(&self, _host: &dyn LauncherHost) -> AppResult<Vec<AppEntry>> {
        if self.staging_dir.as_os_str().is_empty() {
            tracing::debug!(event = "launcher_archive_dir_unset");
            return Ok(Vec::new());
        }
        if !self.staging_dir.is_dir() {
            tracing::debug!(
                event = "launcher_archive_dir_missing",
                dir = self.staging_dir.display().to_string()
            );
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(self.staging_dir.as_path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for dir_entry in walker.into_iter().filter_map(Result::ok) {
            if !dir_entry.file_type().is_file() {
                continue;
            }
            let path = dir_entry.path();
            if !has_extension(path, self.extension.as_str()) {
                continue;
            }
            // Display name is the file stem, extension dropped.
            let Some(display_name) = path_stem_string(path) else {
                continue;
            };
            if !self.filter.admits(display_name.as_str()) {
                continue;
            }
            entries.push(AppEntry::archive(path.to_path_buf(), display_name));
        }

        tracing::debug!(
            event = "launcher_local_archives_enumerated",
            dir = self.staging_dir.display().to_string(),
            surfaced = entries.len()
        );
        Ok(entries)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(extension))
}

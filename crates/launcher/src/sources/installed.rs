use super::AppSource;
use crate::entry::AppEntry;
use crate::filter::InclusionFilter;
use crate::host::LauncherHost;
use crate::icon::encode_package_icon;
use crate::naming::normalize_display_name;
use crate::settings::LauncherSettingsRecord;
use protocol::AppResult;

pub const INSTALLED_SOURCE_NAME: &str = "installed_packages";

pub struct InstalledPackageSource {
    skip_system_apps: bool,
    filter: InclusionFilter,
}

impl InstalledPackageSource {
    pub fn from_settings(settings: &LauncherSettingsRecord) -> Self {
        Self {
            skip_system_apps: settings.skip_system_apps,
            filter: InclusionFilter::from_patterns(settings.include_patterns.as_slice()),
        }
    }
}

impl AppSource for InstalledPackageSource {
    fn name(&self) -> &'static str {
        INSTALLED_SOURCE_NAME
    }

    fn enumerate(&self, host: &dyn LauncherHost) -> AppResult<Vec<AppEntry>> {
        let packages = host.list_installed_packages()?;
        let total = packages.len();

        let mut entries = Vec::new();
        for package in packages {
            if self.skip_system_apps && package.system {
                continue;
            }
            if !self.filter.admits(package.package_id.as_str()) {
                continue;
            }

            let display_name = normalize_display_name(package.label.as_str())
                .unwrap_or_else(|| package.package_id.clone());
            let icon = host
                .fetch_package_icon(package.package_id.as_str())
                .map(|bytes| encode_package_icon(bytes.as_slice()));

            let mut entry = AppEntry::installed(package.package_id, display_name);
            entry.icon = icon;
            entries.push(entry);
        }

        tracing::debug!(
            event = "launcher_installed_packages_enumerated",
            discovered = total,
            surfaced = entries.len()
        );
        Ok(entries)
    }
}

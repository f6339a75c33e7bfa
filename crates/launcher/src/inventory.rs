use crate::entry::{AppEntry, AppIdentity};
use crate::host::LauncherHost;
use crate::metadata::{MetadataRecord, MetadataStore};
use crate::settings::LauncherSettingsRecord;
use crate::sources::{AppSource, InstalledPackageSource, LocalArchiveSource};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RebuildOutcome {
    pub entries: Vec<AppEntry>,
    pub installed_entries: u32,
    pub archive_entries: u32,
    pub metadata_matches: u32,
    pub duration_ms: u64,
}

/// Merges the configured sources into one ordered inventory and joins the
/// manifest metadata onto it. The inventory is rebuilt wholesale on every
/// call; there is no incremental diffing and no cross-source dedup.
pub struct InventoryReconciler {
    sources: Vec<Box<dyn AppSource>>,
    manifest_path: PathBuf,
}

impl InventoryReconciler {
    /// Declared source order: installed packages before local archives.
    pub fn from_settings(settings: &LauncherSettingsRecord) -> Self {
        Self::new(
            vec![
                Box::new(InstalledPackageSource::from_settings(settings)),
                Box::new(LocalArchiveSource::from_settings(settings)),
            ],
            settings.manifest_path.as_str(),
        )
    }

    pub fn new(sources: Vec<Box<dyn AppSource>>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            manifest_path: manifest_path.into(),
        }
    }

    pub fn rebuild(&self, host: &dyn LauncherHost) -> RebuildOutcome {
        let started_at = Instant::now();
        let metadata = MetadataStore::load_from_file(self.manifest_path.as_path());

        let mut entries: Vec<AppEntry> = Vec::new();
        for source in &self.sources {
            match source.enumerate(host) {
                Ok(source_entries) => entries.extend(source_entries),
                Err(error) => {
                    tracing::warn!(
                        event = "launcher_source_enumeration_failed",
                        source = source.name(),
                        error = error.to_string()
                    );
                }
            }
        }

        let mut metadata_matches = 0u32;
        for entry in &mut entries {
            let Some(record) =
                metadata.lookup(entry.identity.package_id(), entry.display_name.as_str())
            else {
                continue;
            };
            apply_metadata(entry, record);
            metadata_matches += 1;
        }

        let installed_entries = entries
            .iter()
            .filter(|entry| matches!(entry.identity, AppIdentity::Installed { .. }))
            .count() as u32;
        let archive_entries = entries.len() as u32 - installed_entries;
        let duration_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            event = "launcher_inventory_rebuilt",
            total_entries = entries.len(),
            installed_entries,
            archive_entries,
            metadata_matches,
            manifest_records = metadata.len(),
            duration_ms
        );

        RebuildOutcome {
            entries,
            installed_entries,
            archive_entries,
            metadata_matches,
            duration_ms,
        }
    }
}

// The icon is intentionally left untouched: real platform icons take
// precedence over anything the manifest could declare.
fn apply_metadata(entry: &mut AppEntry, record: &MetadataRecord) {
    entry.description = record.description.clone();
    entry.preview_image = record.preview_image.clone();
    entry.organization = record.organization.clone();
    entry.financial_logo = record.financial_logo.clone();
    entry.partners = record
        .partners
        .iter()
        .map(|partner| partner.name.clone())
        .collect();
}

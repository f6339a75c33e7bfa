use protocol::{AppResult, ResultExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerRecord {
    pub name: String,
}

/// One manifest entry. Keyed by `packageName` or `appName`; the on-disk
/// manifest is a bare JSON array of these records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataRecord {
    pub package_name: Option<String>,
    pub app_name: Option<String>,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub organization: Option<String>,
    pub partners: Vec<PartnerRecord>,
    pub financial_logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    by_package: HashMap<String, MetadataRecord>,
    by_name: HashMap<String, MetadataRecord>,
    record_count: usize,
}

impl MetadataStore {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let records: Vec<MetadataRecord> = serde_json::from_str(raw)
            .with_code("launcher_manifest_parse_failed", "解析应用清单失败")?;

        let mut store = Self::default();
        for record in records {
            let package_key = trimmed_key(record.package_name.as_deref());
            let name_key = trimmed_key(record.app_name.as_deref());
            if package_key.is_none() && name_key.is_none() {
                tracing::debug!(event = "launcher_manifest_record_without_key");
                continue;
            }

            // First record wins on duplicate keys.
            if let Some(key) = package_key {
                store.by_package.entry(key).or_insert_with(|| record.clone());
            }
            if let Some(key) = name_key {
                store.by_name.entry(key).or_insert(record);
            }
            store.record_count += 1;
        }
        Ok(store)
    }

    /// Soft-failing loader: a missing or malformed manifest yields an empty
    /// store so the launcher stays usable with zero metadata.
    pub fn load_from_file(path: &Path) -> Self {
        if path.as_os_str().is_empty() {
            tracing::debug!(event = "launcher_manifest_path_unset");
            return Self::default();
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(
                    event = "launcher_manifest_read_failed",
                    path = path.display().to_string(),
                    error = error.to_string()
                );
                return Self::default();
            }
        };

        match Self::parse(raw.as_str()) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(
                    event = "launcher_manifest_parse_failed",
                    path = path.display().to_string(),
                    error = error.to_string()
                );
                Self::default()
            }
        }
    }

    /// Ordered two-key lookup: package id first, display name fallback.
    pub fn lookup(&self, package_id: Option<&str>, display_name: &str) -> Option<&MetadataRecord> {
        if let Some(record) = package_id
            .and_then(|key| trimmed_key(Some(key)))
            .and_then(|key| self.by_package.get(key.as_str()))
        {
            return Some(record);
        }
        trimmed_key(Some(display_name)).and_then(|key| self.by_name.get(key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

fn trimmed_key(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

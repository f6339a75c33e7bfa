use serde::{Deserialize, Serialize};

/// Identity of one launchable unit. Exactly one variant applies: installed
/// packages carry a package id, sideloaded archives carry a file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AppIdentityDto {
    #[serde(rename_all = "camelCase")]
    Installed { package_id: String },
    #[serde(rename_all = "camelCase")]
    ArchiveFile { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPayloadDto {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntryDto {
    pub entry_id: u32,
    pub identity: AppIdentityDto,
    pub display_name: String,
    pub icon: Option<IconPayloadDto>,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub preview_image: Option<String>,
    pub financial_logo: Option<String>,
    pub partners: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDto {
    pub entries: Vec<AppEntryDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildResultDto {
    pub total_entries: u32,
    pub installed_entries: u32,
    pub archive_entries: u32,
    pub metadata_matches: u32,
    pub duration_ms: u64,
}

/// Instruction handed to the platform launcher. Tags mirror the identity
/// invariant: a request targets either a package or an archive, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LaunchRequest {
    #[serde(rename_all = "camelCase")]
    ByPackage { package_id: String },
    #[serde(rename_all = "camelCase")]
    ByArchive { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherSettingsDto {
    pub skip_system_apps: bool,
    pub include_patterns: Vec<String>,
    pub archive_dir: String,
    pub archive_extension: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LauncherUpdateSettingsInputDto {
    pub skip_system_apps: Option<bool>,
    pub include_patterns: Option<Vec<String>>,
    pub archive_dir: Option<String>,
    pub archive_extension: Option<String>,
    pub manifest_path: Option<String>,
}

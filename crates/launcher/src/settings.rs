use protocol::models::{LauncherSettingsDto, LauncherUpdateSettingsInputDto};
use serde::{Deserialize, Serialize};

const DEFAULT_ARCHIVE_EXTENSION: &str = "apk";
const MAX_INCLUDE_PATTERNS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LauncherSettingsRecord {
    pub skip_system_apps: bool,
    pub include_patterns: Vec<String>,
    pub archive_dir: String,
    pub archive_extension: String,
    pub manifest_path: String,
}

impl Default for LauncherSettingsRecord {
    fn default() -> Self {
        Self {
            skip_system_apps: true,
            include_patterns: Vec::new(),
            archive_dir: String::new(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            manifest_path: String::new(),
        }
    }
}

impl LauncherSettingsRecord {
    pub fn normalize(mut self) -> Self {
        self.include_patterns = sanitize_patterns(self.include_patterns);
        self.archive_dir = self.archive_dir.trim().to_string();
        self.archive_extension = sanitize_extension(self.archive_extension.as_str());
        self.manifest_path = self.manifest_path.trim().to_string();
        self
    }

    pub fn merged_with(self, input: LauncherUpdateSettingsInputDto) -> Self {
        Self {
            skip_system_apps: input.skip_system_apps.unwrap_or(self.skip_system_apps),
            include_patterns: input.include_patterns.unwrap_or(self.include_patterns),
            archive_dir: input.archive_dir.unwrap_or(self.archive_dir),
            archive_extension: input.archive_extension.unwrap_or(self.archive_extension),
            manifest_path: input.manifest_path.unwrap_or(self.manifest_path),
        }
        .normalize()
    }

    pub fn to_dto(&self) -> LauncherSettingsDto {
        LauncherSettingsDto {
            skip_system_apps: self.skip_system_apps,
            include_patterns: self.include_patterns.clone(),
            archive_dir: self.archive_dir.clone(),
            archive_extension: self.archive_extension.clone(),
            manifest_path: self.manifest_path.clone(),
        }
    }
}

fn sanitize_patterns(patterns: Vec<String>) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::new();
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            continue;
        }
        if sanitized.iter().any(|existing| existing == trimmed) {
            continue;
        }
        sanitized.push(trimmed.to_string());
        if sanitized.len() == MAX_INCLUDE_PATTERNS {
            break;
        }
    }
    sanitized
}

fn sanitize_extension(extension: &str) -> String {
    let cleaned = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if cleaned.is_empty() {
        return DEFAULT_ARCHIVE_EXTENSION.to_string();
    }
    cleaned
}

use crate::icon::IconPayload;
use protocol::models::{AppEntryDto, AppIdentityDto, InventoryDto};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppIdentity {
    Installed { package_id: String },
    ArchiveFile { path: PathBuf },
}

impl AppIdentity {
    pub fn package_id(&self) -> Option<&str> {
        match self {
            Self::Installed { package_id } => Some(package_id.as_str()),
            Self::ArchiveFile { .. } => None,
        }
    }

    pub fn archive_path(&self) -> Option<&Path> {
        match self {
            Self::Installed { .. } => None,
            Self::ArchiveFile { path } => Some(path.as_path()),
        }
    }

    fn to_dto(&self) -> AppIdentityDto {
        match self {
            Self::Installed { package_id } => AppIdentityDto::Installed {
                package_id: package_id.clone(),
            },
            Self::ArchiveFile { path } => AppIdentityDto::ArchiveFile {
                path: path.to_string_lossy().to_string(),
            },
        }
    }
}

/// One launchable unit shown in the launcher. Descriptive fields are only
/// ever populated by the metadata join; sources leave them empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub identity: AppIdentity,
    pub display_name: String,
    pub icon: Option<IconPayload>,
    pub description: Option<String>,
    pub organization: Option<String>,
    pub preview_image: Option<String>,
    pub financial_logo: Option<String>,
    pub partners: Vec<String>,
}

impl AppEntry {
    pub fn installed(package_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::bare(
            AppIdentity::Installed {
                package_id: package_id.into(),
            },
            display_name,
        )
    }

    pub fn archive(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self::bare(
            AppIdentity::ArchiveFile { path: path.into() },
            display_name,
        )
    }

    fn bare(identity: AppIdentity, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            icon: None,
            description: None,
            organization: None,
            preview_image: None,
            financial_logo: None,
            partners: Vec::new(),
        }
    }

    pub fn to_dto(&self, entry_id: u32) -> AppEntryDto {
        AppEntryDto {
            entry_id,
            identity: self.identity.to_dto(),
            display_name: self.display_name.clone(),
            icon: self.icon.as_ref().map(IconPayload::to_dto),
            description: self.description.clone(),
            organization: self.organization.clone(),
            preview_image: self.preview_image.clone(),
            financial_logo: self.financial_logo.clone(),
            partners: self.partners.clone(),
        }
    }
}

pub fn inventory_to_dto(entries: &[AppEntry]) -> InventoryDto {
    InventoryDto {
        entries: entries
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.to_dto(index as u32))
            .collect(),
    }
}

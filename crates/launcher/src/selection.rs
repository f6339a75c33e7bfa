use crate::entry::{AppEntry, AppIdentity};
use protocol::models::LaunchRequest;
use protocol::{AppError, AppResult};

/// Tracks the single selected inventory entry. Entry ids are indexes into
/// the current inventory and are not stable across rebuilds, so the owner
/// must call `clear` whenever the inventory is replaced.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<u32>,
}

impl SelectionController {
    pub fn select<'a>(&mut self, entry_id: u32, inventory: &'a [AppEntry]) -> AppResult<&'a AppEntry> {
        let entry = inventory.get(entry_id as usize).ok_or_else(|| {
            AppError::new("launcher_select_unknown_entry", "所选应用不存在")
                .with_context("entryId", entry_id.to_string())
        })?;
        self.selected = Some(entry_id);
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected_entry<'a>(&self, inventory: &'a [AppEntry]) -> Option<&'a AppEntry> {
        self.selected
            .and_then(|entry_id| inventory.get(entry_id as usize))
    }

    pub fn build_launch_request(&self, inventory: &[AppEntry]) -> AppResult<LaunchRequest> {
        let entry = self
            .selected
            .and_then(|entry_id| inventory.get(entry_id as usize))
            .ok_or_else(|| AppError::new("launcher_no_selection", "未选择要启动的应用"))?;

        Ok(match &entry.identity {
            AppIdentity::Installed { package_id } => LaunchRequest::ByPackage {
                package_id: package_id.clone(),
            },
            AppIdentity::ArchiveFile { path } => LaunchRequest::ByArchive {
                path: path.to_string_lossy().to_string(),
            },
        })
    }
}

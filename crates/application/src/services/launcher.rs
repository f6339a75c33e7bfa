use launcher::entry::{AppEntry, inventory_to_dto};
use launcher::host::LauncherHost;
use launcher::inventory::InventoryReconciler;
use launcher::selection::SelectionController;
use launcher::settings::LauncherSettingsRecord;
use protocol::models::{
    AppEntryDto, InventoryDto, LaunchRequest, LauncherSettingsDto, LauncherUpdateSettingsInputDto,
    RebuildResultDto,
};
use protocol::{AppError, AppResult, ResultExt};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

pub const INVENTORY_REBUILT_EVENT: &str = "leclick://inventory/rebuilt";
pub const SELECTION_CHANGED_EVENT: &str = "leclick://selection/changed";
pub const SELECTION_CLEARED_EVENT: &str = "leclick://selection/cleared";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRebuiltPayload {
    inventory: InventoryDto,
    result: RebuildResultDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionChangedPayload {
    entry: AppEntryDto,
}

#[derive(Debug, Default)]
struct LauncherState {
    inventory: Vec<AppEntry>,
    selection: SelectionController,
}

/// Callable surface handed to the platform/UI layer. Holds the current
/// inventory and selection; every mutation goes through here.
pub struct LauncherApplicationService {
    settings: Mutex<LauncherSettingsRecord>,
    state: Mutex<LauncherState>,
    rebuild_guard: Mutex<()>,
}

impl LauncherApplicationService {
    pub fn new(settings: LauncherSettingsRecord) -> Self {
        Self {
            settings: Mutex::new(settings.normalize()),
            state: Mutex::new(LauncherState::default()),
            rebuild_guard: Mutex::new(()),
        }
    }

    /// Replaces the inventory wholesale and resets the selection. At most
    /// one rebuild may be in flight; an overlapping call is rejected. The
    /// new inventory is computed before the state lock is taken, so
    /// observers never see a partially-built inventory.
    pub fn rebuild(&self, host: &dyn LauncherHost) -> AppResult<RebuildResultDto> {
        let Ok(_guard) = self.rebuild_guard.try_lock() else {
            return Err(AppError::new("launcher_rebuild_in_progress", "清单正在刷新中"));
        };

        let settings = self.settings_guard()?.clone();
        let outcome = InventoryReconciler::from_settings(&settings).rebuild(host);
        let result = RebuildResultDto {
            total_entries: outcome.entries.len() as u32,
            installed_entries: outcome.installed_entries,
            archive_entries: outcome.archive_entries,
            metadata_matches: outcome.metadata_matches,
            duration_ms: outcome.duration_ms,
        };

        let inventory = {
            let mut state = self.state_guard()?;
            state.inventory = outcome.entries;
            state.selection.clear();
            inventory_to_dto(state.inventory.as_slice())
        };

        self.emit_event(
            host,
            INVENTORY_REBUILT_EVENT,
            &InventoryRebuiltPayload {
                inventory,
                result: result.clone(),
            },
        );
        Ok(result)
    }

    pub fn on_permission_result(
        &self,
        host: &dyn LauncherHost,
        granted: bool,
    ) -> AppResult<RebuildResultDto> {
        if granted {
            tracing::info!(event = "launcher_storage_permission_granted");
        } else {
            // Non-fatal: sources that need no permission still contribute.
            tracing::warn!(event = "launcher_storage_permission_denied");
        }
        self.rebuild(host)
    }

    pub fn on_foreground_regained(&self, host: &dyn LauncherHost) -> AppResult<RebuildResultDto> {
        tracing::debug!(event = "launcher_foreground_regained");
        self.rebuild(host)
    }

    pub fn on_external_app_closed(&self, host: &dyn LauncherHost) -> AppResult<RebuildResultDto> {
        tracing::debug!(event = "launcher_external_app_closed");
        self.rebuild(host)
    }

    pub fn select_entry(&self, host: &dyn LauncherHost, entry_id: u32) -> AppResult<AppEntryDto> {
        let dto = {
            let mut state = self.state_guard()?;
            let LauncherState {
                inventory,
                selection,
            } = &mut *state;
            let entry = selection.select(entry_id, inventory.as_slice())?;
            entry.to_dto(entry_id)
        };

        self.emit_event(
            host,
            SELECTION_CHANGED_EVENT,
            &SelectionChangedPayload { entry: dto.clone() },
        );
        Ok(dto)
    }

    pub fn clear_selection(&self, host: &dyn LauncherHost) -> AppResult<()> {
        self.state_guard()?.selection.clear();
        self.emit_event(host, SELECTION_CLEARED_EVENT, &serde_json::json!({}));
        Ok(())
    }

    pub fn selected_entry(&self) -> AppResult<Option<AppEntryDto>> {
        let state = self.state_guard()?;
        Ok(state.selection.selected_id().and_then(|entry_id| {
            state
                .selection
                .selected_entry(state.inventory.as_slice())
                .map(|entry| entry.to_dto(entry_id))
        }))
    }

    pub fn inventory(&self) -> AppResult<InventoryDto> {
        let state = self.state_guard()?;
        Ok(inventory_to_dto(state.inventory.as_slice()))
    }

    pub fn build_launch_request(&self) -> AppResult<LaunchRequest> {
        let state = self.state_guard()?;
        state
            .selection
            .build_launch_request(state.inventory.as_slice())
    }

    /// Builds the launch request for the current selection and hands it to
    /// the platform launcher. A platform failure is surfaced to the caller
    /// and never retried here.
    pub fn launch_selected(&self, host: &dyn LauncherHost) -> AppResult<String> {
        let request = self.build_launch_request()?;
        host.launch(&request).map_err(|error| {
            tracing::warn!(
                event = "launcher_launch_failed",
                error = error.to_string()
            );
            error.with_code("launcher_launch_failed", "启动应用失败")
        })?;

        let launch_target = match &request {
            LaunchRequest::ByPackage { package_id } => format!("package:{package_id}"),
            LaunchRequest::ByArchive { path } => format!("archive:{path}"),
        };
        tracing::info!(
            event = "launcher_app_launched",
            launch_target = launch_target.clone()
        );
        Ok(launch_target)
    }

    pub fn get_settings(&self) -> AppResult<LauncherSettingsDto> {
        Ok(self.settings_guard()?.to_dto())
    }

    /// Field-wise merge over the current record; takes effect on the next
    /// rebuild.
    pub fn update_settings(
        &self,
        input: LauncherUpdateSettingsInputDto,
    ) -> AppResult<LauncherSettingsDto> {
        let mut settings = self.settings_guard()?;
        let merged = settings.clone().merged_with(input);
        *settings = merged;
        Ok(settings.to_dto())
    }

    fn emit_event<P: Serialize>(&self, host: &dyn LauncherHost, event: &str, payload: &P) {
        let value = match serde_json::to_value(payload)
            .with_code("launcher_emit_payload_failed", "构造界面事件载荷失败")
        {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    event = "launcher_event_payload_failed",
                    target_event = event,
                    error = error.to_string()
                );
                return;
            }
        };
        if let Err(error) = host.emit(event, value) {
            tracing::warn!(
                event = "launcher_event_emit_failed",
                target_event = event,
                error = error.to_string()
            );
        }
    }

    fn state_guard(&self) -> AppResult<MutexGuard<'_, LauncherState>> {
        self.state
            .lock()
            .map_err(|_| AppError::new("launcher_state_lock_failed", "启动器状态不可用"))
    }

    fn settings_guard(&self) -> AppResult<MutexGuard<'_, LauncherSettingsRecord>> {
        self.settings
            .lock()
            .map_err(|_| AppError::new("launcher_state_lock_failed", "启动器状态不可用"))
    }
}

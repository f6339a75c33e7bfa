use protocol::AppResult;
use protocol::models::LaunchRequest;
use serde_json::Value;

/// One row from the platform package query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackageInfo {
    pub package_id: String,
    pub label: String,
    pub system: bool,
}

/// Platform collaborator boundary. Everything OS-specific lives behind this
/// trait: package-manager queries, native icon fetch, UI event delivery and
/// the actual launch call. Permission dialogs are driven by the platform
/// layer too; the core only receives the resulting callbacks.
pub trait LauncherHost: Send + Sync {
    fn list_installed_packages(&self) -> AppResult<Vec<InstalledPackageInfo>>;

    /// Best-effort icon lookup, PNG bytes. `None` is a legitimate outcome
    /// and makes the UI fall back to its default sprite.
    fn fetch_package_icon(&self, package_id: &str) -> Option<Vec<u8>>;

    fn emit(&self, event: &str, payload: Value) -> AppResult<()>;

    fn launch(&self, request: &LaunchRequest) -> AppResult<()>;
}

use leclick_launcher::entry::{AppIdentity, inventory_to_dto};
use leclick_launcher::host::{InstalledPackageInfo, LauncherHost};
use leclick_launcher::inventory::InventoryReconciler;
use leclick_launcher::settings::LauncherSettingsRecord;
use protocol::models::LaunchRequest;
use protocol::{AppError, AppResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Default)]
struct FakeHost {
    packages: Vec<InstalledPackageInfo>,
    icons: HashMap<String, Vec<u8>>,
    fail_package_query: bool,
}

impl FakeHost {
    fn with_packages(packages: Vec<InstalledPackageInfo>) -> Self {
        Self {
            packages,
            ..Self::default()
        }
    }
}

impl LauncherHost for FakeHost {
    fn list_installed_packages(&self) -> AppResult<Vec<InstalledPackageInfo>> {
        if self.fail_package_query {
            return Err(AppError::new(
                "platform_package_query_failed",
                "查询已安装应用失败",
            ));
        }
        Ok(self.packages.clone())
    }

    fn fetch_package_icon(&self, package_id: &str) -> Option<Vec<u8>> {
        self.icons.get(package_id).cloned()
    }

    fn emit(&self, _event: &str, _payload: Value) -> AppResult<()> {
        Ok(())
    }

    fn launch(&self, _request: &LaunchRequest) -> AppResult<()> {
        Ok(())
    }
}

fn package(package_id: &str, label: &str, system: bool) -> InstalledPackageInfo {
    InstalledPackageInfo {
        package_id: package_id.to_string(),
        label: label.to_string(),
        system,
    }
}

fn create_temp_dir(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("leclick-{prefix}-{}", Uuid::new_v4()));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn settings(archive_dir: &Path, manifest_path: &Path) -> LauncherSettingsRecord {
    LauncherSettingsRecord {
        archive_dir: archive_dir.to_string_lossy().to_string(),
        manifest_path: manifest_path.to_string_lossy().to_string(),
        ..LauncherSettingsRecord::default()
    }
    .normalize()
}

#[test]
fn should_order_installed_entries_before_archives() {
    let dir = create_temp_dir("inventory-order");
    fs::write(dir.join("zeta.apk"), b"apk").expect("write archive");
    fs::write(dir.join("alpha.apk"), b"apk").expect("write archive");

    let host = FakeHost::with_packages(vec![
        package("be.leclick.demoa", "Demo A", false),
        package("be.leclick.demob", "Demo B", false),
    ]);
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    let names: Vec<&str> = outcome
        .entries
        .iter()
        .map(|entry| entry.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Demo A", "Demo B", "alpha", "zeta"]);
    assert_eq!(outcome.installed_entries, 2);
    assert_eq!(outcome.archive_entries, 2);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_populate_exactly_one_identity_per_entry() {
    let dir = create_temp_dir("inventory-identity");
    fs::write(dir.join("staged.apk"), b"apk").expect("write archive");

    let host = FakeHost::with_packages(vec![package("be.leclick.demoa", "Demo A", false)]);
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.entries.len(), 2);
    for entry in &outcome.entries {
        let has_package = entry.identity.package_id().is_some();
        let has_path = entry.identity.archive_path().is_some();
        assert!(has_package != has_path);
    }

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_join_manifest_metadata_onto_installed_entry() {
    let dir = create_temp_dir("inventory-join");
    let manifest_path = dir.join("manifest.json");
    fs::write(
        &manifest_path,
        r#"[{"packageName":"be.x.demo","description":"Demo app","partners":[{"name":"ACME"}]}]"#,
    )
    .expect("write manifest");

    let host = FakeHost::with_packages(vec![package("be.x.demo", "Demo", false)]);
    let empty_archive_dir = dir.join("staging");
    fs::create_dir_all(&empty_archive_dir).expect("create staging dir");
    let reconciler = InventoryReconciler::from_settings(&settings(
        empty_archive_dir.as_path(),
        manifest_path.as_path(),
    ));
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.metadata_matches, 1);
    let entry = &outcome.entries[0];
    assert_eq!(entry.description.as_deref(), Some("Demo app"));
    assert_eq!(entry.partners, vec!["ACME".to_string()]);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_keep_platform_icon_when_metadata_matches() {
    let dir = create_temp_dir("inventory-icon");
    let manifest_path = dir.join("manifest.json");
    fs::write(
        &manifest_path,
        r#"[{"packageName":"be.x.demo","description":"Demo app","previewImage":"p.png"}]"#,
    )
    .expect("write manifest");

    let mut host = FakeHost::with_packages(vec![package("be.x.demo", "Demo", false)]);
    host.icons
        .insert("be.x.demo".to_string(), vec![0x89, 0x50, 0x4e, 0x47]);
    let staging = dir.join("staging");
    let reconciler =
        InventoryReconciler::from_settings(&settings(staging.as_path(), manifest_path.as_path()));
    let outcome = reconciler.rebuild(&host);

    let entry = &outcome.entries[0];
    let icon = entry.icon.as_ref().expect("platform icon kept");
    assert_eq!(icon.kind, "png-base64");
    assert_eq!(entry.preview_image.as_deref(), Some("p.png"));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_skip_system_packages_by_default() {
    let host = FakeHost::with_packages(vec![
        package("android.settings", "Settings", true),
        package("be.leclick.demoa", "Demo A", false),
    ]);
    let reconciler = InventoryReconciler::from_settings(
        &settings(Path::new("/absent-staging"), Path::new("/absent.json")),
    );
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(
        outcome.entries[0].identity.package_id(),
        Some("be.leclick.demoa")
    );
}

#[test]
fn should_yield_empty_inventory_when_filter_rejects_all() {
    let dir = create_temp_dir("inventory-filter");
    fs::write(dir.join("foo.apk"), b"apk").expect("write archive");

    let host = FakeHost::with_packages(vec![package("com.whatsapp", "WhatsApp", false)]);
    let record = LauncherSettingsRecord {
        include_patterns: vec!["leclick".to_string()],
        archive_dir: dir.to_string_lossy().to_string(),
        ..LauncherSettingsRecord::default()
    }
    .normalize();
    let outcome = InventoryReconciler::from_settings(&record).rebuild(&host);

    assert!(outcome.entries.is_empty());

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_isolate_failing_source_from_the_other() {
    let dir = create_temp_dir("inventory-isolation");
    fs::write(dir.join("staged.apk"), b"apk").expect("write archive");

    let host = FakeHost {
        packages: vec![package("be.leclick.demoa", "Demo A", false)],
        fail_package_query: true,
        ..FakeHost::default()
    };
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.installed_entries, 0);
    assert_eq!(outcome.archive_entries, 1);
    assert_eq!(outcome.entries[0].display_name, "staged");

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_succeed_without_manifest() {
    let host = FakeHost::with_packages(vec![package("be.leclick.demoa", "Demo A", false)]);
    let reconciler = InventoryReconciler::from_settings(
        &settings(Path::new("/absent-staging"), Path::new("/absent.json")),
    );
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.metadata_matches, 0);
    assert!(outcome.entries[0].description.is_none());
}

#[test]
fn should_preserve_duplicates_across_sources() {
    let dir = create_temp_dir("inventory-duplicates");
    fs::write(dir.join("Demo A.apk"), b"apk").expect("write archive");

    let host = FakeHost::with_packages(vec![package("be.leclick.demoa", "Demo A", false)]);
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    let names: Vec<&str> = outcome
        .entries
        .iter()
        .map(|entry| entry.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Demo A", "Demo A"]);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_produce_identical_inventory_on_repeated_rebuilds() {
    let dir = create_temp_dir("inventory-idempotent");
    fs::write(dir.join("staged.apk"), b"apk").expect("write archive");
    let manifest_path = dir.join("manifest.json");
    fs::write(
        &manifest_path,
        r#"[{"appName":"staged","description":"Staged archive"}]"#,
    )
    .expect("write manifest");

    let host = FakeHost::with_packages(vec![package("be.leclick.demoa", "Demo A", false)]);
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), manifest_path.as_path()));

    let first = serde_json::to_string(&inventory_to_dto(&reconciler.rebuild(&host).entries))
        .expect("serialize first inventory");
    let second = serde_json::to_string(&inventory_to_dto(&reconciler.rebuild(&host).entries))
        .expect("serialize second inventory");
    assert_eq!(first, second);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_match_archives_against_filter_by_derived_name() {
    let dir = create_temp_dir("inventory-archive-filter");
    fs::write(dir.join("leclick-demo.apk"), b"apk").expect("write archive");
    fs::write(dir.join("other.apk"), b"apk").expect("write archive");
    fs::write(dir.join("notes.txt"), b"text").expect("write stray file");

    let host = FakeHost::default();
    let record = LauncherSettingsRecord {
        include_patterns: vec!["leclick".to_string()],
        archive_dir: dir.to_string_lossy().to_string(),
        ..LauncherSettingsRecord::default()
    }
    .normalize();
    let outcome = InventoryReconciler::from_settings(&record).rebuild(&host);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].display_name, "leclick-demo");
    assert_eq!(
        outcome.entries[0].identity.archive_path(),
        Some(dir.join("leclick-demo.apk").as_path())
    );

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_match_archive_extension_case_insensitively() {
    let dir = create_temp_dir("inventory-archive-ext");
    fs::write(dir.join("Upper.APK"), b"apk").expect("write archive");

    let host = FakeHost::default();
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].display_name, "Upper");

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn should_identify_matching_identity_for_archive_entries() {
    let dir = create_temp_dir("inventory-archive-identity");
    fs::write(dir.join("staged.apk"), b"apk").expect("write archive");

    let host = FakeHost::default();
    let reconciler =
        InventoryReconciler::from_settings(&settings(dir.as_path(), Path::new("/absent.json")));
    let outcome = reconciler.rebuild(&host);

    match &outcome.entries[0].identity {
        AppIdentity::ArchiveFile { path } => {
            assert_eq!(path.as_path(), dir.join("staged.apk").as_path());
        }
        AppIdentity::Installed { .. } => panic!("archive entry carried package identity"),
    }

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

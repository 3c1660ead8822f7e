use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use super::config::{initial_config, SavedProfile, SetupConfig, StorageMode, WizardMode};
use super::store::SetupStore;
use crate::error::Result;
use crate::storage::StoragePlan;

const STATE_DIR: &str = "mediastack-wizard";
const STATE_FILE: &str = "setup-wizard-storage.json";

/// The on-disk form of a [`SetupStore`]. Secrets are always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub current_step: usize,
    pub mode: Option<WizardMode>,
    pub storage_mode: StorageMode,
    pub selected_services: Vec<String>,
    pub config: SetupConfig,
    pub saved_profiles: BTreeMap<String, SavedProfile>,
    pub advanced_plan_cache: Option<StoragePlan>,
}

/// Missing fields in a state file fall back to first-launch values
impl Default for PersistedState {
    fn default() -> Self {
        Self {
            current_step: 0,
            mode: None,
            storage_mode: StorageMode::default(),
            selected_services: Vec::new(),
            config: initial_config(),
            saved_profiles: BTreeMap::new(),
            advanced_plan_cache: None,
        }
    }
}

/// Copy of `config` with every secret cleared
pub fn scrub_secrets(config: &SetupConfig) -> SetupConfig {
    let mut scrubbed = config.clone();
    scrubbed.scrub_secrets();
    scrubbed
}

impl SetupStore {
    /// Redacted view for persistence; the live store keeps its secrets
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            current_step: self.current_step,
            mode: self.mode,
            storage_mode: self.storage_mode,
            selected_services: self.selected_services.clone(),
            config: scrub_secrets(&self.config),
            saved_profiles: self
                .saved_profiles
                .iter()
                .map(|(name, profile)| {
                    let profile = SavedProfile {
                        config: scrub_secrets(&profile.config),
                        ..profile.clone()
                    };
                    (name.clone(), profile)
                })
                .collect(),
            advanced_plan_cache: self.advanced_plan_cache.clone(),
        }
    }

    pub fn from_snapshot(state: PersistedState) -> Self {
        SetupStore::restore(
            state.current_step,
            state.mode,
            state.storage_mode,
            state.selected_services,
            state.config,
            state.saved_profiles,
            state.advanced_plan_cache,
        )
    }
}

/// Write via a temp file in the same directory, then rename over `path`
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let tmp_name = format!(
        ".{}.tmp-{}-{}",
        path.file_name().and_then(|v| v.to_str()).unwrap_or("state"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    let tmp_path = parent.join(tmp_name);

    {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    sync_parent_dir(parent)
}

#[cfg(unix)]
fn sync_parent_dir(parent: &Path) -> std::io::Result<()> {
    fs::File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_parent: &Path) -> std::io::Result<()> {
    Ok(())
}

/// The JSON file holding the wizard state between runs
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/mediastack-wizard/setup-wizard-storage.json`, falling
    /// back to the working directory when there is no data dir
    pub fn default_location() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(STATE_DIR).join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state. A missing file yields `None`; an unreadable
    /// one is an error so the caller can decide whether to start fresh.
    pub fn load(&self) -> Result<Option<SetupStore>> {
        if !self.path.exists() {
            info!("No saved wizard state at {:?}", self.path);
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let state: PersistedState = serde_json::from_str(&content)?;
        info!("Loaded wizard state from {:?}", self.path);
        Ok(Some(SetupStore::from_snapshot(state)))
    }

    /// Load, or start fresh when the file is missing or corrupt
    pub fn load_or_default(&self) -> SetupStore {
        match self.load() {
            Ok(Some(store)) => store,
            Ok(None) => SetupStore::new(),
            Err(e) => {
                warn!("Ignoring unreadable wizard state {:?}: {}", self.path, e);
                SetupStore::new()
            }
        }
    }

    pub fn save(&self, store: &SetupStore) -> Result<()> {
        let json = serde_json::to_vec_pretty(&store.snapshot())?;
        write_atomic(&self.path, &json)?;
        debug!("Saved wizard state to {:?}", self.path);
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Removed wizard state {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::SecretField;
    use crate::storage::{StoragePathUpdate, STORAGE_CATEGORIES};

    fn store_with_secrets() -> SetupStore {
        let mut store = SetupStore::new();
        store.set_secret(SecretField::Password, "super-secret".into());
        store.set_secret(SecretField::CloudflareToken, "cf-token".into());
        store.set_secret(SecretField::PlexClaim, "claim-abc".into());
        store.set_secret(SecretField::WireguardPrivateKey, "wg-key".into());
        store.set_secret(SecretField::WireguardAddresses, "10.0.0.2/32".into());
        store
    }

    #[test]
    fn snapshot_scrubs_active_config_and_profiles() {
        let mut store = store_with_secrets();
        store.save_profile("home");

        let snapshot = store.snapshot();
        assert!(!snapshot.config.has_secrets());
        assert!(!snapshot.saved_profiles["home"].config.has_secrets());

        assert_eq!(store.config().password, "super-secret");
        assert_eq!(store.saved_profiles()["home"].config.plex_claim, "claim-abc");
    }

    #[test]
    fn state_file_round_trip_without_secrets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StateFile::new(dir.path().join("nested").join(STATE_FILE));

        let mut store = store_with_secrets();
        store.set_selected_services(vec!["plex".into(), "arr".into()]);
        store.update_storage_path("dataRoot", StoragePathUpdate::path("/mnt/nas"));
        store.next_step();
        file.save(&store).expect("save");

        let raw = fs::read_to_string(file.path()).expect("read");
        assert!(!raw.contains("super-secret"));
        assert!(!raw.contains("wg-key"));

        let loaded = file.load().expect("load").expect("present");
        assert_eq!(loaded.current_step(), 1);
        assert_eq!(loaded.selected_services(), ["plex", "arr"]);
        assert_eq!(loaded.storage_plan().data_root(), Some("/mnt/nas"));
        assert!(!loaded.config().has_secrets());
    }

    #[test]
    fn missing_file_is_none_and_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StateFile::new(dir.path().join(STATE_FILE));
        assert!(file.load().expect("load").is_none());

        fs::write(file.path(), "{not json").expect("write");
        assert!(file.load().is_err());
        assert_eq!(file.load_or_default().current_step(), 0);
    }

    #[test]
    fn partial_state_is_completed_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StateFile::new(dir.path().join(STATE_FILE));
        fs::write(
            file.path(),
            r#"{"currentStep": 2, "config": {"domain": "media.lan", "storagePlan": {"dataRoot": {"path": "/tank", "type": "local"}}}}"#,
        )
        .expect("write");

        let store = file.load().expect("load").expect("present");
        assert_eq!(store.current_step(), 2);
        assert_eq!(store.config().domain, "media.lan");
        assert_eq!(store.storage_plan().len(), STORAGE_CATEGORIES.len());
        assert_eq!(store.storage_plan().get("tv").unwrap().path, "/tank/media/tv");
    }

    #[test]
    fn state_without_config_restores_initial_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StateFile::new(dir.path().join(STATE_FILE));
        fs::write(file.path(), r#"{"currentStep": 1, "selectedServices": ["plex"]}"#)
            .expect("write");

        let store = file.load().expect("load").expect("present");
        assert_eq!(store.current_step(), 1);
        assert_eq!(store.config().domain, "example.com");
        assert_eq!(store.config().puid, "1000");
        assert_eq!(store.config().pgid, "1000");
        assert!(!store.config().timezone.is_empty());
        assert_eq!(store.storage_plan().len(), STORAGE_CATEGORIES.len());
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = StateFile::new(dir.path().join(STATE_FILE));
        file.save(&SetupStore::new()).expect("save");
        file.remove().expect("remove");
        assert!(!file.path().exists());
    }
}

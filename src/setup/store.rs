use std::collections::BTreeMap;
use tracing::debug;
use zeroize::Zeroize;

use super::config::{
    initial_config, ConfigPatch, SavedProfile, SetupConfig, StorageMode, WizardMode,
};
use super::steps::{StepId, LAST_STEP};
use crate::storage::{
    create_default_storage_plan, merge_plan, StoragePathSetting, StoragePathUpdate, StoragePlan,
    DATA_ROOT_ID,
};

/// Stack preselected for first-time users
pub const NEWBIE_SERVICES: [&str; 6] = ["plex", "arr", "torrent", "vpn", "notify", "stats"];

/// Wizard session state plus every action that mutates it.
///
/// The store has a single owner (the event loop). Each action that changes
/// something bumps [`SetupStore::revision`] so the owner knows when to
/// persist.
#[derive(Debug, Clone)]
pub struct SetupStore {
    pub(crate) current_step: usize,
    pub(crate) mode: Option<WizardMode>,
    pub(crate) storage_mode: StorageMode,
    pub(crate) selected_services: Vec<String>,
    pub(crate) config: SetupConfig,
    pub(crate) advanced_plan_cache: Option<StoragePlan>,
    pub(crate) saved_profiles: BTreeMap<String, SavedProfile>,
    revision: u64,
}

impl Default for SetupStore {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup(services: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(services.len());
    for service in services {
        if !seen.contains(&service) {
            seen.push(service);
        }
    }
    seen
}

impl SetupStore {
    pub fn new() -> Self {
        Self {
            current_step: 0,
            mode: None,
            storage_mode: StorageMode::Simple,
            selected_services: Vec::new(),
            config: initial_config(),
            advanced_plan_cache: None,
            saved_profiles: BTreeMap::new(),
            revision: 0,
        }
    }

    // --- accessors ---

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step(&self) -> StepId {
        StepId::from_index(self.current_step)
    }

    pub fn mode(&self) -> Option<WizardMode> {
        self.mode
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.storage_mode
    }

    pub fn selected_services(&self) -> &[String] {
        &self.selected_services
    }

    pub fn is_selected(&self, service: &str) -> bool {
        self.selected_services.iter().any(|s| s == service)
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    pub fn storage_plan(&self) -> &StoragePlan {
        &self.config.storage_plan
    }

    pub fn service_config(&self, service: &str) -> Option<&BTreeMap<String, String>> {
        self.config.service_configs.get(service)
    }

    pub fn advanced_plan_cache(&self) -> Option<&StoragePlan> {
        self.advanced_plan_cache.as_ref()
    }

    pub fn saved_profiles(&self) -> &BTreeMap<String, SavedProfile> {
        &self.saved_profiles
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn merged_plan(&self) -> StoragePlan {
        merge_plan(Some(&self.config.storage_plan), None)
    }

    // --- navigation ---

    /// Jump without bounds checking; views clamp when rendering
    pub fn set_current_step(&mut self, step: usize) {
        debug!("set_current_step {}", step);
        self.current_step = step;
        self.touch();
    }

    pub fn next_step(&mut self) {
        self.current_step = (self.current_step + 1).min(LAST_STEP);
        self.touch();
    }

    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
        self.touch();
    }

    // --- selection ---

    pub fn set_mode(&mut self, mode: WizardMode) {
        debug!("set_mode {:?}", mode);
        self.mode = Some(mode);
        if mode == WizardMode::Newbie {
            self.selected_services = NEWBIE_SERVICES.iter().map(|s| s.to_string()).collect();
        }
        self.touch();
    }

    pub fn set_selected_services(&mut self, services: Vec<String>) {
        self.selected_services = dedup(services);
        self.touch();
    }

    pub fn toggle_service(&mut self, service: &str) {
        if self.is_selected(service) {
            self.selected_services.retain(|s| s != service);
        } else {
            self.selected_services.push(service.to_string());
        }
        debug!("toggle_service {} -> {:?}", service, self.selected_services);
        self.touch();
    }

    // --- configuration ---

    pub fn update_config(&mut self, patch: ConfigPatch) {
        self.config.apply(patch);
        self.touch();
    }

    /// Merge `values` into the service's map; existing keys not in
    /// `values` are kept
    pub fn update_service_config(&mut self, service: &str, values: BTreeMap<String, String>) {
        self.config
            .service_configs
            .entry(service.to_string())
            .or_default()
            .extend(values);
        self.touch();
    }

    /// Record API keys returned by the control server's *arr bootstrap.
    /// Names arrive either as app ids (`sonarr`) or env names
    /// (`SONARR_API_KEY`); both are stored as `<APP>_API_KEY`.
    pub fn store_arr_api_keys(&mut self, keys: &BTreeMap<String, String>) {
        if keys.is_empty() {
            return;
        }
        let values = keys
            .iter()
            .map(|(name, key)| {
                let name = name.to_uppercase();
                let env_name = if name.ends_with("_API_KEY") {
                    name
                } else {
                    format!("{name}_API_KEY")
                };
                (env_name, key.clone())
            })
            .collect();
        self.update_service_config("arr", values);
    }

    // --- storage ---

    /// Change one storage category.
    ///
    /// In simple mode only a new data root is accepted and every category
    /// is rebuilt from it; other updates are ignored. In advanced mode the
    /// category is patched, dependent paths follow a data root change, and
    /// the result is kept as the advanced cache.
    pub fn update_storage_path(&mut self, category: &str, update: StoragePathUpdate) {
        let current = self.merged_plan();
        let plan_root = current.data_root_or_default().to_string();

        if self.storage_mode == StorageMode::Simple {
            let Some(path) = update.path.as_deref().filter(|p| !p.is_empty()) else {
                return;
            };
            if category != DATA_ROOT_ID {
                return;
            }
            let trimmed = path.trim();
            let root = if trimmed.is_empty() { plan_root.as_str() } else { trimmed };
            debug!("simple storage root -> {}", root);
            self.config.storage_plan = create_default_storage_plan(root);
            self.touch();
            return;
        }

        let defaults = create_default_storage_plan(&plan_root);
        let Some(previous) = current.get(category).or_else(|| defaults.get(category)).cloned()
        else {
            debug!("ignoring update for unknown storage category {}", category);
            return;
        };

        let entry = StoragePathSetting {
            path: update.path.clone().unwrap_or_else(|| previous.path.clone()),
            path_type: update.path_type.unwrap_or(previous.path_type),
        };
        let mut next = current;
        next.insert(category, entry);

        if category == DATA_ROOT_ID {
            if let Some(new_root) = update.path.as_deref().filter(|p| !p.is_empty()) {
                if new_root != previous.path {
                    debug!("re-rooting storage plan {} -> {}", previous.path, new_root);
                    next = next.reroot(&previous.path, new_root);
                }
            }
        }

        let root = next.data_root().map(str::to_string);
        let merged = merge_plan(Some(&next), root.as_deref());
        self.config.storage_plan = merged.clone();
        self.advanced_plan_cache = Some(merged);
        self.touch();
    }

    pub fn set_storage_mode(&mut self, mode: StorageMode) {
        if self.storage_mode == mode {
            return;
        }
        debug!("storage mode {:?} -> {:?}", self.storage_mode, mode);

        match mode {
            StorageMode::Simple => {
                let current = self.merged_plan();
                let root = current.data_root_or_default().to_string();
                self.advanced_plan_cache = Some(current);
                self.config.storage_plan = create_default_storage_plan(&root);
            }
            StorageMode::Advanced => {
                let restored = self
                    .advanced_plan_cache
                    .clone()
                    .unwrap_or_else(|| self.merged_plan());
                let root = restored.data_root().map(str::to_string);
                self.config.storage_plan = merge_plan(Some(&restored), root.as_deref());
            }
        }
        self.storage_mode = mode;
        self.touch();
    }

    // --- lifecycle ---

    /// Back to first-launch state. Saved profiles are kept.
    pub fn reset_wizard(&mut self) {
        debug!("reset_wizard");
        self.config.scrub_secrets();
        self.current_step = 0;
        self.mode = None;
        self.storage_mode = StorageMode::Simple;
        self.selected_services.clear();
        self.config = initial_config();
        self.advanced_plan_cache = None;
        self.touch();
    }

    /// Apply a preset: selection, optional config patch, expert mode
    pub fn load_template(&mut self, services: Vec<String>, patch: Option<ConfigPatch>) {
        self.selected_services = dedup(services);
        if let Some(patch) = patch {
            self.config.apply(patch);
        }
        self.mode = Some(WizardMode::Expert);
        self.touch();
    }

    /// Replace the session with imported choices and start over at step 0
    /// in advanced storage mode
    pub(crate) fn replace_session(
        &mut self,
        config: SetupConfig,
        selected_services: Vec<String>,
        mode: Option<WizardMode>,
    ) {
        let plan = merge_plan(Some(&config.storage_plan), None);
        self.config.scrub_secrets();
        self.config = SetupConfig {
            storage_plan: plan.clone(),
            ..config
        };
        self.selected_services = dedup(selected_services);
        self.mode = mode;
        self.storage_mode = StorageMode::Advanced;
        self.advanced_plan_cache = Some(plan);
        self.current_step = 0;
        self.touch();
    }

    // --- profiles ---

    pub fn save_profile(&mut self, name: &str) {
        debug!("save_profile {}", name);
        let profile = SavedProfile {
            config: self.config.normalized(),
            selected_services: self.selected_services.clone(),
            mode: self.mode,
        };
        if let Some(mut old) = self.saved_profiles.insert(name.to_string(), profile) {
            old.config.scrub_secrets();
        }
        self.touch();
    }

    pub fn delete_profile(&mut self, name: &str) {
        if let Some(mut removed) = self.saved_profiles.remove(name) {
            debug!("delete_profile {}", name);
            removed.config.scrub_secrets();
            self.touch();
        }
    }

    /// Load a saved profile; unknown names are ignored
    pub fn load_profile(&mut self, name: &str) -> bool {
        let Some(profile) = self.saved_profiles.get(name).cloned() else {
            return false;
        };
        debug!("load_profile {}", name);
        self.replace_session(profile.config, profile.selected_services, profile.mode);
        true
    }

    /// Rebuild a store from persisted state. Plans are completed so older
    /// files with partial plans still satisfy the plan invariant.
    pub(crate) fn restore(
        current_step: usize,
        mode: Option<WizardMode>,
        storage_mode: StorageMode,
        selected_services: Vec<String>,
        mut config: SetupConfig,
        saved_profiles: BTreeMap<String, SavedProfile>,
        advanced_plan_cache: Option<StoragePlan>,
    ) -> Self {
        config.storage_plan = merge_plan(Some(&config.storage_plan), None);
        Self {
            current_step: current_step.min(LAST_STEP),
            mode,
            storage_mode,
            selected_services: dedup(selected_services),
            config,
            advanced_plan_cache,
            saved_profiles,
            revision: 0,
        }
    }

    /// Overwrite a secret in place, zeroising the previous value
    pub fn set_secret(&mut self, field: SecretField, value: String) {
        let slot = match field {
            SecretField::Password => &mut self.config.password,
            SecretField::CloudflareToken => &mut self.config.cloudflare_token,
            SecretField::PlexClaim => &mut self.config.plex_claim,
            SecretField::WireguardPrivateKey => &mut self.config.wireguard_private_key,
            SecretField::WireguardAddresses => &mut self.config.wireguard_addresses,
        };
        slot.zeroize();
        *slot = value;
        self.touch();
    }
}

/// The five secret-bearing config fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretField {
    Password,
    CloudflareToken,
    PlexClaim,
    WireguardPrivateKey,
    WireguardAddresses,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StoragePathType, DEFAULT_DATA_ROOT, STORAGE_CATEGORIES};
    use proptest::prelude::*;

    fn advanced_store() -> SetupStore {
        let mut store = SetupStore::new();
        store.set_storage_mode(StorageMode::Advanced);
        store
    }

    fn path(store: &SetupStore, id: &str) -> String {
        store.storage_plan().get(id).expect("category present").path.clone()
    }

    #[test]
    fn steps_saturate() {
        let mut store = SetupStore::new();
        store.prev_step();
        assert_eq!(store.current_step(), 0);
        for _ in 0..10 {
            store.next_step();
        }
        assert_eq!(store.current_step(), LAST_STEP);
        store.set_current_step(3);
        assert_eq!(store.step(), StepId::ServiceConfig);
    }

    #[test]
    fn newbie_mode_preselects_stack_and_expert_keeps_selection() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["jellyfin".into()]);
        store.set_mode(WizardMode::Expert);
        assert_eq!(store.selected_services(), ["jellyfin"]);

        store.set_mode(WizardMode::Newbie);
        assert_eq!(store.selected_services(), NEWBIE_SERVICES);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut store = SetupStore::new();
        store.toggle_service("plex");
        store.toggle_service("kavita");
        store.toggle_service("plex");
        assert_eq!(store.selected_services(), ["kavita"]);
    }

    #[test]
    fn selection_drops_duplicates() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["plex".into(), "arr".into(), "plex".into()]);
        assert_eq!(store.selected_services(), ["plex", "arr"]);
    }

    #[test]
    fn service_config_merges_keys() {
        let mut store = SetupStore::new();
        store.update_service_config("plex", [("A".to_string(), "1".to_string())].into());
        store.update_service_config("plex", [("B".to_string(), "2".to_string())].into());
        let plex = store.service_config("plex").unwrap();
        assert_eq!(plex.get("A").map(String::as_str), Some("1"));
        assert_eq!(plex.get("B").map(String::as_str), Some("2"));
    }

    #[test]
    fn arr_keys_are_stored_uppercased() {
        let mut store = SetupStore::new();
        store.store_arr_api_keys(&BTreeMap::from([
            ("sonarr".to_string(), "abc".to_string()),
            ("RADARR_API_KEY".to_string(), "def".to_string()),
        ]));
        let arr = store.service_config("arr").unwrap();
        assert_eq!(arr.get("SONARR_API_KEY").map(String::as_str), Some("abc"));
        assert_eq!(arr.get("RADARR_API_KEY").map(String::as_str), Some("def"));
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn bootstrapped_arr_keys_are_redacted_in_logs() {
        let mut store = SetupStore::new();
        store.store_arr_api_keys(&BTreeMap::from([
            ("sonarr".to_string(), "sonarr-key-123".to_string()),
            ("prowlarr".to_string(), "prowlarr-key-456".to_string()),
        ]));
        let logged = crate::redact::redacted(store.config());
        assert!(!logged.contains("sonarr-key-123"));
        assert!(!logged.contains("prowlarr-key-456"));
        assert!(logged.contains("SONARR_API_KEY"));
    }

    #[test]
    fn simple_mode_rebuilds_plan_from_root() {
        let mut store = SetupStore::new();
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path("  /mnt/nas  "));
        assert_eq!(path(&store, DATA_ROOT_ID), "/mnt/nas");
        assert_eq!(path(&store, "movies"), "/mnt/nas/media/movies");
    }

    #[test]
    fn simple_mode_ignores_other_updates() {
        let mut store = SetupStore::new();
        let before = store.storage_plan().clone();
        let revision = store.revision();

        store.update_storage_path("movies", StoragePathUpdate::path("/custom"));
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path(""));
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path_type(StoragePathType::Network));

        assert_eq!(store.storage_plan(), &before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn simple_mode_blank_root_keeps_current_root() {
        let mut store = SetupStore::new();
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path("   "));
        assert_eq!(path(&store, DATA_ROOT_ID), DEFAULT_DATA_ROOT);
    }

    #[test]
    fn advanced_root_change_moves_defaults_only() {
        let mut store = advanced_store();
        store.update_storage_path("tv", StoragePathUpdate::path("/custom/films"));
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path("/mnt/nas"));

        assert_eq!(path(&store, "movies"), "/mnt/nas/media/movies");
        assert_eq!(path(&store, "tv"), "/custom/films");
        assert_eq!(store.advanced_plan_cache(), Some(store.storage_plan()));
    }

    #[test]
    fn advanced_type_update_keeps_path() {
        let mut store = advanced_store();
        store.update_storage_path("music", StoragePathUpdate::path_type(StoragePathType::Network));
        let music = store.storage_plan().get("music").unwrap();
        assert_eq!(music.path, "/srv/mediastack/media/music");
        assert_eq!(music.path_type, StoragePathType::Network);
    }

    #[test]
    fn advanced_unknown_category_is_ignored() {
        let mut store = advanced_store();
        let before = store.storage_plan().clone();
        store.update_storage_path("podcasts", StoragePathUpdate::path("/x"));
        assert_eq!(store.storage_plan(), &before);
    }

    #[test]
    fn storage_mode_round_trip_restores_plan() {
        let mut store = advanced_store();
        store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path("/tank"));
        store.update_storage_path("photos", StoragePathUpdate::typed_path("//nas/photos"));
        let advanced = store.storage_plan().clone();

        store.set_storage_mode(StorageMode::Simple);
        assert_eq!(path(&store, "photos"), "/tank/media/photos");

        store.set_storage_mode(StorageMode::Advanced);
        assert_eq!(store.storage_plan(), &advanced);
        assert_eq!(
            store.storage_plan().get("photos").unwrap().path_type,
            StoragePathType::Network
        );
    }

    #[test]
    fn setting_same_storage_mode_is_noop() {
        let mut store = SetupStore::new();
        let revision = store.revision();
        store.set_storage_mode(StorageMode::Simple);
        assert_eq!(store.revision(), revision);
        assert!(store.advanced_plan_cache().is_none());
    }

    #[test]
    fn reset_keeps_profiles() {
        let mut store = SetupStore::new();
        store.set_mode(WizardMode::Newbie);
        store.next_step();
        store.save_profile("home");
        store.reset_wizard();

        assert_eq!(store.current_step(), 0);
        assert!(store.mode().is_none());
        assert!(store.selected_services().is_empty());
        assert_eq!(store.storage_mode(), StorageMode::Simple);
        assert!(store.saved_profiles().contains_key("home"));
    }

    #[test]
    fn template_sets_expert_mode_and_patch() {
        let mut store = SetupStore::new();
        store.load_template(vec!["jellyfin".into()], Some(ConfigPatch::ids("1001", "1001")));
        assert_eq!(store.mode(), Some(WizardMode::Expert));
        assert_eq!(store.config().puid, "1001");
        assert_eq!(store.selected_services(), ["jellyfin"]);
    }

    #[test]
    fn profile_load_resets_to_advanced_step_zero() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["plex".into()]);
        store.set_mode(WizardMode::Expert);
        store.save_profile("lab");

        store.reset_wizard();
        store.set_current_step(4);
        assert!(store.load_profile("lab"));

        assert_eq!(store.current_step(), 0);
        assert_eq!(store.storage_mode(), StorageMode::Advanced);
        assert_eq!(store.selected_services(), ["plex"]);
        assert_eq!(store.advanced_plan_cache().map(|p| p.len()), Some(STORAGE_CATEGORIES.len()));
        assert!(!store.load_profile("missing"));
    }

    #[test]
    fn delete_profile_removes_entry() {
        let mut store = SetupStore::new();
        store.save_profile("a");
        store.delete_profile("a");
        assert!(store.saved_profiles().is_empty());
    }

    #[test]
    fn set_secret_replaces_value() {
        let mut store = SetupStore::new();
        store.set_secret(SecretField::Password, "first-pass".into());
        store.set_secret(SecretField::Password, "second-pass".into());
        assert_eq!(store.config().password, "second-pass");
    }

    #[derive(Debug, Clone)]
    enum Action {
        Next,
        Prev,
        Mode(StorageMode),
        Path(&'static str, String),
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "(/[a-z]{1,8}){1,3}",
            "//nas/[a-z]{1,6}",
        ]
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        let ids: Vec<&'static str> = STORAGE_CATEGORIES.iter().map(|c| c.id).collect();
        prop_oneof![
            Just(Action::Next),
            Just(Action::Prev),
            prop_oneof![Just(StorageMode::Simple), Just(StorageMode::Advanced)]
                .prop_map(Action::Mode),
            (proptest::sample::select(ids), path_strategy())
                .prop_map(|(id, path)| Action::Path(id, path)),
        ]
    }

    fn apply(store: &mut SetupStore, action: &Action) {
        match action {
            Action::Next => store.next_step(),
            Action::Prev => store.prev_step(),
            Action::Mode(mode) => store.set_storage_mode(*mode),
            Action::Path(id, path) => {
                store.update_storage_path(*id, StoragePathUpdate::typed_path(path.as_str()))
            }
        }
    }

    proptest! {
        #[test]
        fn any_action_sequence_keeps_store_consistent(
            actions in proptest::collection::vec(action_strategy(), 0..40),
        ) {
            let mut store = SetupStore::new();
            for action in &actions {
                apply(&mut store, action);
                prop_assert!(store.current_step() <= LAST_STEP);
                for c in STORAGE_CATEGORIES {
                    prop_assert!(store.storage_plan().get(c.id).is_some(), "missing {}", c.id);
                }
            }

            store.set_storage_mode(StorageMode::Advanced);
            let advanced = store.storage_plan().clone();
            store.set_storage_mode(StorageMode::Simple);
            let root = advanced.data_root_or_default().to_string();
            prop_assert_eq!(store.storage_plan(), &create_default_storage_plan(&root));
            store.set_storage_mode(StorageMode::Advanced);
            prop_assert_eq!(store.storage_plan(), &advanced);
        }
    }
}

use mediastack_wizard::catalog::template;
use mediastack_wizard::render::{self, review_summary, VPN_WARNING};
use mediastack_wizard::setup::{
    ConfigPatch, SecretField, SetupStore, StateFile, StepId, StorageMode, WizardMode,
};
use mediastack_wizard::storage::{StoragePathType, StoragePathUpdate, DATA_ROOT_ID};

fn configured_store() -> SetupStore {
    let mut store = SetupStore::new();
    store.set_mode(WizardMode::Newbie);
    store.update_config(ConfigPatch {
        domain: Some("media.home.arpa".to_string()),
        timezone: Some("Europe/Berlin".to_string()),
        ..ConfigPatch::ids("1001", "1001")
    });
    store.set_secret(SecretField::Password, "a-long-password".to_string());
    store.set_secret(SecretField::CloudflareToken, "cf-token".to_string());
    store
}

#[test]
fn full_session_survives_a_restart_without_secrets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = StateFile::new(dir.path().join("state").join("setup-wizard-storage.json"));

    let mut store = configured_store();
    for _ in 0..10 {
        store.next_step();
    }
    assert_eq!(store.step(), StepId::Review);

    store.update_storage_path(DATA_ROOT_ID, StoragePathUpdate::path("/mnt/nas"));
    assert_eq!(store.storage_plan().resolve("movies"), "/mnt/nas/media/movies");

    store.set_storage_mode(StorageMode::Advanced);
    store.update_storage_path("movies", StoragePathUpdate::typed_path("//nas/films"));
    store.save_profile("nas");
    state.save(&store).expect("save");

    let restored = state.load().expect("load").expect("state present");
    assert_eq!(restored.step(), StepId::Review);
    assert_eq!(restored.storage_mode(), StorageMode::Advanced);
    assert_eq!(restored.config().domain, "media.home.arpa");
    assert!(!restored.config().has_secrets());
    assert!(!restored.saved_profiles()["nas"].config.has_secrets());

    let movies = restored.storage_plan().get("movies").expect("movies");
    assert_eq!(movies.path, "//nas/films");
    assert_eq!(movies.path_type, StoragePathType::Network);

    // The live store still has its secrets
    assert_eq!(store.config().cloudflare_token, "cf-token");
}

#[test]
fn advanced_plan_survives_a_trip_through_simple_mode() {
    let mut store = configured_store();
    store.set_storage_mode(StorageMode::Advanced);
    store.update_storage_path("downloads", StoragePathUpdate::path("/scratch/dl"));
    let advanced = store.storage_plan().clone();

    store.set_storage_mode(StorageMode::Simple);
    assert_eq!(store.storage_plan().resolve("downloads"), "/srv/mediastack/downloads");

    store.set_storage_mode(StorageMode::Advanced);
    assert_eq!(store.storage_plan(), &advanced);
}

#[test]
fn export_import_and_render() {
    let mut source = configured_store();
    template("privacy-focused").expect("template").apply(&mut source);
    assert_eq!(source.mode(), Some(WizardMode::Expert));
    let exported = source.export_config().expect("export");
    assert!(exported.contains("a-long-password"));

    let mut target = SetupStore::new();
    target.set_current_step(4);
    target.import_json(&exported).expect("import");
    assert_eq!(target.current_step(), 0);
    assert_eq!(target.selected_services(), source.selected_services());
    assert_eq!(target.config().password, "a-long-password");

    let dir = tempfile::tempdir().expect("tempdir");
    let written = render::write_bundle(dir.path(), &target).expect("write");
    assert_eq!(written.len(), 4);

    let env = std::fs::read_to_string(dir.path().join(render::ENV_FILE)).expect("env");
    assert!(env.contains("DOMAIN=media.home.arpa"));
    assert!(env.contains("CLOUDFLARE_TUNNEL_TOKEN=cf-token"));
    assert!(env.contains("MOVIES_PATH=/srv/mediastack/media/movies"));

    let compose = std::fs::read_to_string(dir.path().join(render::COMPOSE_FILE)).expect("compose");
    assert!(compose.contains("mediastack"));
}

#[test]
fn review_warns_about_torrents_without_vpn() {
    let mut store = SetupStore::new();
    store.set_selected_services(vec!["plex".into(), "torrent".into()]);
    assert_eq!(review_summary(&store).vpn_warning, Some(VPN_WARNING));

    store.toggle_service("vpn");
    let summary = review_summary(&store);
    assert!(summary.vpn_warning.is_none());
    assert!(summary.storage.iter().any(|e| e.id == "downloads"));
}

#[test]
fn reset_keeps_profiles_and_restarts() {
    let mut store = configured_store();
    store.save_profile("home");
    store.next_step();
    store.reset_wizard();

    assert_eq!(store.current_step(), 0);
    assert_eq!(store.mode(), None);
    assert!(store.selected_services().is_empty());
    assert!(!store.config().has_secrets());

    assert!(store.load_profile("home"));
    assert_eq!(store.config().password, "a-long-password");
    assert_eq!(store.storage_mode(), StorageMode::Advanced);
    assert!(!store.load_profile("missing"));
}

#[test]
fn corrupt_state_starts_fresh() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").expect("write");

    let state = StateFile::new(&path);
    assert!(state.load().is_err());
    let store = state.load_or_default();
    assert_eq!(store.current_step(), 0);
    assert!(store.saved_profiles().is_empty());
}

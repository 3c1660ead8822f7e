use std::fmt::Write;

use crate::setup::SetupStore;

/// `.env` variable -> storage category it is read from
const STORAGE_VARS: &[(&str, &str)] = &[
    ("DATA_ROOT", "dataRoot"),
    ("CONFIG_ROOT", "configRoot"),
    ("MOVIES_PATH", "movies"),
    ("TV_SHOWS_PATH", "tv"),
    ("MUSIC_PATH", "music"),
    ("BOOKS_PATH", "books"),
    ("AUDIOBOOKS_PATH", "audiobooks"),
    ("PHOTOS_PATH", "photos"),
    ("TRANSCODE_PATH", "transcode"),
    ("DOWNLOADS_PATH", "downloads"),
];

const API_KEY_PLACEHOLDERS: &[&str] = &[
    "JELLYFIN_API_KEY",
    "SONARR_API_KEY",
    "RADARR_API_KEY",
    "PROWLARR_API_KEY",
    "BAZARR_API_KEY",
    "OVERSEERR_API_KEY",
    "TAUTULLI_API_KEY",
    "PORTAINER_TOKEN",
];

const RULE: &str =
    "# =============================================================================";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{RULE}\n# {title}\n{RULE}");
}

/// Render the `.env` file for the current choices
pub fn render_env(store: &SetupStore) -> String {
    let config = store.config();
    let plan = &config.storage_plan;
    let mut out = String::new();

    out.push_str("# .env configuration for mediastack\n");
    out.push_str("# Generated by mediastack-wizard\n\n");

    section(&mut out, "GENERAL SETTINGS");
    let _ = writeln!(out, "TIMEZONE={}", config.timezone);
    let _ = writeln!(out, "PUID={}", config.puid);
    let _ = writeln!(out, "PGID={}", config.pgid);
    let _ = writeln!(out, "DOMAIN={}", config.domain);
    out.push_str("DOCKER_NETWORK=mediastack\n");
    let _ = writeln!(out, "COMPOSE_PROFILES={}\n", store.selected_services().join(","));

    section(&mut out, "STORAGE & PATHS");
    for (var, category) in STORAGE_VARS {
        let _ = writeln!(out, "{var}={}", plan.resolve(category));
    }
    out.push('\n');

    section(&mut out, "SERVICE CREDENTIALS & SECRETS");
    let tunnel_token = if config.cloudflare_token.is_empty() {
        "CHANGE_ME_TOKEN"
    } else {
        config.cloudflare_token.as_str()
    };
    let _ = writeln!(out, "CLOUDFLARE_TUNNEL_TOKEN={tunnel_token}\n");

    out.push_str("# Authelia Secrets (Generate these with: openssl rand -hex 32)\n");
    for var in [
        "AUTHELIA_JWT_SECRET",
        "AUTHELIA_SESSION_SECRET",
        "AUTHELIA_STORAGE_ENCRYPTION_KEY",
    ] {
        let _ = writeln!(out, "{var}=GENERATE_WITH_OPENSSL");
    }

    out.push_str("\n# Passwords\n");
    let _ = writeln!(out, "REDIS_PASSWORD={}\n", config.password);

    out.push_str("# API Keys (Fill these in after setting up services)\n");
    let _ = writeln!(out, "PLEX_TOKEN={}", config.plex_claim);
    let arr_keys = store.service_config("arr");
    for var in API_KEY_PLACEHOLDERS {
        let value = arr_keys
            .and_then(|keys| keys.get(*var))
            .map(String::as_str)
            .unwrap_or_default();
        let _ = writeln!(out, "{var}={value}");
    }

    out.push_str("\n# Plex Claim (Optional - for new servers)\n");
    let _ = writeln!(out, "PLEX_CLAIM={}\n", config.plex_claim);

    out.push_str("# PhotoPrism\nPHOTOPRISM_ADMIN_PASSWORD=\n\n");

    out.push_str("# Gluetun VPN (WireGuard)\n");
    let _ = writeln!(out, "WIREGUARD_PRIVATE_KEY={}", config.wireguard_private_key);
    let _ = writeln!(out, "WIREGUARD_ADDRESSES={}\n", config.wireguard_addresses);

    section(&mut out, "SERVICE SPECIFIC CONFIGURATION");
    for (service, values) in &config.service_configs {
        if !store.is_selected(service) {
            continue;
        }
        let values: Vec<_> = values
            .iter()
            .filter(|(key, _)| !API_KEY_PLACEHOLDERS.contains(&key.as_str()))
            .collect();
        if values.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n# {} CONFIGURATION", service.to_uppercase());
        for (key, value) in values {
            let _ = writeln!(out, "{key}={value}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{SecretField, StorageMode};
    use crate::storage::StoragePathUpdate;

    fn line<'a>(env: &'a str, key: &str) -> Option<&'a str> {
        env.lines()
            .find_map(|l| l.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')))
    }

    #[test]
    fn general_and_storage_blocks() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["plex".into(), "arr".into()]);
        store.set_storage_mode(StorageMode::Advanced);
        store.update_storage_path("dataRoot", StoragePathUpdate::path("/mnt/nas"));
        store.update_storage_path("movies", StoragePathUpdate::path("/custom/films"));

        let env = render_env(&store);
        assert_eq!(line(&env, "COMPOSE_PROFILES"), Some("plex,arr"));
        assert_eq!(line(&env, "DOCKER_NETWORK"), Some("mediastack"));
        assert_eq!(line(&env, "DATA_ROOT"), Some("/mnt/nas"));
        assert_eq!(line(&env, "MOVIES_PATH"), Some("/custom/films"));
        assert_eq!(line(&env, "TV_SHOWS_PATH"), Some("/mnt/nas/media/tv"));
        assert_eq!(line(&env, "DOWNLOADS_PATH"), Some("/mnt/nas/downloads"));
    }

    #[test]
    fn missing_token_gets_placeholder() {
        let mut store = SetupStore::new();
        let env = render_env(&store);
        assert_eq!(line(&env, "CLOUDFLARE_TUNNEL_TOKEN"), Some("CHANGE_ME_TOKEN"));

        store.set_secret(SecretField::CloudflareToken, "cf-123".into());
        store.set_secret(SecretField::PlexClaim, "claim-9".into());
        let env = render_env(&store);
        assert_eq!(line(&env, "CLOUDFLARE_TUNNEL_TOKEN"), Some("cf-123"));
        assert_eq!(line(&env, "PLEX_CLAIM"), Some("claim-9"));
        assert_eq!(line(&env, "PLEX_TOKEN"), Some("claim-9"));
    }

    #[test]
    fn service_blocks_only_for_selected_services() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["plex".into()]);
        store.update_service_config("plex", [("ALLOWED_NETWORKS".to_string(), "10.0.0.0/8".to_string())].into());
        store.update_service_config("torrent", [("LAN_NETWORK".to_string(), "10.0.0.0/8".to_string())].into());

        let env = render_env(&store);
        assert!(env.contains("# PLEX CONFIGURATION\nALLOWED_NETWORKS=10.0.0.0/8"));
        assert!(!env.contains("TORRENT CONFIGURATION"));
        assert!(!env.contains("LAN_NETWORK"));
    }

    #[test]
    fn bootstrapped_arr_keys_fill_placeholders_once() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["sonarr".into(), "arr".into()]);
        store.store_arr_api_keys(&[("sonarr".to_string(), "abc".to_string())].into());

        let env = render_env(&store);
        assert_eq!(line(&env, "SONARR_API_KEY"), Some("abc"));
        assert_eq!(env.lines().filter(|l| l.starts_with("SONARR_API_KEY=")).count(), 1);
        assert_eq!(line(&env, "RADARR_API_KEY"), Some(""));
        assert!(!env.contains("# ARR CONFIGURATION"));
    }
}

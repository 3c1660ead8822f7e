use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use zeroize::Zeroize;

use crate::storage::{merge_plan, StoragePlan};

pub type ServiceConfigs = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardMode {
    Newbie,
    Expert,
}

impl WizardMode {
    /// Lenient parse used for imported files; anything unknown is no mode
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "newbie" => Some(WizardMode::Newbie),
            "expert" => Some(WizardMode::Expert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardMode::Newbie => "newbie",
            WizardMode::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Simple,
    Advanced,
}

impl StorageMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "simple" => Some(StorageMode::Simple),
            "advanced" => Some(StorageMode::Advanced),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageMode::Simple => "simple",
            StorageMode::Advanced => "advanced",
        }
    }
}

/// Everything that drives the generated `.env` and compose files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetupConfig {
    /// Primary domain without protocol, e.g. `media.example.com`
    pub domain: String,
    /// IANA timezone passed to every container
    pub timezone: String,
    pub puid: String,
    pub pgid: String,
    pub password: String,
    pub cloudflare_token: String,
    pub plex_claim: String,
    pub wireguard_private_key: String,
    pub wireguard_addresses: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_configs: ServiceConfigs,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_plan: StoragePlan,
}

/// `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl SetupConfig {
    /// Clear the secret-bearing fields in place
    pub fn scrub_secrets(&mut self) {
        self.password.zeroize();
        self.cloudflare_token.zeroize();
        self.plex_claim.zeroize();
        self.wireguard_private_key.zeroize();
        self.wireguard_addresses.zeroize();
    }

    pub fn has_secrets(&self) -> bool {
        [
            &self.password,
            &self.cloudflare_token,
            &self.plex_claim,
            &self.wireguard_private_key,
            &self.wireguard_addresses,
        ]
        .iter()
        .any(|s| !s.is_empty())
    }

    /// Copy with the storage plan filled in for every category
    pub fn normalized(&self) -> SetupConfig {
        SetupConfig {
            storage_plan: merge_plan(Some(&self.storage_plan), None),
            ..self.clone()
        }
    }

    pub(crate) fn apply(&mut self, patch: ConfigPatch) {
        let ConfigPatch {
            domain,
            timezone,
            puid,
            pgid,
            password,
            cloudflare_token,
            plex_claim,
            wireguard_private_key,
            wireguard_addresses,
            service_configs,
            storage_plan,
        } = patch;

        let fields = [
            (&mut self.domain, domain),
            (&mut self.timezone, timezone),
            (&mut self.puid, puid),
            (&mut self.pgid, pgid),
            (&mut self.password, password),
            (&mut self.cloudflare_token, cloudflare_token),
            (&mut self.plex_claim, plex_claim),
            (&mut self.wireguard_private_key, wireguard_private_key),
            (&mut self.wireguard_addresses, wireguard_addresses),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(configs) = service_configs {
            self.service_configs = configs;
        }
        if let Some(plan) = storage_plan {
            self.storage_plan = merge_plan(Some(&plan), None);
        }
    }
}

/// Partial update to [`SetupConfig`]; `None` leaves the field as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub domain: Option<String>,
    pub timezone: Option<String>,
    pub puid: Option<String>,
    pub pgid: Option<String>,
    pub password: Option<String>,
    pub cloudflare_token: Option<String>,
    pub plex_claim: Option<String>,
    pub wireguard_private_key: Option<String>,
    pub wireguard_addresses: Option<String>,
    pub service_configs: Option<ServiceConfigs>,
    pub storage_plan: Option<StoragePlan>,
}

impl ConfigPatch {
    pub fn ids(puid: &str, pgid: &str) -> Self {
        Self {
            puid: Some(puid.to_string()),
            pgid: Some(pgid.to_string()),
            ..Default::default()
        }
    }
}

/// A named snapshot of the wizard choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProfile {
    pub config: SetupConfig,
    pub selected_services: Vec<String>,
    pub mode: Option<WizardMode>,
}

fn detect_timezone() -> String {
    std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim().trim_start_matches(':').to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| "Etc/UTC".to_string())
}

/// Values shown on first launch
pub fn initial_config() -> SetupConfig {
    SetupConfig {
        domain: "example.com".to_string(),
        timezone: detect_timezone(),
        puid: "1000".to_string(),
        pgid: "1000".to_string(),
        storage_plan: merge_plan(None, None),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StoragePathSetting, DEFAULT_DATA_ROOT};

    #[test]
    fn initial_config_has_no_secrets_and_full_plan() {
        let config = initial_config();
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.puid, "1000");
        assert!(!config.has_secrets());
        assert_eq!(config.storage_plan.data_root(), Some(DEFAULT_DATA_ROOT));
        assert!(!config.timezone.is_empty());
    }

    #[test]
    fn scrub_clears_all_secret_fields() {
        let mut config = initial_config();
        config.password = "hunter22".into();
        config.cloudflare_token = "cf".into();
        config.plex_claim = "claim-1".into();
        config.wireguard_private_key = "key".into();
        config.wireguard_addresses = "10.0.0.2/32".into();
        config.scrub_secrets();
        assert!(!config.has_secrets());
        assert_eq!(config.domain, "example.com");
    }

    #[test]
    fn patch_only_touches_given_fields_and_merges_plan() {
        let mut config = initial_config();
        let plan: StoragePlan = [("dataRoot".to_string(), StoragePathSetting::local("/tank"))]
            .into_iter()
            .collect();
        config.apply(ConfigPatch {
            domain: Some("media.home.net".into()),
            storage_plan: Some(plan),
            ..Default::default()
        });
        assert_eq!(config.domain, "media.home.net");
        assert_eq!(config.puid, "1000");
        assert_eq!(config.storage_plan.get("tv").unwrap().path, "/tank/media/tv");
    }

    #[test]
    fn json_uses_camel_case_names() {
        let json = serde_json::to_value(initial_config()).unwrap();
        let object = json.as_object().unwrap();
        for key in ["cloudflareToken", "plexClaim", "wireguardPrivateKey", "serviceConfigs", "storagePlan"] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn null_maps_read_as_empty() {
        let config: SetupConfig =
            serde_json::from_str(r#"{"domain": "media.lan", "serviceConfigs": null, "storagePlan": null}"#)
                .unwrap();
        assert_eq!(config.domain, "media.lan");
        assert!(config.service_configs.is_empty());
        assert!(config.storage_plan.is_empty());
    }

    #[test]
    fn mode_parse_is_lenient() {
        assert_eq!(WizardMode::parse("Expert"), Some(WizardMode::Expert));
        assert_eq!(WizardMode::parse("guru"), None);
        assert_eq!(StorageMode::parse("advanced"), Some(StorageMode::Advanced));
    }
}

use std::collections::BTreeMap;

use crate::catalog::{service_fields, service_name, Template, TEMPLATES};
use crate::setup::{ConfigPatch, SecretField, SetupStore, StepId, StorageMode, WizardMode};
use crate::storage::{category, visible_categories, StoragePathUpdate, DATA_ROOT_ID};
use crate::vim::InputBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Domain,
    Timezone,
    Puid,
    Pgid,
    Password,
    CloudflareToken,
    PlexClaim,
    WireguardPrivateKey,
    WireguardAddresses,
    StoragePath(&'static str),
    ServiceSetting { service: String, key: &'static str },
}

impl FieldKey {
    pub fn label(&self) -> String {
        match self {
            FieldKey::Domain => "Domain".to_string(),
            FieldKey::Timezone => "Timezone".to_string(),
            FieldKey::Puid => "PUID".to_string(),
            FieldKey::Pgid => "PGID".to_string(),
            FieldKey::Password => "Admin password".to_string(),
            FieldKey::CloudflareToken => "Cloudflare tunnel token".to_string(),
            FieldKey::PlexClaim => "Plex claim".to_string(),
            FieldKey::WireguardPrivateKey => "WireGuard private key".to_string(),
            FieldKey::WireguardAddresses => "WireGuard address".to_string(),
            FieldKey::StoragePath(id) => category(id)
                .map(|c| c.label.to_string())
                .unwrap_or_else(|| id.to_string()),
            FieldKey::ServiceSetting { service, key } => {
                format!("{} {}", service_name(service), key)
            }
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(
            self,
            FieldKey::Password
                | FieldKey::CloudflareToken
                | FieldKey::PlexClaim
                | FieldKey::WireguardPrivateKey
        )
    }

    fn secret(&self) -> Option<SecretField> {
        match self {
            FieldKey::Password => Some(SecretField::Password),
            FieldKey::CloudflareToken => Some(SecretField::CloudflareToken),
            FieldKey::PlexClaim => Some(SecretField::PlexClaim),
            FieldKey::WireguardPrivateKey => Some(SecretField::WireguardPrivateKey),
            FieldKey::WireguardAddresses => Some(SecretField::WireguardAddresses),
            _ => None,
        }
    }

    fn stored_service_value<'a>(&self, store: &'a SetupStore) -> Option<&'a String> {
        match self {
            FieldKey::ServiceSetting { service, key } => {
                store.service_config(service).and_then(|values| values.get(*key))
            }
            _ => None,
        }
    }

    /// What the field shows for the current store
    pub fn value(&self, store: &SetupStore) -> String {
        let config = store.config();
        match self {
            FieldKey::Domain => config.domain.clone(),
            FieldKey::Timezone => config.timezone.clone(),
            FieldKey::Puid => config.puid.clone(),
            FieldKey::Pgid => config.pgid.clone(),
            FieldKey::Password => config.password.clone(),
            FieldKey::CloudflareToken => config.cloudflare_token.clone(),
            FieldKey::PlexClaim => config.plex_claim.clone(),
            FieldKey::WireguardPrivateKey => config.wireguard_private_key.clone(),
            FieldKey::WireguardAddresses => config.wireguard_addresses.clone(),
            FieldKey::StoragePath(id) => store.storage_plan().resolve(id),
            FieldKey::ServiceSetting { service, key } => match self.stored_service_value(store) {
                Some(value) => value.clone(),
                None => service_fields(service)
                    .and_then(|f| f.fields.iter().find(|field| field.key == *key))
                    .map(|field| field.default.to_string())
                    .unwrap_or_default(),
            },
        }
    }

    /// Write `value` into the store. Unchanged values leave the store (and
    /// its revision) alone.
    pub fn commit(&self, store: &mut SetupStore, value: &str) {
        let unchanged = match self {
            FieldKey::ServiceSetting { .. } => {
                self.stored_service_value(store).map(String::as_str) == Some(value)
            }
            _ => self.value(store) == value,
        };
        if unchanged {
            return;
        }

        if let Some(secret) = self.secret() {
            store.set_secret(secret, value.to_string());
            return;
        }

        let value = value.to_string();
        match self {
            FieldKey::Domain => store.update_config(ConfigPatch {
                domain: Some(value.trim().to_string()),
                ..Default::default()
            }),
            FieldKey::Timezone => store.update_config(ConfigPatch {
                timezone: Some(value.trim().to_string()),
                ..Default::default()
            }),
            FieldKey::Puid => store.update_config(ConfigPatch {
                puid: Some(value.trim().to_string()),
                ..Default::default()
            }),
            FieldKey::Pgid => store.update_config(ConfigPatch {
                pgid: Some(value.trim().to_string()),
                ..Default::default()
            }),
            FieldKey::StoragePath(id) => {
                store.update_storage_path(id, StoragePathUpdate::typed_path(value.trim()))
            }
            FieldKey::ServiceSetting { service, key } => {
                let values = BTreeMap::from([(key.to_string(), value)]);
                store.update_service_config(service, values);
            }
            _ => {}
        }
    }
}

pub struct FormField {
    pub key: FieldKey,
    pub buffer: InputBuffer,
}

impl FormField {
    fn load(key: FieldKey, store: &SetupStore) -> Self {
        let buffer = InputBuffer::with_content(&key.value(store), key.is_masked());
        Self { key, buffer }
    }

    pub fn commit(&self, store: &mut SetupStore) {
        self.key.commit(store, self.buffer.content());
    }
}

/// Fields shown on `step` for the current store
pub fn field_keys(step: StepId, store: &SetupStore) -> Vec<FieldKey> {
    match step {
        StepId::BasicConfig => vec![
            FieldKey::Domain,
            FieldKey::Timezone,
            FieldKey::Puid,
            FieldKey::Pgid,
            FieldKey::Password,
        ],
        StepId::ServiceConfig => store
            .selected_services()
            .iter()
            .filter_map(|service| service_fields(service).map(|f| (service, f)))
            .flat_map(|(service, f)| {
                f.fields.iter().map(move |field| FieldKey::ServiceSetting {
                    service: service.clone(),
                    key: field.key,
                })
            })
            .collect(),
        StepId::Advanced => {
            let mut keys: Vec<FieldKey> = match store.storage_mode() {
                StorageMode::Simple => vec![FieldKey::StoragePath(DATA_ROOT_ID)],
                StorageMode::Advanced => visible_categories(store.selected_services())
                    .into_iter()
                    .map(|c| FieldKey::StoragePath(c.id))
                    .collect(),
            };
            keys.extend([
                FieldKey::CloudflareToken,
                FieldKey::PlexClaim,
                FieldKey::WireguardPrivateKey,
                FieldKey::WireguardAddresses,
            ]);
            keys
        }
        StepId::Welcome | StepId::StackSelection | StepId::Review => Vec::new(),
    }
}

pub fn build_fields(step: StepId, store: &SetupStore) -> Vec<FormField> {
    field_keys(step, store)
        .into_iter()
        .map(|key| FormField::load(key, store))
        .collect()
}

/// Rows on the welcome screen
#[derive(Debug, Clone, Copy)]
pub enum WelcomeChoice {
    Mode(WizardMode),
    Template(&'static Template),
}

impl WelcomeChoice {
    pub fn all() -> Vec<WelcomeChoice> {
        [WizardMode::Newbie, WizardMode::Expert]
            .into_iter()
            .map(WelcomeChoice::Mode)
            .chain(TEMPLATES.iter().map(WelcomeChoice::Template))
            .collect()
    }

    pub fn title(&self) -> String {
        match self {
            WelcomeChoice::Mode(WizardMode::Newbie) => "Newbie: a recommended stack".to_string(),
            WelcomeChoice::Mode(WizardMode::Expert) => "Expert: pick every service".to_string(),
            WelcomeChoice::Template(t) => {
                format!("Template: {} ({})", t.name, t.difficulty.label())
            }
        }
    }

    pub fn apply(&self, store: &mut SetupStore) {
        match self {
            WelcomeChoice::Mode(mode) => store.set_mode(*mode),
            WelcomeChoice::Template(template) => template.apply(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePathType;

    #[test]
    fn unchanged_commit_keeps_revision() {
        let mut store = SetupStore::new();
        let revision = store.revision();
        let timezone = store.config().timezone.clone();
        FieldKey::Timezone.commit(&mut store, &timezone);
        assert_eq!(store.revision(), revision);

        FieldKey::Domain.commit(&mut store, " media.lan ");
        assert_eq!(store.config().domain, "media.lan");
        assert!(store.revision() > revision);
    }

    #[test]
    fn secrets_are_masked_and_committed() {
        let mut store = SetupStore::new();
        let field = FormField::load(FieldKey::Password, &store);
        assert!(field.buffer.is_masked());

        FieldKey::Password.commit(&mut store, "correct horse");
        assert_eq!(store.config().password, "correct horse");
        FieldKey::WireguardAddresses.commit(&mut store, "10.2.0.2/32");
        assert_eq!(store.config().wireguard_addresses, "10.2.0.2/32");
    }

    #[test]
    fn storage_fields_follow_storage_mode() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["plex".into()]);
        let simple = field_keys(StepId::Advanced, &store);
        assert_eq!(simple[0], FieldKey::StoragePath(DATA_ROOT_ID));
        assert_eq!(simple.len(), 5);

        store.set_storage_mode(StorageMode::Advanced);
        let advanced = field_keys(StepId::Advanced, &store);
        assert!(advanced.contains(&FieldKey::StoragePath("movies")));
        assert!(!advanced.contains(&FieldKey::StoragePath("books")));
    }

    #[test]
    fn network_storage_path_is_typed() {
        let mut store = SetupStore::new();
        store.set_storage_mode(StorageMode::Advanced);
        FieldKey::StoragePath("movies").commit(&mut store, "//nas/movies");
        let movies = store.storage_plan().get("movies").expect("movies");
        assert_eq!(movies.path, "//nas/movies");
        assert_eq!(movies.path_type, StoragePathType::Network);
    }

    #[test]
    fn service_settings_default_until_committed() {
        let mut store = SetupStore::new();
        store.set_selected_services(vec!["torrent".into(), "sonarr".into()]);
        let keys = field_keys(StepId::ServiceConfig, &store);
        assert_eq!(
            keys,
            vec![FieldKey::ServiceSetting {
                service: "torrent".into(),
                key: "LAN_NETWORK"
            }]
        );
        assert_eq!(keys[0].value(&store), "192.168.1.0/24");

        // Accepting the default still records it for the .env file
        keys[0].commit(&mut store, "192.168.1.0/24");
        assert_eq!(
            store.service_config("torrent").and_then(|c| c.get("LAN_NETWORK")).map(String::as_str),
            Some("192.168.1.0/24")
        );
    }

    #[test]
    fn welcome_lists_modes_then_templates() {
        let choices = WelcomeChoice::all();
        assert_eq!(choices.len(), 2 + TEMPLATES.len());

        let mut store = SetupStore::new();
        choices[0].apply(&mut store);
        assert_eq!(store.mode(), Some(WizardMode::Newbie));
        choices[2].apply(&mut store);
        assert_eq!(store.mode(), Some(WizardMode::Expert));
    }
}

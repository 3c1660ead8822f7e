use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::config::{SetupConfig, WizardMode};
use super::store::SetupStore;
use crate::error::{Result, WizardError};
use crate::redact::redacted;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedConfig {
    pub version: String,
    pub timestamp: String,
    pub mode: Option<WizardMode>,
    pub selected_services: Vec<String>,
    pub config: SetupConfig,
}

/// A parsed import file, ready for [`SetupStore::import_config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedConfig {
    pub config: SetupConfig,
    pub selected_services: Vec<String>,
    pub mode: Option<WizardMode>,
}

impl ImportedConfig {
    /// Parse an exported file. `config` must be an object and
    /// `selectedServices` an array of strings; an unrecognised `mode`
    /// becomes no mode.
    pub fn parse(data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data)?;
        let Value::Object(mut root) = value else {
            return Err(WizardError::Import("expected a JSON object".to_string()));
        };

        let config = match root.remove("config") {
            Some(config @ Value::Object(_)) => serde_json::from_value::<SetupConfig>(config)?,
            _ => return Err(WizardError::Import("missing `config` object".to_string())),
        };

        let selected_services = match root.remove("selectedServices") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(WizardError::Import(format!(
                        "selectedServices entries must be strings, got {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(WizardError::Import(
                    "missing `selectedServices` array".to_string(),
                ))
            }
        };

        let mode = root
            .get("mode")
            .and_then(Value::as_str)
            .and_then(WizardMode::parse);

        Ok(Self {
            config,
            selected_services,
            mode,
        })
    }
}

impl SetupStore {
    /// Pretty JSON of the current choices, secrets included
    pub fn export_config(&self) -> Result<String> {
        let exported = ExportedConfig {
            version: EXPORT_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            mode: self.mode,
            selected_services: self.selected_services.clone(),
            config: self.config.normalized(),
        };
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    /// Replace the session with imported choices: step 0, advanced
    /// storage, the imported plan completed with defaults
    pub fn import_config(&mut self, data: ImportedConfig) {
        info!(
            "Importing configuration with {} services",
            data.selected_services.len()
        );
        debug!("imported config {}", redacted(&data.config));
        self.replace_session(data.config, data.selected_services, data.mode);
    }

    /// Parse and import in one go. On error the store is untouched.
    pub fn import_json(&mut self, data: &str) -> Result<()> {
        let imported = ImportedConfig::parse(data)?;
        self.import_config(imported);
        Ok(())
    }
}

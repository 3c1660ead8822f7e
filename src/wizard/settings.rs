use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::control::DEFAULT_CONTROL_URL;
use crate::error::Result;

const DEFAULT_SETTINGS_PATH: &str = "/etc/mediastack/wizard.toml";

/// Overrides `[control] url`
pub const CONTROL_URL_ENV: &str = "MEDIASTACK_CONTROL_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
    pub general: GeneralSettings,
    pub control: ControlSettings,
    pub output: OutputSettings,
    pub defaults: DefaultsSettings,
}

impl WizardSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_SETTINGS_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: WizardSettings = toml::from_str(&content)?;
            info!("Loaded settings from {:?}", path);
            settings
        } else {
            info!("Settings file not found at {:?}, using defaults", path);
            Self::default()
        };

        Ok(settings.with_control_url(std::env::var(CONTROL_URL_ENV).ok()))
    }

    /// Replace the control url when `url` is set and not blank
    pub fn with_control_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            info!("Control url from environment: {}", url);
            self.control.url = url;
        }
        self
    }

    pub fn is_dryrun(&self) -> bool {
        self.general.dryrun
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub title: String,
    pub subtitle: String,
    /// No control server calls; generated files are still written
    pub dryrun: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            title: "MediaStack Setup".to_string(),
            subtitle: "Plan storage, pick services, generate your stack".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
    /// Ticks between health checks
    pub health_interval_ticks: u32,
}

impl ControlSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_CONTROL_URL.to_string(),
            timeout_secs: 10,
            health_interval_ticks: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where `.env`, compose and proxy files are written
    pub directory: PathBuf,
    pub state_file: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./mediastack"),
            state_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsSettings {
    /// Prefill PUID/PGID from the invoking user on a fresh state
    pub detect_ids: bool,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self { detect_ids: true }
    }
}

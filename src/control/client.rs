use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, WizardError};

pub const DEFAULT_CONTROL_URL: &str = "http://127.0.0.1:3001";

const OFFLINE_BOOTSTRAP_ERROR: &str = "Control server is disabled (dry run); no keys were fetched";

/// Outcome of `POST /api/arr/bootstrap`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComposeServicesResponse {
    #[serde(default)]
    services: Vec<String>,
}

/// HTTP client for the control server. Cheap to clone into tasks.
#[derive(Debug, Clone)]
pub struct ControlClient {
    base_url: String,
    http: Option<Client>,
}

impl ControlClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        info!("Control server at {}", base_url);
        Ok(Self {
            base_url,
            http: Some(http),
        })
    }

    /// A client that never touches the network
    pub fn offline() -> Self {
        info!("Control server disabled, running offline");
        Self {
            base_url: String::new(),
            http: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.http.is_none()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/health`; any 2xx means online
    pub async fn health(&self) -> Result<bool> {
        let Some(http) = &self.http else {
            return Ok(true);
        };
        let response = http.get(self.url("/api/health")).send().await?;
        debug!("health -> {}", response.status());
        Ok(response.status().is_success())
    }

    /// `POST /api/arr/bootstrap`: have the server read *arr API keys out
    /// of the running containers
    pub async fn bootstrap_arr(&self) -> Result<BootstrapResult> {
        let Some(http) = &self.http else {
            return Ok(BootstrapResult {
                success: false,
                keys: BTreeMap::new(),
                error: Some(OFFLINE_BOOTSTRAP_ERROR.to_string()),
            });
        };

        let path = "/api/arr/bootstrap";
        let response = http.post(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", path, status);
            return Err(WizardError::ControlStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let result: BootstrapResult = response.json().await?;
        debug!(
            "bootstrap -> success={} keys={:?}",
            result.success,
            result.keys.keys().collect::<Vec<_>>()
        );
        Ok(result)
    }

    /// `GET /api/compose/services`: containers the server currently knows
    pub async fn compose_services(&self) -> Result<Vec<String>> {
        let Some(http) = &self.http else {
            return Ok(Vec::new());
        };

        let path = "/api/compose/services";
        let response = http.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WizardError::ControlStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        let body: ComposeServicesResponse = response.json().await?;
        Ok(body.services)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Control server request failed: {0}")]
    Control(#[from] reqwest::Error),

    #[error("Control server returned {status} for {path}")]
    ControlStatus { status: u16, path: String },

    #[error("Invalid configuration file: {0}")]
    Import(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;

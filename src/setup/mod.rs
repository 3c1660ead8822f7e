mod config;
mod persist;
mod steps;
mod store;
mod transfer;
pub mod validate;

pub use config::{
    initial_config, ConfigPatch, SavedProfile, ServiceConfigs, SetupConfig, StorageMode,
    WizardMode,
};
pub(crate) use persist::write_atomic;
pub use persist::{scrub_secrets, PersistedState, StateFile};
pub use steps::{StepId, LAST_STEP};
pub use store::{SecretField, SetupStore, NEWBIE_SERVICES};
pub use transfer::{ExportedConfig, ImportedConfig, EXPORT_VERSION};

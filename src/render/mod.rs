mod compose;
mod env;
mod proxy;
mod summary;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::setup::{write_atomic, SetupStore};

pub use compose::{compose_services, containers_for, render_compose, ComposeService};
pub use env::render_env;
pub use proxy::{render_authelia, render_cloudflare};
pub use summary::{review_summary, ReviewSummary, StorageEntry, VPN_WARNING};

pub const ENV_FILE: &str = ".env";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const AUTHELIA_FILE: &str = "authelia-configuration.yml";
pub const CLOUDFLARE_FILE: &str = "cloudflare-config.yml";

/// Render every artifact as (file name, contents)
pub fn render_bundle(store: &SetupStore) -> Result<Vec<(&'static str, String)>> {
    let domain = store.config().domain.as_str();
    let selected = store.selected_services();
    Ok(vec![
        (ENV_FILE, render_env(store)),
        (COMPOSE_FILE, render_compose(selected)?),
        (AUTHELIA_FILE, render_authelia(domain)?),
        (CLOUDFLARE_FILE, render_cloudflare(domain, selected)?),
    ])
}

/// Write every artifact into `dir`, creating it when needed
pub fn write_bundle(dir: &Path, store: &SetupStore) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, contents) in render_bundle(store)? {
        let path = dir.join(name);
        write_atomic(&path, contents.as_bytes())?;
        written.push(path);
    }
    info!("Wrote {} files to {:?}", written.len(), dir);
    Ok(written)
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::categories::STORAGE_CATEGORIES;

pub const DEFAULT_DATA_ROOT: &str = "/srv/mediastack";
pub const DATA_ROOT_ID: &str = "dataRoot";

const NETWORK_PREFIXES: &[&str] = &["\\\\", "//", "smb:", "nfs:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePathType {
    #[default]
    Local,
    Network,
}

impl StoragePathType {
    /// Classify a typed path. Only network shares are recognised; anything
    /// else leaves the existing type alone.
    pub fn detect(path: &str) -> Option<Self> {
        let lower = path.trim().to_lowercase();
        NETWORK_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
            .then_some(StoragePathType::Network)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoragePathType::Local => "local",
            StoragePathType::Network => "network",
        }
    }
}

/// Advisory check used by the planner view; the store accepts any path.
pub fn is_absolute_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.starts_with("\\\\") {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('\\')) if drive.is_ascii_alphabetic()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePathSetting {
    pub path: String,
    #[serde(rename = "type", default)]
    pub path_type: StoragePathType,
}

impl StoragePathSetting {
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_type: StoragePathType::Local,
        }
    }
}

/// Partial update for a single category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoragePathUpdate {
    pub path: Option<String>,
    pub path_type: Option<StoragePathType>,
}

impl StoragePathUpdate {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            path_type: None,
        }
    }

    pub fn path_type(path_type: StoragePathType) -> Self {
        Self {
            path: None,
            path_type: Some(path_type),
        }
    }

    /// Path update that also flags network shares
    pub fn typed_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let path_type = StoragePathType::detect(&path);
        Self {
            path: Some(path),
            path_type,
        }
    }
}

/// Category id -> path setting. Unknown ids are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePlan(BTreeMap<String, StoragePathSetting>);

impl StoragePlan {
    pub fn get(&self, id: &str) -> Option<&StoragePathSetting> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, setting: StoragePathSetting) {
        self.0.insert(id.into(), setting);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoragePathSetting)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The data root path, if the plan carries a non-blank one
    pub fn data_root(&self) -> Option<&str> {
        self.0
            .get(DATA_ROOT_ID)
            .map(|s| s.path.as_str())
            .filter(|p| !p.trim().is_empty())
    }

    pub fn data_root_or_default(&self) -> &str {
        self.data_root().unwrap_or(DEFAULT_DATA_ROOT)
    }

    /// Path for `id`, falling back to the category default under this
    /// plan's root
    pub fn resolve(&self, id: &str) -> String {
        if let Some(setting) = self.0.get(id).filter(|s| !s.path.is_empty()) {
            return setting.path.clone();
        }
        super::categories::category(id)
            .map(|c| c.default_path(self.data_root_or_default()))
            .unwrap_or_default()
    }

    /// Move every entry still sitting at its `old_root` default to the
    /// matching `new_root` default. Customised entries keep their path.
    pub fn reroot(&self, old_root: &str, new_root: &str) -> StoragePlan {
        let old_defaults = create_default_storage_plan(old_root);
        let new_defaults = create_default_storage_plan(new_root);

        let entries = self
            .0
            .iter()
            .map(|(id, setting)| {
                let at_old_default = old_defaults
                    .get(id)
                    .is_some_and(|d| d.path == setting.path);
                let path = match new_defaults.get(id) {
                    Some(d) if at_old_default => d.path.clone(),
                    _ => setting.path.clone(),
                };
                (
                    id.clone(),
                    StoragePathSetting {
                        path,
                        path_type: setting.path_type,
                    },
                )
            })
            .collect();
        StoragePlan(entries)
    }
}

impl FromIterator<(String, StoragePathSetting)> for StoragePlan {
    fn from_iter<I: IntoIterator<Item = (String, StoragePathSetting)>>(iter: I) -> Self {
        StoragePlan(iter.into_iter().collect())
    }
}

pub fn create_default_storage_plan(root: &str) -> StoragePlan {
    STORAGE_CATEGORIES
        .iter()
        .map(|c| (c.id.to_string(), StoragePathSetting::local(c.default_path(root))))
        .collect()
}

/// Fill in every category default under the effective root, then lay the
/// existing entries over them.
///
/// The root is the first non-blank of `root_override`, the existing plan's
/// data root, and [`DEFAULT_DATA_ROOT`].
pub fn merge_plan(existing: Option<&StoragePlan>, root_override: Option<&str>) -> StoragePlan {
    let root = root_override
        .filter(|r| !r.trim().is_empty())
        .or_else(|| existing.and_then(StoragePlan::data_root))
        .unwrap_or(DEFAULT_DATA_ROOT);

    let mut merged = create_default_storage_plan(root);
    if let Some(plan) = existing {
        for (id, setting) in plan.iter() {
            merged.insert(id.clone(), setting.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::category;
    use proptest::prelude::*;

    fn root_strategy() -> impl Strategy<Value = String> {
        "/[a-z]{1,8}(/[a-z0-9]{1,8}){0,2}"
    }

    #[test]
    fn default_plan_covers_every_category() {
        let plan = create_default_storage_plan(DEFAULT_DATA_ROOT);
        assert_eq!(plan.len(), STORAGE_CATEGORIES.len());
        assert_eq!(plan.get("movies").unwrap().path, "/srv/mediastack/media/movies");
        assert!(plan.iter().all(|(_, s)| s.path_type == StoragePathType::Local));
    }

    #[test]
    fn merge_without_plan_uses_default_root() {
        let plan = merge_plan(None, None);
        assert_eq!(plan, create_default_storage_plan(DEFAULT_DATA_ROOT));
    }

    #[test]
    fn merge_fills_gaps_from_partial_plan_root() {
        let partial: StoragePlan = [
            (DATA_ROOT_ID.to_string(), StoragePathSetting::local("/mnt/nas")),
            ("tv".to_string(), StoragePathSetting::local("/custom/tv")),
        ]
        .into_iter()
        .collect();

        let merged = merge_plan(Some(&partial), None);
        assert_eq!(merged.get("tv").unwrap().path, "/custom/tv");
        assert_eq!(merged.get("movies").unwrap().path, "/mnt/nas/media/movies");
        assert_eq!(merged.len(), STORAGE_CATEGORIES.len());
    }

    #[test]
    fn merge_keeps_unknown_entries() {
        let partial: StoragePlan = [("scratch".to_string(), StoragePathSetting::local("/tmp/x"))]
            .into_iter()
            .collect();
        let merged = merge_plan(Some(&partial), None);
        assert_eq!(merged.get("scratch").unwrap().path, "/tmp/x");
        assert_eq!(merged.len(), STORAGE_CATEGORIES.len() + 1);
    }

    #[test]
    fn blank_root_override_falls_through() {
        let merged = merge_plan(None, Some("   "));
        assert_eq!(merged.data_root(), Some(DEFAULT_DATA_ROOT));
    }

    #[test]
    fn reroot_moves_defaults_and_keeps_customised_paths() {
        let mut plan = create_default_storage_plan("/srv/mediastack");
        plan.insert("tv", StoragePathSetting::local("/custom/films"));

        let moved = plan.reroot("/srv/mediastack", "/mnt/nas");
        assert_eq!(moved.get("movies").unwrap().path, "/mnt/nas/media/movies");
        assert_eq!(moved.get("tv").unwrap().path, "/custom/films");
        assert_eq!(moved.get(DATA_ROOT_ID).unwrap().path, "/mnt/nas");
    }

    #[test]
    fn detects_network_shares() {
        assert_eq!(StoragePathType::detect("\\\\NAS\\Media"), Some(StoragePathType::Network));
        assert_eq!(StoragePathType::detect("//nas/media"), Some(StoragePathType::Network));
        assert_eq!(StoragePathType::detect("SMB://nas/share"), Some(StoragePathType::Network));
        assert_eq!(StoragePathType::detect("nfs:/export"), Some(StoragePathType::Network));
        assert_eq!(StoragePathType::detect("/mnt/media"), None);
    }

    #[test]
    fn absolute_path_forms() {
        assert!(is_absolute_path(""));
        assert!(is_absolute_path("/mnt/media"));
        assert!(is_absolute_path("\\\\NAS\\Media"));
        assert!(is_absolute_path("//nas/media"));
        assert!(is_absolute_path("D:\\Media"));
        assert!(!is_absolute_path("media/movies"));
        assert!(!is_absolute_path("smb://nas"));
        assert!(!is_absolute_path("1:\\x"));
    }

    #[test]
    fn resolve_falls_back_to_category_default() {
        let plan: StoragePlan = [(DATA_ROOT_ID.to_string(), StoragePathSetting::local("/data"))]
            .into_iter()
            .collect();
        assert_eq!(plan.resolve("downloads"), "/data/downloads");
        assert_eq!(plan.resolve("dataRoot"), "/data");
        assert_eq!(plan.resolve("nope"), "");
    }

    #[test]
    fn setting_serializes_with_type_key() {
        let json = serde_json::to_value(StoragePathSetting::local("/x")).unwrap();
        assert_eq!(json, serde_json::json!({"path": "/x", "type": "local"}));
    }

    proptest! {
        #[test]
        fn default_plan_matches_category_defaults(root in root_strategy()) {
            let plan = create_default_storage_plan(&root);
            for c in STORAGE_CATEGORIES {
                prop_assert_eq!(&plan.get(c.id).unwrap().path, &c.default_path(&root));
            }
        }

        #[test]
        fn merge_is_idempotent(
            root in root_strategy(),
            custom in proptest::option::of("/[a-z]{1,10}"),
        ) {
            let mut plan = create_default_storage_plan(&root);
            if let Some(path) = custom {
                plan.insert("music", StoragePathSetting::local(path));
            }
            let once = merge_plan(Some(&plan), None);
            let twice = merge_plan(Some(&once), None);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn reroot_follows_defaults(old in root_strategy(), new in root_strategy()) {
            let plan = create_default_storage_plan(&old);
            let moved = plan.reroot(&old, &new);
            for c in STORAGE_CATEGORIES {
                prop_assert_eq!(&moved.get(c.id).unwrap().path, &category(c.id).unwrap().default_path(&new));
            }
        }
    }
}

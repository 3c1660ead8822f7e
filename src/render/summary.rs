use crate::setup::SetupStore;
use crate::storage::{visible_categories, StoragePathType};

pub const VPN_WARNING: &str = "A torrent client is selected without the VPN service. \
Enable Gluetun VPN so download traffic does not leave through your own IP.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub path: String,
    pub path_type: StoragePathType,
}

/// What the Review step shows before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub storage: Vec<StorageEntry>,
    pub vpn_warning: Option<&'static str>,
}

pub fn review_summary(store: &SetupStore) -> ReviewSummary {
    let plan = store.storage_plan();
    let storage = visible_categories(store.selected_services())
        .into_iter()
        .map(|category| StorageEntry {
            id: category.id,
            label: category.label,
            path: plan.resolve(category.id),
            path_type: plan
                .get(category.id)
                .map(|s| s.path_type)
                .unwrap_or_default(),
        })
        .collect();

    let vpn_warning =
        (store.is_selected("torrent") && !store.is_selected("vpn")).then_some(VPN_WARNING);

    ReviewSummary {
        storage,
        vpn_warning,
    }
}

mod categories;
mod plan;

pub use categories::{category, visible_categories, StorageCategory, STORAGE_CATEGORIES};
pub use plan::{
    create_default_storage_plan, is_absolute_path, merge_plan, StoragePathSetting,
    StoragePathType, StoragePathUpdate, StoragePlan, DATA_ROOT_ID, DEFAULT_DATA_ROOT,
};

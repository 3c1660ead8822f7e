mod ids;

pub use ids::{current_ids, HostIds};

pub mod grouping;
pub mod model;
pub mod store;

pub use grouping::{group_mods_by_category, GroupedMods};
pub use model::Mod;
pub use store::ModStore;

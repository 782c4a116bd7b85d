pub mod core;

pub use crate::core::error::{ModError, ModResult};
pub use crate::core::exclusivity::{plan_exclusive, ModToggler, ToggleBatchOutcome, ToggleOp};
pub use crate::core::mods::{group_mods_by_category, GroupedMods, Mod, ModStore};
pub use crate::core::preset::{Preset, PresetRegistry};
pub use crate::core::taxonomy::{build_hero_list, leaf_heroes, CategoryNode, Hero};
pub use crate::core::variant::{
    decode_catalog, decode_variant, encode_selection, find_variant, CompoundSelection,
    CompoundVariant, DuplicatePolicy,
};

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for embedders that don't bring their own
/// subscriber. Honors `RUST_LOG`, defaults to `info` with crate-level debug.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,citadel_mods=debug")),
        )
        .init();
}

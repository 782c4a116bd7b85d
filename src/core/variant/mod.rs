pub mod codec;
pub mod slots;

pub use codec::{
    decode_catalog, decode_variant, encode_selection, find_variant, CompoundSelection,
    CompoundVariant, DuplicatePolicy,
};
pub use slots::{BeltSash, Dress, Futa, Garter, Gloves, Skirt, Stockings, Top};

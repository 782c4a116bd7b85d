pub mod builder;

pub use builder::{build_hero_list, leaf_heroes, CategoryNode, Hero};

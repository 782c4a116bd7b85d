pub mod archive;
pub mod error;
pub mod exclusivity;
pub mod game;
pub mod http;
pub mod metadata;
pub mod mods;
pub mod preset;
pub mod settings;
pub mod taxonomy;
pub mod variant;
pub mod vendor;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Default priority slot for VPKs whose file name carries no `pak##` prefix.
pub const DEFAULT_PRIORITY: u32 = 50;

/// An installed cosmetic mod. The filesystem store owns the authoritative
/// state; everything else holds a read/derived view refreshed by re-scanning
/// after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mod {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub path: String,
    pub enabled: bool,
    pub priority: u32,
    pub size: u64,
    pub installed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_banana_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_section: Option<String>,
}

/// Stable mod id derived from the file path.
pub fn mod_id_for_path(path: &Path) -> String {
    let mut hasher = Sha1::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Extract the priority number from a `pak##_dir.vpk` / `pak##_name.vpk`
/// file name. Returns `None` for names outside that convention.
pub fn parse_pak_number(file_name: &str) -> Option<u32> {
    let rest = file_name.strip_prefix("pak")?;
    // `get` rather than a byte slice: file names are arbitrary and may put a
    // multibyte character right after the prefix.
    let digits = rest.get(..2)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Derive a human-readable display name from a VPK file name.
/// `pak05_neon_abrams_dir.vpk` becomes `Neon Abrams`.
pub fn display_name(file_name: &str) -> String {
    let stem = file_name
        .trim_end_matches("_dir.vpk")
        .trim_end_matches(".vpk");

    let stem = match parse_pak_number(stem) {
        Some(_) if stem.len() > 5 => stem[5..].trim_start_matches('_'),
        _ => stem,
    };

    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

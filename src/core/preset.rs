// ─── Preset Index ───
// Named, pre-packaged attribute combinations derived from the mod files
// already on disk. Recomputed fully on every call; the mod list is the only
// input and it is small.

use serde::Serialize;

use crate::core::mods::model::display_name;
use crate::core::mods::Mod;
use crate::core::variant::codec::VARIANT_PREFIXES;
use crate::core::variant::decode_variant;

/// Companion texture VPK that every Midnight Mina preset expects.
const MINA_TEXTURES_FILE: &str = "textures-pak21_dir.vpk";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// The on-disk file the preset maps to (first file of its signature).
    pub file_name: String,
    pub label: String,
    /// True iff every file in the signature is installed and enabled.
    pub enabled: bool,
}

#[derive(Debug, Clone)]
struct PresetSignature {
    label: String,
    files: Vec<String>,
}

/// Static registry mapping installed-file signatures to preset labels,
/// extended at runtime by files discovered under the known preset prefixes.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    signatures: Vec<PresetSignature>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the signatures this manager knows about.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            "Midnight Mina — Textures",
            vec![MINA_TEXTURES_FILE.to_string()],
        );
        registry
    }

    pub fn register(&mut self, label: impl Into<String>, files: Vec<String>) {
        self.signatures.push(PresetSignature {
            label: label.into(),
            files,
        });
    }

    /// Build the preset list for the current mod snapshot.
    ///
    /// Registered signatures are reported when at least one of their files
    /// is installed; `enabled` is an all-or-nothing match against enabled
    /// mods, never partial credit. Installed files under a recognized preset
    /// prefix that no signature covers are surfaced as single-file presets
    /// with a label derived from their decoded variant.
    pub fn build_presets(&self, mods: &[Mod]) -> Vec<Preset> {
        let mut presets = Vec::new();

        for signature in &self.signatures {
            let any_installed = signature
                .files
                .iter()
                .any(|file| mods.iter().any(|m| file_eq(&m.file_name, file)));
            if !any_installed {
                continue;
            }
            let all_enabled = signature
                .files
                .iter()
                .all(|file| mods.iter().any(|m| m.enabled && file_eq(&m.file_name, file)));
            presets.push(Preset {
                file_name: signature.files[0].clone(),
                label: signature.label.clone(),
                enabled: all_enabled,
            });
        }

        for mod_item in mods {
            if !is_preset_file(&mod_item.file_name) {
                continue;
            }
            let covered = self
                .signatures
                .iter()
                .any(|s| s.files.iter().any(|f| file_eq(f, &mod_item.file_name)));
            if covered {
                continue;
            }
            let label = match decode_variant(&mod_item.file_name) {
                Some(variant) => format!("Midnight Mina — {}", variant.label),
                None => display_name(&mod_item.file_name),
            };
            presets.push(Preset {
                file_name: mod_item.file_name.clone(),
                label,
                enabled: mod_item.enabled,
            });
        }

        presets
    }

    /// The preset currently in effect, if any.
    pub fn active_preset(&self, mods: &[Mod]) -> Option<Preset> {
        self.build_presets(mods).into_iter().find(|p| p.enabled)
    }
}

fn file_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Does this file name mark a packaged preset?
pub fn is_preset_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".vpk")
        && VARIANT_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

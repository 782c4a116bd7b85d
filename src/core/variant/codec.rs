// ─── Variant Codec ───
// A compound-cosmetic archive stores one file per combination of attribute
// values, and the file name is the only carrier of which combination it is.
// This module is the grammar for those names.
//
// Shape: `<prefix>[_<token>...][_dir.vpk|.vpk]` where the prefix is one of
// the recognized preset markers, a valued slot is its name token followed by
// a value token (`top red`, `skirt short`), and a flag slot is its name
// token alone (`gloves`, `futa`). Tokens are case-insensitive and carry no
// positional meaning.

use serde::{Deserialize, Serialize};

use super::slots::{BeltSash, Dress, Futa, Garter, Gloves, Skirt, Stockings, Top};

/// Name prefixes that mark an entry as a compound-cosmetic variant.
/// Longest first so `sts_midnight_mina_...` never half-matches as `mina`.
pub(crate) const VARIANT_PREFIXES: [&str; 3] = ["sts_midnight_mina", "clothing_preset", "mina"];

/// One packaged combination, decoded from a raw archive entry name.
/// Never mutated; discarded when the archive listing is refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundVariant {
    pub top: Top,
    pub skirt: Skirt,
    pub stockings: Stockings,
    pub belt_sash: BeltSash,
    pub gloves: Gloves,
    pub garter: Garter,
    pub dress: Dress,
    pub futa: Futa,
    /// The raw name this was decoded from.
    pub archive_entry: String,
    /// Derived display name, independent of the raw token order.
    pub label: String,
}

/// The user's current pick, one value per slot. Pure caller-owned state;
/// the engine never persists it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompoundSelection {
    pub top: Top,
    pub skirt: Skirt,
    pub stockings: Stockings,
    pub belt_sash: BeltSash,
    pub gloves: Gloves,
    pub garter: Garter,
    pub dress: Dress,
    pub futa: Futa,
}

type SlotKey = (Top, Skirt, Stockings, BeltSash, Gloves, Garter, Dress, Futa);

impl CompoundVariant {
    fn slot_key(&self) -> SlotKey {
        (
            self.top,
            self.skirt,
            self.stockings,
            self.belt_sash,
            self.gloves,
            self.garter,
            self.dress,
            self.futa,
        )
    }

    /// Exact match on every slot; a defaulted slot counts as a value like
    /// any other.
    pub fn matches(&self, selection: &CompoundSelection) -> bool {
        self.slot_key() == selection.slot_key()
    }
}

impl CompoundSelection {
    fn slot_key(&self) -> SlotKey {
        (
            self.top,
            self.skirt,
            self.stockings,
            self.belt_sash,
            self.gloves,
            self.garter,
            self.dress,
            self.futa,
        )
    }
}

/// What to do when two raw entries decode to the same combination
/// (duplicate packaging under different file names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep every physical entry; matching still prefers the first.
    KeepAll,
    /// Collapse identical combinations, keeping the first-seen entry.
    MergeFirst,
}

/// Decode a raw archive entry name. `None` means "not a variant" — archives
/// routinely contain previews and readmes, and the caller just skips those.
pub fn decode_variant(raw_entry_name: &str) -> Option<CompoundVariant> {
    let file_name = raw_entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw_entry_name);
    let lower = file_name.to_lowercase();

    let stem = if let Some(stripped) = lower.strip_suffix("_dir.vpk") {
        stripped
    } else if let Some(stripped) = lower.strip_suffix(".vpk") {
        stripped
    } else {
        lower.as_str()
    };
    // Anything still carrying an extension is a non-variant file.
    if stem.contains('.') {
        return None;
    }

    let rest = VARIANT_PREFIXES.iter().find_map(|prefix| {
        stem.strip_prefix(prefix)
            .filter(|r| r.is_empty() || r.starts_with('_'))
    })?;

    let tokens: Vec<&str> = rest.split('_').filter(|t| !t.is_empty()).collect();
    let mut selection = CompoundSelection::default();
    let mut seen = [false; 8];
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "top" => {
                let value = Top::from_token(*tokens.get(i + 1)?)?;
                assign(&mut seen, 0)?;
                selection.top = value;
                i += 2;
            }
            "skirt" => {
                let value = Skirt::from_token(*tokens.get(i + 1)?)?;
                assign(&mut seen, 1)?;
                selection.skirt = value;
                i += 2;
            }
            "stockings" => {
                let value = Stockings::from_token(*tokens.get(i + 1)?)?;
                assign(&mut seen, 2)?;
                selection.stockings = value;
                i += 2;
            }
            "belt" if tokens.get(i + 1) == Some(&"sash") => {
                assign(&mut seen, 3)?;
                selection.belt_sash = BeltSash::Yes;
                i += 2;
            }
            "gloves" => {
                assign(&mut seen, 4)?;
                selection.gloves = Gloves::Yes;
                i += 1;
            }
            "garter" => {
                assign(&mut seen, 5)?;
                selection.garter = Garter::Yes;
                i += 1;
            }
            "dress" => {
                assign(&mut seen, 6)?;
                selection.dress = Dress::Yes;
                i += 1;
            }
            "futa" => {
                assign(&mut seen, 7)?;
                selection.futa = Futa::Yes;
                i += 1;
            }
            // Unrecognized token: malformed, skip the whole name.
            _ => return None,
        }
    }

    Some(CompoundVariant {
        top: selection.top,
        skirt: selection.skirt,
        stockings: selection.stockings,
        belt_sash: selection.belt_sash,
        gloves: selection.gloves,
        garter: selection.garter,
        dress: selection.dress,
        futa: selection.futa,
        archive_entry: raw_entry_name.to_string(),
        label: selection_label(&selection),
    })
}

fn assign(seen: &mut [bool; 8], slot: usize) -> Option<()> {
    if seen[slot] {
        // Same slot twice in one name is malformed.
        return None;
    }
    seen[slot] = true;
    Some(())
}

/// Canonical name for a selection, tokens in slot-declaration order.
/// Round-trips through `decode_variant`.
pub fn encode_selection(selection: &CompoundSelection) -> String {
    let mut name = String::from("mina");
    if let Some(token) = selection.top.token() {
        name.push_str("_top_");
        name.push_str(token);
    }
    if let Some(token) = selection.skirt.token() {
        name.push_str("_skirt_");
        name.push_str(token);
    }
    if let Some(token) = selection.stockings.token() {
        name.push_str("_stockings_");
        name.push_str(token);
    }
    if selection.belt_sash == BeltSash::Yes {
        name.push_str("_belt_sash");
    }
    if selection.gloves == Gloves::Yes {
        name.push_str("_gloves");
    }
    if selection.garter == Garter::Yes {
        name.push_str("_garter");
    }
    if selection.dress == Dress::Yes {
        name.push_str("_dress");
    }
    if selection.futa == Futa::Yes {
        name.push_str("_futa");
    }
    name
}

/// Human-readable label in slot-declaration order. Two differently-ordered
/// raw names that decode to the same combination get identical labels.
pub fn selection_label(selection: &CompoundSelection) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(fragment) = selection.top.label_fragment() {
        parts.push(fragment);
    }
    if let Some(fragment) = selection.skirt.label_fragment() {
        parts.push(fragment);
    }
    if let Some(fragment) = selection.stockings.label_fragment() {
        parts.push(fragment);
    }
    if selection.belt_sash == BeltSash::Yes {
        parts.push("Belt Sash".to_string());
    }
    if selection.gloves == Gloves::Yes {
        parts.push("Gloves".to_string());
    }
    if selection.garter == Garter::Yes {
        parts.push("Garter".to_string());
    }
    if selection.dress == Dress::Yes {
        parts.push("Dress".to_string());
    }
    if selection.futa == Futa::Yes {
        parts.push("Futa".to_string());
    }
    if parts.is_empty() {
        "Default".to_string()
    } else {
        parts.join(", ")
    }
}

/// First variant whose slots equal the selection on every slot, or `None`
/// when no such combination was packaged (a normal outcome, not an error).
pub fn find_variant<'a>(
    variants: &'a [CompoundVariant],
    selection: &CompoundSelection,
) -> Option<&'a CompoundVariant> {
    variants.iter().find(|v| v.matches(selection))
}

/// Decode a whole archive listing, silently skipping non-variant entries.
pub fn decode_catalog(entries: &[String], policy: DuplicatePolicy) -> Vec<CompoundVariant> {
    let mut variants: Vec<CompoundVariant> = Vec::new();
    for entry in entries {
        let Some(variant) = decode_variant(entry) else {
            continue;
        };
        if policy == DuplicatePolicy::MergeFirst
            && variants.iter().any(|v| v.slot_key() == variant.slot_key())
        {
            continue;
        }
        variants.push(variant);
    }
    variants
}

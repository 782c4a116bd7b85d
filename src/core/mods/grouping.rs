// ─── Mod Grouping Index ───
// Partitions the flat installed-mod list into per-hero buckets against the
// current taxonomy snapshot.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::model::Mod;
use crate::core::taxonomy::Hero;

/// Per-hero mod buckets plus everything that couldn't be attributed.
///
/// A mod lands in `uncategorized` when it has no category id or its id is
/// missing from the hero snapshot (stale taxonomy vs. mod cache). That is a
/// recoverable condition, never an error.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedMods {
    pub by_hero: HashMap<u64, Vec<Mod>>,
    pub uncategorized: Vec<Mod>,
}

impl GroupedMods {
    /// Mods attributed to one hero, in discovery order. Empty slice for
    /// heroes with no installed mods.
    pub fn bucket(&self, hero_id: u64) -> &[Mod] {
        self.by_hero.get(&hero_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_hero.values().map(Vec::len).sum::<usize>() + self.uncategorized.len()
    }
}

/// Single pass over the mod list; relative input order is preserved within
/// each bucket because display order reflects install order.
pub fn group_mods_by_category(mods: &[Mod], heroes: &[Hero]) -> GroupedMods {
    let known: HashSet<u64> = heroes.iter().map(|h| h.id).collect();
    let mut grouped = GroupedMods::default();

    for mod_item in mods {
        match mod_item.category_id {
            Some(id) if known.contains(&id) => {
                grouped.by_hero.entry(id).or_default().push(mod_item.clone());
            }
            Some(id) => {
                debug!(
                    mod_id = %mod_item.id,
                    category_id = id,
                    "category id not in taxonomy snapshot, routing to uncategorized"
                );
                grouped.uncategorized.push(mod_item.clone());
            }
            None => grouped.uncategorized.push(mod_item.clone()),
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hero(id: u64) -> Hero {
        Hero {
            id,
            name: format!("hero-{id}"),
            icon_url: None,
        }
    }

    fn mod_with_category(id: &str, category_id: Option<u64>) -> Mod {
        Mod {
            id: id.to_string(),
            name: id.to_string(),
            file_name: format!("{id}.vpk"),
            path: format!("/addons/{id}.vpk"),
            enabled: false,
            priority: 50,
            size: 0,
            installed_at: Utc::now(),
            description: None,
            thumbnail_url: None,
            game_banana_id: None,
            category_id,
            source_section: None,
        }
    }

    #[test]
    fn partition_is_exact() {
        let heroes = vec![hero(1), hero(2)];
        let mods = vec![
            mod_with_category("a", Some(1)),
            mod_with_category("b", Some(2)),
            mod_with_category("c", None),
            mod_with_category("d", Some(9)), // stale category
            mod_with_category("e", Some(1)),
        ];
        let grouped = group_mods_by_category(&mods, &heroes);

        assert_eq!(grouped.total(), mods.len());
        assert_eq!(
            grouped.bucket(1).iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "e"]
        );
        assert_eq!(grouped.bucket(2).len(), 1);
        assert_eq!(
            grouped.uncategorized.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["c", "d"]
        );
    }

    #[test]
    fn empty_bucket_for_hero_without_mods() {
        let grouped = group_mods_by_category(&[], &[hero(1)]);
        assert!(grouped.bucket(1).is_empty());
        assert_eq!(grouped.total(), 0);
    }
}

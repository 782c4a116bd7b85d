// ─── Metadata sidecar ───
// VPK files carry no structured metadata of their own, so vendor ids,
// category ids and display names live in a JSON map keyed by file name and
// get layered over scan results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{ModError, ModResult};
use crate::core::mods::Mod;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_banana_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

pub type ModMetadataMap = HashMap<String, ModMetadata>;

/// Reads and writes `mod_metadata.json` under the app's config directory.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("mod_metadata.json"),
        }
    }

    pub async fn load(&self) -> ModResult<ModMetadataMap> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ModError::io(&self.path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn save(&self, map: &ModMetadataMap) -> ModResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ModError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ModError::io(&self.path, e))?;
        Ok(())
    }

    /// Record the same metadata for every given file.
    pub async fn upsert_for_files(
        &self,
        files: &[PathBuf],
        metadata: &ModMetadata,
    ) -> ModResult<()> {
        let mut map = self.load().await?;
        for path in files {
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                map.insert(file_name.to_string(), metadata.clone());
            }
        }
        self.save(&map).await
    }

    pub async fn remove(&self, file_name: &str) -> ModResult<()> {
        let mut map = self.load().await?;
        if map.remove(file_name).is_some() {
            self.save(&map).await?;
        }
        Ok(())
    }

    /// Follow a file rename (priority change) without losing its metadata.
    pub async fn rename_key(&self, from: &str, to: &str) -> ModResult<()> {
        let mut map = self.load().await?;
        if let Some(entry) = map.remove(from) {
            map.insert(to.to_string(), entry);
            self.save(&map).await?;
        }
        Ok(())
    }
}

/// Layer sidecar metadata over scanned mods so grouping sees category ids.
pub fn apply_metadata(mods: &mut [Mod], map: &ModMetadataMap) {
    for mod_item in mods {
        if let Some(meta) = map.get(&mod_item.file_name) {
            mod_item.name = meta.name.clone();
            mod_item.game_banana_id = meta.game_banana_id;
            mod_item.category_id = meta.category_id;
            mod_item.source_section = meta.source_section.clone();
            mod_item.description = meta.description.clone();
            mod_item.thumbnail_url = meta.thumbnail_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn meta(name: &str, category_id: Option<u64>) -> ModMetadata {
        ModMetadata {
            name: name.to_string(),
            game_banana_id: Some(1),
            category_id,
            source_section: Some("Mod".to_string()),
            description: None,
            thumbnail_url: None,
        }
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(tmp.path());
        assert!(store.load().await.unwrap().is_empty());

        store
            .upsert_for_files(&[PathBuf::from("/addons/pak01_dir.vpk")], &meta("Skin", Some(7)))
            .await
            .unwrap();
        let map = store.load().await.unwrap();
        assert_eq!(map["pak01_dir.vpk"].category_id, Some(7));

        store.rename_key("pak01_dir.vpk", "pak09_dir.vpk").await.unwrap();
        let map = store.load().await.unwrap();
        assert!(map.contains_key("pak09_dir.vpk"));
        assert!(!map.contains_key("pak01_dir.vpk"));

        store.remove("pak09_dir.vpk").await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[test]
    fn apply_overlays_scan_results() {
        let mut mods = vec![Mod {
            id: "a".into(),
            name: "Pak01".into(),
            file_name: "pak01_dir.vpk".into(),
            path: "/addons/pak01_dir.vpk".into(),
            enabled: true,
            priority: 1,
            size: 0,
            installed_at: Utc::now(),
            description: None,
            thumbnail_url: None,
            game_banana_id: None,
            category_id: None,
            source_section: None,
        }];
        let mut map = ModMetadataMap::new();
        map.insert("pak01_dir.vpk".to_string(), meta("Neon Abrams", Some(12)));

        apply_metadata(&mut mods, &map);
        assert_eq!(mods[0].name, "Neon Abrams");
        assert_eq!(mods[0].category_id, Some(12));
    }
}

// ─── Filesystem mod store ───
// Scans and toggles VPKs across the game's `addons/` and `addons/.disabled/`
// directories. Enable/disable is a rename between the two, so each toggle is
// atomic per mod.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::model::{display_name, mod_id_for_path, parse_pak_number, Mod, DEFAULT_PRIORITY};
use crate::core::error::{ModError, ModResult};
use crate::core::exclusivity::ModToggler;
use crate::core::game;

pub struct ModStore {
    addons_dir: PathBuf,
    disabled_dir: PathBuf,
}

impl ModStore {
    /// Open the store for a validated game install, creating the addons
    /// directories if needed.
    pub fn open(game_path: &Path) -> ModResult<Self> {
        Ok(Self {
            addons_dir: game::addons_path(game_path)?,
            disabled_dir: game::disabled_path(game_path)?,
        })
    }

    /// Store over explicit directories; used by embedders with non-standard
    /// layouts and by tests.
    pub fn with_dirs(addons_dir: PathBuf, disabled_dir: PathBuf) -> Self {
        Self {
            addons_dir,
            disabled_dir,
        }
    }

    pub fn addons_dir(&self) -> &Path {
        &self.addons_dir
    }

    pub fn disabled_dir(&self) -> &Path {
        &self.disabled_dir
    }

    /// Scan both directories and return all installed mods sorted by
    /// priority.
    pub async fn scan(&self) -> ModResult<Vec<Mod>> {
        let mut mods = self.scan_folder(&self.addons_dir, true).await?;
        mods.extend(self.scan_folder(&self.disabled_dir, false).await?);
        mods.sort_by_key(|m| m.priority);
        debug!(count = mods.len(), "scanned installed mods");
        Ok(mods)
    }

    async fn scan_folder(&self, folder: &Path, enabled: bool) -> ModResult<Vec<Mod>> {
        let mut mods = Vec::new();
        if !folder.exists() {
            return Ok(mods);
        }

        let mut entries = tokio::fs::read_dir(folder)
            .await
            .map_err(|e| ModError::io(folder, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ModError::io(folder, e))?
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(String::from)
            else {
                continue;
            };
            if !file_name.ends_with(".vpk") {
                continue;
            }

            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| ModError::io(&path, e))?;
            let installed_at: DateTime<Utc> = metadata
                .modified()
                .map(Into::into)
                .unwrap_or_else(|_| Utc::now());

            mods.push(Mod {
                id: mod_id_for_path(&path),
                name: display_name(&file_name),
                path: path.to_string_lossy().to_string(),
                enabled,
                priority: parse_pak_number(&file_name).unwrap_or(DEFAULT_PRIORITY),
                size: metadata.len(),
                installed_at,
                file_name,
                description: None,
                thumbnail_url: None,
                game_banana_id: None,
                category_id: None,
                source_section: None,
            });
        }

        Ok(mods)
    }

    async fn find_mod(&self, mod_id: &str) -> ModResult<Mod> {
        self.scan()
            .await?
            .into_iter()
            .find(|m| m.id == mod_id)
            .ok_or_else(|| ModError::ModNotFound(mod_id.to_string()))
    }

    /// Move a mod into `addons/`. Idempotent: enabling an enabled mod is a
    /// no-op.
    pub async fn enable(&self, mod_id: &str) -> ModResult<Mod> {
        let target = self.find_mod(mod_id).await?;
        if target.enabled {
            return Ok(target);
        }
        self.move_mod(target, self.addons_dir.clone(), true).await
    }

    /// Move a mod into `addons/.disabled/`. Idempotent.
    pub async fn disable(&self, mod_id: &str) -> ModResult<Mod> {
        let target = self.find_mod(mod_id).await?;
        if !target.enabled {
            return Ok(target);
        }
        self.move_mod(target, self.disabled_dir.clone(), false)
            .await
    }

    async fn move_mod(&self, mut target: Mod, dest_dir: PathBuf, enabled: bool) -> ModResult<Mod> {
        let source = PathBuf::from(&target.path);
        let dest = dest_dir.join(&target.file_name);
        tokio::fs::rename(&source, &dest)
            .await
            .map_err(|e| ModError::io(&source, e))?;
        info!(mod_id = %target.id, enabled, "toggled mod");
        target.enabled = enabled;
        target.path = dest.to_string_lossy().to_string();
        Ok(target)
    }

    /// Remove a mod and its sibling chunk VPKs (`pak##_000.vpk`, ...).
    pub async fn delete(&self, mod_id: &str) -> ModResult<()> {
        let target = self.find_mod(mod_id).await?;
        let target_path = PathBuf::from(&target.path);
        tokio::fs::remove_file(&target_path)
            .await
            .map_err(|e| ModError::io(&target_path, e))?;

        let base_name = target.file_name.trim_end_matches("_dir.vpk").to_string();
        let parent = target_path
            .parent()
            .ok_or_else(|| ModError::ModNotFound(mod_id.to_string()))?
            .to_path_buf();

        let mut entries = tokio::fs::read_dir(&parent)
            .await
            .map_err(|e| ModError::io(&parent, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ModError::io(&parent, e))?
        {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&base_name) && name.ends_with(".vpk") {
                tokio::fs::remove_file(entry.path())
                    .await
                    .map_err(|e| ModError::io(entry.path(), e))?;
            }
        }

        info!(mod_id, "deleted mod");
        Ok(())
    }

    /// Renumber a mod into a different `pak##` slot.
    pub async fn set_priority(&self, mod_id: &str, new_priority: u32) -> ModResult<Mod> {
        let new_priority = new_priority.min(99);
        let mods = self.scan().await?;
        let mut target = mods
            .iter()
            .find(|m| m.id == mod_id)
            .cloned()
            .ok_or_else(|| ModError::ModNotFound(mod_id.to_string()))?;

        // A slot is occupied by any file carrying that pak number, not just
        // the canonical `pak##_dir.vpk` name.
        let occupied = mods.iter().any(|m| {
            m.id != target.id && parse_pak_number(&m.file_name) == Some(new_priority)
        });
        if occupied {
            return Err(ModError::PriorityInUse(new_priority));
        }

        let source = PathBuf::from(&target.path);
        let parent = source
            .parent()
            .ok_or_else(|| ModError::ModNotFound(mod_id.to_string()))?;
        let new_file_name = format!("pak{new_priority:02}_dir.vpk");
        let dest = parent.join(&new_file_name);

        tokio::fs::rename(&source, &dest)
            .await
            .map_err(|e| ModError::io(&source, e))?;

        target.priority = new_priority;
        target.file_name = new_file_name;
        target.path = dest.to_string_lossy().to_string();
        Ok(target)
    }

    /// Lowest free `pak##` slot at or above `preferred`, checking both
    /// directories.
    pub async fn next_free_pak_number(&self, preferred: u32) -> ModResult<u32> {
        let used: Vec<u32> = self
            .scan()
            .await?
            .iter()
            .filter_map(|m| parse_pak_number(&m.file_name))
            .collect();
        let mut candidate = preferred.min(99);
        while used.contains(&candidate) {
            candidate += 1;
            if candidate > 99 {
                return Err(ModError::Other("no free pak slot below 100".to_string()));
            }
        }
        Ok(candidate)
    }
}

#[async_trait]
impl ModToggler for ModStore {
    async fn set_enabled(&self, mod_id: &str, enabled: bool) -> ModResult<()> {
        if enabled {
            self.enable(mod_id).await?;
        } else {
            self.disable(mod_id).await?;
        }
        Ok(())
    }
}

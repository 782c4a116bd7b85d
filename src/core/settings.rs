use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{ModError, ModResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub game_path: Option<String>,
    pub auto_configure_game_info: bool,
    pub dev_mode: bool,
    pub dev_game_path: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            game_path: None,
            auto_configure_game_info: true,
            dev_mode: false,
            dev_game_path: None,
        }
    }
}

impl AppSettings {
    /// The install path toggles should run against, honoring dev mode.
    pub fn effective_game_path(&self) -> Option<&str> {
        if self.dev_mode {
            self.dev_game_path.as_deref().or(self.game_path.as_deref())
        } else {
            self.game_path.as_deref()
        }
    }
}

/// Reads and writes `settings.json` under the app's config directory.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("settings.json"),
        }
    }

    /// Per-user default location.
    pub fn default_location() -> ModResult<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| ModError::Settings("no user config directory".to_string()))?;
        Ok(Self::new(&base.join("citadel-mods")))
    }

    pub async fn load(&self) -> ModResult<AppSettings> {
        if !self.path.exists() {
            return Ok(AppSettings::default());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ModError::io(&self.path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn save(&self, settings: &AppSettings) -> ModResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ModError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ModError::io(&self.path, e))?;
        Ok(())
    }
}

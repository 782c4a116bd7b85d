// ─── Game install discovery ───
// Locates the Deadlock install inside the usual Steam library layouts,
// exposes the addon directories the mod store operates on, and keeps
// gameinfo.gi mounting those directories.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::error::{ModError, ModResult};
use crate::core::settings::AppSettings;

const GAME_FOLDER: &str = "Deadlock";
const ADDONS_SUBDIR: &str = "game/citadel/addons";
const DISABLED_SUBDIR: &str = "game/citadel/addons/.disabled";

/// Steam library `common/` directories worth probing on this OS.
fn steam_library_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "linux")]
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".steam/steam/steamapps/common"));
        paths.push(home.join(".local/share/Steam/steamapps/common"));
        // Flatpak Steam
        paths.push(home.join(".var/app/com.valvesoftware.Steam/.steam/steam/steamapps/common"));
    }

    #[cfg(target_os = "windows")]
    {
        paths.push(PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common"));
        paths.push(PathBuf::from(r"C:\Program Files\Steam\steamapps\common"));
        paths.push(PathBuf::from(r"D:\Steam\steamapps\common"));
        paths.push(PathBuf::from(r"D:\SteamLibrary\steamapps\common"));
    }

    #[cfg(target_os = "macos")]
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("Library/Application Support/Steam/steamapps/common"));
    }

    paths
}

/// Probe the known Steam libraries for a valid install.
pub fn detect_install() -> Option<PathBuf> {
    for library in steam_library_paths() {
        let candidate = library.join(GAME_FOLDER);
        if is_valid_install(&candidate) {
            debug!(path = %candidate.display(), "detected game install");
            return Some(candidate);
        }
    }
    None
}

/// Resolve the install path from settings, falling back to Steam library
/// auto-detection when none is configured.
pub fn resolve_install(settings: &AppSettings) -> ModResult<PathBuf> {
    if let Some(configured) = settings.effective_game_path() {
        let path = PathBuf::from(configured);
        if !is_valid_install(&path) {
            return Err(ModError::InvalidInstallPath(path.display().to_string()));
        }
        return Ok(path);
    }
    detect_install().ok_or(ModError::InstallNotFound)
}

/// A valid install carries the `game/citadel` tree.
pub fn is_valid_install(path: &Path) -> bool {
    path.join("game").exists() && path.join("game/citadel").exists()
}

/// Addons directory, created on demand.
pub fn addons_path(game_path: &Path) -> ModResult<PathBuf> {
    ensure_dir(game_path.join(ADDONS_SUBDIR))
}

/// Disabled-mods directory, created on demand.
pub fn disabled_path(game_path: &Path) -> ModResult<PathBuf> {
    ensure_dir(game_path.join(DISABLED_SUBDIR))
}

/// The `gameinfo.gi` config file of the install.
pub fn gameinfo_path(game_path: &Path) -> PathBuf {
    game_path.join("game/citadel/gameinfo.gi")
}

/// Resolve the install and, when settings ask for it, make sure
/// `gameinfo.gi` mounts the addon search paths before any toggling runs.
pub async fn prepare_install(settings: &AppSettings) -> ModResult<PathBuf> {
    let game_path = resolve_install(settings)?;
    if settings.auto_configure_game_info {
        let status = gameinfo_status(&game_path).await?;
        if !status.configured {
            configure_gameinfo(&game_path).await?;
        }
    }
    Ok(game_path)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameinfoStatus {
    pub configured: bool,
    pub message: String,
}

/// Whether `gameinfo.gi` currently mounts the addon search paths.
pub async fn gameinfo_status(game_path: &Path) -> ModResult<GameinfoStatus> {
    let path = gameinfo_path(game_path);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ModError::io(&path, e))?;
    let configured = is_gameinfo_configured(&content);
    Ok(GameinfoStatus {
        configured,
        message: if configured {
            "gameinfo.gi is configured for addons.".to_string()
        } else {
            "gameinfo.gi is missing addon search paths.".to_string()
        },
    })
}

/// Rewrite `gameinfo.gi` so the addon search paths are mounted. Leaves the
/// file untouched when it already matches.
pub async fn configure_gameinfo(game_path: &Path) -> ModResult<GameinfoStatus> {
    let path = gameinfo_path(game_path);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ModError::io(&path, e))?;
    if is_gameinfo_configured(&content) {
        return Ok(GameinfoStatus {
            configured: true,
            message: "gameinfo.gi is configured for addons.".to_string(),
        });
    }
    let updated = normalize_gameinfo(&content)?;
    if updated != content {
        tokio::fs::write(&path, updated)
            .await
            .map_err(|e| ModError::io(&path, e))?;
        info!(path = %path.display(), "rewrote gameinfo.gi addon search paths");
    }
    Ok(GameinfoStatus {
        configured: true,
        message: "gameinfo.gi updated with addon paths.".to_string(),
    })
}

fn is_gameinfo_configured(content: &str) -> bool {
    content.contains("Game                citadel/addons")
        && content.contains("AddonRoot           citadel_addons")
        && content.contains("OfficialAddonRoot   citadel_community_addons")
        && content.contains("\"UseOfficialAddons\" \"1\"")
}

/// The FileSystem/AddonConfig blocks the game expects once addons are
/// mounted. The search-path order matters: `citadel/addons` must come
/// before `citadel` so addon VPKs override stock assets.
const GAMEINFO_TARGET_BLOCK: &str = r#"FileSystem
	{
		SearchPaths
		{
			// Language paths must be mounted first.
			Game_Language		citadel_*LANGUAGE*

			Mod                 citadel
			Write               citadel
			Game                citadel/addons
			Game                citadel
			Mod                 core
			Write               core
			Game                core
			AddonRoot           citadel_addons
			OfficialAddonRoot   citadel_community_addons
		}
	}
	AddonConfig
	{
		"UseOfficialAddons" "1"
	}"#;

fn normalize_gameinfo(content: &str) -> ModResult<String> {
    let without_addon = remove_block(content, "AddonConfig");
    let Some((start, end)) = find_block(&without_addon, "FileSystem") else {
        return Err(ModError::Settings(
            "FileSystem block not found in gameinfo.gi".to_string(),
        ));
    };
    let mut updated = String::new();
    updated.push_str(&without_addon[..start]);
    updated.push_str(GAMEINFO_TARGET_BLOCK);
    updated.push_str(&without_addon[end..]);
    Ok(updated)
}

/// Byte span of `key { ... }` with balanced braces, `key` included.
fn find_block(content: &str, key: &str) -> Option<(usize, usize)> {
    let key_index = content.find(key)?;
    let brace_index = content[key_index..].find('{')? + key_index;
    let mut depth = 0;
    for (offset, ch) in content[brace_index..].char_indices() {
        if ch == '{' {
            depth += 1;
        } else if ch == '}' {
            depth -= 1;
            if depth == 0 {
                return Some((key_index, brace_index + offset + 1));
            }
        }
    }
    None
}

fn remove_block(content: &str, key: &str) -> String {
    match find_block(content, key) {
        Some((start, end)) => {
            let mut updated = String::new();
            updated.push_str(&content[..start]);
            updated.push_str(&content[end..]);
            updated
        }
        None => content.to_string(),
    }
}

fn ensure_dir(path: PathBuf) -> ModResult<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(&path).map_err(|e| ModError::io(&path, e))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_citadel_layout() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_valid_install(tmp.path()));

        std::fs::create_dir_all(tmp.path().join("game/citadel")).unwrap();
        assert!(is_valid_install(tmp.path()));
    }

    #[test]
    fn resolve_rejects_configured_non_install() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = AppSettings::default();
        settings.game_path = Some(tmp.path().join("nope").display().to_string());

        let err = resolve_install(&settings).unwrap_err();
        assert!(matches!(err, ModError::InvalidInstallPath(_)));

        std::fs::create_dir_all(tmp.path().join("game/citadel")).unwrap();
        settings.game_path = Some(tmp.path().display().to_string());
        assert_eq!(resolve_install(&settings).unwrap(), tmp.path());
    }

    #[test]
    fn addon_dirs_are_created_on_demand() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("game/citadel")).unwrap();

        let addons = addons_path(tmp.path()).unwrap();
        let disabled = disabled_path(tmp.path()).unwrap();
        assert!(addons.is_dir());
        assert!(disabled.is_dir());
        assert!(disabled.starts_with(&addons));
    }

    const STOCK_GAMEINFO: &str = r#""GameInfo"
{
	game		"Citadel"

	FileSystem
	{
		SearchPaths
		{
			Game_Language		citadel_*LANGUAGE*
			Mod                 citadel
			Write               citadel
			Game                citadel
		}
	}

	Engine2
	{
		"HasModAppSystems" "1"
	}
}"#;

    fn fake_install_with_gameinfo(content: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("game/citadel")).unwrap();
        std::fs::write(gameinfo_path(tmp.path()), content).unwrap();
        tmp
    }

    #[tokio::test]
    async fn stock_gameinfo_is_reported_unconfigured() {
        let tmp = fake_install_with_gameinfo(STOCK_GAMEINFO);
        let status = gameinfo_status(tmp.path()).await.unwrap();
        assert!(!status.configured);
    }

    #[tokio::test]
    async fn configure_rewrites_search_paths_and_is_idempotent() {
        let tmp = fake_install_with_gameinfo(STOCK_GAMEINFO);

        configure_gameinfo(tmp.path()).await.unwrap();
        let status = gameinfo_status(tmp.path()).await.unwrap();
        assert!(status.configured);

        let first = std::fs::read_to_string(gameinfo_path(tmp.path())).unwrap();
        assert!(first.contains("Game                citadel/addons"));
        assert!(first.contains("Engine2"));

        configure_gameinfo(tmp.path()).await.unwrap();
        let second = std::fs::read_to_string(gameinfo_path(tmp.path())).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn configure_requires_a_filesystem_block() {
        let tmp = fake_install_with_gameinfo("\"GameInfo\"\n{\n\tgame \"Citadel\"\n}\n");
        let err = configure_gameinfo(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ModError::Settings(_)));
    }

    #[tokio::test]
    async fn prepare_install_honors_auto_configure_flag() {
        let tmp = fake_install_with_gameinfo(STOCK_GAMEINFO);
        let mut settings = AppSettings::default();
        settings.game_path = Some(tmp.path().display().to_string());

        settings.auto_configure_game_info = false;
        prepare_install(&settings).await.unwrap();
        assert!(!gameinfo_status(tmp.path()).await.unwrap().configured);

        settings.auto_configure_game_info = true;
        prepare_install(&settings).await.unwrap();
        assert!(gameinfo_status(tmp.path()).await.unwrap().configured);
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the engine.
/// Every module returns `Result<T, ModError>`.
///
/// Recoverable conditions never show up here: duplicate taxonomy nodes,
/// unresolvable category ids, unparsable variant names and no-match lookups
/// are all ordinary values (`None`, `uncategorized`, partial-failure
/// outcomes), not errors.
#[derive(Debug, Error)]
pub enum ModError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vendor API error at {endpoint}: HTTP {status}")]
    VendorApi { endpoint: String, status: u16 },

    // ── Serialization ───────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive entry not found: {0}")]
    ArchiveEntryNotFound(String),

    // ── Game install ────────────────────────────────────
    #[error("Game installation not found")]
    InstallNotFound,

    #[error("Invalid game path: {0}")]
    InvalidInstallPath(String),

    // ── Mod store ───────────────────────────────────────
    #[error("Mod not found: {0}")]
    ModNotFound(String),

    #[error("Priority {0} is already in use")]
    PriorityInUse(u32),

    // ── Settings / generic ──────────────────────────────
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ModResult<T> = Result<T, ModError>;

impl ModError {
    /// Attach path context to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for ModError {
    fn from(source: std::io::Error) -> Self {
        ModError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// ── Serialization for IPC ───────────────────────────────
// Frontends (Tauri-style command layers) need the error type to implement
// `Serialize`; the string form is what gets surfaced.
impl serde::Serialize for ModError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

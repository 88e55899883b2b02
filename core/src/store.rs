//! JSON save file persistence.
//!
//! RULE: Only store.rs touches the save file.
//! Writes go to `save_data.json.tmp` in the same directory, are flushed to
//! disk, then renamed over `save_data.json`. A crash at any point leaves
//! either the previous document or the new one, never a torn file.

use crate::{
    config::GameConfig,
    error::{GameError, GameResult},
    save_document::SaveDocument,
    state::EconomyState,
    types::APP_NAME,
};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

pub const SAVE_FILE_NAME: &str = "save_data.json";
const TEMP_SUFFIX: &str = ".tmp";

pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// A store rooted at an explicit directory (tests, `--save-dir`).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user store for this platform, or `None` when no data
    /// directory can be resolved.
    pub fn platform_default() -> Option<Self> {
        resolve_save_directory().map(Self::at)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SAVE_FILE_NAME)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{SAVE_FILE_NAME}{TEMP_SUFFIX}"))
    }

    /// Read and parse the save document.
    pub fn load_document(&self) -> GameResult<SaveDocument> {
        let content = fs::read_to_string(self.path())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the saved game. Never fails: a missing, unreadable or malformed
    /// file yields a brand-new game.
    pub fn load_state(&self, config: &GameConfig) -> EconomyState {
        match self.load_document() {
            Ok(doc) => {
                log::info!("Loaded save from {}", self.path().display());
                doc.restore(config)
            }
            Err(GameError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No save at {}, starting fresh", self.path().display());
                EconomyState::new(config)
            }
            Err(e) => {
                log::warn!("Could not load {}: {e}; starting fresh", self.path().display());
                EconomyState::new(config)
            }
        }
    }

    /// First half of a save: write and flush the temp file. The live save
    /// is untouched until `StagedSave::commit`.
    pub fn stage(&self, state: &EconomyState) -> GameResult<StagedSave> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&SaveDocument::capture(state))?;

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        Ok(StagedSave { temp, target: self.path() })
    }

    /// Atomically replace the save file with `state`.
    pub fn save(&self, state: &EconomyState) -> GameResult<()> {
        self.stage(state)?.commit()?;
        log::info!("Saved game to {}", self.path().display());
        Ok(())
    }

    /// Remove the save file. A missing file is not an error.
    pub fn delete(&self) -> GameResult<()> {
        for path in [self.path(), self.temp_path()] {
            match fs::remove_file(&path) {
                Ok(()) => log::info!("Deleted {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// A fully written temp file waiting to replace the live save.
#[derive(Debug)]
pub struct StagedSave {
    temp:   PathBuf,
    target: PathBuf,
}

impl StagedSave {
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Rename the temp file over the live save.
    pub fn commit(self) -> GameResult<()> {
        if let Err(e) = fs::rename(&self.temp, &self.target) {
            let _ = fs::remove_file(&self.temp);
            return Err(e.into());
        }
        Ok(())
    }
}

// ── Save directory resolution ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }
}

/// The per-user data directory for `platform`, looking variables up
/// through `env`. Relative paths are rejected so the result never depends
/// on the working directory.
pub fn resolve_save_directory_for<F>(platform: Platform, env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let absolute = |name: &str| {
        env(name)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
    };

    let base = match platform {
        Platform::Windows => absolute("LOCALAPPDATA").or_else(|| absolute("APPDATA")),
        Platform::MacOs => absolute("HOME").map(|h| h.join("Library").join("Application Support")),
        Platform::Unix => absolute("XDG_DATA_HOME")
            .or_else(|| absolute("HOME").map(|h| h.join(".local").join("share"))),
    }?;
    Some(base.join(APP_NAME))
}

pub fn resolve_save_directory() -> Option<PathBuf> {
    resolve_save_directory_for(Platform::current(), |name| std::env::var(name).ok())
}

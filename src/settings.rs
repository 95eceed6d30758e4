use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

/// Single-line file holding the last opened file or directory.
pub const SETTINGS_FILE_NAME: &str = "silane_ave_app.config";
/// Folder under the desktop that receives all chart images.
pub const OUTPUT_DIR_NAME: &str = "shilane_result";

// ---------------------------------------------------------------------------
// Well-known locations
// ---------------------------------------------------------------------------

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `~/Documents`, the fallback directory for the open dialog.
pub fn documents_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| home_dir().join("Documents"))
}

/// `~/Desktop/shilane_result`.
pub fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .unwrap_or_else(|| home_dir().join("Desktop"))
        .join(OUTPUT_DIR_NAME)
}

pub fn default_settings_path() -> PathBuf {
    documents_dir().join(SETTINGS_FILE_NAME)
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Where the open dialog starts and which file reopens at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    path: PathBuf,
    fallback_dir: PathBuf,
    pub last_opened_file: Option<PathBuf>,
    pub default_open_dir: PathBuf,
}

impl Settings {
    /// Settings stored at `path`, falling back to `fallback_dir` when the
    /// stored location is missing or gone.
    pub fn new(path: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
        let fallback_dir = fallback_dir.into();
        Self {
            path: path.into(),
            last_opened_file: None,
            default_open_dir: fallback_dir.clone(),
            fallback_dir,
        }
    }

    /// Read the settings file. Errors are logged and leave the defaults.
    pub fn load(path: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
        let mut settings = Self::new(path, fallback_dir);
        if let Err(e) = settings.read() {
            warn!("Failed to read settings: {e:#}");
        }
        settings
    }

    fn read(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let stored = text.trim();
        if stored.is_empty() {
            return Ok(());
        }
        let stored = PathBuf::from(stored);
        if stored.is_file() {
            self.default_open_dir = stored
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.fallback_dir.clone());
            self.last_opened_file = Some(stored);
        } else if stored.is_dir() {
            self.default_open_dir = stored;
        }
        Ok(())
    }

    /// Remember a file the user just opened.
    pub fn remember_file(&mut self, file: &Path) {
        self.last_opened_file = Some(file.to_path_buf());
        if let Some(parent) = file.parent() {
            self.default_open_dir = parent.to_path_buf();
        }
    }

    /// The path written to disk: the last file if it still exists, else the
    /// open directory if it exists, else the fallback directory.
    pub fn path_to_store(&self) -> &Path {
        match &self.last_opened_file {
            Some(file) if file.is_file() => file.as_path(),
            _ if self.default_open_dir.is_dir() => self.default_open_dir.as_path(),
            _ => self.fallback_dir.as_path(),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let stored = self.path_to_store();
        std::fs::write(&self.path, stored.to_string_lossy().as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        info!("Saved settings: {}", stored.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("silane-peak-settings-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = scratch_dir("missing");
        let s = Settings::load(dir.join("none.config"), &dir);
        assert_eq!(s.last_opened_file, None);
        assert_eq!(s.default_open_dir, dir);
    }

    #[test]
    fn stored_file_sets_file_and_directory() {
        let dir = scratch_dir("file");
        let data = dir.join("run.csv");
        std::fs::write(&data, "a,b,c\n").unwrap();
        let cfg = dir.join("app.config");
        std::fs::write(&cfg, format!("{}\n", data.display())).unwrap();

        let s = Settings::load(&cfg, "/fallback");
        assert_eq!(s.last_opened_file.as_deref(), Some(data.as_path()));
        assert_eq!(s.default_open_dir, dir);
    }

    #[test]
    fn stored_directory_sets_only_the_directory() {
        let dir = scratch_dir("dir");
        let cfg = dir.join("app.config");
        std::fs::write(&cfg, dir.display().to_string()).unwrap();

        let s = Settings::load(&cfg, "/fallback");
        assert_eq!(s.last_opened_file, None);
        assert_eq!(s.default_open_dir, dir);
    }

    #[test]
    fn vanished_path_falls_back() {
        let dir = scratch_dir("vanished");
        let cfg = dir.join("app.config");
        std::fs::write(&cfg, dir.join("gone.csv").display().to_string()).unwrap();

        let s = Settings::load(&cfg, &dir);
        assert_eq!(s.last_opened_file, None);
        assert_eq!(s.default_open_dir, dir);
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = scratch_dir("save");
        let data = dir.join("run.xlsx");
        std::fs::write(&data, b"").unwrap();
        let cfg = dir.join("nested").join("app.config");

        let mut s = Settings::new(&cfg, &dir);
        s.remember_file(&data);
        s.save().unwrap();
        assert_eq!(std::fs::read_to_string(&cfg).unwrap(), data.display().to_string());

        let loaded = Settings::load(&cfg, "/fallback");
        assert_eq!(loaded.last_opened_file.as_deref(), Some(data.as_path()));
    }

    #[test]
    fn deleted_file_stores_its_directory() {
        let dir = scratch_dir("deleted");
        let mut s = Settings::new(dir.join("app.config"), "/fallback");
        s.remember_file(&dir.join("deleted.csv"));
        assert_eq!(s.path_to_store(), dir.as_path());
    }
}

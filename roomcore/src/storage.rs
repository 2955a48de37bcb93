//! Storage utilities for QuietRoom.
//!
//! Error type, well-known directories, and the file browser state used
//! by the open/save dialogs.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("theme not found: {0}")]
    ThemeNotFound(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Config directory for QuietRoom (preferences live here).
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "quietroom", "quietroom")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Data directory (themes and autosave snapshots live under here).
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "quietroom", "quietroom")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The user's own themes directory. Themes saved from the preferences
/// dialog land here, and it is first in the lookup order.
pub fn user_themes_dir() -> PathBuf {
    data_dir().join("themes")
}

/// System-wide themes directory (package-installed themes).
pub fn system_themes_dir() -> PathBuf {
    PathBuf::from("/usr/share/quietroom/themes")
}

/// Bundled theme directories, searched relative to the executable so an
/// uninstalled build still finds the themes shipped in the source tree.
pub fn bundled_themes_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.join("themes"));
            // Cargo workspace: exe is in target/debug or target/release
            if let Some(parent) = dir.parent() {
                if let Some(grandparent) = parent.parent() {
                    dirs.push(grandparent.join("themes"));
                }
            }
        }
    }
    dirs
}

/// Full theme lookup order: user dir, system dir, bundled dirs.
pub fn theme_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![user_themes_dir(), system_themes_dir()];
    dirs.extend(bundled_themes_dirs());
    dirs
}

/// Where autosave snapshots of modified buffers are written.
pub fn autosave_dir() -> PathBuf {
    data_dir().join("autosave")
}

/// The user's documents directory, starting point for open/save dialogs.
pub fn documents_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// One row in the open/save dialog listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Directory listing state for the open/save dialogs.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected_index: Option<usize>,
    filter_extensions: Vec<String>,
}

impl FileBrowser {
    pub fn new(start_dir: PathBuf) -> Self {
        let mut browser = Self {
            current_dir: start_dir,
            entries: Vec::new(),
            selected_index: None,
            filter_extensions: Vec::new(),
        };
        browser.refresh();
        browser
    }

    /// Restrict listed files to the given extensions (lowercase, no dot).
    pub fn with_filter(mut self, extensions: Vec<String>) -> Self {
        self.filter_extensions = extensions;
        self.refresh();
        self
    }

    /// Re-read the current directory. Hidden files are skipped,
    /// directories sort before files, both alphabetically.
    pub fn refresh(&mut self) {
        self.entries.clear();
        self.selected_index = None;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_directory: true,
            });
        }

        let read_dir = match std::fs::read_dir(&self.current_dir) {
            Ok(rd) => rd,
            Err(_) => return,
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let is_directory = path.is_dir();
            if !is_directory && !self.matches_filter(&path) {
                continue;
            }
            let entry = FileEntry { name, path, is_directory };
            if is_directory {
                dirs.push(entry);
            } else {
                files.push(entry);
            }
        }

        dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.entries.extend(dirs);
        self.entries.extend(files);
    }

    fn matches_filter(&self, path: &Path) -> bool {
        if self.filter_extensions.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.filter_extensions.iter().any(|f| *f == ext)
    }

    pub fn navigate_to(&mut self, path: PathBuf) {
        if path.is_dir() {
            self.current_dir = path;
            self.refresh();
        }
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.selected_index.and_then(|i| self.entries.get(i))
    }
}

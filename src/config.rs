use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{NotesError, Result, NOTES_STORAGE_KEY};

const CONFIG_FILE_NAME: &str = "config.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage slots
    pub data_dir: PathBuf,

    /// Slot the note collection is stored under
    pub storage_key: String,

    /// Editor command used by `--edit`
    pub editor_command: Option<String>,

    /// Ask before deleting a note
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".simplenotes"));

        Self {
            data_dir,
            storage_key: NOTES_STORAGE_KEY.to_string(),
            editor_command: None,
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Default location of the configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `path`, or from the default location.
    ///
    /// An explicitly given file must exist; a missing default file yields the
    /// defaults. Fields absent from the file keep their default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(NotesError::FileNotFound {
                    file_path: path.display().to_string(),
                });
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        info!("Loading configuration from {}", path.display());
        let raw = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| NotesError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;

        if config.storage_key.trim().is_empty() {
            return Err(NotesError::ConfigError {
                message: "storage_key must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "simplenotes")
}

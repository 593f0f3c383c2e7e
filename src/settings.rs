// Import necessary libraries and modules for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::rules::RuleTables;

// Where settings and the log file live: ~/vtm_progression/data
pub fn data_dir() -> Result<PathBuf> {
    let home_dir = dir::home_dir().ok_or(AppError::NoHomeDirectory)?;
    Ok(home_dir.join("vtm_progression").join("data"))
}

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub export_dir: PathBuf,          // Directory character sheets are exported to.
    pub free_mode_default: bool,      // Preselect Free Mode on the greeting screen.
    pub debug_mode: bool,             // Log at debug level.
    pub rules_path: Option<PathBuf>, // Optional JSON replacing the built-in V20 tables.
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            export_dir: PathBuf::from("."),
            free_mode_default: false,
            debug_mode: false,
            rules_path: None,
        }
    }
}

impl Settings {
    // Load settings from the default file path, creating it on first run.
    pub fn load() -> Result<Self> {
        Self::load_or_create(data_dir()?.join("settings.json"))
    }

    /// Reads `path`, or writes the defaults there when no file exists yet.
    /// An unreadable or malformed file is reported and left untouched.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::load_settings_from_file(path) {
            Err(AppError::IO(e)) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to_file(path)?;
                Ok(settings)
            }
            result => result,
        }
    }

    // Save current settings to the default file path.
    pub fn save(&self) -> Result<()> {
        self.save_to_file(data_dir()?.join("settings.json"))
    }

    pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// The configured rule tables, or V20 when none are configured or the file is unusable.
    pub fn rules(&self) -> RuleTables {
        match &self.rules_path {
            Some(path) => RuleTables::load_from_file(path).unwrap_or_else(|e| {
                log::error!("Could not load rules from {}: {e}", path.display());
                RuleTables::default()
            }),
            None => RuleTables::default(),
        }
    }
}
